//! Bank investment statements (CDB, LCI, LCA, savings)

use extrato_core::{Extraction, StatementFamily};

use super::FamilyExtractor;
use crate::error::Result;
use crate::rules::{BalanceRule, FeeRule, LabelSource, MatchMode, RuleSet};

pub const BALANCE_RULES: &[BalanceRule] = &[
    BalanceRule {
        label: LabelSource::Fixed("CDB"),
        pattern: r"(?i)\bCDB\b[\s\S]{0,160}?R\$\s*(?P<amount>\d[\d.,]*\d|\d)",
        mode: MatchMode::First,
    },
    BalanceRule {
        label: LabelSource::Fixed("LCI"),
        pattern: r"(?i)\bLCI\b[\s\S]{0,160}?R\$\s*(?P<amount>\d[\d.,]*\d|\d)",
        mode: MatchMode::First,
    },
    BalanceRule {
        label: LabelSource::Fixed("LCA"),
        pattern: r"(?i)\bLCA\b[\s\S]{0,160}?R\$\s*(?P<amount>\d[\d.,]*\d|\d)",
        mode: MatchMode::First,
    },
    BalanceRule {
        label: LabelSource::Fixed("Aplicações"),
        pattern: r"(?i)\b(?:Saldo|Aplica[çc][ãa]o|Poupan[çc]a)\b[\s\S]{0,160}?R\$\s*(?P<amount>\d[\d.,]*\d|\d)",
        mode: MatchMode::First,
    },
];

pub const FEE_RULES: &[FeeRule] = &[];

#[derive(Debug, Clone)]
pub struct BankExtractor {
    rules: RuleSet,
}

impl BankExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: RuleSet::compile(BALANCE_RULES, FEE_RULES)?,
        })
    }
}

impl FamilyExtractor for BankExtractor {
    fn family(&self) -> StatementFamily {
        StatementFamily::Bank
    }

    fn extract(&self, text: &str) -> Extraction {
        self.rules.evaluate(text)
    }
}
