//! Brokerage (corretora) consolidated position statements.
//!
//! Expected text, one section per asset class:
//!   Renda Fixa                 R$ 12.500,00
//!   Renda Variável             R$ 8.300,45
//!   Fundos de Investimento     R$ 4.000,00
//!   Taxa de administração: 0,50%

use extrato_core::{Extraction, StatementFamily};

use super::FamilyExtractor;
use crate::error::Result;
use crate::rules::{BalanceRule, FeeRule, LabelSource, MatchMode, RuleSet};

pub const BALANCE_RULES: &[BalanceRule] = &[
    BalanceRule {
        label: LabelSource::Fixed("Renda Fixa"),
        pattern: r"(?i)\bRenda\s+Fixa\b[\s\S]{0,160}?R\$\s*(?P<amount>\d[\d.,]*\d|\d)",
        mode: MatchMode::First,
    },
    BalanceRule {
        label: LabelSource::Fixed("Renda Variável"),
        pattern: r"(?i)\bRenda\s+Vari[áa]vel\b[\s\S]{0,160}?R\$\s*(?P<amount>\d[\d.,]*\d|\d)",
        mode: MatchMode::First,
    },
    BalanceRule {
        label: LabelSource::Fixed("Fundos"),
        pattern: r"(?i)\bFundos?\b[\s\S]{0,160}?R\$\s*(?P<amount>\d[\d.,]*\d|\d)",
        mode: MatchMode::First,
    },
];

pub const FEE_RULES: &[FeeRule] = &[FeeRule {
    label: "Taxa",
    pattern: r"(?i)\bTaxa\s+(?:de\s+)?(?:administra[çc][ãa]o|corretagem)\s*:?\s*(?P<rate>\d[\d.,]*)\s*%",
}];

#[derive(Debug, Clone)]
pub struct BrokerageExtractor {
    rules: RuleSet,
}

impl BrokerageExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: RuleSet::compile(BALANCE_RULES, FEE_RULES)?,
        })
    }
}

impl FamilyExtractor for BrokerageExtractor {
    fn family(&self) -> StatementFamily {
        StatementFamily::Brokerage
    }

    fn extract(&self, text: &str) -> Extraction {
        self.rules.evaluate(text)
    }
}
