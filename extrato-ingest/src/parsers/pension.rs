//! Private pension (previdência) statements.
//!
//! The plan total is captured under a generic label first and then renamed to
//! the plan's product code (PGBL/VGBL) when the statement names one.

use extrato_core::{Extraction, StatementFamily};

use super::FamilyExtractor;
use crate::error::Result;
use crate::rules::{BalanceRule, FeeRule, LabelSource, MatchMode, RuleSet};

pub const PENSION_TOTAL: &str = "Previdência Privada";

/// Product codes checked in priority order
pub const PRODUCT_CODES: &[&str] = &["PGBL", "VGBL"];

pub const BALANCE_RULES: &[BalanceRule] = &[BalanceRule {
    label: LabelSource::Fixed(PENSION_TOTAL),
    pattern: r"(?i)(?:\bSaldo\s+)?\bTotal\b[\s\S]{0,160}?R\$\s*(?P<amount>\d[\d.,]*\d|\d)",
    mode: MatchMode::First,
}];

pub const FEE_RULES: &[FeeRule] = &[
    FeeRule {
        label: "Taxa de Administração",
        pattern: r"(?i)\bTaxa\s+de\s+administra[çc][ãa]o\s*:?\s*(?P<rate>\d[\d.,]*)\s*%",
    },
    FeeRule {
        label: "Taxa de Carregamento",
        pattern: r"(?i)\bTaxa\s+de\s+carregamento\s*:?\s*(?P<rate>\d[\d.,]*)\s*%",
    },
];

#[derive(Debug, Clone)]
pub struct PensionExtractor {
    rules: RuleSet,
}

impl PensionExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: RuleSet::compile(BALANCE_RULES, FEE_RULES)?,
        })
    }
}

/// First product code mentioned anywhere in the text
pub fn product_code(text: &str) -> Option<&'static str> {
    let upper = text.to_uppercase();
    PRODUCT_CODES.iter().copied().find(|code| upper.contains(code))
}

impl FamilyExtractor for PensionExtractor {
    fn family(&self) -> StatementFamily {
        StatementFamily::Pension
    }

    fn extract(&self, text: &str) -> Extraction {
        let mut out = self.rules.evaluate(text);

        if let Some(code) = product_code(text) {
            if let Some(total) = out.balances.remove(PENSION_TOTAL) {
                out.balances.insert(code.to_string(), total);
            }
        }

        out
    }
}
