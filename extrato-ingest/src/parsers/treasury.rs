//! Tesouro Direto custody statements.
//!
//! Expected text rows:
//!   Tesouro IPCA+ 2035                 R$ 1.500,00
//!   Tesouro Selic 2029
//!   Saldo Tesouro                      R$ 3.210,77
//!
//! Each bond title is its own balance, labelled by the title text.

use extrato_core::{Extraction, StatementFamily};

use super::FamilyExtractor;
use crate::error::Result;
use crate::rules::{BalanceRule, FeeRule, LabelSource, MatchMode, RuleSet};

pub const BALANCE_RULES: &[BalanceRule] = &[
    BalanceRule {
        label: LabelSource::Captured { fallback: "Tesouro" },
        pattern: r"(?i)(?P<label>Tesouro\s+(?:IPCA\+?|Selic|Prefixado|Renda\+?|Educa\+?)[^\n]*?)\s*R\$\s*(?P<amount>\d[\d.,]*\d|\d)",
        mode: MatchMode::Each,
    },
    BalanceRule {
        label: LabelSource::PrecedingLine { fallback: "Tesouro" },
        pattern: r"(?i)Saldo\s+(?:Tesouro|IPCA|Selic)[^\n]*?R\$\s*(?P<amount>\d[\d.,]*\d|\d)",
        mode: MatchMode::Each,
    },
];

pub const FEE_RULES: &[FeeRule] = &[];

#[derive(Debug, Clone)]
pub struct TreasuryExtractor {
    rules: RuleSet,
}

impl TreasuryExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rules: RuleSet::compile(BALANCE_RULES, FEE_RULES)?,
        })
    }
}

impl FamilyExtractor for TreasuryExtractor {
    fn family(&self) -> StatementFamily {
        StatementFamily::Treasury
    }

    fn extract(&self, text: &str) -> Extraction {
        self.rules.evaluate(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_title_line() {
        let out = TreasuryExtractor::new()
            .unwrap()
            .extract("Tesouro IPCA 2035 R$ 1.500,00");
        assert_eq!(out.balances.len(), 1);
        assert_eq!(out.balances.get("Tesouro IPCA 2035"), Some(&1500.0));
        assert!(out.fee_rates.is_empty());
    }

    #[test]
    fn test_multiple_titles_keep_their_labels() {
        let text = r#"
TESOURO DIRETO - EXTRATO DE CUSTÓDIA (B3)
Tesouro IPCA+ 2035            R$ 1.500,00
Tesouro Selic 2029            R$ 10.250,37
Tesouro Prefixado 2027        R$ 0,00
"#;
        let out = TreasuryExtractor::new().unwrap().extract(text);
        assert_eq!(out.balances.len(), 2);
        assert_eq!(out.balances.get("Tesouro IPCA+ 2035"), Some(&1500.0));
        assert_eq!(out.balances.get("Tesouro Selic 2029"), Some(&10250.37));
    }

    #[test]
    fn test_saldo_line_labelled_by_preceding_line() {
        let text = "Tesouro Educa+ 2040\nSaldo Tesouro R$ 3.210,77";
        let out = TreasuryExtractor::new().unwrap().extract(text);
        assert_eq!(out.balances.get("Tesouro Educa+ 2040"), Some(&3210.77));
        assert_eq!(out.balances.len(), 1);
    }

    #[test]
    fn test_saldo_line_without_context_uses_fallback() {
        let out = TreasuryExtractor::new()
            .unwrap()
            .extract("Saldo Selic R$ 99,90");
        assert_eq!(out.balances.get("Tesouro"), Some(&99.9));
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let ex = TreasuryExtractor::new().unwrap();
        let text = "Tesouro Selic 2029 R$ 100,00\nSaldo IPCA R$ 50,00";
        assert_eq!(ex.extract(text), ex.extract(text));
    }
}
