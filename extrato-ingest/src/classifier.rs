//! Keyword classifier assigning a statement family to raw text.
//!
//! Rules are checked in table order and the first family with a keyword hit
//! wins, so a brokerage statement listing CDBs still lands in `Brokerage`.

use extrato_core::StatementFamily;
use regex::Regex;

use crate::error::{IngestError, Result};

/// One row of the classifier table. All keywords are uppercase.
#[derive(Debug, Clone, Copy)]
pub struct FamilyRule {
    pub family: StatementFamily,
    /// Hit anywhere in the text, including inside longer words ("CDBS")
    pub keywords: &'static [&'static str],
    /// Short brand tokens, hit only as whole words
    pub tokens: &'static [&'static str],
}

pub const FAMILY_RULES: &[FamilyRule] = &[
    FamilyRule {
        family: StatementFamily::Treasury,
        keywords: &[
            "TESOURO DIRETO",
            "TESOURO IPCA",
            "TESOURO SELIC",
            "TESOURO PREFIXADO",
            "TESOURO RENDA+",
            "TESOURO EDUCA+",
        ],
        tokens: &["B3"],
    },
    FamilyRule {
        family: StatementFamily::Brokerage,
        keywords: &["CORRETORA", "GENIAL", "NUINVEST", "INTER INVEST"],
        tokens: &["XP", "CLEAR", "RICO", "BTG"],
    },
    FamilyRule {
        family: StatementFamily::Bank,
        keywords: &["BANCO", "CDB", "LCI", "LCA"],
        tokens: &[],
    },
    FamilyRule {
        family: StatementFamily::Pension,
        keywords: &["PREVIDÊNCIA", "PREVIDENCIA", "PGBL", "VGBL"],
        tokens: &[],
    },
];

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(StatementFamily, Regex)>,
}

/// Escaped keyword; a space matches any whitespace run
fn keyword_pattern(kw: &str) -> String {
    regex::escape(kw).replace(' ', r"\s+")
}

impl Classifier {
    pub fn new() -> Result<Self> {
        Self::with_rules(FAMILY_RULES)
    }

    pub fn with_rules(table: &[FamilyRule]) -> Result<Self> {
        let mut rules = Vec::with_capacity(table.len());
        for rule in table {
            let alternatives: Vec<String> = rule
                .keywords
                .iter()
                .map(|kw| keyword_pattern(kw))
                .chain(
                    rule.tokens
                        .iter()
                        .map(|tok| format!(r"\b{}\b", keyword_pattern(tok))),
                )
                .collect();
            if alternatives.is_empty() {
                continue;
            }
            let pattern = format!("(?:{})", alternatives.join("|"));
            let re = Regex::new(&pattern).map_err(|source| IngestError::Pattern {
                rule: format!("classifier:{}", rule.family.as_str()),
                source,
            })?;
            rules.push((rule.family, re));
        }
        Ok(Self { rules })
    }

    /// Classify statement text. Text without any known keyword is `Other`.
    pub fn classify(&self, text: &str) -> StatementFamily {
        let upper = text.to_uppercase();
        self.rules
            .iter()
            .find(|(_, re)| re.is_match(&upper))
            .map(|(family, _)| *family)
            .unwrap_or(StatementFamily::Other)
    }
}
