//! Classify-then-extract for a single statement text

use chrono::NaiveDate;
use extrato_core::{ExtractedStatement, Extraction, StatementFamily};

use crate::classifier::Classifier;
use crate::error::Result;
use crate::parsers::{FamilyExtractor, get_extractors};

/// Compiled classifier and extractors, built once and shared across documents
pub struct Pipeline {
    classifier: Classifier,
    extractors: Vec<Box<dyn FamilyExtractor>>,
}

impl Pipeline {
    pub fn new() -> Result<Self> {
        Ok(Self {
            classifier: Classifier::new()?,
            extractors: get_extractors()?,
        })
    }

    pub fn classify(&self, text: &str) -> StatementFamily {
        self.classifier.classify(text)
    }

    /// Run the extractor registered for `family`
    pub fn extract(&self, family: StatementFamily, text: &str) -> Extraction {
        self.extractors
            .iter()
            .find(|e| e.family() == family)
            .map(|e| e.extract(text))
            .unwrap_or_default()
    }

    /// Classify `text` and build a statement from the matching family's rules
    pub fn parse(&self, text: &str, extraction_date: NaiveDate) -> ExtractedStatement {
        let family = self.classify(text);
        let extraction = self.extract(family, text);
        ExtractedStatement::from_extraction(family, extraction_date, extraction)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let families: Vec<_> = self.extractors.iter().map(|e| e.family()).collect();
        f.debug_struct("Pipeline")
            .field("classifier", &self.classifier)
            .field("extractors", &families)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
    }

    #[test]
    fn test_brokerage_text_uses_brokerage_rules_only() {
        // CDB would be read by the bank rules, but the brokerage rule wins
        let text = "Corretora Genial\nRenda Fixa R$ 1.000,00\nCDB R$ 2.000,00";
        let stmt = Pipeline::new().unwrap().parse(text, date());
        assert_eq!(stmt.family(), StatementFamily::Brokerage);
        assert_eq!(stmt.balances().get("Renda Fixa"), Some(&1000.0));
        assert!(stmt.balances().get("CDB").is_none());
    }

    #[test]
    fn test_empty_text_is_other_and_empty() {
        let stmt = Pipeline::new().unwrap().parse("", date());
        assert_eq!(stmt.family(), StatementFamily::Other);
        assert!(stmt.is_empty());
    }
}
