//! Keyword-agnostic extraction for statements no family recognises.
//!
//! Every currency amount in the text is summed into one balance.

use extrato_core::{Extraction, StatementFamily, parse_amount};
use regex::Regex;
use tracing::trace;

use super::FamilyExtractor;
use crate::error::{IngestError, Result};
use crate::rules::AMOUNT;

pub const FALLBACK_LABEL: &str = "Aplicações";

#[derive(Debug, Clone)]
pub struct FallbackExtractor {
    amount_re: Regex,
}

impl FallbackExtractor {
    pub fn new() -> Result<Self> {
        let amount_re = Regex::new(AMOUNT).map_err(|source| IngestError::Pattern {
            rule: "fallback".to_string(),
            source,
        })?;
        Ok(Self { amount_re })
    }
}

impl FamilyExtractor for FallbackExtractor {
    fn family(&self) -> StatementFamily {
        StatementFamily::Other
    }

    fn extract(&self, text: &str) -> Extraction {
        let values: Vec<f64> = self
            .amount_re
            .captures_iter(text)
            .filter_map(|caps| {
                let raw = caps.name("amount")?.as_str();
                match parse_amount(raw) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        trace!(error = %e, "discarding amount");
                        None
                    }
                }
            })
            .collect();

        let mut out = Extraction::default();
        if !values.is_empty() {
            out.balances
                .insert(FALLBACK_LABEL.to_string(), values.iter().sum());
        }
        out
    }
}
