//! Statement types shared by the extractors and the consolidator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Institution family a statement was classified into
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatementFamily {
    #[serde(rename = "treasury")]
    Treasury,
    #[serde(rename = "brokerage")]
    Brokerage,
    #[serde(rename = "bank")]
    Bank,
    #[serde(rename = "pension")]
    Pension,
    #[serde(rename = "other")]
    Other,
}

impl StatementFamily {
    pub const ALL: [StatementFamily; 5] = [
        StatementFamily::Treasury,
        StatementFamily::Brokerage,
        StatementFamily::Bank,
        StatementFamily::Pension,
        StatementFamily::Other,
    ];

    /// Label used on statements and reports
    pub fn display_label(&self) -> &'static str {
        match self {
            StatementFamily::Treasury => "Tesouro",
            StatementFamily::Brokerage => "Corretora",
            StatementFamily::Bank => "Banco",
            StatementFamily::Pension => "Previdência",
            StatementFamily::Other => "Outro",
        }
    }

    /// Stable machine name (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementFamily::Treasury => "treasury",
            StatementFamily::Brokerage => "brokerage",
            StatementFamily::Bank => "bank",
            StatementFamily::Pension => "pension",
            StatementFamily::Other => "other",
        }
    }
}

impl fmt::Display for StatementFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}

/// Balances and fee rates recovered by one extractor, before a family is attached
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub balances: BTreeMap<String, f64>,
    pub fee_rates: BTreeMap<String, f64>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// One parsed statement document.
///
/// The family and extraction date are fixed at construction; balances only
/// ever hold finite, non-negative amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedStatement {
    family: StatementFamily,
    extraction_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    balances: BTreeMap<String, f64>,
    #[serde(default)]
    fee_rates: BTreeMap<String, f64>,
}

impl ExtractedStatement {
    pub fn new(family: StatementFamily, extraction_date: NaiveDate) -> Self {
        Self {
            family,
            extraction_date,
            source: None,
            balances: BTreeMap::new(),
            fee_rates: BTreeMap::new(),
        }
    }

    /// Attach the name of the document this statement came from
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Build a statement from an extractor's output, dropping any invalid values
    pub fn from_extraction(
        family: StatementFamily,
        extraction_date: NaiveDate,
        extraction: Extraction,
    ) -> Self {
        let mut stmt = Self::new(family, extraction_date);
        for (label, amount) in extraction.balances {
            stmt.insert_balance(label, amount);
        }
        for (label, rate) in extraction.fee_rates {
            stmt.insert_fee_rate(label, rate);
        }
        stmt
    }

    pub fn family(&self) -> StatementFamily {
        self.family
    }

    pub fn extraction_date(&self) -> NaiveDate {
        self.extraction_date
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn balances(&self) -> &BTreeMap<String, f64> {
        &self.balances
    }

    pub fn fee_rates(&self) -> &BTreeMap<String, f64> {
        &self.fee_rates
    }

    /// Store a balance. Returns false (and stores nothing) for NaN, infinite
    /// or negative amounts. An existing label is overwritten.
    pub fn insert_balance(&mut self, label: impl Into<String>, amount: f64) -> bool {
        if !amount.is_finite() || amount < 0.0 {
            return false;
        }
        self.balances.insert(label.into(), amount);
        true
    }

    /// Store a fee rate (percent). Non-finite rates are rejected.
    pub fn insert_fee_rate(&mut self, label: impl Into<String>, rate: f64) -> bool {
        if !rate.is_finite() {
            return false;
        }
        self.fee_rates.insert(label.into(), rate);
        true
    }

    /// Sum of every balance on this statement
    pub fn total(&self) -> f64 {
        self.balances.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}
