//! Consolidation: reduce many statements into portfolio-wide totals.
//!
//! Labels are merged by exact string equality only. Fee rates are summed
//! across statements, not averaged.

use extrato_core::ExtractedStatement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedSummary {
    pub totals_by_class: BTreeMap<String, f64>,
    pub total_overall: f64,
    pub implied_fee_rates: BTreeMap<String, f64>,
}

/// One asset class with its share of the overall total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub label: String,
    pub amount: f64,
    /// Fraction of `total_overall`, 0.0..=1.0
    pub share: f64,
}

/// Sum every statement's balances and fee rates, in input order
pub fn consolidate(statements: &[ExtractedStatement]) -> ConsolidatedSummary {
    let mut summary = ConsolidatedSummary::default();

    for stmt in statements {
        for (label, amount) in stmt.balances() {
            *summary.totals_by_class.entry(label.clone()).or_insert(0.0) += amount;
            summary.total_overall += amount;
        }

        for (label, rate) in stmt.fee_rates() {
            *summary.implied_fee_rates.entry(label.clone()).or_insert(0.0) += rate;
        }
    }

    summary
}

impl ConsolidatedSummary {
    pub fn is_empty(&self) -> bool {
        self.totals_by_class.is_empty()
    }

    /// Fraction of the overall total held in `label` (0 when nothing is held)
    pub fn share_of(&self, label: &str) -> f64 {
        if self.total_overall <= 0.0 {
            return 0.0;
        }
        self.totals_by_class
            .get(label)
            .map(|amount| amount / self.total_overall)
            .unwrap_or(0.0)
    }

    /// Classes sorted by amount, largest first; ties by label
    pub fn allocation(&self) -> Vec<AllocationRow> {
        let mut rows: Vec<AllocationRow> = self
            .totals_by_class
            .iter()
            .map(|(label, amount)| AllocationRow {
                label: label.clone(),
                amount: *amount,
                share: self.share_of(label),
            })
            .collect();

        rows.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.label.cmp(&b.label))
        });
        rows
    }
}
