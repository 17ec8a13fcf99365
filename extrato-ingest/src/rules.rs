//! Declarative extraction rules and the single function that evaluates them.
//!
//! Every family extractor is a table of [`BalanceRule`]s and [`FeeRule`]s.
//! Patterns expose the amount as the named group `amount` (`rate` for fees)
//! and, for [`LabelSource::Captured`], the instrument title as `label`.

use extrato_core::{Extraction, parse_amount};
use regex::{Captures, Regex};
use std::ops::Range;
use tracing::trace;

use crate::error::{IngestError, Result};

/// Currency-prefixed amount, shared by every balance pattern
pub const AMOUNT: &str = r"R\$\s*(?P<amount>\d[\d.,]*\d|\d)";

/// Characters looked at before a match when labelling by preceding line
pub const PRECEDING_WINDOW: usize = 50;

/// Where a balance's label comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSource {
    Fixed(&'static str),
    /// The pattern's `label` group, or `fallback` when it is blank
    Captured { fallback: &'static str },
    /// The last non-blank line in the text just before the match
    PrecedingLine { fallback: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// First usable occurrence only
    First,
    /// Every occurrence, each stored under its own label
    Each,
}

#[derive(Debug, Clone, Copy)]
pub struct BalanceRule {
    pub label: LabelSource,
    pub pattern: &'static str,
    pub mode: MatchMode,
}

#[derive(Debug, Clone, Copy)]
pub struct FeeRule {
    pub label: &'static str,
    pub pattern: &'static str,
}

/// A family's rule tables with their patterns compiled
#[derive(Debug, Clone)]
pub struct RuleSet {
    balances: Vec<(BalanceRule, Regex)>,
    fees: Vec<(FeeRule, Regex)>,
}

impl RuleSet {
    pub fn compile(balances: &[BalanceRule], fees: &[FeeRule]) -> Result<Self> {
        let balances = balances
            .iter()
            .map(|rule| Ok((*rule, compile_pattern(rule.pattern)?)))
            .collect::<Result<Vec<_>>>()?;
        let fees = fees
            .iter()
            .map(|rule| Ok((*rule, compile_pattern(rule.pattern)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { balances, fees })
    }

    /// Run every rule over `text`.
    ///
    /// An amount token is credited to at most one balance: once a rule has
    /// used it, later rules that reach the same token skip that occurrence.
    pub fn evaluate(&self, text: &str) -> Extraction {
        let mut out = Extraction::default();
        let mut claimed: Vec<Range<usize>> = Vec::new();

        for (rule, re) in &self.balances {
            for caps in re.captures_iter(text) {
                let Some(amount_match) = caps.name("amount") else {
                    continue;
                };
                let span = amount_match.range();
                if claimed.iter().any(|c| c.start < span.end && span.start < c.end) {
                    continue;
                }

                let amount = match parse_amount(amount_match.as_str()) {
                    Ok(v) if v > 0.0 => v,
                    Ok(_) => continue,
                    Err(e) => {
                        trace!(error = %e, "discarding amount");
                        continue;
                    }
                };

                let label = resolve_label(rule.label, text, &caps);
                claimed.push(span);
                out.balances.insert(label, amount);

                if rule.mode == MatchMode::First {
                    break;
                }
            }
        }

        for (rule, re) in &self.fees {
            let rate = re
                .captures_iter(text)
                .filter_map(|caps| caps.name("rate").map(|m| m.as_str().to_string()))
                .find_map(|raw| parse_amount(&raw).ok().filter(|r| *r >= 0.0));
            if let Some(rate) = rate {
                out.fee_rates.insert(rule.label.to_string(), rate);
            }
        }

        out
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| IngestError::Pattern {
        rule: pattern.to_string(),
        source,
    })
}

fn resolve_label(source: LabelSource, text: &str, caps: &Captures<'_>) -> String {
    match source {
        LabelSource::Fixed(label) => label.to_string(),
        LabelSource::Captured { fallback } => caps
            .name("label")
            .map(|m| normalize_label(m.as_str()))
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| fallback.to_string()),
        LabelSource::PrecedingLine { fallback } => {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            preceding_line(text, start)
                .unwrap_or_else(|| fallback.to_string())
        }
    }
}

/// Last non-blank line within [`PRECEDING_WINDOW`] characters before `end`
pub fn preceding_line(text: &str, end: usize) -> Option<String> {
    let prefix = &text[..end];
    let window_start = prefix
        .char_indices()
        .rev()
        .nth(PRECEDING_WINDOW - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);

    prefix[window_start..]
        .split('\n')
        .map(normalize_label)
        .filter(|l| !l.is_empty())
        .last()
}

/// Collapse whitespace runs and trim
pub fn normalize_label(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
