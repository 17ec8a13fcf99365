//! Amount parsing and formatting for Brazilian-locale statements.
//!
//! Statements write `1.234,56`: `.` groups thousands and `,` marks decimals.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmountError {
    #[error("malformed amount token: {0:?}")]
    Malformed(String),

    #[error("amount token is not a finite number: {0:?}")]
    NonFinite(String),
}

/// Parse a locale-formatted amount (`1.234,56` -> 1234.56).
///
/// Every `.` is dropped and the first `,` becomes the decimal point. Anything
/// that is still not a plain number afterwards is an error, never a silent zero.
pub fn parse_amount(token: &str) -> Result<f64, AmountError> {
    let cleaned = token.trim().replace('.', "").replacen(',', ".", 1);

    let value: f64 = cleaned
        .parse()
        .map_err(|_| AmountError::Malformed(token.to_string()))?;

    if !value.is_finite() {
        return Err(AmountError::NonFinite(token.to_string()));
    }

    Ok(value)
}

/// Render a value as Brazilian currency, e.g. `R$ 1.234,56`.
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac:02}")
}
