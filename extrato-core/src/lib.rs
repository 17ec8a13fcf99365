//! extrato-core: statement data model and locale-aware amount helpers

pub mod amount;
pub mod statement;

pub use amount::{AmountError, format_brl, parse_amount};
pub use statement::{ExtractedStatement, Extraction, StatementFamily};
