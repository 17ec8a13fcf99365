//! Family-specific extractors.
//!
//! Each extractor owns the compiled rule tables for one statement family and
//! never fails on input text: anything it cannot read is simply left out.

pub mod bank;
pub mod brokerage;
pub mod fallback;
pub mod pension;
pub mod treasury;

use extrato_core::{Extraction, StatementFamily};

use crate::error::Result;

pub use bank::BankExtractor;
pub use brokerage::BrokerageExtractor;
pub use fallback::FallbackExtractor;
pub use pension::PensionExtractor;
pub use treasury::TreasuryExtractor;

pub trait FamilyExtractor: Send + Sync {
    /// Family whose statements this extractor reads
    fn family(&self) -> StatementFamily;

    /// Recover balances and fee rates from raw statement text
    fn extract(&self, text: &str) -> Extraction;
}

/// One extractor per family, `Other` included
pub fn get_extractors() -> Result<Vec<Box<dyn FamilyExtractor>>> {
    Ok(vec![
        Box::new(TreasuryExtractor::new()?),
        Box::new(BrokerageExtractor::new()?),
        Box::new(BankExtractor::new()?),
        Box::new(PensionExtractor::new()?),
        Box::new(FallbackExtractor::new()?),
    ])
}
