//! extrato-finance: consolidation of extracted statements and summary reports

pub mod consolidate;
pub mod report;

pub use consolidate::{AllocationRow, ConsolidatedSummary, consolidate};
pub use report::{render_text, write_csv};
