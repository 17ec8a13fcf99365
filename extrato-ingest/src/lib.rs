//! extrato-ingest: statement classification, family extractors, text
//! acquisition and the batch driver.

pub mod acquire;
pub mod batch;
pub mod classifier;
pub mod error;
pub mod parsers;
pub mod pipeline;
pub mod rules;
pub mod types;

pub use acquire::{AcquisitionConfig, FsTextAcquirer, TextAcquirer};
pub use batch::{BatchProcessor, BatchReport, DocumentOutcome, SkipReason};
pub use classifier::Classifier;
pub use error::{AcquisitionError, IngestError};
pub use pipeline::Pipeline;
pub use types::{ContentKind, SourceDocument};
