use thiserror::Error;

/// Failure to turn a source document into text
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {name}: {reason}")]
    Decode { name: String, reason: String },

    #[error("{name} is {size} bytes, above the {limit} byte limit")]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("no acquisition path for content kind {kind:?}")]
    Unsupported { kind: String },

    #[error("invalid acquisition config: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error("invalid pattern for rule {rule:?}: {source}")]
    Pattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
