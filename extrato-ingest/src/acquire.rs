//! Turning source documents into text.
//!
//! The core only ever sees a `String`; how it was obtained is the acquirer's
//! business. [`FsTextAcquirer::init`] is called once at startup and the
//! resulting value is handed to the batch processor.

use serde::{Deserialize, Serialize};
use std::fs;
use std::panic;
use tracing::{debug, info};

use crate::error::AcquisitionError;
use crate::types::{ContentKind, SourceDocument};

pub trait TextAcquirer: Send + Sync {
    /// Full text of `doc`, pages joined by newlines
    fn acquire(&self, doc: &SourceDocument) -> Result<String, AcquisitionError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Documents above this size are refused before decoding
    pub max_document_bytes: u64,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: 50 * 1024 * 1024,
        }
    }
}

/// Reads PDFs and text files from the local filesystem
#[derive(Debug, Clone)]
pub struct FsTextAcquirer {
    config: AcquisitionConfig,
}

impl FsTextAcquirer {
    pub fn init(config: AcquisitionConfig) -> Result<Self, AcquisitionError> {
        if config.max_document_bytes == 0 {
            return Err(AcquisitionError::Config(
                "max_document_bytes must be greater than zero".to_string(),
            ));
        }
        info!(
            max_document_bytes = config.max_document_bytes,
            "text acquisition ready"
        );
        Ok(Self { config })
    }

    fn read_bytes(&self, doc: &SourceDocument) -> Result<Vec<u8>, AcquisitionError> {
        let io_err = |source| AcquisitionError::Io {
            name: doc.name.clone(),
            source,
        };

        let size = fs::metadata(&doc.path).map_err(io_err)?.len();
        if size > self.config.max_document_bytes {
            return Err(AcquisitionError::TooLarge {
                name: doc.name.clone(),
                size,
                limit: self.config.max_document_bytes,
            });
        }

        fs::read(&doc.path).map_err(io_err)
    }
}

impl TextAcquirer for FsTextAcquirer {
    fn acquire(&self, doc: &SourceDocument) -> Result<String, AcquisitionError> {
        match &doc.kind {
            ContentKind::Document => {
                let bytes = self.read_bytes(doc)?;
                debug!(name = %doc.name, bytes = bytes.len(), "extracting pdf text");
                decode_pdf(&doc.name, &bytes)
            }
            ContentKind::PlainText => {
                let bytes = self.read_bytes(doc)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            ContentKind::Unsupported(kind) => {
                Err(AcquisitionError::Unsupported { kind: kind.clone() })
            }
        }
    }
}

/// Decode PDF bytes to text. The decoder panics on some malformed files, so a
/// panic is reported as a decode error for that document only.
pub fn decode_pdf(name: &str, bytes: &[u8]) -> Result<String, AcquisitionError> {
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(AcquisitionError::Decode {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Err(AcquisitionError::Decode {
            name: name.to_string(),
            reason: "pdf decoder panicked".to_string(),
        }),
    }
}
