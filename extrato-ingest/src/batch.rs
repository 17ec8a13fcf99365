//! Batch driver: acquire, classify and extract every document, isolating
//! failures so one bad file never costs the rest of the batch.

use chrono::{Local, NaiveDate};
use extrato_core::ExtractedStatement;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::acquire::TextAcquirer;
use crate::error::{AcquisitionError, Result};
use crate::pipeline::Pipeline;
use crate::types::{ContentKind, SourceDocument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkipReason {
    /// No acquisition path for this content kind
    UnsupportedKind(String),
    /// Text was read but no balance was recovered
    EmptyExtraction,
}

/// What happened to one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentOutcome {
    Included(ExtractedStatement),
    Skipped { name: String, reason: SkipReason },
    Failed { name: String, error: String },
}

impl DocumentOutcome {
    pub fn statement(&self) -> Option<&ExtractedStatement> {
        match self {
            DocumentOutcome::Included(stmt) => Some(stmt),
            _ => None,
        }
    }
}

/// Per-document outcomes, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    pub fn statements(&self) -> impl Iterator<Item = &ExtractedStatement> {
        self.outcomes.iter().filter_map(DocumentOutcome::statement)
    }

    pub fn into_statements(self) -> Vec<ExtractedStatement> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                DocumentOutcome::Included(stmt) => Some(stmt),
                _ => None,
            })
            .collect()
    }

    pub fn included_count(&self) -> usize {
        self.statements().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DocumentOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DocumentOutcome::Failed { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

pub struct BatchProcessor {
    pipeline: Arc<Pipeline>,
    acquirer: Arc<dyn TextAcquirer>,
    extraction_date: NaiveDate,
}

impl BatchProcessor {
    /// Build a processor around an already-initialized acquirer.
    /// Statements are stamped with today's local date.
    pub fn new(acquirer: Arc<dyn TextAcquirer>) -> Result<Self> {
        Ok(Self {
            pipeline: Arc::new(Pipeline::new()?),
            acquirer,
            extraction_date: Local::now().date_naive(),
        })
    }

    pub fn with_extraction_date(mut self, date: NaiveDate) -> Self {
        self.extraction_date = date;
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Process one document. Never fails; problems become outcomes.
    pub fn process_one(&self, doc: &SourceDocument) -> DocumentOutcome {
        if let ContentKind::Unsupported(kind) = &doc.kind {
            warn!(name = %doc.name, kind = %kind, "unsupported content kind, skipping");
            return DocumentOutcome::Skipped {
                name: doc.name.clone(),
                reason: SkipReason::UnsupportedKind(kind.clone()),
            };
        }

        let text = match self.acquirer.acquire(doc) {
            Ok(text) => text,
            Err(AcquisitionError::Unsupported { kind }) => {
                warn!(name = %doc.name, kind = %kind, "acquirer cannot read this kind, skipping");
                return DocumentOutcome::Skipped {
                    name: doc.name.clone(),
                    reason: SkipReason::UnsupportedKind(kind),
                };
            }
            Err(e) => {
                error!(name = %doc.name, error = %e, "failed to acquire text");
                return DocumentOutcome::Failed {
                    name: doc.name.clone(),
                    error: e.to_string(),
                };
            }
        };

        let stmt = self
            .pipeline
            .parse(&text, self.extraction_date)
            .with_source(doc.name.clone());

        if stmt.is_empty() {
            debug!(name = %doc.name, family = ?stmt.family(), "no balances extracted");
            return DocumentOutcome::Skipped {
                name: doc.name.clone(),
                reason: SkipReason::EmptyExtraction,
            };
        }

        info!(
            name = %doc.name,
            family = ?stmt.family(),
            balances = stmt.balances().len(),
            "extracted statement"
        );
        DocumentOutcome::Included(stmt)
    }

    /// Process documents one after another
    pub fn process(&self, docs: &[SourceDocument]) -> BatchReport {
        self.process_while(docs, |_| ControlFlow::Continue(()))
    }

    /// Process documents in order until `on_outcome` breaks. Outcomes gathered
    /// before the break are returned as a valid partial report.
    pub fn process_while<F>(&self, docs: &[SourceDocument], mut on_outcome: F) -> BatchReport
    where
        F: FnMut(&DocumentOutcome) -> ControlFlow<()>,
    {
        let mut report = BatchReport::default();
        for doc in docs {
            let outcome = self.process_isolated(doc);
            let flow = on_outcome(&outcome);
            report.outcomes.push(outcome);
            if flow.is_break() {
                info!(processed = report.len(), total = docs.len(), "batch stopped early");
                break;
            }
        }
        report
    }

    /// `process_one`, with a panic anywhere in the document's processing
    /// turned into a `Failed` outcome for that document
    fn process_isolated(&self, doc: &SourceDocument) -> DocumentOutcome {
        match panic::catch_unwind(AssertUnwindSafe(|| self.process_one(doc))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let error = format!("panicked: {}", panic_message(payload.as_ref()));
                error!(name = %doc.name, error = %error, "document processing panicked");
                DocumentOutcome::Failed {
                    name: doc.name.clone(),
                    error,
                }
            }
        }
    }

    /// Process documents on blocking worker tasks, at most `limit` at a time.
    /// Outcomes come back in input order whatever order the work finishes in.
    pub async fn process_concurrent(
        self: Arc<Self>,
        docs: Vec<SourceDocument>,
        limit: usize,
    ) -> BatchReport {
        let semaphore = Arc::new(Semaphore::new(limit.max(1)));
        let mut handles = Vec::with_capacity(docs.len());

        for doc in docs {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let processor = Arc::clone(&self);
            let name = doc.name.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                processor.process_isolated(&doc)
            });
            handles.push((name, handle));
        }

        let mut report = BatchReport::default();
        for (name, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(name = %name, error = %e, "document task aborted");
                    DocumentOutcome::Failed {
                        name,
                        error: e.to_string(),
                    }
                }
            };
            report.outcomes.push(outcome);
        }
        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
