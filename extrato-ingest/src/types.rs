use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a document's text is obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    /// Needs text extraction (PDF)
    Document,
    /// Readable as-is
    PlainText,
    /// Anything else; carries the extension that was seen
    Unsupported(String),
}

impl ContentKind {
    /// Infer the kind from a file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pdf") => ContentKind::Document,
            Some("txt") | Some("text") | Some("csv") => ContentKind::PlainText,
            Some(other) => ContentKind::Unsupported(other.to_string()),
            None => ContentKind::Unsupported(String::new()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ContentKind::Unsupported(_))
    }
}

/// One input handed to the batch processor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub name: String,
    pub kind: ContentKind,
    pub path: PathBuf,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, kind: ContentKind, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            path: path.into(),
        }
    }

    /// Build a document from a path, naming it after the file
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let kind = ContentKind::from_path(&path);
        Self { name, kind, path }
    }
}
