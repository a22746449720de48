//! The content pipeline: extract → enhance → serialize.
//!
//! Extraction and serialization live here; enhancement is in `crate::enhance`.
//! Each stage is a pure function of its inputs — the intermediate text
//! round-trips through the web layer, never through shared state.

pub mod extract;
pub mod serialize;

mod docx;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of document formats at the service boundary.
/// Adding a format is a compile-time-visible change: every `match` on this
/// enum is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Text,
}

impl DocumentFormat {
    /// Sniffs the format from a filename extension. Unknown or missing
    /// extensions are the caller's `UnsupportedFormat` error.
    pub fn from_filename(filename: &str) -> Result<Self, PipelineError> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" | "text" => Ok(Self::Text),
            _ => Err(PipelineError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Text => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Text => "text/plain; charset=utf-8",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Errors from the extract and serialize stages.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("DOCX error: {0}")]
    Docx(String),

    #[error("Document is not valid UTF-8")]
    InvalidUtf8,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extracted document content: an ordered sequence of sections.
/// A section is a run of non-blank lines; each line inside a section keeps
/// its trailing newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedText {
    pub sections: Vec<String>,
}

impl ExtractedText {
    /// Joins sections with a blank line, the editing representation handed
    /// to the web layer.
    pub fn text(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.trim_end_matches('\n'))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Splits flat text into sections on blank lines. Shared by the PDF and
/// plain-text extraction paths.
pub(crate) fn split_sections(content: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    if !current.is_empty() {
        sections.push(current);
    }
    sections
}
