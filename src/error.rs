//! Error types for the form filling library.
//!
//! Only conditions that must stop a run are errors. Per-widget and per-field
//! problems are collected as [`Outcome`](crate::forms::Outcome) values instead,
//! and verification mismatches are findings, not errors.

use crate::access::NodeId;
use std::path::PathBuf;

/// Result type alias for form filling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while filling or verifying a form.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)] // "Invalid" prefix is intentional for clarity
pub enum Error {
    /// The answers file does not exist
    #[error("Answers file not found: {}", .0.display())]
    AnswersNotFound(PathBuf),

    /// The input document does not exist
    #[error("Document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    /// The answers file is not a JSON object of scalars
    #[error("Invalid answers: {0}")]
    InvalidAnswers(String),

    /// The override table could not be interpreted
    #[error("Invalid override table: {0}")]
    InvalidOverrides(String),

    /// Invalid PDF structure (missing catalog, non-dictionary node, ...)
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// Appearance dictionary of a widget is not shaped as a state map
    #[error("Malformed appearance dictionary on widget {node}: {reason}")]
    MalformedAppearance {
        /// Widget whose /AP could not be read
        node: NodeId,
        /// What was wrong with it
        reason: String,
    },

    /// Error reported by the PDF object layer
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a missing-input condition detected before processing.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, Error::AnswersNotFound(_) | Error::DocumentNotFound(_))
    }

    /// Process exit status for a run stopped by this error: 2 for missing
    /// input, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_missing_input() {
            2
        } else {
            1
        }
    }
}
