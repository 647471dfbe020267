//! Error types for Kellogg operations.
//!
//! This module provides the main error type [`KelloggError`] which wraps
//! the failures that can occur while turning a sentence into a diagram.

use std::io;

use thiserror::Error;

use kellogg_parser::error::ParseError;

use crate::layout::StructuralError;

/// The main error type for Kellogg operations.
///
/// # Diagnostic Variants
///
/// `Parse` and `Structural` keep the sentence source they refer to, so
/// their spans can be rendered against it.
#[derive(Debug, Error)]
pub enum KelloggError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("{err}")]
    Structural { err: StructuralError, src: String },

    #[error("unsupported diagram style `{0}`, valid styles: reed-kellogg, dependency")]
    UnsupportedStyle(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("sentence has no dependency rows to draw")]
    MissingDependencies,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    #[error("{} of {total} sentences failed", failures.len())]
    Batch {
        failures: Vec<SentenceFailure>,
        total: usize,
    },
}

impl From<crate::export::Error> for KelloggError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl KelloggError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }

    /// Create a new `Structural` error with the associated source code.
    pub fn new_structural_error(err: StructuralError, src: impl Into<String>) -> Self {
        Self::Structural {
            err,
            src: src.into(),
        }
    }
}

/// One failed sentence of a batch.
#[derive(Debug)]
pub struct SentenceFailure {
    /// 1-based position of the sentence in its document.
    pub index: usize,
    pub error: KelloggError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_style_message() {
        let err = KelloggError::UnsupportedStyle("arc-diagram".to_string());
        assert_eq!(
            err.to_string(),
            "unsupported diagram style `arc-diagram`, valid styles: reed-kellogg, dependency"
        );
    }

    #[test]
    fn test_batch_message_counts_failures() {
        let err = KelloggError::Batch {
            failures: vec![SentenceFailure {
                index: 2,
                error: KelloggError::MissingDependencies,
            }],
            total: 3,
        };
        assert_eq!(err.to_string(), "1 of 3 sentences failed");
    }
}
