//! Export functionality for Kellogg diagrams.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! converting laid-out diagrams into output documents. It is the final stage
//! in the Kellogg processing pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Bracketed tree
//!     ↓ parse
//! ConstituencyNode
//!     ↓ layout
//! Diagram (primitives + bounds)
//!     ↓ export (this module)
//! Document text
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG output via [`svg::SvgExporter`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`]. [`Error`] converts into
//! [`KelloggError::Export`] at the crate boundary.
//!
//! [`KelloggError::Export`]: crate::KelloggError::Export

/// SVG export backend.
pub mod svg;

use crate::layout::Diagram;

/// Abstraction for diagram export backends.
pub trait Exporter {
    /// Renders a laid-out diagram to the backend's document format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the diagram cannot be represented in the
    /// target format.
    fn export_diagram(&self, diagram: &Diagram) -> Result<String, Error>;
}

/// Errors that can occur during diagram export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
