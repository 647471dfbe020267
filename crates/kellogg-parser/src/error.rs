//! Diagnostics for the treebank reader.
//!
//! Every problem found while reading a sentence block becomes a
//! [`Diagnostic`]: a severity, an optional [`ErrorCode`], a message, labeled
//! source spans and optional help. All diagnostics for one block are returned
//! together in a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use kellogg_parser::error::{Diagnostic, ErrorCode};
//! # use kellogg_parser::Span;
//! let diag = Diagnostic::error("unknown category tag `NPP`")
//!     .with_code(ErrorCode::E201)
//!     .with_label(Span::new(1..4), "not a Penn Treebank tag")
//!     .with_help("did you mean `NP`?");
//! assert_eq!(diag.to_string(), "error[E201]: unknown category tag `NPP`");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
