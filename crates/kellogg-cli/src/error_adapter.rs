//! Error adapter for converting KelloggError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! A [`kellogg_parser::error::ParseError`] may carry several diagnostics and
//! a batch may carry several failed sentences. Each diagnostic and each
//! failure is rendered independently.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use kellogg::{KelloggError, layout::StructuralError};
use kellogg_parser::error::Diagnostic;

/// Adapter for a single parser diagnostic.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Source code for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for a tree the layout could not diagram.
///
/// Points at the offending node in the sentence block.
pub struct StructuralAdapter<'a> {
    err: &'a StructuralError,
    src: &'a str,
}

impl<'a> StructuralAdapter<'a> {
    pub fn new(err: &'a StructuralError, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for StructuralAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuralAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for StructuralAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.err, f)
    }
}

impl std::error::Error for StructuralAdapter<'_> {}

impl MietteDiagnostic for StructuralAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("kellogg::structure"))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = span_to_miette(self.err.span());
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some(self.err.kind().to_string()),
            span,
        ))))
    }
}

/// Adapter for [`KelloggError`] variants without source locations.
pub struct ErrorAdapter<'a>(pub &'a KelloggError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            KelloggError::Io(_) => "kellogg::io",
            KelloggError::Parse { .. } | KelloggError::Structural { .. } => return None,
            KelloggError::UnsupportedStyle(_) => "kellogg::style",
            KelloggError::InvalidInput(_) => "kellogg::input",
            KelloggError::MissingDependencies => "kellogg::dependency",
            KelloggError::Config(_) => "kellogg::config",
            KelloggError::Export(_) => "kellogg::export",
            KelloggError::Batch { .. } => "kellogg::batch",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            KelloggError::MissingDependencies => Some(Box::new(
                "add dependency rows after the tree, or use the reed-kellogg style",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A parser diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A layout failure pointing at a tree node.
    Structural(StructuralAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl Reportable<'_> {
    fn as_diagnostic(&self) -> &dyn MietteDiagnostic {
        match self {
            Reportable::Diagnostic(d) => d,
            Reportable::Structural(s) => s,
            Reportable::Error(e) => e,
        }
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_diagnostic(), f)
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Error(e) => e.source(),
            _ => None,
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.as_diagnostic().code()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.as_diagnostic().help()
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.as_diagnostic().source_code()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.as_diagnostic().labels()
    }
}

/// Convert a kellogg [`Span`](kellogg_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: kellogg_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`KelloggError`] into a list of reportable errors.
///
/// [`KelloggError::Parse`] yields one [`Reportable`] per diagnostic and
/// [`KelloggError::Batch`] the reportables of every failed sentence. Other
/// variants yield a single [`Reportable`].
pub fn to_reportables(err: &KelloggError) -> Vec<Reportable<'_>> {
    match err {
        KelloggError::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        KelloggError::Structural { err, src } => {
            vec![Reportable::Structural(StructuralAdapter::new(err, src))]
        }
        KelloggError::Batch { failures, .. } => failures
            .iter()
            .flat_map(|failure| to_reportables(&failure.error))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use kellogg::SentenceFailure;
    use kellogg_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("test error")
            .with_code(ErrorCode::E100)
            .with_label(Span::new(0..5), "here")
            .with_help("try this");
        let parse_err = ParseError::from(diag);
        let err = KelloggError::new_parse_error(parse_err, "hello");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "test error");
            }
            _ => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_structural_error_points_at_node() {
        let source = "(S (NP (PRP I)) (VP (NN cat)))";
        let builder = kellogg::DiagramBuilder::default();
        let err = builder.generate_diagram(source, "reed-kellogg").unwrap_err();

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        let labels: Vec<_> = reportables[0].labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].label(), Some("missing verb"));
        assert_eq!(
            &source[labels[0].offset()..labels[0].offset() + labels[0].len()],
            "(VP (NN cat))"
        );
    }

    #[test]
    fn test_batch_flattens_failures() {
        let err = KelloggError::Batch {
            failures: vec![
                SentenceFailure {
                    index: 1,
                    error: KelloggError::MissingDependencies,
                },
                SentenceFailure {
                    index: 3,
                    error: KelloggError::InvalidInput("bad".to_string()),
                },
            ],
            total: 3,
        };

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[1].to_string(), "bad");
    }

    #[test]
    fn test_non_diagnostic_error_has_code() {
        let err = KelloggError::UnsupportedStyle("arc-diagram".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        let code = reportables[0].code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("kellogg::style"));
    }

    #[test]
    fn test_primary_flag_on_labels() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary")
            .with_secondary_label(Span::new(10..15), "secondary");

        let adapter = DiagnosticAdapter::new(&diag, "some source code");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
    }
}
