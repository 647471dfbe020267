use std::fmt;

use thiserror::Error;

use kellogg_core::grammar::{Category, ConstituencyNode, Span};

/// What a handler expected to find under a node and did not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralErrorKind {
    /// The handler was given a node of the wrong category.
    UnexpectedCategory { expected: &'static str },
    MissingSubject,
    MissingPredicate,
    MissingVerb,
    MissingPreposition,
    MissingPrepositionObject,
    MissingAdjective,
    MissingClause,
    MissingConjunct,
}

impl fmt::Display for StructuralErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCategory { expected } => write!(f, "expected {expected}"),
            Self::MissingSubject => f.write_str("missing subject"),
            Self::MissingPredicate => f.write_str("missing predicate"),
            Self::MissingVerb => f.write_str("missing verb"),
            Self::MissingPreposition => f.write_str("missing preposition"),
            Self::MissingPrepositionObject => f.write_str("missing prepositional object"),
            Self::MissingAdjective => f.write_str("missing adjective"),
            Self::MissingClause => f.write_str("missing clause"),
            Self::MissingConjunct => f.write_str("missing conjunct"),
        }
    }
}

/// A tree that does not have the shape a layout handler requires.
///
/// Carries the offending node's label, text and source span so callers can
/// point at the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} in {category} \"{text}\"")]
pub struct StructuralError {
    kind: StructuralErrorKind,
    category: Category,
    text: String,
    span: Span,
}

impl StructuralError {
    pub fn new(kind: StructuralErrorKind, node: &ConstituencyNode) -> Self {
        Self {
            kind,
            category: node.category(),
            text: node.text(),
            span: node.span(),
        }
    }

    pub fn kind(&self) -> StructuralErrorKind {
        self.kind
    }

    /// Label of the node the handler was working on.
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }
}
