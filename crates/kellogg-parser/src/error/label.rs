//! Labeled source spans.

use crate::Span;

/// A message attached to a span of the sentence block.
///
/// A diagnostic usually has one primary label marking where the problem is,
/// and may add secondary labels for related locations such as the opening
/// bracket of an unclosed constituent.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_kinds() {
        let primary = Label::primary(Span::new(3..9), "here");
        let secondary = Label::secondary(Span::new(0..1), "opened here");

        assert!(primary.is_primary());
        assert!(!secondary.is_primary());
        assert_eq!(primary.span().start(), 3);
        assert_eq!(secondary.message(), "opened here");
    }
}
