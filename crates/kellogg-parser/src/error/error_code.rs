//! Error codes for treebank diagnostics.
//!
//! Codes are grouped by the stage that raises them:
//! - `E1xx` - Bracket syntax
//! - `E2xx` - Tree construction
//! - `E3xx` - Dependency rows

use std::fmt;

/// Stable identifiers for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Bracket Syntax (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// Something other than a bracketed tree appeared where one was expected,
    /// such as raw sentence text or a stray closing bracket.
    E100,

    /// Incomplete input.
    ///
    /// The block ended before every opening bracket was closed.
    E101,

    // =========================================================================
    // Tree Construction (E2xx)
    // =========================================================================
    /// Empty input.
    ///
    /// The block contains no tree at all.
    E200,

    /// Unknown category tag.
    ///
    /// The label is neither a Penn Treebank phrase tag nor a part-of-speech tag.
    E201,

    /// Empty constituent.
    ///
    /// A phrase bracket has no children.
    E202,

    /// Unlabeled bracket with several children.
    ///
    /// An unlabeled wrapper such as `( (S ...) )` must hold exactly one tree.
    E203,

    /// Malformed pre-terminal.
    ///
    /// A part-of-speech tag must wrap exactly one word.
    E204,

    /// Word outside a part-of-speech tag.
    ///
    /// Phrase brackets hold other brackets; a bare word must be tagged.
    E205,

    // =========================================================================
    // Dependency Rows (E3xx)
    // =========================================================================
    /// Malformed dependency row.
    ///
    /// A row needs `index word head relation`, or the ten CoNLL-U columns.
    E300,

    /// Invalid number in a dependency row.
    E301,

    /// Dependency index out of sequence.
    ///
    /// Rows must be numbered 1, 2, 3, ... in order.
    E302,

    /// Dependency head out of range.
    ///
    /// A head must be 0 (root) or the index of another row.
    E303,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E201").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
        }
    }

    /// Returns a short description, used as the default label text.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E200 => "empty input",
            ErrorCode::E201 => "unknown category tag",
            ErrorCode::E202 => "empty constituent",
            ErrorCode::E203 => "ambiguous unlabeled bracket",
            ErrorCode::E204 => "malformed part-of-speech bracket",
            ErrorCode::E205 => "untagged word",
            ErrorCode::E300 => "malformed dependency row",
            ErrorCode::E301 => "invalid number",
            ErrorCode::E302 => "index out of sequence",
            ErrorCode::E303 => "head out of range",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
