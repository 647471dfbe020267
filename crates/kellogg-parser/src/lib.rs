//! # Kellogg Parser
//!
//! Reads sentences that an upstream NLP pipeline has already analysed. Each
//! sentence block holds a Penn Treebank bracketed constituency tree,
//! optionally followed by dependency rows:
//!
//! ```text
//! # The cat sat.
//! (S (NP (DT The) (NN cat)) (VP (VBD sat)) (. .))
//! 1   The   2   det
//! 2   cat   3   nsubj
//! 3   sat   0   root
//! 4   .     3   punct
//! ```
//!
//! Blocks in a document are separated by blank lines.
//!
//! ## Usage
//!
//! ```
//! # use kellogg_parser::{parse, error::ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let sentence = parse("(S (NP (PRP I)) (VP (VBP run)))")?;
//!     assert_eq!(sentence.text(), "I run");
//!     Ok(())
//! }
//! ```

pub mod error;

mod bracketed;
mod conll;
mod elaborate;

pub use kellogg_core::grammar::Span;

use log::{debug, trace};

use kellogg_core::grammar::{ConstituencyNode, DependencyToken};

use error::{Diagnostic, ErrorCode, ParseError};

/// A sentence as delivered by the upstream parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSentence {
    tree: ConstituencyNode,
    dependencies: Vec<DependencyToken>,
}

impl ParsedSentence {
    pub fn new(tree: ConstituencyNode, dependencies: Vec<DependencyToken>) -> Self {
        Self { tree, dependencies }
    }

    /// The constituency tree.
    pub fn tree(&self) -> &ConstituencyNode {
        &self.tree
    }

    /// Dependency rows, empty when the block had none.
    pub fn dependencies(&self) -> &[DependencyToken] {
        &self.dependencies
    }

    /// The sentence text recovered from the tree's words.
    pub fn text(&self) -> String {
        self.tree.text()
    }
}

/// Boundary to whatever produces constituency trees from text.
///
/// Implementations own their models; the layout engine only ever sees the
/// returned [`ParsedSentence`].
pub trait SentenceParser {
    /// Analyse one sentence.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the sentence cannot be analysed.
    fn parse(&self, text: &str) -> Result<ParsedSentence, ParseError>;
}

/// A [`SentenceParser`] for text that is already in treebank notation.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreebankParser;

impl SentenceParser for TreebankParser {
    fn parse(&self, text: &str) -> Result<ParsedSentence, ParseError> {
        parse(text)
    }
}

/// Parse one sentence block.
///
/// Spans in diagnostics are byte offsets into `source`.
///
/// # Errors
///
/// Returns every diagnostic found in the block: bracket syntax (`E1xx`),
/// tree construction (`E2xx`) or dependency rows (`E3xx`).
pub fn parse(source: &str) -> Result<ParsedSentence, ParseError> {
    let (raw, tree_end) = bracketed::read_tree(source)?;
    trace!(raw:?; "Raw tree");

    let rest = &source[tree_end..];
    let rest_start = tree_end + (rest.len() - rest.trim_start().len());
    match rest.trim_start().chars().next() {
        Some(')') => {
            return Err(Diagnostic::error("unmatched `)`")
                .with_code(ErrorCode::E100)
                .with_label(Span::new(rest_start..rest_start + 1), "no bracket to close")
                .into());
        }
        Some('(') => {
            return Err(Diagnostic::error("more than one tree in sentence block")
                .with_code(ErrorCode::E100)
                .with_label(
                    Span::new(rest_start..rest_start + 1),
                    "second tree starts here",
                )
                .with_secondary_label(closing_bracket_span(tree_end), "first tree ends here")
                .with_help("separate sentences with a blank line")
                .into());
        }
        _ => {}
    }

    let tree = elaborate::build_tree(&raw)?;
    let dependencies = conll::read_rows(rest, tree_end)?;

    debug!(
        nodes = tree.node_count(),
        dependencies = dependencies.len();
        "Sentence parsed"
    );
    Ok(ParsedSentence::new(tree, dependencies))
}

fn closing_bracket_span(tree_end: usize) -> Span {
    Span::new(tree_end.saturating_sub(1)..tree_end)
}

/// Splits a document into sentence blocks separated by blank lines.
///
/// Blocks made only of `#` comment lines are skipped.
///
/// # Examples
///
/// ```
/// # use kellogg_parser::split_sentences;
/// let doc = "(S (NP (PRP I)) (VP (VBP run)))\n\n# note\n\n(S (NP (PRP we)) (VP (VBP go)))\n";
/// let blocks = split_sentences(doc);
/// assert_eq!(blocks.len(), 2);
/// assert!(blocks[1].contains("we"));
/// ```
pub fn split_sentences(document: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut block_start: Option<usize> = None;
    let mut block_end = 0;
    let mut offset = 0;

    for line in document.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if line.trim().is_empty() {
            if let Some(start) = block_start.take() {
                blocks.push(&document[start..block_end]);
            }
        } else {
            block_start.get_or_insert(line_start);
            block_end = line_start + line.trim_end().len();
        }
    }
    if let Some(start) = block_start {
        blocks.push(&document[start..block_end]);
    }

    blocks.retain(|block| {
        block
            .lines()
            .any(|line| !line.trim_start().starts_with('#'))
    });
    blocks
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn word_strategy() -> impl Strategy<Value = String> {
        "[a-z]{1,8}"
    }

    /// Bracketed noun phrases with a determiner and some nouns.
    fn np_strategy() -> impl Strategy<Value = (String, Vec<String>)> {
        prop::collection::vec(word_strategy(), 1..4).prop_map(|nouns| {
            let mut words = vec!["the".to_string()];
            let mut text = "(NP (DT the)".to_string();
            for noun in &nouns {
                text.push_str(&format!(" (NN {noun})"));
                words.push(noun.clone());
            }
            text.push(')');
            (text, words)
        })
    }

    fn check_words_preserved(subject: (String, Vec<String>), verb: String) -> Result<(), TestCaseError> {
        let (np, mut words) = subject;
        let source = format!("(S {np} (VP (VBD {verb})))");
        words.push(verb);

        let sentence = parse(&source).map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(sentence.text(), words.join(" "));
        Ok(())
    }

    proptest! {
        #[test]
        fn arbitrary_input_never_panics(source in "[()A-Za-z .#\n\t-]{0,64}") {
            let _ = parse(&source);
        }

        #[test]
        fn generated_trees_keep_their_words(subject in np_strategy(), verb in word_strategy()) {
            check_words_preserved(subject, verb)?;
        }
    }
}
