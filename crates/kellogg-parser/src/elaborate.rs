//! Builds typed [`ConstituencyNode`] trees from raw brackets.
//!
//! This is where labels meet the closed category set. Penn function tags and
//! co-indices (`NP-SBJ-1`, `PP=2`) are stripped, `ROOT`/`TOP` and unlabeled
//! wrappers are unwrapped, and empty elements (`-NONE-` traces) are dropped
//! along with any phrase left without children. Unknown labels are errors.

use std::str::FromStr;

use log::debug;

use kellogg_core::grammar::{Category, Child, ConstituencyNode, PosTag, Word};

use crate::{
    bracketed::{RawLabel, RawNode},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
};

const PHRASE_TAG_HELP: &str =
    "expected a Penn Treebank tag such as S, NP, VP, PP, ADJP, SBAR, NN, VBD or JJ";

/// Strips function tags and co-indices from a label.
///
/// Tags that begin with `-` (`-LRB-`, `-NONE-`) are whole tags.
fn base_label(label: &str) -> &str {
    if label.starts_with('-') {
        return label;
    }
    match label.find(['-', '=']) {
        Some(0) | None => label,
        Some(end) => &label[..end],
    }
}

fn is_root_label(label: Option<&RawLabel<'_>>) -> bool {
    label.is_none_or(|label| matches!(label.text, "ROOT" | "TOP"))
}

/// Converts a raw tree into a validated constituency tree.
///
/// # Errors
///
/// Returns every diagnostic found in the tree, not just the first.
pub(crate) fn build_tree(raw: &RawNode<'_>) -> Result<ConstituencyNode, ParseError> {
    let mut builder = Builder {
        diagnostics: DiagnosticCollector::new(),
    };

    let root = builder
        .unwrap_root(raw)
        .and_then(|inner| builder.elaborate(inner));
    builder.diagnostics.finish()?;

    match root {
        Some(tree) => Ok(tree),
        None => Err(Diagnostic::error("tree contains no words")
            .with_code(ErrorCode::E202)
            .with_label(raw.span(), ErrorCode::E202.description())
            .with_help("every sentence needs at least one tagged word")
            .into()),
    }
}

struct Builder {
    diagnostics: DiagnosticCollector,
}

impl Builder {
    /// Descends through `ROOT`, `TOP` and unlabeled single-child wrappers.
    fn unwrap_root<'n, 'a>(&mut self, mut node: &'n RawNode<'a>) -> Option<&'n RawNode<'a>> {
        while let RawNode::Bracket {
            label, children, span,
        } = node
        {
            if !is_root_label(label.as_ref()) {
                break;
            }
            match children.as_slice() {
                [only @ RawNode::Bracket { .. }] => node = only,
                [] => {
                    self.diagnostics.emit(
                        Diagnostic::error("empty bracket")
                            .with_code(ErrorCode::E202)
                            .with_label(*span, ErrorCode::E202.description()),
                    );
                    return None;
                }
                _ => {
                    self.diagnostics.emit(
                        Diagnostic::error("wrapper bracket must hold exactly one tree")
                            .with_code(ErrorCode::E203)
                            .with_label(*span, ErrorCode::E203.description())
                            .with_help("put each sentence in its own block, separated by a blank line"),
                    );
                    return None;
                }
            }
        }
        Some(node)
    }

    fn elaborate(&mut self, node: &RawNode<'_>) -> Option<ConstituencyNode> {
        let RawNode::Bracket {
            label,
            children,
            span,
        } = node
        else {
            // Words are consumed by their parent bracket.
            return None;
        };

        let Some(label) = label else {
            self.diagnostics.emit(
                Diagnostic::error("bracket has no category tag")
                    .with_code(ErrorCode::E201)
                    .with_label(*span, ErrorCode::E201.description())
                    .with_help(PHRASE_TAG_HELP),
            );
            return None;
        };

        let category = match Category::from_str(base_label(label.text)) {
            Ok(category) => category,
            Err(_) => {
                self.diagnostics.emit(
                    Diagnostic::error(format!("unknown category tag `{}`", label.text))
                        .with_code(ErrorCode::E201)
                        .with_label(label.span, "not a Penn Treebank tag")
                        .with_help(PHRASE_TAG_HELP),
                );
                return None;
            }
        };

        match category {
            Category::Pos(tag) => match children.as_slice() {
                [RawNode::Word { text, span }] => {
                    if tag == PosTag::Empty {
                        debug!(trace = *text; "Dropping empty element");
                        return None;
                    }
                    Some(ConstituencyNode::leaf(tag, Word::new(*text, *span)))
                }
                _ => {
                    self.diagnostics.emit(
                        Diagnostic::error(format!("`{}` must wrap exactly one word", label.text))
                            .with_code(ErrorCode::E204)
                            .with_label(*span, ErrorCode::E204.description())
                            .with_help(format!("write it as `({} word)`", label.text)),
                    );
                    None
                }
            },
            Category::Phrase(_) => {
                if children.is_empty() {
                    self.diagnostics.emit(
                        Diagnostic::error(format!("`{}` has no children", label.text))
                            .with_code(ErrorCode::E202)
                            .with_label(*span, ErrorCode::E202.description()),
                    );
                    return None;
                }

                let mut kids = Vec::with_capacity(children.len());
                for child in children {
                    match child {
                        RawNode::Word { text, span } => self.diagnostics.emit(
                            Diagnostic::error(format!("word `{text}` is not tagged"))
                                .with_code(ErrorCode::E205)
                                .with_label(*span, ErrorCode::E205.description())
                                .with_help(format!("wrap it in a part-of-speech bracket such as `(NN {text})`")),
                        ),
                        RawNode::Bracket { .. } => {
                            if let Some(kid) = self.elaborate(child) {
                                kids.push(Child::Node(kid));
                            }
                        }
                    }
                }

                if kids.is_empty() {
                    debug!(label = label.text; "Dropping phrase left empty by removed traces");
                    return None;
                }
                ConstituencyNode::new(category, kids, *span).ok()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kellogg_core::grammar::PhraseTag;

    use super::*;
    use crate::bracketed::read_tree;

    fn build(source: &str) -> Result<ConstituencyNode, ParseError> {
        let (raw, _) = read_tree(source).expect("valid brackets");
        build_tree(&raw)
    }

    #[test]
    fn test_base_label() {
        assert_eq!(base_label("NP-SBJ-1"), "NP");
        assert_eq!(base_label("PP=2"), "PP");
        assert_eq!(base_label("-LRB-"), "-LRB-");
        assert_eq!(base_label("-NONE-"), "-NONE-");
        assert_eq!(base_label("PRP$"), "PRP$");
    }

    #[test]
    fn test_build_simple_tree() {
        let tree = build("(S (NP (DT The) (NN cat)) (VP (VBD sat)))").unwrap();

        assert!(tree.is(PhraseTag::S));
        assert_eq!(tree.text(), "The cat sat");
        let np = tree.child_nodes().next().unwrap();
        assert!(np.is(PhraseTag::Np));
        assert_eq!(np.child_nodes().next().unwrap().pos(), Some(PosTag::Dt));
    }

    #[test]
    fn test_root_and_wrappers_unwrapped() {
        let tree = build("(ROOT (S (NP (PRP I)) (VP (VBP run))))").unwrap();
        assert!(tree.is(PhraseTag::S));

        let tree = build("( (S (NP (PRP I)) (VP (VBP run))) )").unwrap();
        assert!(tree.is(PhraseTag::S));
    }

    #[test]
    fn test_function_tags_stripped() {
        let tree = build("(S (NP-SBJ-1 (PRP I)) (VP (VBP run)))").unwrap();
        assert!(tree.child_nodes().next().unwrap().is(PhraseTag::Np));
    }

    #[test]
    fn test_traces_dropped() {
        let tree = build("(S (NP-SBJ (-NONE- *T*-1)) (NP (PRP I)) (VP (VBP run)))").unwrap();
        assert_eq!(tree.child_nodes().count(), 2);
        assert_eq!(tree.text(), "I run");
    }

    #[test]
    fn test_unknown_tags_all_reported() {
        let err = build("(S (NPX (DT The) (NN cat)) (VP (VBDD sat)))").unwrap_err();

        assert_eq!(err.diagnostics().len(), 2);
        assert!(
            err.diagnostics()
                .iter()
                .all(|d| d.code() == Some(ErrorCode::E201))
        );
        assert_eq!(err.diagnostics()[0].message(), "unknown category tag `NPX`");
    }

    #[test]
    fn test_untagged_word() {
        let err = build("(S (NP cat) (VP (VBD sat)))").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E205));
    }

    #[test]
    fn test_malformed_preterminal() {
        let err = build("(S (NP (NN big cat)) (VP (VBD sat)))").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E204));
    }

    #[test]
    fn test_empty_phrase() {
        let err = build("(S (NP) (VP (VBD sat)))").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E202));
    }

    #[test]
    fn test_ambiguous_wrapper() {
        let err = build("( (S (NP (PRP I)) (VP (VBP run))) (S (NP (PRP we)) (VP (VBP go))) )")
            .unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E203));
    }

    #[test]
    fn test_only_traces() {
        let err = build("(S (-NONE- *))").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E202));
    }
}
