//! Dependency rows following a bracketed tree.
//!
//! Two layouts are accepted, one row per token:
//!
//! ```text
//! 1   The   2   det                       index word head relation
//! 1   The   the   DET   DT   _   2   det   _   _     CoNLL-U
//! ```
//!
//! A head of `0` marks the root. CoNLL-U multiword ranges (`1-2`) and empty
//! nodes (`1.1`) are skipped.

use kellogg_core::grammar::DependencyToken;

use crate::{
    Span,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
};

struct Row<'a> {
    index: &'a str,
    word: &'a str,
    head: &'a str,
    relation: &'a str,
    span: Span,
}

fn columns(line: &str, span: Span) -> Option<Row<'_>> {
    let cols: Vec<&str> = line.split_whitespace().collect();
    match cols.len() {
        4 => Some(Row {
            index: cols[0],
            word: cols[1],
            head: cols[2],
            relation: cols[3],
            span,
        }),
        n if n >= 8 => Some(Row {
            index: cols[0],
            word: cols[1],
            head: cols[6],
            relation: cols[7],
            span,
        }),
        _ => None,
    }
}

fn number(text: &str, what: &str, span: Span) -> Result<usize, Diagnostic> {
    text.parse::<usize>().map_err(|_| {
        Diagnostic::error(format!("{what} `{text}` is not a number"))
            .with_code(ErrorCode::E301)
            .with_label(span, ErrorCode::E301.description())
    })
}

/// Reads dependency rows from `source`, which starts at byte `offset` of the
/// sentence block.
pub(crate) fn read_rows(source: &str, offset: usize) -> Result<Vec<DependencyToken>, ParseError> {
    let mut diagnostics = DiagnosticCollector::new();
    let mut tokens: Vec<DependencyToken> = Vec::new();
    let mut heads: Vec<(usize, Span)> = Vec::new();

    let mut line_start = offset;
    for line in source.split_inclusive('\n') {
        let start = line_start;
        line_start += line.len();

        let leading = line.len() - line.trim_start().len();
        let content = line.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        let span = Span::new(start + leading..start + leading + content.len());

        let Some(row) = columns(content, span) else {
            diagnostics.emit(
                Diagnostic::error("malformed dependency row")
                    .with_code(ErrorCode::E300)
                    .with_label(span, ErrorCode::E300.description())
                    .with_help("expected `index word head relation` or ten CoNLL-U columns"),
            );
            continue;
        };

        if row.index.contains(['-', '.']) {
            continue;
        }

        let parsed = number(row.index, "index", row.span)
            .and_then(|index| number(row.head, "head", row.span).map(|head| (index, head)));
        let (index, head) = match parsed {
            Ok(pair) => pair,
            Err(diag) => {
                diagnostics.emit(diag);
                continue;
            }
        };

        let expected = tokens.len() + 1;
        if index != expected {
            diagnostics.emit(
                Diagnostic::error(format!("expected token {expected}, found {index}"))
                    .with_code(ErrorCode::E302)
                    .with_label(row.span, ErrorCode::E302.description()),
            );
            continue;
        }

        heads.push((head, row.span));
        tokens.push(DependencyToken::new(
            index,
            row.word,
            (head != 0).then_some(head),
            row.relation,
        ));
    }

    for (head, span) in heads {
        if head > tokens.len() {
            diagnostics.emit(
                Diagnostic::error(format!("head {head} refers to a missing token"))
                    .with_code(ErrorCode::E303)
                    .with_label(span, ErrorCode::E303.description())
                    .with_help(format!("heads must be 0 or between 1 and {}", tokens.len())),
            );
        }
    }

    diagnostics.finish()?;
    Ok(tokens)
}
