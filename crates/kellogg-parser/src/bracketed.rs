//! Reader for Penn Treebank bracket notation.
//!
//! Turns text such as `(S (NP (DT The) (NN cat)) (VP (VBD sat)))` into an
//! untyped [`RawNode`] tree. Labels are kept as written; validating them
//! against the category set happens in [`elaborate`](crate::elaborate).
//!
//! Lines starting with `#` before the tree are comments.

use winnow::{
    Parser as _,
    ascii::{multispace0, multispace1},
    combinator::{alt, opt, repeat},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{take_till, take_while},
};

use crate::{
    Span,
    error::{Diagnostic, ErrorCode},
};

/// Diagnostic details attached to winnow errors via `.add_context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BracketDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// Offset of the opening bracket the error belongs to.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type PResult<O> = ModalResult<O, ContextError<BracketDiagnostic>>;

/// A category label as written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawLabel<'a> {
    pub text: &'a str,
    pub span: Span,
}

/// An unvalidated bracketed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawNode<'a> {
    Bracket {
        label: Option<RawLabel<'a>>,
        children: Vec<RawNode<'a>>,
        span: Span,
    },
    Word {
        text: &'a str,
        span: Span,
    },
}

impl RawNode<'_> {
    pub(crate) fn span(&self) -> Span {
        match self {
            RawNode::Bracket { span, .. } | RawNode::Word { span, .. } => *span,
        }
    }
}

/// Whitespace and `#` comment lines.
fn trivia(input: &mut Input<'_>) -> PResult<()> {
    repeat(
        0..,
        alt((multispace1.void(), ('#', take_till(0.., '\n')).void())),
    )
    .parse_next(input)
}

/// A label or word: anything up to whitespace or a bracket.
fn symbol<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    take_while(1.., |c: char| !c.is_whitespace() && c != '(' && c != ')').parse_next(input)
}

fn word<'a>(input: &mut Input<'a>) -> PResult<RawNode<'a>> {
    symbol
        .with_span()
        .map(|(text, range)| RawNode::Word {
            text,
            span: Span::new(range),
        })
        .parse_next(input)
}

fn unclosed(input: &Input<'_>, start: usize) -> ErrMode<ContextError<BracketDiagnostic>> {
    ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        BracketDiagnostic {
            code: ErrorCode::E101,
            message: "unclosed bracket",
            help: Some("add a closing `)`"),
            start,
        },
    ))
}

/// `(` label? (bracket | word)* `)`
fn bracket<'a>(input: &mut Input<'a>) -> PResult<RawNode<'a>> {
    let start = input.current_token_start();
    '('.parse_next(input)?;
    multispace0.parse_next(input)?;

    let label = opt(symbol.with_span())
        .map(|label| {
            label.map(|(text, range)| RawLabel {
                text,
                span: Span::new(range),
            })
        })
        .parse_next(input)?;

    let mut children = Vec::new();
    loop {
        multispace0.parse_next(input)?;
        if input.is_empty() {
            return Err(unclosed(input, start));
        }
        if opt(')').parse_next(input)?.is_some() {
            break;
        }
        children.push(alt((bracket, word)).parse_next(input)?);
    }

    let end = input.current_token_start();
    Ok(RawNode::Bracket {
        label,
        children,
        span: Span::new(start..end),
    })
}

/// Reads the first tree in `source`.
///
/// Returns the tree and the byte offset just past its closing bracket, where
/// any dependency rows begin.
pub(crate) fn read_tree(source: &str) -> Result<(RawNode<'_>, usize), Diagnostic> {
    let mut input = LocatingSlice::new(source);

    trivia
        .parse_next(&mut input)
        .map_err(|err| convert_err_mode(err, input.current_token_start()))?;

    let position = input.current_token_start();
    if input.is_empty() {
        return Err(Diagnostic::error("no tree in sentence block")
            .with_code(ErrorCode::E200)
            .with_label(Span::new(position..position), ErrorCode::E200.description())
            .with_help("provide a bracketed parse such as `(S (NP (NN it)) (VP (VBD rained)))`"));
    }

    if !input.starts_with('(') {
        let token_len = source[position..]
            .find(char::is_whitespace)
            .unwrap_or(source.len() - position);
        return Err(Diagnostic::error("expected `(` to start a bracketed tree")
            .with_code(ErrorCode::E100)
            .with_label(
                Span::new(position..position + token_len),
                ErrorCode::E100.description(),
            )
            .with_help(
                "raw sentences must be parsed first; input must look like `(S (NP ...) (VP ...))`",
            ));
    }

    let tree = bracket
        .parse_next(&mut input)
        .map_err(|err| convert_err_mode(err, input.current_token_start()))?;

    Ok((tree, input.current_token_start()))
}

/// Converts a winnow error into a diagnostic, preferring attached context.
fn convert_err_mode(err: ErrMode<ContextError<BracketDiagnostic>>, error_pos: usize) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    if let Some(BracketDiagnostic {
        code,
        message,
        help,
        start,
    }) = context_error.context().next()
    {
        let mut diag = Diagnostic::error(*message)
            .with_code(*code)
            .with_label(Span::new(error_pos..error_pos), "input ends here")
            .with_secondary_label(Span::new(*start..*start + 1), "bracket opened here");
        if let Some(help) = help {
            diag = diag.with_help(*help);
        }
        return diag;
    }

    Diagnostic::error("unexpected token")
        .with_code(ErrorCode::E100)
        .with_label(
            Span::new(error_pos..error_pos.saturating_add(1)),
            ErrorCode::E100.description(),
        )
}
