//! Grammar model consumed by the layout engine.
//!
//! A sentence arrives as a [`ConstituencyNode`] tree whose labels are drawn
//! from the closed [`Category`] enumeration, optionally accompanied by a flat
//! list of [`DependencyToken`]s. Both are produced upstream by a natural
//! language parser; this module only models them.
//!
//! Trees are immutable once built. [`ConstituencyNode::new`] rejects
//! non-terminals without children, so every node the layout engine sees
//! covers at least one word.

use std::{fmt, ops::Range, str::FromStr};

use thiserror::Error;

/// Byte range of a tree element in its source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }

    pub fn start(self) -> usize {
        self.start
    }

    pub fn end(self) -> usize {
        self.end
    }

    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns the smallest span covering both spans.
    pub fn union(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Errors raised while building grammar trees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("unknown category tag `{0}`")]
    UnknownTag(String),

    #[error("{0} node has no children")]
    EmptyNode(Category),
}

macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Returns the Penn Treebank spelling of this tag.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = GrammarError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(GrammarError::UnknownTag(s.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tag_enum! {
    /// Phrase-level (non-terminal) categories.
    PhraseTag {
        S => "S",
        Sbar => "SBAR",
        Sbarq => "SBARQ",
        Sinv => "SINV",
        Sq => "SQ",
        Np => "NP",
        Vp => "VP",
        Pp => "PP",
        Adjp => "ADJP",
        Advp => "ADVP",
        Prt => "PRT",
        Qp => "QP",
        Whnp => "WHNP",
        Whadvp => "WHADVP",
        Whpp => "WHPP",
        Whadjp => "WHADJP",
        Conjp => "CONJP",
        Ucp => "UCP",
        Prn => "PRN",
        Frag => "FRAG",
        Intj => "INTJ",
        Nx => "NX",
        Nac => "NAC",
        Lst => "LST",
        Rrc => "RRC",
        X => "X",
    }
}

tag_enum! {
    /// Part-of-speech (pre-terminal) categories, including punctuation tags.
    PosTag {
        Cc => "CC",
        Cd => "CD",
        Dt => "DT",
        Ex => "EX",
        Fw => "FW",
        In => "IN",
        Jj => "JJ",
        Jjr => "JJR",
        Jjs => "JJS",
        Ls => "LS",
        Md => "MD",
        Nn => "NN",
        Nns => "NNS",
        Nnp => "NNP",
        Nnps => "NNPS",
        Pdt => "PDT",
        Pos => "POS",
        Prp => "PRP",
        PrpPossessive => "PRP$",
        Rb => "RB",
        Rbr => "RBR",
        Rbs => "RBS",
        Rp => "RP",
        Sym => "SYM",
        To => "TO",
        Uh => "UH",
        Vb => "VB",
        Vbd => "VBD",
        Vbg => "VBG",
        Vbn => "VBN",
        Vbp => "VBP",
        Vbz => "VBZ",
        Wdt => "WDT",
        Wp => "WP",
        WpPossessive => "WP$",
        Wrb => "WRB",
        Add => "ADD",
        Afx => "AFX",
        Hyph => "HYPH",
        Nfp => "NFP",
        Comma => ",",
        Period => ".",
        Colon => ":",
        OpenQuote => "``",
        CloseQuote => "''",
        Hash => "#",
        Dollar => "$",
        LeftBracket => "-LRB-",
        RightBracket => "-RRB-",
        Empty => "-NONE-",
    }
}

impl PhraseTag {
    /// Clause-level categories that can head a diagram.
    pub fn is_clause(&self) -> bool {
        matches!(self, Self::S | Self::Sinv | Self::Sq | Self::Sbarq)
    }
}

impl PosTag {
    pub fn is_noun(&self) -> bool {
        matches!(self, Self::Nn | Self::Nns | Self::Nnp | Self::Nnps)
    }

    pub fn is_pronoun(&self) -> bool {
        matches!(self, Self::Prp | Self::Wp | Self::Ex)
    }

    /// Verb forms plus modals, which join the verb label.
    pub fn is_verbal(&self) -> bool {
        matches!(
            self,
            Self::Vb | Self::Vbd | Self::Vbg | Self::Vbn | Self::Vbp | Self::Vbz | Self::Md
        )
    }

    pub fn is_participle(&self) -> bool {
        matches!(self, Self::Vbg | Self::Vbn)
    }

    pub fn is_adjective(&self) -> bool {
        matches!(self, Self::Jj | Self::Jjr | Self::Jjs)
    }

    pub fn is_preposition(&self) -> bool {
        matches!(self, Self::In | Self::To)
    }

    pub fn is_punctuation(&self) -> bool {
        matches!(
            self,
            Self::Comma
                | Self::Period
                | Self::Colon
                | Self::OpenQuote
                | Self::CloseQuote
                | Self::Hash
                | Self::Dollar
                | Self::LeftBracket
                | Self::RightBracket
                | Self::Hyph
                | Self::Nfp
                | Self::Empty
        )
    }
}

/// A grammatical category label: either a phrase or a part of speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Phrase(PhraseTag),
    Pos(PosTag),
}

impl Category {
    pub fn phrase(&self) -> Option<PhraseTag> {
        match self {
            Self::Phrase(tag) => Some(*tag),
            Self::Pos(_) => None,
        }
    }

    pub fn pos(&self) -> Option<PosTag> {
        match self {
            Self::Pos(tag) => Some(*tag),
            Self::Phrase(_) => None,
        }
    }
}

impl FromStr for Category {
    type Err = GrammarError;

    /// Parses a bare Penn label. Function tags must already be stripped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhraseTag::from_str(s)
            .map(Self::Phrase)
            .or_else(|_| PosTag::from_str(s).map(Self::Pos))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phrase(tag) => fmt::Display::fmt(tag, f),
            Self::Pos(tag) => fmt::Display::fmt(tag, f),
        }
    }
}

/// A terminal word with its location in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    text: String,
    span: Span,
}

impl Word {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A child of a constituency node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Node(ConstituencyNode),
    Word(Word),
}

/// A labeled constituent and its ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstituencyNode {
    category: Category,
    children: Vec<Child>,
    span: Span,
}

impl ConstituencyNode {
    /// Creates a node, rejecting empty child lists.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::EmptyNode`] when `children` is empty.
    pub fn new(category: Category, children: Vec<Child>, span: Span) -> Result<Self, GrammarError> {
        if children.is_empty() {
            return Err(GrammarError::EmptyNode(category));
        }
        Ok(Self {
            category,
            children,
            span,
        })
    }

    /// Creates a pre-terminal node holding a single word.
    pub fn leaf(tag: PosTag, word: Word) -> Self {
        let span = word.span();
        Self {
            category: Category::Pos(tag),
            children: vec![Child::Word(word)],
            span,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Returns the phrase tag, if this node is a phrase.
    pub fn phrase(&self) -> Option<PhraseTag> {
        self.category.phrase()
    }

    /// Returns the part-of-speech tag, if this node is a pre-terminal.
    pub fn pos(&self) -> Option<PosTag> {
        self.category.pos()
    }

    /// Returns `true` when this node is the given phrase.
    pub fn is(&self, tag: PhraseTag) -> bool {
        self.phrase() == Some(tag)
    }

    /// Iterates over child nodes, skipping bare words.
    pub fn child_nodes(&self) -> impl Iterator<Item = &ConstituencyNode> {
        self.children.iter().filter_map(|child| match child {
            Child::Node(node) => Some(node),
            Child::Word(_) => None,
        })
    }

    /// Iterates over the words under this node in order.
    pub fn words(&self) -> Vec<&Word> {
        let mut words = Vec::new();
        self.collect_words(&mut words);
        words
    }

    fn collect_words<'a>(&'a self, out: &mut Vec<&'a Word>) {
        for child in &self.children {
            match child {
                Child::Word(word) => out.push(word),
                Child::Node(node) => node.collect_words(out),
            }
        }
    }

    /// Returns the first word of a pre-terminal, or `None` for phrases.
    pub fn word(&self) -> Option<&str> {
        if self.pos().is_none() {
            return None;
        }
        self.children.iter().find_map(|child| match child {
            Child::Word(word) => Some(word.text()),
            Child::Node(_) => None,
        })
    }

    /// Returns the sentence text covered by this node.
    ///
    /// Punctuation and clitics such as `'s` or `n't` attach to the
    /// preceding word; all other words are separated by a single space.
    pub fn text(&self) -> String {
        join_words(self.words().into_iter().map(Word::text))
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.child_nodes().map(Self::node_count).sum::<usize>()
    }
}

/// Joins tokens into display text.
pub fn join_words<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    let mut text = String::new();
    for word in words {
        if !text.is_empty() && !attaches_left(word) {
            text.push(' ');
        }
        text.push_str(word);
    }
    text
}

fn attaches_left(word: &str) -> bool {
    matches!(word, "," | "." | ";" | ":" | "!" | "?" | "%" | "''")
        || word.starts_with('\'')
        || word.eq_ignore_ascii_case("n't")
}

/// One row of a dependency parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyToken {
    index: usize,
    text: String,
    head: Option<usize>,
    relation: String,
}

impl DependencyToken {
    /// Creates a token. `index` is 1-based; a `head` of `None` marks the root.
    pub fn new(
        index: usize,
        text: impl Into<String>,
        head: Option<usize>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            index,
            text: text.into(),
            head,
            relation: relation.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn head(&self) -> Option<usize> {
        self.head
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }
}
