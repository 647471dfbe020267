use log::debug;

use kellogg_core::{
    geometry::Point,
    grammar::{ConstituencyNode, PhraseTag, PosTag, join_words},
};

use super::{
    CompoundKind, DrawContext, LayoutEngine, LayoutResult, ModifierBias, StructuralError,
    compound::{is_compound, is_coordinator},
    engine::{Attachments, Frontier, content_children},
};

/// The grammatical slot a noun phrase fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NounRole {
    Subject,
    DirectObject,
    IndirectObject,
    PrepositionObject,
    /// Predicate nominative after a linking verb.
    Complement,
    Appositive,
}

impl NounRole {
    pub fn bias(self) -> ModifierBias {
        match self {
            Self::Subject => ModifierBias::Leading,
            _ => ModifierBias::Trailing,
        }
    }

    /// Roles whose compounds hang below their attachment point instead of
    /// straddling it.
    pub(crate) fn hangs_below(self) -> bool {
        matches!(self, Self::IndirectObject | Self::PrepositionObject)
    }
}

enum NounHead<'n> {
    Word(String),
    Phrase(&'n ConstituencyNode),
}

struct NounParts<'n> {
    head: NounHead<'n>,
    leading: Vec<String>,
    trailing: Attachments<'n>,
}

/// An NP whose last child is a possessive marker: `(NP (NNP John) (POS 's))`.
fn is_possessive(node: &ConstituencyNode) -> bool {
    node.is(PhraseTag::Np)
        && node
            .child_nodes()
            .last()
            .is_some_and(|child| child.pos() == Some(PosTag::Pos))
}

fn is_clause_like(node: &ConstituencyNode) -> bool {
    node.phrase().is_some_and(|tag| {
        tag.is_clause() || matches!(tag, PhraseTag::Sbar | PhraseTag::Vp | PhraseTag::Rrc)
    })
}

/// Adds a pre-head word, folding coordinated modifiers such as
/// `black and white` into one label.
fn push_leading(leading: &mut Vec<String>, joining: &mut bool, child: &ConstituencyNode) {
    let text = child.text();
    match leading.last_mut() {
        Some(last) if is_coordinator(child) => {
            *last = join_words([last.as_str(), text.as_str()]);
            *joining = true;
        }
        Some(last) if *joining => {
            *last = join_words([last.as_str(), text.as_str()]);
            *joining = false;
        }
        _ => leading.push(text),
    }
}

impl<'n> NounParts<'n> {
    fn collect(node: &'n ConstituencyNode) -> Self {
        let children: Vec<&ConstituencyNode> = content_children(node).collect();

        let head_index = children
            .iter()
            .rposition(|child| child.pos().is_some_and(|tag| tag.is_noun()))
            .or_else(|| {
                children
                    .iter()
                    .position(|child| child.pos().is_some_and(|tag| tag.is_pronoun()))
            })
            .or_else(|| {
                children
                    .iter()
                    .position(|child| child.is(PhraseTag::Np) && !is_possessive(child))
            });

        let mut trailing = Attachments::default();
        let mut leading = Vec::new();

        let Some(head_index) = head_index else {
            // No nominal head: everything that does not hang off the phrase
            // becomes the head label.
            let mut words = Vec::new();
            for child in children {
                match child.phrase() {
                    Some(PhraseTag::Pp) => trailing.prepositions.push(child),
                    _ if is_clause_like(child) => trailing.clauses.push(child),
                    _ => words.push(child.text()),
                }
            }
            let text = if words.is_empty() {
                node.text()
            } else {
                join_words(words.iter().map(String::as_str))
            };
            return Self {
                head: NounHead::Word(text),
                leading,
                trailing,
            };
        };

        let head_node = children[head_index];
        let mut possessive_marker = None;
        let mut joining = false;
        let head = if head_node.pos().is_some() {
            NounHead::Word(head_node.text())
        } else {
            NounHead::Phrase(head_node)
        };

        for (index, child) in children.iter().copied().enumerate() {
            if index == head_index {
                continue;
            }
            if index == head_index + 1 && child.pos() == Some(PosTag::Pos) {
                possessive_marker = Some(child.text());
                continue;
            }

            match child.phrase() {
                Some(PhraseTag::Pp) => trailing.prepositions.push(child),
                _ if is_clause_like(child) => trailing.clauses.push(child),
                Some(PhraseTag::Np) if !is_possessive(child) && index > head_index => {
                    trailing.appositives.push(child)
                }
                _ if matches!(head, NounHead::Phrase(_)) => trailing.modifiers.push(child.text()),
                _ => push_leading(&mut leading, &mut joining, child),
            }
        }

        let head = match (head, possessive_marker) {
            (NounHead::Word(text), Some(marker)) => {
                NounHead::Word(join_words([text.as_str(), marker.as_str()]))
            }
            (head, _) => head,
        };

        Self {
            head,
            leading,
            trailing,
        }
    }
}

impl LayoutEngine<'_> {
    /// Lays out a noun phrase on a baseline starting at `origin`.
    ///
    /// The head is the last noun, else the first pronoun, else a nested
    /// NP, else the whole phrase text. Determiners, adjectives, numbers,
    /// possessives and noun adjuncts hang below it; prepositional phrases,
    /// appositives and relative clauses follow to the right.
    pub fn process_noun_phrase(
        &self,
        node: &ConstituencyNode,
        origin: Point,
        role: NounRole,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        if is_compound(node, PhraseTag::Np) {
            return self.process_compound(node, CompoundKind::Noun(role), origin, ctx);
        }

        let parts = NounParts::collect(node);
        let frontier = match parts.head {
            NounHead::Word(text) => {
                debug!(head = text.as_str(), modifiers = parts.leading.len(), role:?; "Noun phrase");
                self.layout_word_head(ctx, &text, &parts.leading, origin, role.bias())
            }
            NounHead::Phrase(inner) => {
                let result = self.process_noun_phrase(inner, origin, role, ctx)?;
                Frontier::after(&result, origin)
            }
        };

        self.attach_trailing(ctx, frontier, &parts.trailing, origin)
    }
}

#[cfg(test)]
mod tests {
    use kellogg_core::{
        draw::{HeuristicMetrics, LineRole},
        grammar::{Category, Child, Span, Word},
    };

    use super::*;
    use crate::config::LayoutConfig;

    fn leaf(tag: PosTag, text: &str) -> ConstituencyNode {
        ConstituencyNode::leaf(tag, Word::new(text, Span::default()))
    }

    fn phrase(tag: PhraseTag, children: Vec<ConstituencyNode>) -> ConstituencyNode {
        ConstituencyNode::new(
            Category::Phrase(tag),
            children.into_iter().map(Child::Node).collect(),
            Span::default(),
        )
        .unwrap()
    }

    fn layout(node: &ConstituencyNode, role: NounRole) -> (DrawContext, LayoutResult) {
        let config = LayoutConfig::default();
        let metrics = HeuristicMetrics::new(16.0);
        let engine = LayoutEngine::new(&config, &metrics);
        let mut ctx = DrawContext::new();
        let result = engine
            .process_noun_phrase(node, Point::default(), role, &mut ctx)
            .unwrap();
        (ctx, result)
    }

    fn label_texts(ctx: &DrawContext) -> Vec<&str> {
        ctx.labels().map(|label| label.text()).collect()
    }

    #[test]
    fn test_last_noun_is_head() {
        let np = phrase(
            PhraseTag::Np,
            vec![
                leaf(PosTag::Dt, "the"),
                leaf(PosTag::Nn, "city"),
                leaf(PosTag::Nn, "council"),
            ],
        );
        let (ctx, result) = layout(&np, NounRole::DirectObject);

        let head = ctx
            .labels()
            .find(|label| label.angle() == 0.0)
            .map(|label| label.text());
        assert_eq!(head, Some("council"));
        assert_eq!(
            ctx.lines()
                .filter(|line| line.role() == LineRole::ModifierDiagonal)
                .count(),
            2
        );
        assert!(result.width() > 0.0);
    }

    #[test]
    fn test_coordinated_modifiers_share_one_diagonal() {
        let np = phrase(
            PhraseTag::Np,
            vec![
                leaf(PosTag::Dt, "the"),
                leaf(PosTag::Jj, "black"),
                leaf(PosTag::Cc, "and"),
                leaf(PosTag::Jj, "white"),
                leaf(PosTag::Nn, "cat"),
            ],
        );
        let (ctx, _) = layout(&np, NounRole::Subject);

        let labels = label_texts(&ctx);
        assert_eq!(labels.iter().filter(|text| **text == "cat").count(), 1);
        assert!(labels.contains(&"black and white"));
        assert_eq!(
            ctx.lines()
                .filter(|line| line.role() == LineRole::ModifierDiagonal)
                .count(),
            2
        );
        assert!(ctx.lines().all(|line| line.role() != LineRole::Connector));
    }

    #[test]
    fn test_pronoun_head_without_modifiers() {
        let np = phrase(PhraseTag::Np, vec![leaf(PosTag::Prp, "she")]);
        let (ctx, result) = layout(&np, NounRole::Subject);

        assert_eq!(label_texts(&ctx), vec!["she"]);
        assert_eq!(ctx.lines().count(), 1);
        assert_eq!(result.descent(), 0.0);
    }

    #[test]
    fn test_possessive_becomes_one_modifier() {
        let owner = phrase(
            PhraseTag::Np,
            vec![leaf(PosTag::Nnp, "John"), leaf(PosTag::Pos, "'s")],
        );
        let np = phrase(PhraseTag::Np, vec![owner, leaf(PosTag::Nn, "dog")]);
        let (ctx, _) = layout(&np, NounRole::Subject);

        assert!(label_texts(&ctx).contains(&"John's"));
        assert!(label_texts(&ctx).contains(&"dog"));
    }

    #[test]
    fn test_headless_phrase_uses_text() {
        let np = phrase(
            PhraseTag::Np,
            vec![leaf(PosTag::Dt, "all"), leaf(PosTag::Cd, "three")],
        );
        let (ctx, _) = layout(&np, NounRole::Subject);
        assert_eq!(label_texts(&ctx), vec!["all three"]);
    }

    #[test]
    fn test_prepositional_phrase_extends_width() {
        let bare = phrase(
            PhraseTag::Np,
            vec![leaf(PosTag::Dt, "the"), leaf(PosTag::Nn, "man")],
        );
        let pp = phrase(
            PhraseTag::Pp,
            vec![
                leaf(PosTag::In, "with"),
                phrase(PhraseTag::Np, vec![leaf(PosTag::Nn, "hats")]),
            ],
        );
        let np = phrase(PhraseTag::Np, vec![bare.clone(), pp]);

        let (_, short) = layout(&bare, NounRole::DirectObject);
        let (ctx, long) = layout(&np, NounRole::DirectObject);

        assert!(long.width() > short.width());
        assert!(long.descent() > short.descent());
        assert!(
            ctx.lines()
                .any(|line| line.role() == LineRole::PrepositionDiagonal)
        );
    }
}
