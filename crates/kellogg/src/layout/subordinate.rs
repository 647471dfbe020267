use log::debug;

use kellogg_core::{
    draw::{LineRole, LineStyle},
    geometry::Point,
    grammar::{Category, ConstituencyNode, PhraseTag, join_words},
};

use super::{
    DrawContext, LayoutEngine, LayoutResult, StructuralError, StructuralErrorKind, VerbFrame,
    engine::content_children, sentence::SubjectSlot,
};

/// Where a hung clause ended up.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HungClause {
    pub right: f32,
    pub bottom: f32,
}

/// A WH-phrase that only holds a trace carries nothing to draw.
fn is_empty_phrase(node: &ConstituencyNode) -> bool {
    content_children(node).next().is_none()
}

impl LayoutEngine<'_> {
    /// Lays out a dependent clause whose own baseline starts at `origin`.
    ///
    /// Connecting words (`because`, `that`, `when`) are written on a dashed
    /// stretch of baseline in front of the clause. A WH-phrase becomes the
    /// clause's subject when the embedded sentence has none, as in
    /// `the man [who left]`. Clauses without a subject, such as infinitives
    /// and reduced relatives, are drawn as a bare predicate.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralErrorKind::MissingClause`] for an SBAR with no
    /// embedded sentence, and propagates errors from the clause itself.
    pub fn process_subordinate_clause(
        &self,
        node: &ConstituencyNode,
        origin: Point,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        match node.category() {
            Category::Phrase(PhraseTag::Sbar) => self.layout_linked_clause(node, origin, ctx),
            Category::Phrase(PhraseTag::Vp) => {
                self.process_verb_phrase(node, origin, &VerbFrame::new(), ctx)
            }
            Category::Phrase(tag) if tag.is_clause() => {
                self.layout_clause(node, origin, SubjectSlot::Optional, ctx)
            }
            _ => Err(StructuralError::new(
                StructuralErrorKind::UnexpectedCategory { expected: "SBAR" },
                node,
            )),
        }
    }

    fn layout_linked_clause(
        &self,
        node: &ConstituencyNode,
        origin: Point,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        let children: Vec<&ConstituencyNode> = content_children(node).collect();
        let Some(clause) = children
            .iter()
            .copied()
            .find(|child| child.phrase().is_some_and(|tag| tag.is_clause()))
        else {
            return Err(StructuralError::new(StructuralErrorKind::MissingClause, node));
        };

        let clause_has_subject = clause.child_nodes().any(|child| child.is(PhraseTag::Np));
        let mut link_words = Vec::new();
        let mut wh_subject = None;
        for child in children {
            if std::ptr::eq(child, clause) || is_empty_phrase(child) {
                continue;
            }
            if child.is(PhraseTag::Whnp) && !clause_has_subject && wh_subject.is_none() {
                wh_subject = Some(child);
            } else {
                link_words.push(child.text());
            }
        }

        let link = join_words(link_words.iter().map(String::as_str));
        debug!(link = link.as_str(), relative = wh_subject.is_some(); "Subordinate clause");

        let pad = self.config().padding();
        let (x, y) = (origin.x(), origin.y());
        let (strip, link_ascent) = if link.is_empty() {
            (0.0, 0.0)
        } else {
            let strip = self.measure(&link).width() + 2.0 * pad;
            let ascent = self.head_label(ctx, &link, x + strip / 2.0, y);
            ctx.line(
                Point::new(x, y),
                Point::new(x + strip, y),
                LineStyle::Dashed,
                LineRole::Connector,
            );
            (strip, ascent)
        };

        let slot = match wh_subject {
            Some(subject) => SubjectSlot::Given(subject),
            None => SubjectSlot::Optional,
        };
        let body = self.layout_clause(clause, Point::new(x + strip, y), slot, ctx)?;

        Ok(LayoutResult::new(
            strip + body.width(),
            link_ascent.max(body.ascent()),
            body.descent(),
            origin,
            body.baseline_end(),
        ))
    }

    /// Lays out `clause` below everything above `bottom` and ties it back to
    /// `attach` with a dashed connector.
    pub(crate) fn hang_clause(
        &self,
        ctx: &mut DrawContext,
        clause: &ConstituencyNode,
        attach: Point,
        bottom: f32,
    ) -> Result<HungClause, StructuralError> {
        let config = self.config();
        let x = attach.x() + config.subordinate_indent();
        let (sub, result) =
            self.detached(|sub| self.process_subordinate_clause(clause, Point::new(x, 0.0), sub))?;

        let y = bottom + config.clause_gap() + result.ascent();
        ctx.append_shifted(sub, Point::new(0.0, y));
        ctx.line(attach, Point::new(x, y), LineStyle::Dashed, LineRole::Connector);

        Ok(HungClause {
            right: x + result.width(),
            bottom: y + result.descent(),
        })
    }
}

#[cfg(test)]
mod tests {
    use kellogg_core::{
        draw::HeuristicMetrics,
        grammar::{Child, PosTag, Span, Word},
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

    fn clause(subject: &str, verb: &str) -> ConstituencyNode {
        phrase(
            PhraseTag::S,
            vec![
                phrase(PhraseTag::Np, vec![leaf(PosTag::Prp, subject)]),
                phrase(PhraseTag::Vp, vec![leaf(PosTag::Vbd, verb)]),
            ],
        )
    }

    fn layout(node: &ConstituencyNode) -> Result<(DrawContext, LayoutResult), StructuralError> {
        let config = LayoutConfig::default();
        let metrics = HeuristicMetrics::new(16.0);
        let engine = LayoutEngine::new(&config, &metrics);
        let mut ctx = DrawContext::new();
        let result = engine.process_subordinate_clause(node, Point::default(), &mut ctx)?;
        Ok((ctx, result))
    }

    #[test]
    fn test_conjunction_offsets_clause() {
        let node = phrase(
            PhraseTag::Sbar,
            vec![leaf(PosTag::In, "because"), clause("she", "left")],
        );
        let (ctx, result) = layout(&node).unwrap();

        let connector = ctx
            .lines()
            .find(|line| line.role() == LineRole::Connector)
            .unwrap();
        assert_eq!(connector.style(), LineStyle::Dashed);
        assert_eq!(connector.start(), Point::default());

        let divider = ctx
            .lines()
            .find(|line| line.role() == LineRole::SubjectDivider)
            .unwrap();
        assert!(divider.start().x() > connector.end().x());
        assert!(ctx.labels().any(|label| label.text() == "because"));
        assert_eq!(result.anchor(), Point::default());
    }

    #[test]
    fn test_relative_pronoun_becomes_subject() {
        let node = phrase(
            PhraseTag::Sbar,
            vec![
                phrase(PhraseTag::Whnp, vec![leaf(PosTag::Wp, "who")]),
                phrase(
                    PhraseTag::S,
                    vec![phrase(PhraseTag::Vp, vec![leaf(PosTag::Vbd, "left")])],
                ),
            ],
        );
        let (ctx, _) = layout(&node).unwrap();

        assert_eq!(
            ctx.lines()
                .filter(|line| line.role() == LineRole::SubjectDivider)
                .count(),
            1
        );
        assert_eq!(
            ctx.lines()
                .filter(|line| line.role() == LineRole::Connector)
                .count(),
            0
        );
    }

    #[test]
    fn test_infinitive_is_bare_predicate() {
        let node = phrase(
            PhraseTag::S,
            vec![phrase(
                PhraseTag::Vp,
                vec![
                    leaf(PosTag::To, "to"),
                    phrase(PhraseTag::Vp, vec![leaf(PosTag::Vb, "help")]),
                ],
            )],
        );
        let (ctx, _) = layout(&node).unwrap();

        assert!(ctx.labels().any(|label| label.text() == "to help"));
        assert!(
            !ctx.lines()
                .any(|line| line.role() == LineRole::SubjectDivider)
        );
    }

    #[test]
    fn test_missing_clause() {
        let node = phrase(PhraseTag::Sbar, vec![leaf(PosTag::In, "because")]);
        let err = layout(&node).unwrap_err();
        assert_eq!(err.kind(), StructuralErrorKind::MissingClause);
    }

    #[test]
    fn test_hung_clause_sits_below() {
        let config = LayoutConfig::default();
        let metrics = HeuristicMetrics::new(16.0);
        let engine = LayoutEngine::new(&config, &metrics);
        let mut ctx = DrawContext::new();

        let node = phrase(
            PhraseTag::Sbar,
            vec![leaf(PosTag::In, "when"), clause("it", "rained")],
        );
        let hung = engine
            .hang_clause(&mut ctx, &node, Point::new(50.0, 0.0), 10.0)
            .unwrap();

        assert!(hung.bottom > 10.0 + config.clause_gap());
        assert!(hung.right > 50.0);
        let tie = ctx
            .lines()
            .find(|line| line.role() == LineRole::Connector && line.start() == Point::new(50.0, 0.0))
            .unwrap();
        assert!(tie.end().y() > 10.0);
    }
}
