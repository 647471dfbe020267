//! Coordinated phrases: compound subjects, objects, predicates and
//! complements.

use std::borrow::Cow;

use log::debug;

use kellogg_core::{
    draw::{LineRole, LineStyle, Rotation},
    geometry::Point,
    grammar::{Category, Child, ConstituencyNode, PhraseTag, PosTag, join_words},
};

use super::{
    DrawContext, LayoutEngine, LayoutResult, NounRole, StructuralError, StructuralErrorKind,
    VerbFrame, engine::is_punctuation,
};

/// What kind of phrase a compound coordinates.
#[derive(Debug, Clone, Copy)]
pub enum CompoundKind<'f> {
    Noun(NounRole),
    /// Coordinated verb phrases sharing `frame`.
    Predicate(&'f VerbFrame<'f>),
    Adjective,
}

impl CompoundKind<'_> {
    fn tag(&self) -> PhraseTag {
        match self {
            Self::Noun(_) => PhraseTag::Np,
            Self::Predicate(_) => PhraseTag::Vp,
            Self::Adjective => PhraseTag::Adjp,
        }
    }

    /// Subject compounds converge on the predicate to their right; all
    /// others diverge from the point they hang from.
    fn joins_right(&self) -> bool {
        matches!(self, Self::Noun(NounRole::Subject))
    }

    fn hangs_below(&self) -> bool {
        matches!(self, Self::Noun(role) if role.hangs_below())
    }
}

/// The parts of a coordinated node.
#[derive(Debug, Clone)]
pub(crate) struct Coordination<'n> {
    pub conjuncts: Vec<Cow<'n, ConstituencyNode>>,
    /// Coordinating words in order: `and`, `or`, `as well as`.
    pub coordinators: Vec<String>,
    /// Children that are neither conjuncts nor separators.
    pub shared: Vec<&'n ConstituencyNode>,
}

impl Coordination<'_> {
    pub fn conjunction(&self) -> String {
        join_words(self.coordinators.iter().map(String::as_str))
    }
}

pub(crate) fn is_coordinator(node: &ConstituencyNode) -> bool {
    node.pos() == Some(PosTag::Cc) || node.is(PhraseTag::Conjp)
}

fn is_separator(node: &ConstituencyNode) -> bool {
    is_coordinator(node) || is_punctuation(node)
}

/// Splits a node carrying a coordinator into its conjuncts.
///
/// Conjuncts are the children labeled `tag` when there are at least two;
/// otherwise a flat node such as `(NP (NNS cats) (CC and) (NNS dogs))` is
/// cut at every coordinator and comma into synthetic `tag` phrases.
/// Returns `None` when the node has no coordinator, or when some piece of
/// a flat node lacks a head of its own, as in `the black and white cat`.
pub(crate) fn coordination(node: &ConstituencyNode, tag: PhraseTag) -> Option<Coordination<'_>> {
    let coordinators: Vec<String> = node
        .child_nodes()
        .filter(|child| is_coordinator(child))
        .map(ConstituencyNode::text)
        .collect();
    if coordinators.is_empty() {
        return None;
    }

    let phrases = node.child_nodes().filter(|child| child.is(tag)).count();
    if phrases >= 2 {
        let (conjuncts, shared): (Vec<_>, Vec<_>) = node
            .child_nodes()
            .filter(|child| !is_separator(child))
            .partition(|child| child.is(tag));
        return Some(Coordination {
            conjuncts: conjuncts.into_iter().map(Cow::Borrowed).collect(),
            coordinators,
            shared,
        });
    }

    let mut segments: Vec<Vec<&ConstituencyNode>> = vec![Vec::new()];
    for child in node.child_nodes() {
        if is_separator(child) {
            if segments.last().is_some_and(|segment| !segment.is_empty()) {
                segments.push(Vec::new());
            }
        } else if let Some(segment) = segments.last_mut() {
            segment.push(child);
        }
    }

    segments.retain(|segment| !segment.is_empty());
    if !segments.iter().all(|segment| has_head(segment, tag)) {
        return None;
    }

    let conjuncts = segments
        .into_iter()
        .filter_map(|segment| {
            let span = segment
                .iter()
                .map(|child| child.span())
                .reduce(|acc, span| acc.union(span))?;
            let children = segment
                .into_iter()
                .map(|child| Child::Node(child.clone()))
                .collect();
            ConstituencyNode::new(Category::Phrase(tag), children, span).ok()
        })
        .map(Cow::Owned)
        .collect();

    Some(Coordination {
        conjuncts,
        coordinators,
        shared: Vec::new(),
    })
}

/// Whether a flat segment can stand alone as a `tag` conjunct.
fn has_head(segment: &[&ConstituencyNode], tag: PhraseTag) -> bool {
    segment.iter().any(|child| match (child.category(), tag) {
        (Category::Pos(pos), PhraseTag::Np) => pos.is_noun() || pos.is_pronoun(),
        (Category::Pos(pos), PhraseTag::Vp) => pos.is_verbal(),
        (Category::Pos(pos), PhraseTag::Adjp) => pos.is_adjective() || pos.is_participle(),
        (Category::Phrase(phrase), PhraseTag::Np | PhraseTag::Vp | PhraseTag::Adjp) => {
            phrase == tag
        }
        _ => true,
    })
}

/// Whether `node` coordinates at least two `tag` conjuncts.
pub(crate) fn is_compound(node: &ConstituencyNode, tag: PhraseTag) -> bool {
    coordination(node, tag).is_some_and(|coordination| coordination.conjuncts.len() >= 2)
}

impl LayoutEngine<'_> {
    /// Lays out a coordinated phrase as parallel branches.
    ///
    /// Branches stack vertically `compound_gap` apart and are extended to a
    /// common length. Subject branches converge with fork lines on a join
    /// point at the right, where the predicate continues; all other kinds
    /// diverge from `origin`. The conjunction sits on the free side between
    /// the last two branches and every branch is tied to it with a dashed
    /// connector.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralErrorKind::MissingConjunct`] when `node` does not
    /// coordinate at least two phrases of the kind requested.
    pub fn process_compound(
        &self,
        node: &ConstituencyNode,
        kind: CompoundKind<'_>,
        origin: Point,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        let Some(coordination) =
            coordination(node, kind.tag()).filter(|coordination| coordination.conjuncts.len() >= 2)
        else {
            return Err(StructuralError::new(StructuralErrorKind::MissingConjunct, node));
        };

        let config = self.config();
        let pad = config.padding();
        let label = self.conjunction_label(&coordination, &kind);
        let label_size = self.measure(&label);
        let strip = if label.is_empty() {
            pad
        } else {
            label_size.width() + 2.0 * pad
        };

        let joins_right = kind.joins_right();
        let branch_x = if joins_right {
            origin.x() + strip
        } else {
            origin.x() + config.fork_run()
        };
        debug!(
            conjuncts = coordination.conjuncts.len(),
            conjunction = label.as_str(),
            kind:?;
            "Compound"
        );

        let mut branches = Vec::with_capacity(coordination.conjuncts.len());
        for (index, conjunct) in coordination.conjuncts.iter().enumerate() {
            let start = Point::new(branch_x, 0.0);
            branches.push(self.detached(|sub| self.layout_conjunct(conjunct, kind, index, start, sub))?);
        }

        let gap = config.compound_gap();
        let widest = branches
            .iter()
            .map(|(_, result)| result.width())
            .fold(0.0_f32, f32::max);
        let stack_height = branches
            .iter()
            .map(|(_, result)| result.height())
            .sum::<f32>()
            + gap * (branches.len() - 1) as f32;
        let end_x = branch_x + widest;

        let mut top = if kind.hangs_below() {
            origin.y() - branches[0].1.ascent()
        } else {
            origin.y() - stack_height / 2.0
        };
        let mut rows: Vec<(f32, LayoutResult)> = Vec::with_capacity(branches.len());
        for (sub, result) in branches {
            let y = top + result.ascent();
            ctx.append_shifted(sub, Point::new(0.0, y));
            let result = result.translate(Point::new(0.0, y));
            self.baseline(ctx, y, result.baseline_end(), end_x);
            top = y + result.descent() + gap;
            rows.push((y, result));
        }

        let first_top = rows[0].0 - rows[0].1.ascent();
        let (last_y, last) = rows[rows.len() - 1];
        let (previous_y, previous) = rows[rows.len() - 2];
        let last_bottom = last_y + last.descent();
        let label_y = (previous_y + previous.descent() + last_y - last.ascent()) / 2.0;

        let (join, branch_edge, label_edge, label_x, width) = if joins_right {
            let join = Point::new(end_x + config.fork_run(), origin.y());
            for (y, _) in &rows {
                ctx.line(Point::new(end_x, *y), join, LineStyle::Solid, LineRole::Fork);
            }
            (
                join,
                branch_x,
                branch_x - pad,
                origin.x() + strip / 2.0,
                strip + widest + config.fork_run(),
            )
        } else {
            for (y, _) in &rows {
                ctx.line(origin, Point::new(branch_x, *y), LineStyle::Solid, LineRole::Fork);
            }
            (
                origin,
                end_x,
                end_x + pad,
                end_x + strip / 2.0,
                config.fork_run() + widest + strip,
            )
        };

        for (y, _) in &rows {
            ctx.line(
                Point::new(branch_edge, *y),
                Point::new(label_edge, label_y),
                LineStyle::Dashed,
                LineRole::Connector,
            );
        }
        if !label.is_empty() {
            ctx.label(
                label,
                Point::new(label_x, label_y + label_size.height() / 2.0),
                Rotation::Horizontal,
            );
        }

        let baseline_end = if joins_right { join.x() } else { end_x };
        Ok(LayoutResult::new(
            width,
            origin.y() - first_top,
            last_bottom - origin.y(),
            join,
            baseline_end,
        ))
    }

    /// Correlatives such as `both` or `either` share the conjunction label.
    fn conjunction_label(&self, coordination: &Coordination<'_>, kind: &CompoundKind<'_>) -> String {
        if matches!(kind, CompoundKind::Predicate(_)) {
            return coordination.conjunction();
        }

        let mut words = Vec::new();
        for shared in &coordination.shared {
            if shared.pos().is_some() {
                words.push(shared.text());
            } else {
                debug!(category:% = shared.category(), text = shared.text().as_str(); "Shared constituent not drawn");
            }
        }
        words.extend(coordination.coordinators.iter().cloned());
        join_words(words.iter().map(String::as_str))
    }

    fn layout_conjunct(
        &self,
        conjunct: &ConstituencyNode,
        kind: CompoundKind<'_>,
        index: usize,
        origin: Point,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        match kind {
            CompoundKind::Noun(role) => self.process_noun_phrase(conjunct, origin, role, ctx),
            CompoundKind::Adjective => self.process_adjective_phrase(conjunct, origin, ctx),
            // Shared adverbials and prepositional phrases attach once.
            CompoundKind::Predicate(frame) if index == 0 => {
                self.process_verb_phrase(conjunct, origin, frame, ctx)
            }
            CompoundKind::Predicate(frame) => {
                self.process_verb_phrase(conjunct, origin, &frame.prefix_only(), ctx)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kellogg_core::grammar::{Span, Word};

    use super::*;

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

    #[test]
    fn test_phrase_conjuncts() {
        let np = phrase(
            PhraseTag::Np,
            vec![
                leaf(PosTag::Dt, "both"),
                phrase(PhraseTag::Np, vec![leaf(PosTag::Nns, "cats")]),
                leaf(PosTag::Cc, "and"),
                phrase(PhraseTag::Np, vec![leaf(PosTag::Nns, "dogs")]),
            ],
        );
        let coordination = coordination(&np, PhraseTag::Np).unwrap();

        assert_eq!(coordination.conjuncts.len(), 2);
        assert!(matches!(coordination.conjuncts[0], Cow::Borrowed(_)));
        assert_eq!(coordination.conjunction(), "and");
        assert_eq!(coordination.shared.len(), 1);
    }

    #[test]
    fn test_flat_conjuncts_split_at_separators() {
        let np = phrase(
            PhraseTag::Np,
            vec![
                leaf(PosTag::Nns, "apples"),
                leaf(PosTag::Comma, ","),
                leaf(PosTag::Nns, "pears"),
                leaf(PosTag::Comma, ","),
                leaf(PosTag::Cc, "and"),
                leaf(PosTag::Nns, "plums"),
            ],
        );
        let coordination = coordination(&np, PhraseTag::Np).unwrap();

        let texts: Vec<String> = coordination.conjuncts.iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["apples", "pears", "plums"]);
        assert!(coordination.conjuncts.iter().all(|c| c.is(PhraseTag::Np)));
    }

    #[test]
    fn test_no_coordinator() {
        let np = phrase(
            PhraseTag::Np,
            vec![leaf(PosTag::Dt, "the"), leaf(PosTag::Nn, "cat")],
        );
        assert!(coordination(&np, PhraseTag::Np).is_none());
        assert!(!is_compound(&np, PhraseTag::Np));
    }

    #[test]
    fn test_single_conjunct_is_not_compound() {
        let np = phrase(
            PhraseTag::Np,
            vec![leaf(PosTag::Cc, "and"), leaf(PosTag::Nn, "so")],
        );
        assert!(!is_compound(&np, PhraseTag::Np));
    }

    #[test]
    fn test_coordinated_modifiers_do_not_split_noun_phrase() {
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
        assert!(coordination(&np, PhraseTag::Np).is_none());
        assert!(!is_compound(&np, PhraseTag::Np));
    }

    #[test]
    fn test_coordinated_objects_do_not_split_verb_phrase() {
        let vp = phrase(
            PhraseTag::Vp,
            vec![
                leaf(PosTag::Vbd, "ate"),
                phrase(PhraseTag::Np, vec![leaf(PosTag::Nn, "bread")]),
                leaf(PosTag::Cc, "and"),
                phrase(PhraseTag::Np, vec![leaf(PosTag::Nn, "butter")]),
            ],
        );
        assert!(coordination(&vp, PhraseTag::Vp).is_none());
    }

    #[test]
    fn test_flat_verbs_split() {
        let vp = phrase(
            PhraseTag::Vp,
            vec![
                leaf(PosTag::Vbd, "sang"),
                leaf(PosTag::Cc, "and"),
                leaf(PosTag::Vbd, "danced"),
            ],
        );
        assert!(is_compound(&vp, PhraseTag::Vp));
    }
}
