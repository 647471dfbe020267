use std::{borrow::Cow, ops::Range};

use log::debug;

use kellogg_core::{
    draw::{LineRole, LineStyle},
    geometry::Point,
    grammar::{Category, Child, ConstituencyNode, PhraseTag, PosTag, join_words},
};

use super::{
    CompoundKind, DrawContext, LayoutEngine, LayoutResult, ModifierBias, NounRole,
    StructuralError, StructuralErrorKind,
    compound::{coordination, is_compound, is_coordinator},
    engine::is_punctuation,
};

/// Verb forms after which a lone noun phrase renames the subject instead of
/// receiving the action.
const LINKING_VERBS: &[&str] = &[
    "be", "am", "is", "are", "was", "were", "been", "being", "'m", "'re", "become", "becomes",
    "became", "becoming", "seem", "seems", "seemed", "remain", "remains", "remained",
];

/// Context a verb phrase inherits from above it.
///
/// `prefix` holds auxiliaries shared by coordinated predicates
/// (`will [sing and dance]`); `extras` holds constituents attached at a
/// higher level that belong to the verb, such as sentence adverbs.
#[derive(Debug, Clone, Default)]
pub struct VerbFrame<'n> {
    prefix: Vec<String>,
    extras: Vec<Cow<'n, ConstituencyNode>>,
}

impl<'n> VerbFrame<'n> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_prefix(&mut self, word: String) {
        self.prefix.push(word);
    }

    pub(crate) fn push_extra(&mut self, node: &'n ConstituencyNode) {
        self.extras.push(Cow::Borrowed(node));
    }

    pub(crate) fn prefix_only(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            extras: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct VerbParts<'n> {
    verb: Vec<String>,
    modifiers: Vec<&'n ConstituencyNode>,
    objects: Vec<Cow<'n, ConstituencyNode>>,
    complements: Vec<&'n ConstituencyNode>,
    prepositions: Vec<&'n ConstituencyNode>,
    clauses: Vec<&'n ConstituencyNode>,
}

impl<'n> VerbParts<'n> {
    /// Sorts the children of `node`, descending through the chain of
    /// auxiliary VPs. Returns a coordinated VP met along the chain.
    fn collect(&mut self, node: &'n ConstituencyNode) -> Option<&'n ConstituencyNode> {
        let children: Vec<&'n ConstituencyNode> = node.child_nodes().collect();
        let (run, mut grouped) = coordinated_objects(&children).unzip();
        let mut chain = None;
        for (index, child) in children.iter().copied().enumerate() {
            if run.as_ref().is_some_and(|run| run.contains(&index)) {
                if let Some(object) = grouped.take() {
                    self.objects.push(Cow::Owned(object));
                }
                continue;
            }
            if is_punctuation(child) {
                continue;
            }
            if child.is(PhraseTag::Vp) && chain.is_none() {
                chain = Some(child);
            } else {
                self.classify(child);
            }
        }

        let inner = chain?;
        if is_compound(inner, PhraseTag::Vp) {
            return Some(inner);
        }
        self.collect(inner)
    }

    fn classify(&mut self, child: &'n ConstituencyNode) {
        match child.category() {
            Category::Pos(tag) if tag.is_verbal() || matches!(tag, PosTag::To | PosTag::Rp) => {
                self.verb.push(child.text())
            }
            Category::Pos(tag) if tag.is_adjective() => self.complements.push(child),
            Category::Pos(tag) if tag.is_noun() || tag.is_pronoun() => {
                self.objects.push(Cow::Borrowed(child))
            }
            Category::Pos(_) => self.modifiers.push(child),
            Category::Phrase(PhraseTag::Prt) => self.verb.push(child.text()),
            Category::Phrase(PhraseTag::Np) => self.objects.push(Cow::Borrowed(child)),
            Category::Phrase(PhraseTag::Adjp) => self.complements.push(child),
            Category::Phrase(PhraseTag::Pp) => self.prepositions.push(child),
            Category::Phrase(tag)
                if tag.is_clause() || matches!(tag, PhraseTag::Sbar | PhraseTag::Vp) =>
            {
                self.clauses.push(child)
            }
            Category::Phrase(_) => self.modifiers.push(child),
        }
    }

    /// Everything except the verb words, for handing down to a compound.
    fn into_extras(self) -> Vec<Cow<'n, ConstituencyNode>> {
        let mut extras: Vec<_> = self.modifiers.into_iter().map(Cow::Borrowed).collect();
        extras.extend(self.prepositions.into_iter().map(Cow::Borrowed));
        extras.extend(self.objects);
        extras.extend(self.complements.into_iter().map(Cow::Borrowed));
        extras.extend(self.clauses.into_iter().map(Cow::Borrowed));
        extras
    }
}

fn is_object(node: &ConstituencyNode) -> bool {
    node.is(PhraseTag::Np) || node.pos().is_some_and(|tag| tag.is_noun() || tag.is_pronoun())
}

/// Finds objects joined by a coordinator, as in `ate bread and butter`, and
/// groups them with their separators into one noun phrase.
///
/// The run starts at the object before the first coordinator, reaching back
/// over comma-separated objects, and extends while separators and objects
/// alternate.
fn coordinated_objects(children: &[&ConstituencyNode]) -> Option<(Range<usize>, ConstituencyNode)> {
    let joiner = (1..children.len().saturating_sub(1)).find(|&index| {
        is_coordinator(children[index])
            && is_object(children[index - 1])
            && is_object(children[index + 1])
    })?;

    let mut start = joiner - 1;
    while start >= 2 && is_punctuation(children[start - 1]) && is_object(children[start - 2]) {
        start -= 2;
    }
    let mut end = joiner + 2;
    while end + 1 < children.len()
        && (is_coordinator(children[end]) || is_punctuation(children[end]))
        && is_object(children[end + 1])
    {
        end += 2;
    }

    let run = &children[start..end];
    let span = run
        .iter()
        .map(|child| child.span())
        .reduce(|acc, span| acc.union(span))?;
    let members = run.iter().map(|child| Child::Node((*child).clone())).collect();
    let object = ConstituencyNode::new(Category::Phrase(PhraseTag::Np), members, span).ok()?;
    Some((start..end, object))
}

fn is_linking(verb: &[String]) -> bool {
    verb.last()
        .is_some_and(|word| LINKING_VERBS.contains(&word.to_lowercase().as_str()))
}

impl LayoutEngine<'_> {
    /// Lays out a predicate: the verb with its auxiliaries on one baseline,
    /// adverbs hanging below it, then its complements.
    ///
    /// Prepositional phrases and indirect objects hang from the verb's own
    /// stretch of baseline. A direct object follows a tick that stands on
    /// the baseline; subject complements follow a forward slash. Clausal
    /// complements hang below-right of the verb.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralErrorKind::MissingVerb`] when no verb or modal is
    /// found along the auxiliary chain.
    pub fn process_verb_phrase(
        &self,
        node: &ConstituencyNode,
        origin: Point,
        frame: &VerbFrame<'_>,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        if let Some(coordination) =
            coordination(node, PhraseTag::Vp).filter(|coordination| coordination.conjuncts.len() >= 2)
        {
            let mut shared = frame.clone();
            for child in coordination.shared {
                match child.pos() {
                    Some(tag) if tag.is_verbal() || tag == PosTag::To => {
                        shared.push_prefix(child.text())
                    }
                    _ => shared.push_extra(child),
                }
            }
            return self.process_compound(node, CompoundKind::Predicate(&shared), origin, ctx);
        }

        let mut parts = VerbParts {
            verb: frame.prefix.clone(),
            ..VerbParts::default()
        };
        for extra in &frame.extras {
            parts.classify(extra);
        }

        if let Some(compound) = parts.collect(node) {
            let verb = std::mem::take(&mut parts.verb);
            let inner = VerbFrame {
                prefix: verb,
                extras: parts.into_extras(),
            };
            return self.process_compound(compound, CompoundKind::Predicate(&inner), origin, ctx);
        }

        if parts.verb.is_empty() {
            return Err(StructuralError::new(StructuralErrorKind::MissingVerb, node));
        }
        self.layout_predicate(parts, origin, ctx)
    }

    fn layout_predicate(
        &self,
        parts: VerbParts<'_>,
        origin: Point,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        let config = self.config();
        let pad = config.padding();
        let extent = config.divider_extent();
        let (x, y) = (origin.x(), origin.y());

        let verb = join_words(parts.verb.iter().map(String::as_str));
        let modifiers: Vec<String> = parts.modifiers.iter().map(|node| node.text()).collect();
        debug!(
            verb = verb.as_str(),
            modifiers = modifiers.len(),
            objects = parts.objects.len(),
            prepositions = parts.prepositions.len();
            "Verb phrase"
        );

        let verb_width = self.measure(&verb).width() + 2.0 * pad;
        let span = self.modifier_span(verb_width, modifiers.len());
        let placement = self.process_modifiers(ctx, &modifiers, x, span, y, ModifierBias::Trailing);
        let center = x + span / 2.0;

        let mut ascent = self.head_label(ctx, &verb, center, y);
        let mut descent = placement.descent();
        let mut cursor = (x + span).max(placement.right_extent());

        for phrase in &parts.prepositions {
            let result = self.process_prepositional_phrase(phrase, Point::new(cursor, y), ctx)?;
            cursor += result.width() + pad;
            ascent = ascent.max(result.ascent());
            descent = descent.max(result.descent());
        }

        let linking = is_linking(&parts.verb);
        let (indirect, direct, nominative) = match parts.objects.as_slice() {
            [] => (&[][..], None, None),
            [only] if linking => (&[][..], None, Some(&**only)),
            [only] => (&[][..], Some(&**only), None),
            [indirect @ .., direct] => (indirect, Some(&**direct), None),
        };

        for object in indirect {
            let foot = Point::new(cursor + config.preposition_run(), y + config.preposition_drop());
            ctx.line(
                Point::new(cursor, y),
                foot,
                LineStyle::Solid,
                LineRole::PrepositionDiagonal,
            );
            let result = self.process_noun_phrase(object, foot, NounRole::IndirectObject, ctx)?;
            cursor = foot.x() + result.width() + pad;
            descent = descent.max(foot.y() + result.descent() - y);
        }

        let verb_end = cursor;
        self.baseline(ctx, y, x, verb_end);

        let mut end = verb_end;
        let mut baseline_end = verb_end;

        if let Some(object) = direct {
            ctx.line(
                Point::new(end, y - extent),
                Point::new(end, y),
                LineStyle::Solid,
                LineRole::ObjectDivider,
            );
            let result =
                self.process_noun_phrase(object, Point::new(end, y), NounRole::DirectObject, ctx)?;
            end += result.width();
            baseline_end = result.baseline_end();
            ascent = ascent.max(extent).max(result.ascent());
            descent = descent.max(result.descent());
        }

        for complement in nominative.into_iter().chain(parts.complements.iter().copied()) {
            ctx.line(
                Point::new(end, y),
                Point::new(end + config.slash_run(), y - extent),
                LineStyle::Solid,
                LineRole::ComplementSlash,
            );
            let start = Point::new(end, y);
            let adjectival = complement.is(PhraseTag::Adjp)
                || complement.pos().is_some_and(|tag| tag.is_adjective());
            let result = if adjectival {
                self.process_adjective_phrase(complement, start, ctx)?
            } else {
                self.process_noun_phrase(complement, start, NounRole::Complement, ctx)?
            };
            end += result.width();
            baseline_end = result.baseline_end();
            ascent = ascent.max(extent).max(result.ascent());
            descent = descent.max(result.descent());
        }

        let anchor = Point::new(center, y);
        let mut bottom = y + descent;
        let mut right = end;
        for clause in &parts.clauses {
            let hung = self.hang_clause(ctx, clause, anchor, bottom)?;
            bottom = hung.bottom;
            right = right.max(hung.right);
        }

        Ok(LayoutResult::new(right - x, ascent, bottom - y, anchor, baseline_end))
    }
}

#[cfg(test)]
mod tests {
    use kellogg_core::{
        draw::HeuristicMetrics,
        grammar::{Child, Span, Word},
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

    fn np(words: &[(PosTag, &str)]) -> ConstituencyNode {
        phrase(
            PhraseTag::Np,
            words.iter().map(|(tag, text)| leaf(*tag, text)).collect(),
        )
    }

    fn layout(vp: &ConstituencyNode) -> Result<(DrawContext, LayoutResult), StructuralError> {
        let config = LayoutConfig::default();
        let metrics = HeuristicMetrics::new(16.0);
        let engine = LayoutEngine::new(&config, &metrics);
        let mut ctx = DrawContext::new();
        let result = engine.process_verb_phrase(vp, Point::default(), &VerbFrame::new(), &mut ctx)?;
        Ok((ctx, result))
    }

    fn count(ctx: &DrawContext, role: LineRole) -> usize {
        ctx.lines().filter(|line| line.role() == role).count()
    }

    #[test]
    fn test_auxiliaries_join_verb_label() {
        let vp = phrase(
            PhraseTag::Vp,
            vec![
                leaf(PosTag::Md, "will"),
                phrase(
                    PhraseTag::Vp,
                    vec![
                        leaf(PosTag::Vb, "have"),
                        phrase(PhraseTag::Vp, vec![leaf(PosTag::Vbn, "left")]),
                    ],
                ),
            ],
        );
        let (ctx, _) = layout(&vp).unwrap();

        let labels: Vec<&str> = ctx.labels().map(|label| label.text()).collect();
        assert_eq!(labels, vec!["will have left"]);
        assert_eq!(count(&ctx, LineRole::Baseline), 1);
    }

    #[test]
    fn test_direct_object_tick_stays_above_baseline() {
        let vp = phrase(
            PhraseTag::Vp,
            vec![
                leaf(PosTag::Vbd, "chased"),
                np(&[(PosTag::Dt, "the"), (PosTag::Nn, "mouse")]),
            ],
        );
        let (ctx, _) = layout(&vp).unwrap();

        let ticks: Vec<_> = ctx
            .lines()
            .filter(|line| line.role() == LineRole::ObjectDivider)
            .collect();
        assert_eq!(ticks.len(), 1);
        assert!(ticks[0].is_vertical());
        assert!(ticks[0].bottom() <= 0.0);
        assert!(ticks[0].top() < 0.0);
    }

    #[test]
    fn test_two_objects_make_indirect_and_direct() {
        let vp = phrase(
            PhraseTag::Vp,
            vec![
                leaf(PosTag::Vbd, "gave"),
                np(&[(PosTag::Prp, "him")]),
                np(&[(PosTag::Dt, "a"), (PosTag::Nn, "book")]),
            ],
        );
        let (ctx, result) = layout(&vp).unwrap();

        assert_eq!(count(&ctx, LineRole::ObjectDivider), 1);
        assert_eq!(count(&ctx, LineRole::PrepositionDiagonal), 1);
        assert!(result.descent() >= LayoutConfig::default().preposition_drop());

        // The indirect object hangs left of the tick.
        let tick = ctx
            .lines()
            .find(|line| line.role() == LineRole::ObjectDivider)
            .unwrap();
        let diagonal = ctx
            .lines()
            .find(|line| line.role() == LineRole::PrepositionDiagonal)
            .unwrap();
        assert!(diagonal.start().x() < tick.start().x());
    }

    #[test]
    fn test_coordinated_objects_share_one_tick() {
        let vp = phrase(
            PhraseTag::Vp,
            vec![
                leaf(PosTag::Vbd, "ate"),
                np(&[(PosTag::Nn, "bread")]),
                leaf(PosTag::Cc, "and"),
                np(&[(PosTag::Nn, "butter")]),
            ],
        );
        let (ctx, _) = layout(&vp).unwrap();

        let labels: Vec<&str> = ctx.labels().map(|label| label.text()).collect();
        assert_eq!(labels.iter().filter(|text| **text == "ate").count(), 1);
        assert!(labels.contains(&"and"));
        assert_eq!(count(&ctx, LineRole::ObjectDivider), 1);
        assert_eq!(count(&ctx, LineRole::PrepositionDiagonal), 0);
        assert_eq!(count(&ctx, LineRole::ModifierDiagonal), 0);
        assert_eq!(count(&ctx, LineRole::Connector), 2);
    }

    #[test]
    fn test_indirect_object_before_coordinated_objects() {
        let vp = phrase(
            PhraseTag::Vp,
            vec![
                leaf(PosTag::Vbd, "gave"),
                np(&[(PosTag::Prp, "him")]),
                np(&[(PosTag::Nn, "bread")]),
                leaf(PosTag::Comma, ","),
                np(&[(PosTag::Nn, "milk")]),
                leaf(PosTag::Cc, "and"),
                np(&[(PosTag::Nn, "butter")]),
            ],
        );
        let (ctx, _) = layout(&vp).unwrap();

        assert_eq!(count(&ctx, LineRole::PrepositionDiagonal), 1);
        assert_eq!(count(&ctx, LineRole::ObjectDivider), 1);
        assert_eq!(count(&ctx, LineRole::Connector), 3);
    }

    #[test]
    fn test_subject_complement_slash() {
        let vp = phrase(
            PhraseTag::Vp,
            vec![
                leaf(PosTag::Vbz, "seems"),
                phrase(PhraseTag::Adjp, vec![leaf(PosTag::Jj, "happy")]),
            ],
        );
        let (ctx, _) = layout(&vp).unwrap();

        let slash = ctx
            .lines()
            .find(|line| line.role() == LineRole::ComplementSlash)
            .unwrap();
        assert!(slash.slope().unwrap() > 0.0);
        assert_eq!(count(&ctx, LineRole::ObjectDivider), 0);
    }

    #[test]
    fn test_linking_verb_takes_predicate_nominative() {
        let vp = phrase(
            PhraseTag::Vp,
            vec![
                leaf(PosTag::Vbz, "is"),
                np(&[(PosTag::Dt, "a"), (PosTag::Nn, "doctor")]),
            ],
        );
        let (ctx, _) = layout(&vp).unwrap();

        assert_eq!(count(&ctx, LineRole::ComplementSlash), 1);
        assert_eq!(count(&ctx, LineRole::ObjectDivider), 0);
    }

    #[test]
    fn test_adverbs_hang_from_verb() {
        let vp = phrase(
            PhraseTag::Vp,
            vec![
                leaf(PosTag::Vbd, "ran"),
                phrase(PhraseTag::Advp, vec![leaf(PosTag::Rb, "quickly")]),
            ],
        );
        let (ctx, _) = layout(&vp).unwrap();
        assert_eq!(count(&ctx, LineRole::ModifierDiagonal), 1);
    }

    #[test]
    fn test_missing_verb() {
        let vp = phrase(PhraseTag::Vp, vec![np(&[(PosTag::Nn, "cat")])]);
        let err = layout(&vp).unwrap_err();

        assert_eq!(err.kind(), StructuralErrorKind::MissingVerb);
        assert!(err.to_string().starts_with("missing verb"));
    }

    #[test]
    fn test_compound_predicate() {
        let vp = phrase(
            PhraseTag::Vp,
            vec![
                phrase(PhraseTag::Vp, vec![leaf(PosTag::Vbd, "sang")]),
                leaf(PosTag::Cc, "and"),
                phrase(PhraseTag::Vp, vec![leaf(PosTag::Vbd, "danced")]),
            ],
        );
        let (ctx, _) = layout(&vp).unwrap();

        assert_eq!(count(&ctx, LineRole::Fork), 2);
        assert_eq!(count(&ctx, LineRole::Connector), 2);
        assert!(ctx.labels().any(|label| label.text() == "and"));
    }

    #[test]
    fn test_shared_auxiliary_prefixes_each_branch() {
        let vp = phrase(
            PhraseTag::Vp,
            vec![
                leaf(PosTag::Md, "will"),
                phrase(
                    PhraseTag::Vp,
                    vec![
                        phrase(PhraseTag::Vp, vec![leaf(PosTag::Vb, "sing")]),
                        leaf(PosTag::Cc, "and"),
                        phrase(PhraseTag::Vp, vec![leaf(PosTag::Vb, "dance")]),
                    ],
                ),
            ],
        );
        let (ctx, _) = layout(&vp).unwrap();

        let labels: Vec<&str> = ctx.labels().map(|label| label.text()).collect();
        assert!(labels.contains(&"will sing"));
        assert!(labels.contains(&"will dance"));
    }
}
