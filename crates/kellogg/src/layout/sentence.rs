use log::{debug, trace};

use kellogg_core::{
    draw::{LineRole, LineStyle, Rotation},
    geometry::Point,
    grammar::{ConstituencyNode, PhraseTag, PosTag, join_words},
};

use super::{
    DrawContext, LayoutEngine, LayoutResult, NounRole, StructuralError, StructuralErrorKind,
    VerbFrame, compound::is_coordinator, engine::content_children,
};

/// How a clause finds its subject.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SubjectSlot<'n> {
    /// The first NP child; its absence is an error.
    Required,
    /// The first NP child if any; otherwise only the predicate is drawn.
    Optional,
    /// Supplied from outside the clause, such as a relative pronoun.
    Given(&'n ConstituencyNode),
}

fn is_clause(node: &ConstituencyNode) -> bool {
    node.phrase().is_some_and(|tag| tag.is_clause())
}

impl LayoutEngine<'_> {
    /// Lays out a whole sentence with its main baseline at `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralErrorKind::UnexpectedCategory`] when `node` is not
    /// a clause, and [`StructuralErrorKind::MissingSubject`] or
    /// [`StructuralErrorKind::MissingPredicate`] when it lacks an NP or VP.
    /// Errors from nested phrases propagate unchanged.
    pub fn process_sentence(
        &self,
        node: &ConstituencyNode,
        origin: Point,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        if !is_clause(node) {
            return Err(StructuralError::new(
                StructuralErrorKind::UnexpectedCategory { expected: "S" },
                node,
            ));
        }
        self.layout_clause(node, origin, SubjectSlot::Required, ctx)
    }

    pub(crate) fn layout_clause(
        &self,
        node: &ConstituencyNode,
        origin: Point,
        slot: SubjectSlot<'_>,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        let children: Vec<&ConstituencyNode> = content_children(node).collect();
        let clauses: Vec<&ConstituencyNode> =
            children.iter().copied().filter(|child| is_clause(child)).collect();
        let coordinated = children.iter().any(|child| is_coordinator(child));
        let has_predicate = children.iter().any(|child| child.is(PhraseTag::Vp));

        if clauses.len() >= 2 && (coordinated || !has_predicate) {
            return self.layout_coordinated_clauses(&children, &clauses, origin, ctx);
        }
        self.layout_simple_clause(node, &children, origin, slot, ctx)
    }

    /// Stacks independent clauses downward and joins consecutive baselines
    /// with a dashed line at their left edge. The conjunction is written
    /// beside the last join.
    fn layout_coordinated_clauses(
        &self,
        children: &[&ConstituencyNode],
        clauses: &[&ConstituencyNode],
        origin: Point,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        let config = self.config();
        let pad = config.padding();
        let coordinators: Vec<String> = children
            .iter()
            .filter(|child| is_coordinator(child))
            .map(|child| child.text())
            .collect();
        let label = join_words(coordinators.iter().map(String::as_str));
        let label_size = self.measure(&label);
        let strip = if label.is_empty() {
            pad
        } else {
            label_size.width() + 2.0 * pad
        };
        let x = origin.x() + strip;
        debug!(clauses = clauses.len(), conjunction = label.as_str(); "Coordinated clauses");

        let mut rows: Vec<(f32, LayoutResult)> = Vec::with_capacity(clauses.len());
        for clause in clauses {
            let (sub, result) = self.detached(|sub| {
                self.layout_clause(clause, Point::new(x, 0.0), SubjectSlot::Required, sub)
            })?;
            let y = match rows.last() {
                Some((previous_y, previous)) => {
                    previous_y + previous.descent() + config.clause_gap() + result.ascent()
                }
                None => origin.y(),
            };
            ctx.append_shifted(sub, Point::new(0.0, y));
            rows.push((y, result.translate(Point::new(0.0, y))));
        }

        for pair in rows.windows(2) {
            let (upper_y, _) = pair[0];
            let (lower_y, _) = pair[1];
            ctx.line(
                Point::new(x, upper_y),
                Point::new(x, lower_y),
                LineStyle::Dashed,
                LineRole::Connector,
            );
        }

        let (first_y, first) = rows[0];
        let (last_y, last) = rows[rows.len() - 1];
        if !label.is_empty() {
            let (upper_y, upper) = rows[rows.len() - 2];
            let gap_middle = (upper_y + upper.descent() + last_y - last.ascent()) / 2.0;
            ctx.label(
                label,
                Point::new(origin.x() + strip / 2.0, gap_middle + label_size.height() / 2.0),
                Rotation::Horizontal,
            );
        }

        let widest = rows
            .iter()
            .map(|(_, result)| result.width())
            .fold(0.0_f32, f32::max);
        Ok(LayoutResult::new(
            strip + widest,
            origin.y() - (first_y - first.ascent()),
            last_y + last.descent() - origin.y(),
            first.anchor(),
            first.baseline_end(),
        ))
    }

    fn layout_simple_clause(
        &self,
        node: &ConstituencyNode,
        children: &[&ConstituencyNode],
        origin: Point,
        slot: SubjectSlot<'_>,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        let first_np = children.iter().copied().find(|child| child.is(PhraseTag::Np));
        let subject = match slot {
            SubjectSlot::Given(subject) => Some(subject),
            SubjectSlot::Required => match first_np {
                Some(subject) => Some(subject),
                None => {
                    return Err(StructuralError::new(
                        StructuralErrorKind::MissingSubject,
                        node,
                    ));
                }
            },
            SubjectSlot::Optional => first_np,
        };
        let Some(predicate) = children.iter().copied().find(|child| child.is(PhraseTag::Vp)) else {
            return Err(StructuralError::new(
                StructuralErrorKind::MissingPredicate,
                node,
            ));
        };

        // Everything else attaches to the verb, except clauses, which hang
        // below the whole predicate. Inverted auxiliaries (`Is he coming`)
        // join the verb label.
        let mut frame = VerbFrame::new();
        let mut dependents = Vec::new();
        for child in children.iter().copied() {
            if subject.is_some_and(|subject| std::ptr::eq(subject, child))
                || std::ptr::eq(predicate, child)
            {
                continue;
            }
            match child.pos() {
                Some(tag) if tag.is_verbal() || tag == PosTag::To => frame.push_prefix(child.text()),
                _ if is_clause(child) || child.is(PhraseTag::Sbar) => dependents.push(child),
                _ if is_coordinator(child) => {
                    trace!(word = child.text().as_str(); "Clause-initial coordinator dropped")
                }
                _ => frame.push_extra(child),
            }
        }

        let config = self.config();
        let extent = config.divider_extent();
        let (x, y) = (origin.x(), origin.y());

        let mut ascent = 0.0_f32;
        let mut descent = 0.0_f32;
        let divider_x = match subject {
            Some(subject) => {
                let result = self.process_noun_phrase(subject, origin, NounRole::Subject, ctx)?;
                let divider_x = x + result.width();
                ctx.line(
                    Point::new(divider_x, y - extent),
                    Point::new(divider_x, y + extent),
                    LineStyle::Solid,
                    LineRole::SubjectDivider,
                );
                ascent = result.ascent().max(extent);
                descent = result.descent().max(extent);
                divider_x
            }
            None => x,
        };

        let predicate = self.process_verb_phrase(predicate, Point::new(divider_x, y), &frame, ctx)?;
        ascent = ascent.max(predicate.ascent());
        descent = descent.max(predicate.descent());
        debug!(
            subject = subject.is_some(),
            dependents = dependents.len(),
            divider_x;
            "Clause"
        );

        let mut bottom = y + descent;
        let mut right = divider_x + predicate.width();
        for dependent in dependents {
            let hung = self.hang_clause(ctx, dependent, predicate.anchor(), bottom)?;
            bottom = hung.bottom;
            right = right.max(hung.right);
        }

        Ok(LayoutResult::new(
            right - x,
            ascent,
            bottom - y,
            predicate.anchor(),
            predicate.baseline_end(),
        ))
    }
}
