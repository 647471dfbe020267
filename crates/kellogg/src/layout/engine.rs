use log::trace;

use kellogg_core::{
    draw::{LineRole, LineStyle, Rotation, TextMetrics},
    geometry::{Point, Size},
    grammar::ConstituencyNode,
};

use super::{
    DrawContext, LayoutResult, ModifierBias, NounRole, StructuralError,
};
use crate::config::LayoutConfig;

/// Smallest length a baseline piece must have to be drawn.
const MIN_SEGMENT: f32 = 1e-3;

/// The Reed-Kellogg layout engine.
///
/// Holds only read-only collaborators, so one engine can lay out any number
/// of sentences. Each `process_*` handler takes a subtree, an origin whose y
/// is the baseline to sit on, and the [`DrawContext`] to append to, and
/// returns the [`LayoutResult`] it occupied.
pub struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
    metrics: &'a dyn TextMetrics,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a LayoutConfig, metrics: &'a dyn TextMetrics) -> Self {
        Self { config, metrics }
    }

    pub(crate) fn config(&self) -> &LayoutConfig {
        self.config
    }

    pub(crate) fn measure(&self, text: &str) -> Size {
        self.metrics.measure(text)
    }

    /// Runs a handler against a fresh context so the caller can move its
    /// output once the extents are known.
    pub(crate) fn detached<F>(&self, layout: F) -> Result<(DrawContext, LayoutResult), StructuralError>
    where
        F: FnOnce(&mut DrawContext) -> Result<LayoutResult, StructuralError>,
    {
        let mut ctx = DrawContext::new();
        let result = layout(&mut ctx)?;
        Ok((ctx, result))
    }

    /// Writes a horizontal label centered on `center_x`, sitting on the
    /// baseline at `y`. Returns the ascent it needs.
    pub(crate) fn head_label(&self, ctx: &mut DrawContext, text: &str, center_x: f32, y: f32) -> f32 {
        let lift = self.config.label_lift();
        ctx.label(text, Point::new(center_x, y - lift), Rotation::Horizontal);
        self.measure(text).height() + lift
    }

    pub(crate) fn baseline(&self, ctx: &mut DrawContext, y: f32, from: f32, to: f32) {
        if to - from > MIN_SEGMENT {
            ctx.line(
                Point::new(from, y),
                Point::new(to, y),
                LineStyle::Solid,
                LineRole::Baseline,
            );
        }
    }

    /// Places a head word on its baseline with its modifiers hanging below.
    ///
    /// The baseline itself is drawn by [`attach_trailing`](Self::attach_trailing)
    /// once the full reach is known.
    pub(crate) fn layout_word_head(
        &self,
        ctx: &mut DrawContext,
        text: &str,
        modifiers: &[String],
        origin: Point,
        bias: ModifierBias,
    ) -> Frontier {
        let head_width = self.measure(text).width() + 2.0 * self.config.padding();
        let span = self.modifier_span(head_width, modifiers.len());
        let placement = self.process_modifiers(ctx, modifiers, origin.x(), span, origin.y(), bias);

        let center = origin.x() + span / 2.0;
        let ascent = self.head_label(ctx, text, center, origin.y());

        Frontier {
            baseline_start: origin.x(),
            reach: (origin.x() + span).max(placement.right_extent()),
            ascent,
            descent: placement.descent(),
            anchor: Point::new(center, origin.y()),
        }
    }

    /// Hangs the trailing parts of a head to its right and below it, then
    /// closes the head's baseline.
    ///
    /// Order: extra modifiers, prepositional phrases, appositives, then
    /// dependent clauses stacked below everything else.
    pub(crate) fn attach_trailing(
        &self,
        ctx: &mut DrawContext,
        mut frontier: Frontier,
        attachments: &Attachments<'_>,
        origin: Point,
    ) -> Result<LayoutResult, StructuralError> {
        let y = origin.y();
        let pad = self.config.padding();

        if !attachments.modifiers.is_empty() {
            let span = self.modifier_span(0.0, attachments.modifiers.len());
            let placement = self.process_modifiers(
                ctx,
                &attachments.modifiers,
                frontier.reach,
                span,
                y,
                ModifierBias::Trailing,
            );
            frontier.reach = (frontier.reach + span).max(placement.right_extent());
            frontier.descent = frontier.descent.max(placement.descent());
        }

        for phrase in &attachments.prepositions {
            let result =
                self.process_prepositional_phrase(phrase, Point::new(frontier.reach, y), ctx)?;
            frontier.reach += result.width() + pad;
            frontier.absorb(&result);
        }

        for appositive in &attachments.appositives {
            let open = self.measure("(").width();
            let close = self.measure(")").width();
            let start = frontier.reach + open;

            self.head_label(ctx, "(", frontier.reach + open / 2.0, y);
            self.baseline(ctx, y, frontier.baseline_start, start);

            let result =
                self.process_noun_phrase(appositive, Point::new(start, y), NounRole::Appositive, ctx)?;
            let end = start + result.width();
            self.head_label(ctx, ")", end + close / 2.0, y);

            frontier.baseline_start = end;
            frontier.reach = end + close + pad;
            frontier.absorb(&result);
        }

        if !attachments.clauses.is_empty() {
            let attach = Point::new(frontier.reach, y);
            let mut bottom = y + frontier.descent;
            let mut right = frontier.reach;
            for clause in &attachments.clauses {
                let hung = self.hang_clause(ctx, clause, attach, bottom)?;
                bottom = hung.bottom;
                right = right.max(hung.right);
            }
            frontier.descent = bottom - y;
            frontier.reach = right;
        }

        self.baseline(ctx, y, frontier.baseline_start, frontier.reach);
        trace!(reach = frontier.reach, descent = frontier.descent; "Head attachments placed");

        Ok(LayoutResult::new(
            frontier.reach - origin.x(),
            frontier.ascent,
            frontier.descent,
            frontier.anchor,
            frontier.reach,
        ))
    }
}

/// Running extent of a head while its attachments are placed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frontier {
    /// Where the part of the baseline not yet drawn begins.
    pub baseline_start: f32,
    pub reach: f32,
    pub ascent: f32,
    pub descent: f32,
    pub anchor: Point,
}

impl Frontier {
    /// Continues after a nested head that already drew its own baseline.
    pub fn after(result: &LayoutResult, origin: Point) -> Self {
        let end = origin.x() + result.width();
        Self {
            baseline_start: end,
            reach: end,
            ascent: result.ascent(),
            descent: result.descent(),
            anchor: result.anchor(),
        }
    }

    fn absorb(&mut self, result: &LayoutResult) {
        self.ascent = self.ascent.max(result.ascent());
        self.descent = self.descent.max(result.descent());
    }
}

/// What hangs off a head besides its own leading modifiers.
#[derive(Debug, Default)]
pub(crate) struct Attachments<'n> {
    pub modifiers: Vec<String>,
    pub prepositions: Vec<&'n ConstituencyNode>,
    pub appositives: Vec<&'n ConstituencyNode>,
    pub clauses: Vec<&'n ConstituencyNode>,
}

/// Whether a node is a punctuation pre-terminal, which diagrams omit.
pub(crate) fn is_punctuation(node: &ConstituencyNode) -> bool {
    node.pos().is_some_and(|tag| tag.is_punctuation())
}

/// Children that carry words worth drawing.
pub(crate) fn content_children(node: &ConstituencyNode) -> impl Iterator<Item = &ConstituencyNode> {
    node.child_nodes().filter(|child| !is_punctuation(child))
}
