//! Diagonal modifier lines shared by every head-bearing handler.

use log::debug;

use kellogg_core::{
    draw::{LineRole, LineStyle, Rotation},
    geometry::{Bounds, Point},
};

use super::{DrawContext, LayoutEngine};

/// Below this length a diagonal is treated as a point.
const DEGENERATE_LENGTH: f32 = 1e-3;

/// Which end of a head's span modifiers crowd toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierBias {
    /// Subjects: points shifted half a slot left.
    Leading,
    /// Objects and complements: points shifted half a slot right.
    Trailing,
}

/// Where [`LayoutEngine::process_modifiers`] put its diagonals.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierPlacement {
    attachments: Vec<f32>,
    right_extent: f32,
    descent: f32,
}

impl ModifierPlacement {
    /// Attachment x-coordinates on the head's baseline, left to right.
    pub fn attachments(&self) -> &[f32] {
        &self.attachments
    }

    /// Rightmost x touched by a diagonal or its label, plus padding.
    pub fn right_extent(&self) -> f32 {
        self.right_extent
    }

    /// How far below the baseline the diagonals and labels reach.
    pub fn descent(&self) -> f32 {
        self.descent
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }
}

/// Evenly spaced attachment points for `count` modifiers across a span.
///
/// Slots are `span / (count + 1)` wide; point `i` (1-based) sits at
/// `start + slot * (i - 0.5)` for [`ModifierBias::Leading`] and
/// `start + slot * (i + 0.5)` for [`ModifierBias::Trailing`], so every point
/// stays strictly inside the span.
///
/// # Examples
///
/// ```
/// # use kellogg::layout::{attachment_points, ModifierBias};
/// let points = attachment_points(0.0, 90.0, 2, ModifierBias::Trailing);
/// assert_eq!(points, vec![45.0, 75.0]);
/// ```
pub fn attachment_points(start: f32, span: f32, count: usize, bias: ModifierBias) -> Vec<f32> {
    let slot = span / (count as f32 + 1.0);
    let shift = match bias {
        ModifierBias::Leading => -0.5,
        ModifierBias::Trailing => 0.5,
    };
    (1..=count)
        .map(|i| start + slot * (i as f32 + shift))
        .collect()
}

impl LayoutEngine<'_> {
    /// Width a head needs so `count` modifiers sit at least
    /// `modifier_spacing` apart.
    pub fn modifier_span(&self, head_width: f32, count: usize) -> f32 {
        if count == 0 {
            return head_width;
        }
        head_width.max((count as f32 + 1.0) * self.config().modifier_spacing())
    }

    /// Hangs one backward diagonal per modifier from the baseline at
    /// `baseline_y`, spread across `[start_x, start_x + span]`.
    ///
    /// Every diagonal drops by the same `modifier_drop` however long its
    /// label is. With no modifiers nothing is drawn and the placement is
    /// empty.
    pub fn process_modifiers(
        &self,
        ctx: &mut DrawContext,
        modifiers: &[String],
        start_x: f32,
        span: f32,
        baseline_y: f32,
        bias: ModifierBias,
    ) -> ModifierPlacement {
        if modifiers.is_empty() {
            return ModifierPlacement {
                attachments: Vec::new(),
                right_extent: start_x,
                descent: 0.0,
            };
        }

        let config = self.config();
        let attachments = attachment_points(start_x, span, modifiers.len(), bias);
        debug!(count = modifiers.len(), span, bias:?; "Placing modifiers");

        let mut extent: Option<Bounds> = None;
        for (text, &x) in modifiers.iter().zip(&attachments) {
            let start = Point::new(x, baseline_y);
            let end = Point::new(x + config.modifier_run(), baseline_y + config.modifier_drop());
            let bounds = self.diagonal_with_label(
                ctx,
                text,
                start,
                end,
                LineStyle::Solid,
                LineRole::ModifierDiagonal,
            );
            extent = Some(extent.map_or(bounds, |acc| acc.merge(&bounds)));
        }

        let (right_extent, descent) = extent.map_or((start_x, 0.0), |bounds| {
            (bounds.max_x() + config.padding(), bounds.max_y() - baseline_y)
        });
        ModifierPlacement {
            attachments,
            right_extent,
            descent,
        }
    }

    /// Draws a line from `start` to `end` and writes `text` along its upper
    /// side, rotated to match.
    ///
    /// The label is pushed far enough down the line that no part of it rises
    /// above `start`. Returns the box covering the line and the label.
    pub(crate) fn diagonal_with_label(
        &self,
        ctx: &mut DrawContext,
        text: &str,
        start: Point,
        end: Point,
        style: LineStyle,
        role: LineRole,
    ) -> Bounds {
        ctx.line(start, end, style, role);

        let line_bounds = Bounds::from_points(start, end);
        let dx = end.x() - start.x();
        let dy = end.y() - start.y();
        let length = dx.hypot(dy);
        if text.is_empty() || length < DEGENERATE_LENGTH {
            return line_bounds;
        }

        let size = self.measure(text);
        let lift = self.config().label_lift();
        let (ux, uy) = (dx / length, dy / length);
        // Normal pointing to the text's "up".
        let (nx, ny) = (uy, -ux);

        let half = size.width() / 2.0;
        let clearance = if uy > DEGENERATE_LENGTH {
            half + lift + ux.max(0.0) / uy * (lift + size.height())
        } else {
            half
        };
        let along = (length / 2.0).max(clearance);

        let center = Point::new(
            start.x() + ux * along + nx * lift,
            start.y() + uy * along + ny * lift,
        );
        let angle = uy.atan2(ux).to_degrees();
        ctx.label(text, center, Rotation::Diagonal(angle));

        rotated_label_bounds(center, size.width(), size.height(), (ux, uy)).merge(&line_bounds)
    }
}

/// Box around a label of the given size whose baseline runs through
/// `center` along `direction`.
pub(crate) fn rotated_label_bounds(center: Point, width: f32, height: f32, direction: (f32, f32)) -> Bounds {
    let (ux, uy) = direction;
    let (nx, ny) = (uy, -ux);
    let half = width / 2.0;

    let left = Point::new(center.x() - ux * half, center.y() - uy * half);
    let right = Point::new(center.x() + ux * half, center.y() + uy * half);
    let up = Point::new(nx * height, ny * height);

    Bounds::from_points(left, right)
        .include(left.add_point(up))
        .include(right.add_point(up))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use kellogg_core::draw::HeuristicMetrics;

    use super::*;
    use crate::config::LayoutConfig;

    fn labels(words: &[&str]) -> Vec<String> {
        words.iter().map(|word| word.to_string()).collect()
    }

    #[test]
    fn test_attachment_points_leading() {
        let points = attachment_points(10.0, 90.0, 2, ModifierBias::Leading);
        assert_eq!(points, vec![25.0, 55.0]);
    }

    #[test]
    fn test_attachment_points_empty() {
        assert!(attachment_points(0.0, 50.0, 0, ModifierBias::Leading).is_empty());
    }

    #[test]
    fn test_modifier_span_widens_for_crowds() {
        let config = LayoutConfig::default();
        let metrics = HeuristicMetrics::new(16.0);
        let engine = LayoutEngine::new(&config, &metrics);

        assert_approx_eq!(f32, engine.modifier_span(50.0, 0), 50.0);
        assert_approx_eq!(
            f32,
            engine.modifier_span(50.0, 3),
            4.0 * config.modifier_spacing()
        );
    }

    #[test]
    fn test_no_modifiers_draws_nothing() {
        let config = LayoutConfig::default();
        let metrics = HeuristicMetrics::new(16.0);
        let engine = LayoutEngine::new(&config, &metrics);
        let mut ctx = DrawContext::new();

        let placement =
            engine.process_modifiers(&mut ctx, &[], 5.0, 40.0, 0.0, ModifierBias::Trailing);

        assert!(placement.is_empty());
        assert!(ctx.is_empty());
        assert_approx_eq!(f32, placement.right_extent(), 5.0);
    }

    #[test]
    fn test_diagonals_have_fixed_drop() {
        let config = LayoutConfig::default();
        let metrics = HeuristicMetrics::new(16.0);
        let engine = LayoutEngine::new(&config, &metrics);
        let mut ctx = DrawContext::new();

        let placement = engine.process_modifiers(
            &mut ctx,
            &labels(&["a", "very-long-modifier"]),
            0.0,
            120.0,
            0.0,
            ModifierBias::Trailing,
        );

        assert_eq!(placement.attachments().len(), 2);
        for line in ctx.lines() {
            assert_eq!(line.role(), LineRole::ModifierDiagonal);
            assert_approx_eq!(f32, line.bottom() - line.top(), config.modifier_drop());
            assert!(line.slope().unwrap() < 0.0);
        }
        assert_eq!(ctx.labels().count(), 2);
    }

    #[test]
    fn test_labels_stay_below_baseline() {
        let config = LayoutConfig::default();
        let metrics = HeuristicMetrics::new(16.0);
        let engine = LayoutEngine::new(&config, &metrics);
        let mut ctx = DrawContext::new();

        let bounds = engine.diagonal_with_label(
            &mut ctx,
            "extraordinarily",
            Point::new(0.0, 0.0),
            Point::new(24.0, 40.0),
            LineStyle::Solid,
            LineRole::ModifierDiagonal,
        );

        assert!(bounds.min_y() >= -1e-3);
        let label = ctx.labels().next().unwrap();
        assert!(label.angle() > 0.0 && label.angle() < 90.0);
    }

    #[test]
    fn test_degenerate_diagonal_keeps_line_only() {
        let config = LayoutConfig::default();
        let metrics = HeuristicMetrics::new(16.0);
        let engine = LayoutEngine::new(&config, &metrics);
        let mut ctx = DrawContext::new();

        let point = Point::new(3.0, 3.0);
        engine.diagonal_with_label(
            &mut ctx,
            "x",
            point,
            point,
            LineStyle::Solid,
            LineRole::ModifierDiagonal,
        );

        assert_eq!(ctx.lines().count(), 1);
        assert_eq!(ctx.labels().count(), 0);
    }
}
