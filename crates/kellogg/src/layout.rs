//! Reed-Kellogg layout.
//!
//! Turns a constituency tree into line segments and text labels. The work is
//! split across mutually recursive handlers on [`LayoutEngine`], one per
//! grammatical category:
//!
//! - [`LayoutEngine::process_sentence`] - Subject, divider and predicate; coordinated clauses
//! - [`LayoutEngine::process_noun_phrase`] - Head noun with modifiers and attachments
//! - [`LayoutEngine::process_verb_phrase`] - Verb label, objects and complements
//! - [`LayoutEngine::process_prepositional_phrase`] - Diagonal with object at its foot
//! - [`LayoutEngine::process_adjective_phrase`] - Complement adjectives
//! - [`LayoutEngine::process_subordinate_clause`] - Dependent clauses and connecting words
//! - [`LayoutEngine::process_modifiers`] - Evenly spaced diagonal modifiers
//! - [`LayoutEngine::process_compound`] - Coordinated phrases
//!
//! Every handler appends into one [`DrawContext`] and reports the box it
//! used as a [`LayoutResult`]. Coordinates grow right and down; each handler
//! is given the baseline it sits on as the y of its origin.
//!
//! # Pipeline Position
//!
//! ```text
//! Bracketed tree
//!     ↓ parse
//! ConstituencyNode
//!     ↓ layout (this module)
//! Diagram (primitives + bounds)
//!     ↓ export
//! SVG
//! ```

mod adjective;
mod compound;
mod context;
mod engine;
mod error;
mod modifiers;
mod noun_phrase;
mod prepositional;
mod result;
mod sentence;
mod subordinate;
mod verb_phrase;

pub use compound::CompoundKind;
pub use context::DrawContext;
pub use engine::LayoutEngine;
pub use error::{StructuralError, StructuralErrorKind};
pub use modifiers::{ModifierBias, ModifierPlacement, attachment_points};
pub use noun_phrase::NounRole;
pub use result::LayoutResult;
pub use verb_phrase::VerbFrame;

use log::{debug, info, trace};

use kellogg_core::{
    draw::{LayoutPrimitive, Rotation, TextMetrics},
    geometry::{Bounds, Point, Size},
    grammar::ConstituencyNode,
};

use crate::config::LayoutConfig;

/// The finished layout of one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    primitives: Vec<LayoutPrimitive>,
    bounds: Bounds,
}

impl Diagram {
    /// Primitives in drawing order.
    pub fn primitives(&self) -> &[LayoutPrimitive] {
        &self.primitives
    }

    /// Box covering every line and label.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn size(&self) -> Size {
        self.bounds.to_size()
    }

    pub fn width(&self) -> f32 {
        self.bounds.width()
    }

    pub fn height(&self) -> f32 {
        self.bounds.height()
    }
}

/// Lays out one sentence tree as a Reed-Kellogg diagram.
///
/// The main baseline sits at y = 0 and the sentence starts at x = 0; the
/// returned bounds may extend above and to the left of the origin.
///
/// # Errors
///
/// Returns [`StructuralError`] when the tree lacks a category some handler
/// requires, such as a VP without a verb.
///
/// # Examples
///
/// ```rust,no_run
/// use kellogg::{config::LayoutConfig, layout::layout_reed_kellogg};
/// use kellogg_core::draw::HeuristicMetrics;
///
/// let parsed = kellogg_parser::parse("(S (NP (DT The) (NN cat)) (VP (VBD sat)))")
///     .expect("Failed to parse");
/// let diagram = layout_reed_kellogg(
///     parsed.tree(),
///     &LayoutConfig::default(),
///     &HeuristicMetrics::new(16.0),
/// )
/// .expect("Failed to lay out");
/// assert!(diagram.width() > 0.0);
/// ```
pub fn layout_reed_kellogg(
    tree: &ConstituencyNode,
    config: &LayoutConfig,
    metrics: &dyn TextMetrics,
) -> Result<Diagram, StructuralError> {
    info!(nodes = tree.node_count(); "Laying out sentence");

    let engine = LayoutEngine::new(config, metrics);
    let mut ctx = DrawContext::new();
    let result = engine.process_sentence(tree, Point::default(), &mut ctx)?;
    debug!(
        width = result.width(),
        ascent = result.ascent(),
        descent = result.descent(),
        primitives = ctx.len();
        "Sentence laid out"
    );

    let primitives = ctx.into_primitives();
    let bounds = primitive_bounds(&primitives, metrics);
    trace!(primitives:?; "Layout primitives");

    Ok(Diagram { primitives, bounds })
}

/// Union of the boxes of every primitive.
fn primitive_bounds(primitives: &[LayoutPrimitive], metrics: &dyn TextMetrics) -> Bounds {
    primitives
        .iter()
        .map(|primitive| match primitive {
            LayoutPrimitive::Line(line) => line.bounds(),
            LayoutPrimitive::Text(label) => {
                let size = metrics.measure(label.text());
                let position = label.position();
                match label.rotation() {
                    Rotation::Horizontal => Bounds::new_from_top_left(
                        Point::new(position.x() - size.width() / 2.0, position.y() - size.height()),
                        size,
                    ),
                    Rotation::Diagonal(angle) => {
                        let radians = angle.to_radians();
                        modifiers::rotated_label_bounds(
                            position,
                            size.width(),
                            size.height(),
                            (radians.cos(), radians.sin()),
                        )
                    }
                }
            }
        })
        .reduce(|acc, bounds| acc.merge(&bounds))
        .unwrap_or_default()
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use kellogg_core::draw::HeuristicMetrics;

    use super::*;

    fn word_strategy() -> impl Strategy<Value = String> {
        "[a-z]{1,10}"
    }

    /// `(S (NP (DT the) (JJ ..)* (NN ..)) (VP (VBD ..) [(NP (DT a) (NN ..))]))`
    fn sentence_strategy() -> impl Strategy<Value = String> {
        (
            prop::collection::vec(word_strategy(), 0..4),
            word_strategy(),
            word_strategy(),
            prop::option::of(word_strategy()),
        )
            .prop_map(|(adjectives, noun, verb, object)| {
                let mut subject = "(NP (DT the)".to_string();
                for adjective in &adjectives {
                    subject.push_str(&format!(" (JJ {adjective})"));
                }
                subject.push_str(&format!(" (NN {noun}))"));

                let object = object
                    .map(|object| format!(" (NP (DT a) (NN {object}))"))
                    .unwrap_or_default();
                format!("(S {subject} (VP (VBD {verb}){object}))")
            })
    }

    fn layout(source: &str) -> Result<Diagram, TestCaseError> {
        let parsed =
            kellogg_parser::parse(source).map_err(|err| TestCaseError::fail(err.to_string()))?;
        layout_reed_kellogg(
            parsed.tree(),
            &LayoutConfig::default(),
            &HeuristicMetrics::new(16.0),
        )
        .map_err(|err| TestCaseError::fail(err.to_string()))
    }

    proptest! {
        #[test]
        fn generated_sentences_have_positive_size(source in sentence_strategy()) {
            let diagram = layout(&source)?;
            prop_assert!(diagram.width() > 0.0);
            prop_assert!(diagram.height() > 0.0);
        }

        #[test]
        fn layout_is_deterministic(source in sentence_strategy()) {
            prop_assert_eq!(layout(&source)?, layout(&source)?);
        }

        #[test]
        fn attachment_points_stay_inside_span(
            start in -500.0f32..500.0,
            span in 1.0f32..1000.0,
            count in 1usize..12,
            trailing in any::<bool>(),
        ) {
            let bias = if trailing { ModifierBias::Trailing } else { ModifierBias::Leading };
            let points = attachment_points(start, span, count, bias);

            prop_assert_eq!(points.len(), count);
            for pair in points.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
            for point in points {
                prop_assert!(point > start && point < start + span);
            }
        }
    }
}
