use kellogg_core::{
    draw::{LayoutPrimitive, LineRole, LineSegment, LineStyle, Rotation, TextLabel},
    geometry::Point,
};

/// Append-only accumulator of the primitives one layout call emits.
///
/// Handlers receive it by `&mut` and never remove what a sibling drew.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DrawContext {
    primitives: Vec<LayoutPrimitive>,
}

impl DrawContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, start: Point, end: Point, style: LineStyle, role: LineRole) {
        self.primitives
            .push(LineSegment::new(start, end, style, role).into());
    }

    pub fn label(&mut self, text: impl Into<String>, position: Point, rotation: Rotation) {
        self.primitives
            .push(TextLabel::new(text, position, rotation).into());
    }

    pub fn primitives(&self) -> &[LayoutPrimitive] {
        &self.primitives
    }

    pub fn into_primitives(self) -> Vec<LayoutPrimitive> {
        self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineSegment> {
        self.primitives.iter().filter_map(LayoutPrimitive::as_line)
    }

    pub fn labels(&self) -> impl Iterator<Item = &TextLabel> {
        self.primitives.iter().filter_map(LayoutPrimitive::as_text)
    }

    /// Moves everything drawn into `other` by `offset` and appends it.
    pub(crate) fn append_shifted(&mut self, other: DrawContext, offset: Point) {
        self.primitives.extend(
            other
                .primitives
                .iter()
                .map(|primitive| primitive.translate(offset)),
        );
    }
}
