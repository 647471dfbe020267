use kellogg_core::geometry::Point;

/// The box a handler occupied, measured from the origin it was given.
///
/// `width` runs rightward from the origin x. `ascent` and `descent` are the
/// extents above and below the origin y, which is always the baseline the
/// handler was asked to sit on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResult {
    width: f32,
    ascent: f32,
    descent: f32,
    anchor: Point,
    baseline_end: f32,
}

impl LayoutResult {
    pub fn new(width: f32, ascent: f32, descent: f32, anchor: Point, baseline_end: f32) -> Self {
        Self {
            width,
            ascent: ascent.max(0.0),
            descent: descent.max(0.0),
            anchor,
            baseline_end,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    pub fn descent(&self) -> f32 {
        self.descent
    }

    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// Where connectors attach: the head for phrases, the verb for clauses.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// X where the handler's own baseline stops.
    pub fn baseline_end(&self) -> f32 {
        self.baseline_end
    }

    pub(crate) fn translate(self, offset: Point) -> Self {
        Self {
            anchor: self.anchor.add_point(offset),
            baseline_end: self.baseline_end + offset.x(),
            ..self
        }
    }
}
