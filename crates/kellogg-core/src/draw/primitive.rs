//! Layout primitives.
//!
//! A finished layout is an ordered list of [`LayoutPrimitive`]s. Order is
//! insertion order and only matters for layering when rendered.

use std::fmt;

use crate::{
    draw::LineStyle,
    geometry::{Bounds, Point},
};

/// Horizontal run below which a segment is treated as vertical.
const VERTICAL_EPSILON: f32 = 1e-4;

/// Orientation of a text label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rotation {
    Horizontal,
    /// Rotated clockwise by the given angle in degrees, following the
    /// y-down coordinate system.
    Diagonal(f32),
}

/// The diagramming convention a line segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRole {
    /// Horizontal line carrying a head word.
    Baseline,
    /// Vertical line crossing the baseline between subject and predicate.
    SubjectDivider,
    /// Vertical tick standing on the baseline between verb and direct object.
    ObjectDivider,
    /// Forward slash between a linking verb and its subject complement.
    ComplementSlash,
    /// Backward diagonal carrying a modifier below its head.
    ModifierDiagonal,
    /// Diagonal carrying a preposition, subordinator or indirect object link.
    PrepositionDiagonal,
    /// Dashed link between coordinated or subordinated parts.
    Connector,
    /// Line joining a compound branch to its shared attachment point.
    Fork,
}

impl fmt::Display for LineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Baseline => "baseline",
            Self::SubjectDivider => "subject-divider",
            Self::ObjectDivider => "object-divider",
            Self::ComplementSlash => "complement-slash",
            Self::ModifierDiagonal => "modifier",
            Self::PrepositionDiagonal => "preposition",
            Self::Connector => "connector",
            Self::Fork => "fork",
        };
        f.write_str(name)
    }
}

/// A straight line between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    start: Point,
    end: Point,
    style: LineStyle,
    role: LineRole,
}

impl LineSegment {
    pub fn new(start: Point, end: Point, style: LineStyle, role: LineRole) -> Self {
        Self {
            start,
            end,
            style,
            role,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn style(&self) -> LineStyle {
        self.style
    }

    pub fn role(&self) -> LineRole {
        self.role
    }

    /// Slope with upward rise counted as positive, so `/` is positive and
    /// `\` is negative regardless of the y-down canvas.
    ///
    /// Returns `None` for vertical segments.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kellogg_core::draw::{LineSegment, LineStyle, LineRole};
    /// # use kellogg_core::geometry::Point;
    /// let slash = LineSegment::new(
    ///     Point::new(0.0, 10.0),
    ///     Point::new(10.0, 0.0),
    ///     LineStyle::Solid,
    ///     LineRole::ComplementSlash,
    /// );
    /// assert_eq!(slash.slope(), Some(1.0));
    ///
    /// let tick = LineSegment::new(
    ///     Point::new(5.0, 0.0),
    ///     Point::new(5.0, 10.0),
    ///     LineStyle::Solid,
    ///     LineRole::ObjectDivider,
    /// );
    /// assert_eq!(tick.slope(), None);
    /// ```
    pub fn slope(&self) -> Option<f32> {
        let dx = self.end.x() - self.start.x();
        if dx.abs() < VERTICAL_EPSILON {
            return None;
        }
        Some((self.start.y() - self.end.y()) / dx)
    }

    /// Returns `true` when both endpoints share an x-coordinate.
    pub fn is_vertical(&self) -> bool {
        self.slope().is_none()
    }

    /// Smallest y reached by the segment (its top on screen).
    pub fn top(&self) -> f32 {
        self.start.y().min(self.end.y())
    }

    /// Largest y reached by the segment (its bottom on screen).
    pub fn bottom(&self) -> f32 {
        self.start.y().max(self.end.y())
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(self.start, self.end)
    }

    /// Returns the segment moved by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            start: self.start.add_point(offset),
            end: self.end.add_point(offset),
            ..*self
        }
    }
}

/// A piece of text centered horizontally on `position`, sitting on it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    text: String,
    position: Point,
    rotation: Rotation,
}

impl TextLabel {
    pub fn new(text: impl Into<String>, position: Point, rotation: Rotation) -> Self {
        Self {
            text: text.into(),
            position,
            rotation,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Rotation angle in degrees, `0.0` for horizontal labels.
    pub fn angle(&self) -> f32 {
        match self.rotation {
            Rotation::Horizontal => 0.0,
            Rotation::Diagonal(angle) => angle,
        }
    }
}

/// A drawable element produced by layout.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutPrimitive {
    Text(TextLabel),
    Line(LineSegment),
}

impl LayoutPrimitive {
    pub fn as_line(&self) -> Option<&LineSegment> {
        match self {
            Self::Line(line) => Some(line),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextLabel> {
        match self {
            Self::Text(label) => Some(label),
            Self::Line(_) => None,
        }
    }

    /// Returns the primitive moved by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        match self {
            Self::Line(line) => Self::Line(line.translate(offset)),
            Self::Text(label) => Self::Text(TextLabel {
                position: label.position.add_point(offset),
                ..label.clone()
            }),
        }
    }
}

impl From<LineSegment> for LayoutPrimitive {
    fn from(line: LineSegment) -> Self {
        Self::Line(line)
    }
}

impl From<TextLabel> for LayoutPrimitive {
    fn from(label: TextLabel) -> Self {
        Self::Text(label)
    }
}
