//! Line styles and stroke definitions.
//!
//! Sentence diagrams only need two patterns: solid lines for the grammatical
//! skeleton and dashed lines for connectors between coordinated or
//! subordinated parts. [`StrokeDefinition`] adds the color and width used
//! when rendering, and [`apply_stroke!`](crate::apply_stroke!) writes it onto
//! an SVG element.

use std::str::FromStr;

use serde::Deserialize;

use crate::color::Color;

/// Dash pattern of a line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

impl LineStyle {
    /// Returns the SVG `stroke-dasharray` value, or `None` for solid lines.
    pub fn to_svg_value(self) -> Option<&'static str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("5,4"),
        }
    }
}

impl FromStr for LineStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            _ => Err(format!(
                "invalid line style `{s}`, valid values: solid, dashed"
            )),
        }
    }
}

/// Color, width and pattern used to stroke a line.
///
/// # Examples
///
/// ```
/// use kellogg_core::color::Color;
/// use kellogg_core::draw::{LineStyle, StrokeDefinition};
///
/// let stroke = StrokeDefinition::new(Color::new("navy").unwrap(), 1.5)
///     .with_style(LineStyle::Dashed);
/// assert_eq!(stroke.style(), LineStyle::Dashed);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: LineStyle,
}

impl StrokeDefinition {
    /// Creates a solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: LineStyle::Solid,
        }
    }

    /// Returns a copy with a different line style.
    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> LineStyle {
        self.style
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.5)
    }
}

/// Apply a [`StrokeDefinition`] to an SVG element.
///
/// Sets color, opacity and width, plus a dash array for non-solid styles.
///
/// # Examples
///
/// ```
/// use kellogg_core::draw::StrokeDefinition;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::default();
/// let line = svg_element::Line::new().set("x1", 0).set("x2", 10);
/// let line = kellogg_core::apply_stroke!(line, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width())
            .set("stroke-linecap", "round");

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

#[cfg(test)]
mod tests {
    use svg::node::element as svg_element;

    use super::*;

    #[test]
    fn test_line_style_from_str() {
        assert_eq!("solid".parse::<LineStyle>(), Ok(LineStyle::Solid));
        assert_eq!("dashed".parse::<LineStyle>(), Ok(LineStyle::Dashed));
        assert!("dotted".parse::<LineStyle>().is_err());
    }

    #[test]
    fn test_dash_array_only_for_dashed() {
        assert_eq!(LineStyle::Solid.to_svg_value(), None);
        assert_eq!(LineStyle::Dashed.to_svg_value(), Some("5,4"));
    }

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.5);
        assert_eq!(stroke.style(), LineStyle::Solid);
        assert_eq!(stroke.color().to_string(), "black");
    }

    #[test]
    fn test_apply_stroke_sets_attributes() {
        let stroke = StrokeDefinition::default().with_style(LineStyle::Dashed);
        let line = crate::apply_stroke!(svg_element::Line::new(), &stroke);

        let rendered = line.to_string();
        assert!(rendered.contains("stroke=\"black\""));
        assert!(rendered.contains("stroke-width=\"1.5\""));
        assert!(rendered.contains("stroke-dasharray=\"5,4\""));
    }

    #[test]
    fn test_apply_stroke_solid_has_no_dash() {
        let stroke = StrokeDefinition::default();
        let line = crate::apply_stroke!(svg_element::Line::new(), &stroke);

        assert!(!line.to_string().contains("stroke-dasharray"));
    }
}
