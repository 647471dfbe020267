//! SVG rendering of layout primitives.

use log::{debug, info};
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use kellogg_core::{
    apply_stroke,
    color::Color,
    draw::{LayoutPrimitive, LineSegment, Rotation, StrokeDefinition, TextLabel},
    geometry::Bounds,
};

use super::{Error, Exporter};
use crate::{config::AppConfig, layout::Diagram};

/// Writes diagrams as standalone SVG documents.
///
/// Lines keep their own dash pattern; color and width come from the style
/// configuration.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    stroke: StrokeDefinition,
    text_color: Color,
    background: Option<Color>,
    font_family: String,
    font_size: f32,
    margin: f32,
}

impl SvgExporter {
    /// Builds an exporter from the style, text and margin settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] when a configured color does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let style = config.style();
        Ok(Self {
            stroke: style.stroke().map_err(Error::Render)?,
            text_color: style.text_color().map_err(Error::Render)?,
            background: style.background_color().map_err(Error::Render)?,
            font_family: config.text().font_family().to_string(),
            font_size: config.text().font_size(),
            margin: config.layout().margin(),
        })
    }

    /// Renders the diagram into an SVG document.
    pub fn render_document(&self, diagram: &Diagram) -> Document {
        let view = diagram.bounds().expand(self.margin);
        debug!(
            width = view.width(),
            height = view.height(),
            primitives = diagram.primitives().len();
            "Rendering SVG document"
        );

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    view.min_x(),
                    view.min_y(),
                    view.width(),
                    view.height()
                ),
            )
            .set("width", view.width())
            .set("height", view.height());

        if let Some(background) = &self.background {
            doc = doc.add(self.render_background(view, background));
        }

        let mut lines = svg_element::Group::new().set("fill", "none");
        let mut labels = svg_element::Group::new()
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", &self.text_color)
            .set("text-anchor", "middle");
        for primitive in diagram.primitives() {
            match primitive {
                LayoutPrimitive::Line(line) => lines = lines.add(self.render_line(line)),
                LayoutPrimitive::Text(label) => labels = labels.add(self.render_label(label)),
            }
        }

        doc.add(lines).add(labels)
    }

    fn render_background(&self, view: Bounds, color: &Color) -> svg_element::Rectangle {
        svg_element::Rectangle::new()
            .set("x", view.min_x())
            .set("y", view.min_y())
            .set("width", view.width())
            .set("height", view.height())
            .set("fill", color)
    }

    fn render_line(&self, line: &LineSegment) -> svg_element::Line {
        let stroke = self.stroke.clone().with_style(line.style());
        let element = svg_element::Line::new()
            .set("x1", line.start().x())
            .set("y1", line.start().y())
            .set("x2", line.end().x())
            .set("y2", line.end().y());
        apply_stroke!(element, &stroke)
    }

    fn render_label(&self, label: &TextLabel) -> svg_element::Text {
        let position = label.position();
        let text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y())
            .add(SvgText::new(label.text()));

        match label.rotation() {
            Rotation::Horizontal => text,
            Rotation::Diagonal(angle) => text.set(
                "transform",
                format!("rotate({angle} {} {})", position.x(), position.y()),
            ),
        }
    }
}

impl Exporter for SvgExporter {
    fn export_diagram(&self, diagram: &Diagram) -> Result<String, Error> {
        let document = self.render_document(diagram);
        let content = document.to_string();
        info!(bytes = content.len(); "SVG rendered");
        Ok(content)
    }
}
