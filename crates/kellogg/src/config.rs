//! Configuration types for Kellogg diagram rendering.
//!
//! All types implement [`serde::Deserialize`] so a partial TOML file only
//! overrides the values it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Spacing constants used by the layout engine.
//! - [`StyleConfig`] - Colors and stroke width of the rendered document.
//! - [`TextConfig`] - Font and text measurement settings.
//!
//! # Example
//!
//! ```
//! # use kellogg::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! assert!(config.layout().modifier_drop() > 0.0);
//! ```

use serde::Deserialize;

use kellogg_core::{
    color::Color,
    draw::{FontMetrics, HeuristicMetrics, StrokeDefinition, TextMetrics, TextMetricsKind},
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout spacing section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Visual style section.
    #[serde(default)]
    style: StyleConfig,

    /// Text measurement section.
    #[serde(default)]
    text: TextConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, style: StyleConfig, text: TextConfig) -> Self {
        Self {
            layout,
            style,
            text,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn text(&self) -> &TextConfig {
        &self.text
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value: a negative
    /// spacing, a non-positive font size or an unparsable color.
    pub fn validate(&self) -> Result<(), String> {
        self.layout.validate()?;
        self.style.background_color()?;
        self.style.stroke()?;
        self.style.text_color()?;
        if !(self.text.font_size > 0.0) {
            return Err(format!(
                "text.font_size must be positive, got {}",
                self.text.font_size
            ));
        }
        Ok(())
    }
}

/// Spacing constants for the Reed-Kellogg layout, in canvas units.
///
/// Aesthetic spacing is tunable; none of these values affect which lines are
/// drawn, only where.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal room on each side of a label on its baseline.
    padding: f32,
    /// Gap between a horizontal label and the line it sits on.
    label_lift: f32,
    /// Half-height of the subject divider and height of the object tick.
    divider_extent: f32,
    /// Vertical drop of a modifier diagonal.
    modifier_drop: f32,
    /// Horizontal run of a modifier diagonal.
    modifier_run: f32,
    /// Minimum distance between neighbouring modifier attachment points.
    modifier_spacing: f32,
    /// Vertical drop of a preposition diagonal.
    preposition_drop: f32,
    /// Horizontal run of a preposition diagonal.
    preposition_run: f32,
    /// Horizontal run of the complement slash.
    slash_run: f32,
    /// Vertical gap between compound branches.
    compound_gap: f32,
    /// Vertical gap between stacked clauses.
    clause_gap: f32,
    /// Horizontal run of the lines joining compound branches.
    fork_run: f32,
    /// Horizontal offset of a dependent clause from its attachment point.
    subordinate_indent: f32,
    /// Empty space around the whole diagram.
    margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 10.0,
            label_lift: 4.0,
            divider_extent: 24.0,
            modifier_drop: 40.0,
            modifier_run: 24.0,
            modifier_spacing: 36.0,
            preposition_drop: 48.0,
            preposition_run: 28.0,
            slash_run: 10.0,
            compound_gap: 36.0,
            clause_gap: 40.0,
            fork_run: 28.0,
            subordinate_indent: 24.0,
            margin: 20.0,
        }
    }
}

impl LayoutConfig {
    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn label_lift(&self) -> f32 {
        self.label_lift
    }

    pub fn divider_extent(&self) -> f32 {
        self.divider_extent
    }

    pub fn modifier_drop(&self) -> f32 {
        self.modifier_drop
    }

    pub fn modifier_run(&self) -> f32 {
        self.modifier_run
    }

    pub fn modifier_spacing(&self) -> f32 {
        self.modifier_spacing
    }

    pub fn preposition_drop(&self) -> f32 {
        self.preposition_drop
    }

    pub fn preposition_run(&self) -> f32 {
        self.preposition_run
    }

    pub fn slash_run(&self) -> f32 {
        self.slash_run
    }

    pub fn compound_gap(&self) -> f32 {
        self.compound_gap
    }

    pub fn clause_gap(&self) -> f32 {
        self.clause_gap
    }

    pub fn fork_run(&self) -> f32 {
        self.fork_run
    }

    pub fn subordinate_indent(&self) -> f32 {
        self.subordinate_indent
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    fn validate(&self) -> Result<(), String> {
        let values = [
            ("padding", self.padding),
            ("label_lift", self.label_lift),
            ("divider_extent", self.divider_extent),
            ("modifier_run", self.modifier_run),
            ("modifier_spacing", self.modifier_spacing),
            ("preposition_run", self.preposition_run),
            ("slash_run", self.slash_run),
            ("compound_gap", self.compound_gap),
            ("clause_gap", self.clause_gap),
            ("fork_run", self.fork_run),
            ("subordinate_indent", self.subordinate_indent),
            ("margin", self.margin),
        ];
        if let Some((name, value)) = values.iter().find(|(_, value)| !(*value >= 0.0)) {
            return Err(format!("layout.{name} must not be negative, got {value}"));
        }

        // Diagonals need a real drop to carry their labels.
        for (name, value) in [
            ("modifier_drop", self.modifier_drop),
            ("preposition_drop", self.preposition_drop),
        ] {
            if !(value > 0.0) {
                return Err(format!("layout.{name} must be positive, got {value}"));
            }
        }
        Ok(())
    }
}

/// Visual styling of the rendered document.
///
/// Unset fields fall back to renderer defaults: transparent background,
/// black lines 1.5 units wide, black text.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    background_color: Option<String>,

    #[serde(default)]
    line_color: Option<String>,

    #[serde(default)]
    line_width: Option<f32>,

    #[serde(default)]
    text_color: Option<String>,
}

impl StyleConfig {
    /// Creates a style with only a background color set.
    pub fn with_background(color: impl Into<String>) -> Self {
        Self {
            background_color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Returns the parsed background [`Color`], or `None` if unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
    }

    /// Returns the parsed text [`Color`], black when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn text_color(&self) -> Result<Color, String> {
        self.text_color
            .as_deref()
            .map_or_else(|| Ok(Color::default()), Color::new)
    }

    /// Builds the stroke used for every line of the diagram.
    ///
    /// # Errors
    ///
    /// Returns an error if the line color is invalid or the width is not
    /// positive.
    pub fn stroke(&self) -> Result<StrokeDefinition, String> {
        let mut stroke = StrokeDefinition::default();
        if let Some(color) = self.line_color.as_deref() {
            stroke = StrokeDefinition::new(Color::new(color)?, stroke.width());
        }
        if let Some(width) = self.line_width {
            if !(width > 0.0) {
                return Err(format!("style.line_width must be positive, got {width}"));
            }
            stroke = StrokeDefinition::new(stroke.color(), width);
        }
        Ok(stroke)
    }
}

/// Font and measurement settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    font_family: String,
    font_size: f32,
    metrics: TextMetricsKind,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 16.0,
            metrics: TextMetricsKind::default(),
        }
    }
}

impl TextConfig {
    pub fn new(font_family: impl Into<String>, font_size: f32, metrics: TextMetricsKind) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            metrics,
        }
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn metrics(&self) -> TextMetricsKind {
        self.metrics
    }

    /// Creates the configured [`TextMetrics`] provider.
    pub fn build_metrics(&self) -> Box<dyn TextMetrics> {
        match self.metrics {
            TextMetricsKind::Heuristic => Box::new(HeuristicMetrics::new(self.font_size)),
            TextMetricsKind::Font => Box::new(FontMetrics::new(&self.font_family, self.font_size)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_style_colors() {
        let style = StyleConfig::with_background("white");
        assert!(style.background_color().unwrap().is_some());
        assert!(StyleConfig::default().background_color().unwrap().is_none());

        let bad = StyleConfig::with_background("not-a-color");
        assert!(bad.background_color().is_err());
    }

    #[test]
    fn test_stroke_defaults() {
        let stroke = StyleConfig::default().stroke().unwrap();
        assert_eq!(stroke, StrokeDefinition::default());
    }

    #[test]
    fn test_invalid_line_width() {
        let style = StyleConfig {
            line_width: Some(0.0),
            ..StyleConfig::default()
        };
        assert!(style.stroke().is_err());
    }

    #[test]
    fn test_negative_spacing_rejected() {
        let layout = LayoutConfig {
            clause_gap: -1.0,
            ..LayoutConfig::default()
        };
        let config = AppConfig::new(layout, StyleConfig::default(), TextConfig::default());

        let err = config.validate().unwrap_err();
        assert!(err.contains("clause_gap"));
    }

    #[test]
    fn test_zero_drop_rejected() {
        let layout = LayoutConfig {
            modifier_drop: 0.0,
            ..LayoutConfig::default()
        };
        let config = AppConfig::new(layout, StyleConfig::default(), TextConfig::default());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_heuristic_metrics_built() {
        let metrics = TextConfig::default().build_metrics();
        assert!((metrics.font_size() - 16.0).abs() < f32::EPSILON);
    }
}
