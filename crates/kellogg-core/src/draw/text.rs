//! Text measurement.
//!
//! Layout needs the width of every label before it can place anything to its
//! right. The [`TextMetrics`] trait abstracts that measurement so the engine
//! stays deterministic under test:
//!
//! - [`HeuristicMetrics`] - Character-count estimate, no font access
//! - [`FontMetrics`] - Shaped measurement through cosmic-text
//!
//! # Examples
//!
//! ```
//! # use kellogg_core::draw::{HeuristicMetrics, TextMetrics};
//! let metrics = HeuristicMetrics::new(16.0);
//! let short = metrics.measure("cat");
//! let long = metrics.measure("caterpillar");
//! assert!(long.width() > short.width());
//! ```

use std::sync::Mutex;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{info, warn};
use serde::Deserialize;

use crate::geometry::Size;

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_RATIO: f32 = 0.6;

/// Line height as a fraction of the font size.
const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Measures rendered text.
pub trait TextMetrics: Send + Sync {
    /// Returns the width and line height of `text` on a single line.
    fn measure(&self, text: &str) -> Size;

    /// Font size in pixels the measurements assume.
    fn font_size(&self) -> f32;
}

/// Selects a [`TextMetrics`] implementation from configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMetricsKind {
    #[default]
    Heuristic,
    Font,
}

/// Deterministic estimate based on character count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicMetrics {
    font_size: f32,
}

impl HeuristicMetrics {
    pub fn new(font_size: f32) -> Self {
        Self { font_size }
    }
}

impl TextMetrics for HeuristicMetrics {
    fn measure(&self, text: &str) -> Size {
        let chars = text.chars().count() as f32;
        Size::new(
            chars * self.font_size * CHAR_WIDTH_RATIO,
            self.font_size * LINE_HEIGHT_RATIO,
        )
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }
}

/// Measurement from real font data via cosmic-text.
///
/// Holds its own `FontSystem`, which is expensive to build, so one instance
/// should be reused across sentences.
pub struct FontMetrics {
    font_system: Mutex<FontSystem>,
    family: String,
    font_size: f32,
    fallback: HeuristicMetrics,
}

impl FontMetrics {
    pub fn new(family: impl Into<String>, font_size: f32) -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
            family: family.into(),
            font_size,
            fallback: HeuristicMetrics::new(font_size),
        }
    }

    fn shaped_width(&self, text: &str) -> Option<f32> {
        let Ok(mut font_system) = self.font_system.lock() else {
            warn!("FontSystem lock poisoned, falling back to heuristic metrics");
            return None;
        };

        let metrics = Metrics::new(self.font_size, self.font_size * LINE_HEIGHT_RATIO);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        let attrs = Attrs::new().family(Family::Name(&self.family));

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let width = buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|glyph| glyph.x + glyph.w))
            .fold(0.0_f32, f32::max);

        // No installed font covers the text.
        (width > 0.0).then_some(width)
    }
}

impl std::fmt::Debug for FontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMetrics")
            .field("family", &self.family)
            .field("font_size", &self.font_size)
            .finish()
    }
}

impl TextMetrics for FontMetrics {
    fn measure(&self, text: &str) -> Size {
        if text.is_empty() {
            return Size::new(0.0, self.font_size * LINE_HEIGHT_RATIO);
        }
        match self.shaped_width(text) {
            Some(width) => Size::new(width, self.font_size * LINE_HEIGHT_RATIO),
            None => self.fallback.measure(text),
        }
    }

    fn font_size(&self) -> f32 {
        self.font_size
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_heuristic_scales_with_length() {
        let metrics = HeuristicMetrics::new(10.0);

        assert_approx_eq!(f32, metrics.measure("abcd").width(), 24.0);
        assert_approx_eq!(f32, metrics.measure("abcd").height(), 12.0);
        assert_approx_eq!(f32, metrics.measure("").width(), 0.0);
    }

    #[test]
    fn test_heuristic_counts_chars_not_bytes() {
        let metrics = HeuristicMetrics::new(10.0);
        assert_approx_eq!(
            f32,
            metrics.measure("café").width(),
            metrics.measure("cafe").width()
        );
    }

    #[test]
    fn test_heuristic_is_deterministic() {
        let metrics = HeuristicMetrics::new(14.0);
        assert_eq!(metrics.measure("sentence"), metrics.measure("sentence"));
    }

    #[test]
    fn test_font_metrics_always_positive() {
        let metrics = FontMetrics::new("sans-serif", 16.0);
        let size = metrics.measure("diagram");
        assert!(size.width() > 0.0);
        assert!(size.height() > 0.0);
    }

    #[test]
    fn test_font_metrics_empty_text() {
        let metrics = FontMetrics::new("sans-serif", 16.0);
        assert_approx_eq!(f32, metrics.measure("").width(), 0.0);
    }
}
