//! Drawing vocabulary shared by layout and export.
//!
//! - [`LayoutPrimitive`] - The line segments and text labels a layout emits
//! - [`StrokeDefinition`] / [`LineStyle`] - How a line is stroked
//! - [`TextMetrics`] - Pluggable text measurement

mod primitive;
mod stroke;
mod text;

pub use primitive::{LayoutPrimitive, LineRole, LineSegment, Rotation, TextLabel};
pub use stroke::{LineStyle, StrokeDefinition};
pub use text::{FontMetrics, HeuristicMetrics, TextMetrics, TextMetricsKind};
