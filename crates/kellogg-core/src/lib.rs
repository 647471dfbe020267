//! Kellogg Core Types
//!
//! Foundational types shared by the Kellogg parser, layout engine and CLI:
//!
//! - **Colors**: CSS color handling for rendered strokes ([`color::Color`])
//! - **Geometry**: Points, sizes and bounds in diagram space ([`geometry`] module)
//! - **Grammar**: Constituency trees and dependency tokens ([`grammar`] module)
//! - **Draw**: Layout primitives, line styles and text measurement ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod grammar;
