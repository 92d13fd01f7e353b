//! Core abstractions for diagram processing
//!
//! Everything here is independent of regular expressions: geometry, text
//! measurement, the SVG and character-grid drawing layers, styling, errors,
//! logging, and the parse/layout/render traits the regex plugin implements.

pub mod box_drawing;
mod canvas;
mod error;
mod layout;
pub mod logging;
mod parser;
mod renderer;
pub mod svg;
mod text;
mod theme;
mod types;

pub use box_drawing::{LineChars, Stroke};
pub use canvas::*;
pub use error::*;
pub use layout::*;
pub use logging::*;
pub use parser::*;
pub use renderer::*;
pub use svg::{PathData, SvgElement, SvgSurface};
pub use text::*;
pub use theme::*;
pub use types::*;
