//! Regular expression plugin
//!
//! Parses JavaScript-flavoured regex text into a syntax tree, lays the tree
//! out as a railroad diagram and paints it as SVG or character art.

mod ast;
mod bounds;
mod escapes;
mod labels;
mod layout;
mod parser;
mod svg_renderer;
mod text_renderer;

pub use ast::*;
pub use labels::{
    anchor_label, charset_caption, flags_caption, group_caption, literal_label, repeat_label,
    WILDCARD_LABEL,
};
pub use layout::*;
pub use parser::*;
pub use svg_renderer::*;
pub use text_renderer::*;
