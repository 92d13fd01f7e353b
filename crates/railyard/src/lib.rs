//! Railyard - Turn regular expressions into railroad diagrams
//!
//! A library for parsing JavaScript-style regular expressions and drawing
//! them as railroad diagrams, either as SVG or as character art.
//!
//! # Quick Start
//!
//! ```rust
//! use railyard::render_regex;
//!
//! let surface = render_regex("^(\\d{4})-(\\d{2})$");
//! let svg = surface.to_string();
//! assert!(svg.starts_with("<svg"));
//! assert!(svg.contains("group #1"));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use railyard::prelude::*;
//!
//! let outcome = RegexParser::new().parse("colou?r").unwrap();
//! assert!(outcome.is_clean());
//!
//! // Lay out with character-cell spacing and paint as text
//! let layout = RegexLayoutAlgorithm::with_config(LayoutConfig::text());
//! let diagram = layout.layout(&outcome.root, &CellMetrics).unwrap();
//!
//! let renderer = RegexTextRenderer::new(CharacterSet::Unicode);
//! let text = renderer.render(&diagram).unwrap();
//! assert!(text.contains("“colo”"));
//! ```

pub mod core;
pub mod plugins;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;
pub use plugins::regex::{LayoutConfig, NodeKind, ParseOutcome, Root};

use crate::plugins::regex::{
    parse_pattern, RegexLayoutAlgorithm, RegexSvgRenderer, RegexTextRenderer,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        CellMetrics, CharacterSet, DiagramError, FontMetrics, LayoutAlgorithm, Measure, Parser,
        Renderer, SvgSurface, Theme,
    };
    pub use crate::plugins::regex::{
        LaidOutDiagram, LayoutConfig, NodeKind, ParseOutcome, RegexLayoutAlgorithm, RegexParser,
        RegexSvgRenderer, RegexTextRenderer, Root,
    };
}

/// Parse a pattern into a syntax tree
///
/// Never fails: malformed input is recovered from as well as possible. Use
/// [`parse_with_diagnostics`] to see what was recovered.
///
/// # Example
/// ```rust
/// use railyard::{parse, NodeKind};
///
/// let root = parse("a|b|c");
/// assert_eq!(root.kind(), NodeKind::Root);
/// assert_eq!(root.alternation.branches.len(), 3);
/// ```
pub fn parse(input: &str) -> Root {
    parse_pattern(input).root
}

/// Parse a pattern and report the constructs that had to be recovered
///
/// # Example
/// ```rust
/// use railyard::parse_with_diagnostics;
///
/// let outcome = parse_with_diagnostics("(ab");
/// assert!(!outcome.is_clean());
/// assert!(outcome.into_strict().is_err());
/// ```
pub fn parse_with_diagnostics(input: &str) -> ParseOutcome {
    parse_pattern(input)
}

/// Draw a parsed pattern into a caller-owned surface
///
/// The surface is cleared first and sized to the diagram.
///
/// # Example
/// ```rust
/// use railyard::{parse, render, SvgSurface};
///
/// let mut surface = SvgSurface::new();
/// render(&parse("a+"), &mut surface);
/// assert!(surface.width() > 0.0);
/// assert_eq!(surface.count_class("quantified"), 1);
/// ```
pub fn render(root: &Root, surface: &mut SvgSurface) {
    render_with(root, surface, &FontMetrics::default(), &LayoutConfig::svg());
}

/// [`render`] with an explicit measurement context and spacing
pub fn render_with(
    root: &Root,
    surface: &mut SvgSurface,
    measure: &dyn Measure,
    config: &LayoutConfig,
) {
    let diagram = RegexLayoutAlgorithm::with_config(config.clone()).layout_root(root, measure);
    RegexSvgRenderer::new().render_into(&diagram, surface);
}

/// Parse a pattern and draw it onto a new surface
pub fn render_regex(input: &str) -> SvgSurface {
    let mut surface = SvgSurface::new();
    render(&parse(input), &mut surface);
    surface
}

/// Render a pattern as a standalone SVG document
///
/// With a theme, its stylesheet is embedded so the document displays on its
/// own.
///
/// # Example
/// ```rust
/// use railyard::{render_regex_svg, Theme};
///
/// let svg = render_regex_svg("[a-z]+", Some(Theme::Dark));
/// assert!(svg.contains("<style>"));
/// assert!(svg.contains("class=\"charset-range\""));
/// ```
pub fn render_regex_svg(input: &str, theme: Option<Theme>) -> String {
    let mut surface = render_regex(input);
    surface.set_stylesheet(theme.map(|theme| theme.stylesheet()));
    surface.to_svg()
}

/// Render a pattern as a character-art diagram
///
/// # Example
/// ```rust
/// use railyard::{render_text, CharacterSet};
///
/// let text = render_text("a|b", CharacterSet::Ascii);
/// assert!(text.is_ascii());
/// assert!(text.contains("\"a\""));
/// ```
pub fn render_text(input: &str, style: CharacterSet) -> String {
    let config = match style {
        CharacterSet::Ascii => LayoutConfig::text_ascii(),
        CharacterSet::Unicode => LayoutConfig::text(),
    };
    let root = parse(input);
    let diagram = RegexLayoutAlgorithm::with_config(config).layout_root(&root, &CellMetrics);
    RegexTextRenderer::new(style).paint(&diagram).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_surface() {
        let mut surface = SvgSurface::new();
        render(&parse("abc|def"), &mut surface);
        assert_eq!(surface.count_class("alternation"), 1);

        render(&parse("x"), &mut surface);
        assert_eq!(surface.count_class("alternation"), 0);
        assert_eq!(surface.count_class("literal"), 1);
    }

    #[test]
    fn test_render_regex_is_sized() {
        let surface = render_regex("a");
        assert!(surface.width() > 0.0);
        assert!(surface.height() > 0.0);
    }

    #[test]
    fn test_render_regex_svg_without_theme() {
        let svg = render_regex_svg("a", None);
        assert!(!svg.contains("<style>"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_render_text_styles() {
        let unicode = render_text("a*", CharacterSet::Unicode);
        let ascii = render_text("a*", CharacterSet::Ascii);
        assert!(unicode.contains('●'));
        assert!(ascii.contains('o'));
        assert!(ascii.is_ascii());
    }

    #[test]
    fn test_render_with_cell_metrics() {
        let mut surface = SvgSurface::new();
        render_with(&parse("ab"), &mut surface, &CellMetrics, &LayoutConfig::text());
        assert!(surface.width() < 20.0);
    }

    #[test]
    fn test_parse_never_fails() {
        let root = parse("((([[[\\");
        assert_eq!(root.text, "((([[[\\");
    }
}
