//! SVG painter for laid out regex diagrams

use anyhow::Result;
use tracing::{debug, info, span, Level};

use super::layout::{Fragment, LaidOutDiagram, Segment, Shape};
use crate::core::{Direction, PathData, Point, Renderer, SvgElement, SvgSurface};

/// Half the size of an arrowhead
const ARROW_SIZE: f64 = 4.0;

/// Paints a [`LaidOutDiagram`] into nested SVG groups
///
/// Every fragment becomes a `<g>` carrying its structural class and a
/// translate transform for its offset, so the styling hooks follow the
/// syntax tree. Styling is left to the caller: the surface's stylesheet is
/// never touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexSvgRenderer;

impl RegexSvgRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Replace the surface contents with the painted diagram
    pub fn render_into(&self, diagram: &LaidOutDiagram, surface: &mut SvgSurface) {
        let render_span = span!(
            Level::INFO,
            "render_regex_svg",
            width = diagram.width,
            height = diagram.height
        );
        let _enter = render_span.enter();

        surface.clear();
        surface.set_size(diagram.width, diagram.height);
        surface.push(paint_fragment(&diagram.fragment, Point::default()));

        info!(elements = surface.elements().len(), "SVG rendering completed");
    }
}

impl Renderer<LaidOutDiagram> for RegexSvgRenderer {
    type Output = SvgSurface;

    fn render(&self, diagram: &LaidOutDiagram) -> Result<SvgSurface> {
        diagram.check_size()?;
        let mut surface = SvgSurface::new();
        self.render_into(diagram, &mut surface);
        Ok(surface)
    }

    fn name(&self) -> &'static str {
        "svg"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "svg"
    }
}

fn paint_fragment(fragment: &Fragment, offset: Point) -> SvgElement {
    let mut children: Vec<SvgElement> = fragment.shapes.iter().map(paint_shape).collect();
    for child in &fragment.children {
        children.push(paint_fragment(&child.fragment, child.offset));
    }
    debug!(class = fragment.class, children = children.len(), "Painted fragment");
    SvgElement::group(Some(fragment.class), offset, children)
}

fn paint_shape(shape: &Shape) -> SvgElement {
    match shape {
        Shape::Rect {
            rect,
            radius,
            class,
            ..
        } => SvgElement::Rect {
            rect: *rect,
            rx: *radius,
            class: class.to_string(),
        },
        Shape::Text {
            origin,
            extent,
            text,
            class,
        } => SvgElement::Text {
            position: origin.translate(0.0, extent.baseline),
            content: text.clone(),
            class: class.to_string(),
        },
        Shape::Path { segments, class } => SvgElement::Path {
            data: path_data(segments),
            class: class.to_string(),
        },
        Shape::Circle {
            center,
            radius,
            class,
        } => SvgElement::Circle {
            center: *center,
            radius: *radius,
            class: class.to_string(),
        },
        Shape::Arrow { at, direction } => SvgElement::Path {
            data: arrowhead(*at, *direction),
            class: "arrow".to_string(),
        },
    }
}

fn path_data(segments: &[Segment]) -> PathData {
    segments
        .iter()
        .fold(PathData::new(), |data, segment| match *segment {
            Segment::MoveTo(p) => data.move_to(p),
            Segment::LineTo(p) => data.line_to(p),
            Segment::QuadTo { ctrl, to } => data.quad_to(ctrl, to),
        })
}

/// Closed triangle pointing in `direction` with its tip near `at`
fn arrowhead(at: Point, direction: Direction) -> PathData {
    let s = ARROW_SIZE;
    let (tip, a, b) = match direction {
        Direction::Right => ((s, 0.0), (-s, -s), (-s, s)),
        Direction::Left => ((-s, 0.0), (s, -s), (s, s)),
        Direction::Up => ((0.0, -s), (-s, s), (s, s)),
        Direction::Down => ((0.0, s), (-s, -s), (s, -s)),
    };
    PathData::new()
        .move_to(at.translate(a.0, a.1))
        .line_to(at.translate(tip.0, tip.1))
        .line_to(at.translate(b.0, b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FontMetrics, Theme};
    use crate::plugins::regex::layout::RegexLayoutAlgorithm;
    use crate::plugins::regex::parser::parse_pattern;

    fn render(pattern: &str) -> SvgSurface {
        let root = parse_pattern(pattern).root;
        let diagram = RegexLayoutAlgorithm::new().layout_root(&root, &FontMetrics::default());
        RegexSvgRenderer::new().render(&diagram).unwrap()
    }

    #[test]
    fn test_structural_classes() {
        let surface = render("^a|[b-c]\\d.$");
        for class in [
            "root",
            "alternation",
            "sequence",
            "anchor",
            "literal",
            "charset",
            "charset-range",
            "escape",
            "any-character",
            "connector",
            "terminal",
        ] {
            assert!(surface.count_class(class) > 0, "missing {}", class);
        }
    }

    #[test]
    fn test_surface_size_matches_layout() {
        let root = parse_pattern("abc").root;
        let diagram = RegexLayoutAlgorithm::new().layout_root(&root, &FontMetrics::default());
        let surface = RegexSvgRenderer::new().render(&diagram).unwrap();
        assert_eq!(surface.width(), diagram.width);
        assert_eq!(surface.height(), diagram.height);
    }

    #[test]
    fn test_render_into_replaces_contents() {
        let root = parse_pattern("a|b").root;
        let diagram = RegexLayoutAlgorithm::new().layout_root(&root, &FontMetrics::default());
        let renderer = RegexSvgRenderer::new();
        let mut surface = SvgSurface::new();
        renderer.render_into(&diagram, &mut surface);
        renderer.render_into(&diagram, &mut surface);
        assert_eq!(surface.elements().len(), 1);
        assert_eq!(surface.count_class("alternation"), 1);
    }

    #[test]
    fn test_render_keeps_caller_stylesheet() {
        let root = parse_pattern("a").root;
        let diagram = RegexLayoutAlgorithm::new().layout_root(&root, &FontMetrics::default());
        let mut surface = SvgSurface::new();
        surface.set_stylesheet(Some(Theme::Dark.stylesheet()));
        RegexSvgRenderer::new().render_into(&diagram, &mut surface);
        assert!(surface.to_svg().contains("<style"));

        let plain = RegexSvgRenderer::new().render(&diagram).unwrap().to_svg();
        assert!(!plain.contains("<style"));
    }

    #[test]
    fn test_arrowhead_points_left() {
        let data = arrowhead(Point::new(10.0, 10.0), Direction::Left);
        assert!(data.as_str().starts_with("M14,6"));
        assert!(data.as_str().contains("L6,10"));
    }

    #[test]
    fn test_lazy_quantifier_draws_arrow() {
        let surface = render("a*?b*");
        assert_eq!(surface.count_class("arrow"), 2);
        assert_eq!(surface.count_class("quantified"), 2);
    }

    #[test]
    fn test_labels_escape_xml() {
        let svg = render("<&>").to_svg();
        assert!(svg.contains("“&lt;&amp;&gt;”"));
    }
}
