//! SVG document output

use railyard::plugins::regex::{RegexLayoutAlgorithm, RegexSvgRenderer};
use railyard::{parse, render, render_regex, render_with, CellMetrics, LayoutConfig, SvgSurface, Theme};

const STRUCTURAL_CLASSES: &[&str] = &[
    "root",
    "literal",
    "escape",
    "charset-escape",
    "anchor",
    "any-character",
    "charset",
    "charset-range",
    "subexp",
    "quantified",
    "sequence",
    "alternation",
    "caption",
    "repeat-label",
    "flags",
    "connector",
    "arrow",
    "terminal",
    "label",
];

fn classes_in(svg: &str) -> Vec<String> {
    svg.split("class=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_only_structural_classes() {
    let svg = render_regex("/^(?<y>\\d{2,4})[^a-z\\s]*?.|x$/g").to_svg();
    let classes = classes_in(&svg);
    assert!(!classes.is_empty());
    for class in classes {
        assert!(
            STRUCTURAL_CLASSES.contains(&class.as_str()),
            "unexpected class {}",
            class
        );
    }
}

#[test]
fn test_every_construct_has_its_class() {
    let surface = render_regex("/^(?<y>\\d{2,4})[^a-z\\s]*?.|x$/g");
    for class in [
        "root",
        "anchor",
        "subexp",
        "escape",
        "quantified",
        "charset",
        "charset-range",
        "charset-escape",
        "any-character",
        "alternation",
        "caption",
        "repeat-label",
        "flags",
        "arrow",
        "terminal",
    ] {
        assert!(surface.count_class(class) > 0, "missing {}", class);
    }
}

#[test]
fn test_groups_are_translated() {
    let svg = render_regex("ab|c").to_svg();
    assert!(svg.contains("transform=\"translate("));
    assert!(svg.contains("<g class=\"alternation\""));
}

#[test]
fn test_document_size_matches_surface() {
    let surface = render_regex("a+");
    let svg = surface.to_svg();
    let width = railyard::svg::fmt_num(surface.width());
    assert!(svg.contains(&format!("width=\"{}\"", width)));
    assert!(svg.contains(&format!("viewBox=\"0 0 {} ", width)));
}

#[test]
fn test_stylesheet_is_caller_choice() {
    let mut surface = SvgSurface::new();
    surface.set_stylesheet(Some(Theme::Light.stylesheet()));
    render(&parse("a"), &mut surface);
    assert!(surface.to_svg().contains("<style>"));

    let root = parse("a");
    let diagram = RegexLayoutAlgorithm::new().layout_root(&root, &railyard::FontMetrics::default());
    let mut fresh = SvgSurface::new();
    RegexSvgRenderer::new().render_into(&diagram, &mut fresh);
    assert!(!fresh.to_svg().contains("<style>"));
}

#[test]
fn test_render_with_explicit_context() {
    let mut surface = SvgSurface::new();
    render_with(&parse("abc"), &mut surface, &CellMetrics, &LayoutConfig::text());
    let texts = surface.texts();
    assert_eq!(texts, vec!["“abc”"]);
}

#[test]
fn test_text_is_escaped() {
    let svg = render_regex("a<b").to_svg();
    assert!(svg.contains("“a&lt;b”"));
    assert!(!svg.contains("a<b"));
}
