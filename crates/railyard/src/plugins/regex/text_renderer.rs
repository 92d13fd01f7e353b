//! Character-cell painter for laid out regex diagrams
//!
//! Expects a diagram laid out with [`LayoutConfig::text`](super::LayoutConfig::text)
//! so every coordinate is a whole cell. Lines are painted first and merge
//! into junction glyphs; text, arrows and terminals are written on top.

use anyhow::Result;
use tracing::{info, span, trace, Level};

use super::layout::{Fragment, LaidOutDiagram, Segment, Shape};
use crate::core::{AsciiCanvas, CharacterSet, LineChars, Point, Renderer, Stroke};

pub struct RegexTextRenderer {
    chars: LineChars,
}

impl RegexTextRenderer {
    pub fn new(style: CharacterSet) -> Self {
        Self {
            chars: LineChars::new(style),
        }
    }

    pub fn style(&self) -> CharacterSet {
        self.chars.style()
    }

    /// Paint onto a fresh canvas sized to the diagram
    pub fn paint(&self, diagram: &LaidOutDiagram) -> AsciiCanvas {
        let render_span = span!(
            Level::INFO,
            "render_regex_text",
            width = diagram.width,
            height = diagram.height
        );
        let _enter = render_span.enter();

        let mut canvas = AsciiCanvas::new(cell(diagram.width), cell(diagram.height));
        self.paint_lines(&mut canvas, &diagram.fragment, Point::default());
        self.paint_marks(&mut canvas, &diagram.fragment, Point::default());

        info!(
            columns = canvas.width,
            rows = canvas.height,
            "Text rendering completed"
        );
        canvas
    }

    fn paint_lines(&self, canvas: &mut AsciiCanvas, fragment: &Fragment, origin: Point) {
        for shape in &fragment.shapes {
            match shape {
                Shape::Rect {
                    rect,
                    radius,
                    dashed,
                    ..
                } => {
                    let stroke = Stroke {
                        dashed: *dashed,
                        rounded: *radius > 0.0,
                    };
                    let x = cell(origin.x + rect.x);
                    let y = cell(origin.y + rect.y);
                    let x2 = cell(origin.x + rect.x2() - 1.0);
                    let y2 = cell(origin.y + rect.y2() - 1.0);
                    canvas.draw_rect(x, y, x2, y2, stroke, &self.chars);
                }
                Shape::Path { segments, .. } => self.paint_path(canvas, segments, origin),
                Shape::Text { .. } | Shape::Circle { .. } | Shape::Arrow { .. } => {}
            }
        }
        for child in &fragment.children {
            let child_origin = origin.translate(child.offset.x, child.offset.y);
            self.paint_lines(canvas, &child.fragment, child_origin);
        }
    }

    /// Quadratic curves become elbows through their control point
    fn paint_path(&self, canvas: &mut AsciiCanvas, segments: &[Segment], origin: Point) {
        let mut current = origin;
        for segment in segments {
            match *segment {
                Segment::MoveTo(p) => current = origin.translate(p.x, p.y),
                Segment::LineTo(p) => {
                    let to = origin.translate(p.x, p.y);
                    self.line(canvas, current, to);
                    current = to;
                }
                Segment::QuadTo { ctrl, to } => {
                    let ctrl = origin.translate(ctrl.x, ctrl.y);
                    let to = origin.translate(to.x, to.y);
                    self.line(canvas, current, ctrl);
                    self.line(canvas, ctrl, to);
                    current = to;
                }
            }
        }
    }

    /// Straight run, or horizontal then vertical when not aligned
    fn line(&self, canvas: &mut AsciiCanvas, from: Point, to: Point) {
        let stroke = Stroke::rounded();
        let (x0, y0, x1, y1) = (cell(from.x), cell(from.y), cell(to.x), cell(to.y));
        if y0 == y1 {
            canvas.draw_horizontal_line(x0, x1, y0, stroke, &self.chars);
        } else if x0 == x1 {
            canvas.draw_vertical_line(x0, y0, y1, stroke, &self.chars);
        } else {
            trace!(x0, y0, x1, y1, "Splitting diagonal segment");
            canvas.draw_horizontal_line(x0, x1, y0, stroke, &self.chars);
            canvas.draw_vertical_line(x1, y0, y1, stroke, &self.chars);
        }
    }

    fn paint_marks(&self, canvas: &mut AsciiCanvas, fragment: &Fragment, origin: Point) {
        for shape in &fragment.shapes {
            match shape {
                Shape::Text {
                    origin: at, text, ..
                } => {
                    canvas.draw_text(cell(origin.x + at.x), cell(origin.y + at.y), text);
                }
                Shape::Arrow { at, direction } => {
                    canvas.set_char(
                        cell(origin.x + at.x),
                        cell(origin.y + at.y),
                        self.chars.arrow(*direction),
                    );
                }
                Shape::Circle { center, .. } => {
                    canvas.set_char(
                        cell(origin.x + center.x),
                        cell(origin.y + center.y),
                        self.chars.terminal(),
                    );
                }
                Shape::Rect { .. } | Shape::Path { .. } => {}
            }
        }
        for child in &fragment.children {
            let child_origin = origin.translate(child.offset.x, child.offset.y);
            self.paint_marks(canvas, &child.fragment, child_origin);
        }
    }
}

impl Default for RegexTextRenderer {
    fn default() -> Self {
        Self::new(CharacterSet::default())
    }
}

impl Renderer<LaidOutDiagram> for RegexTextRenderer {
    type Output = String;

    fn render(&self, diagram: &LaidOutDiagram) -> Result<String> {
        diagram.check_size()?;
        Ok(self.paint(diagram).to_string())
    }

    fn name(&self) -> &'static str {
        "text"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        match self.chars.style() {
            CharacterSet::Ascii => "ascii",
            CharacterSet::Unicode => "unicode",
        }
    }
}

fn cell(value: f64) -> usize {
    value.max(0.0).round() as usize
}
