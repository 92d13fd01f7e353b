//! SVG primitive drawing layer
//!
//! A small retained element tree (groups, rects, paths, circles, text) and a
//! surface that owns it. Elements carry structural class names only; colours
//! come from an external stylesheet so the same drawing can be restyled.

use std::fmt::{self, Write};

use super::{Point, Rect};

/// Format a coordinate with at most two decimals and no trailing zeros
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

/// Escape text for use in XML content and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // Not representable in XML 1.0
            c if c.is_control() && c != '\t' && c != '\n' && c != '\r' => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    out
}

/// Builder for SVG path data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: String,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, command: char, points: &[Point]) {
        if !self.commands.is_empty() {
            self.commands.push(' ');
        }
        self.commands.push(command);
        let coords: Vec<String> = points
            .iter()
            .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
            .collect();
        self.commands.push_str(&coords.join(" "));
    }

    pub fn move_to(mut self, p: Point) -> Self {
        self.push('M', &[p]);
        self
    }

    pub fn line_to(mut self, p: Point) -> Self {
        self.push('L', &[p]);
        self
    }

    pub fn quad_to(mut self, ctrl: Point, to: Point) -> Self {
        self.push('Q', &[ctrl, to]);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.commands
    }
}

/// A node in the SVG element tree
#[derive(Debug, Clone, PartialEq)]
pub enum SvgElement {
    Group {
        class: Option<String>,
        translate: Option<Point>,
        children: Vec<SvgElement>,
    },
    Rect {
        rect: Rect,
        rx: f64,
        class: String,
    },
    Path {
        data: PathData,
        class: String,
    },
    Circle {
        center: Point,
        radius: f64,
        class: String,
    },
    Text {
        position: Point,
        content: String,
        class: String,
    },
}

impl SvgElement {
    /// Group translated by `offset`
    pub fn group(class: Option<&str>, offset: Point, children: Vec<SvgElement>) -> Self {
        let translate = if offset == Point::default() {
            None
        } else {
            Some(offset)
        };
        SvgElement::Group {
            class: class.map(str::to_string),
            translate,
            children,
        }
    }

    pub fn class(&self) -> Option<&str> {
        match self {
            SvgElement::Group { class, .. } => class.as_deref(),
            SvgElement::Rect { class, .. }
            | SvgElement::Path { class, .. }
            | SvgElement::Circle { class, .. }
            | SvgElement::Text { class, .. } => Some(class),
        }
    }

    pub fn children(&self) -> &[SvgElement] {
        match self {
            SvgElement::Group { children, .. } => children,
            _ => &[],
        }
    }

    fn write_to(&self, out: &mut String, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            SvgElement::Group {
                class,
                translate,
                children,
            } => {
                write!(out, "{}<g", pad)?;
                if let Some(class) = class {
                    write!(out, " class=\"{}\"", escape_xml(class))?;
                }
                if let Some(t) = translate {
                    write!(
                        out,
                        " transform=\"translate({},{})\"",
                        fmt_num(t.x),
                        fmt_num(t.y)
                    )?;
                }
                if children.is_empty() {
                    writeln!(out, "/>")?;
                } else {
                    writeln!(out, ">")?;
                    for child in children {
                        child.write_to(out, depth + 1)?;
                    }
                    writeln!(out, "{}</g>", pad)?;
                }
            }
            SvgElement::Rect { rect, rx, class } => {
                write!(out, "{}<rect", pad)?;
                if !class.is_empty() {
                    write!(out, " class=\"{}\"", escape_xml(class))?;
                }
                write!(
                    out,
                    " x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                    fmt_num(rect.x),
                    fmt_num(rect.y),
                    fmt_num(rect.width),
                    fmt_num(rect.height)
                )?;
                if *rx > 0.0 {
                    write!(out, " rx=\"{}\"", fmt_num(*rx))?;
                }
                writeln!(out, "/>")?;
            }
            SvgElement::Path { data, class } => {
                writeln!(
                    out,
                    "{}<path class=\"{}\" d=\"{}\"/>",
                    pad,
                    escape_xml(class),
                    data.as_str()
                )?;
            }
            SvgElement::Circle {
                center,
                radius,
                class,
            } => {
                writeln!(
                    out,
                    "{}<circle class=\"{}\" cx=\"{}\" cy=\"{}\" r=\"{}\"/>",
                    pad,
                    escape_xml(class),
                    fmt_num(center.x),
                    fmt_num(center.y),
                    fmt_num(*radius)
                )?;
            }
            SvgElement::Text {
                position,
                content,
                class,
            } => {
                writeln!(
                    out,
                    "{}<text class=\"{}\" x=\"{}\" y=\"{}\">{}</text>",
                    pad,
                    escape_xml(class),
                    fmt_num(position.x),
                    fmt_num(position.y),
                    escape_xml(content)
                )?;
            }
        }
        Ok(())
    }
}

/// Caller-owned drawing surface that renderers populate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    elements: Vec<SvgElement>,
    stylesheet: Option<String>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all elements and reset the size; the stylesheet is kept
    pub fn clear(&mut self) {
        self.elements.clear();
        self.width = 0.0;
        self.height = 0.0;
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn push(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Attach an external stylesheet emitted inside `<style>`
    pub fn set_stylesheet(&mut self, css: Option<String>) {
        self.stylesheet = css;
    }

    /// Number of elements (at any depth) carrying the given class
    pub fn count_class(&self, class: &str) -> usize {
        fn count(elements: &[SvgElement], class: &str) -> usize {
            elements
                .iter()
                .map(|e| usize::from(e.class() == Some(class)) + count(e.children(), class))
                .sum()
        }
        count(&self.elements, class)
    }

    /// All text content in document order
    pub fn texts(&self) -> Vec<&str> {
        fn collect<'a>(elements: &'a [SvgElement], out: &mut Vec<&'a str>) {
            for element in elements {
                match element {
                    SvgElement::Text { content, .. } => out.push(content),
                    SvgElement::Group { children, .. } => collect(children, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.elements, &mut out);
        out
    }

    /// Serialize as a standalone SVG document
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_document(&mut out);
        out
    }

    fn write_document(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = fmt_num(self.width),
            h = fmt_num(self.height)
        )?;
        if let Some(css) = &self.stylesheet {
            writeln!(out, "  <style>{}</style>", escape_xml(css))?;
        }
        for element in &self.elements {
            element.write_to(out, 1)?;
        }
        write!(out, "</svg>")
    }
}

impl fmt::Display for SvgSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_svg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(3.0), "3");
        assert_eq!(fmt_num(3.456), "3.46");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(-2.5), "-2.5");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
        assert_eq!(escape_xml("\u{1}"), "\u{FFFD}");
    }

    #[test]
    fn test_path_data() {
        let d = PathData::new()
            .move_to(Point::new(0.0, 10.0))
            .line_to(Point::new(5.5, 10.0))
            .quad_to(Point::new(10.0, 10.0), Point::new(10.0, 20.0));
        assert_eq!(d.as_str(), "M0,10 L5.5,10 Q10,10 10,20");
    }

    #[test]
    fn test_surface_serialization() {
        let mut surface = SvgSurface::new();
        surface.set_size(100.0, 50.0);
        surface.push(SvgElement::group(
            Some("literal"),
            Point::new(10.0, 5.0),
            vec![SvgElement::Text {
                position: Point::new(0.0, 0.0),
                content: "“a”".to_string(),
                class: "label".to_string(),
            }],
        ));
        let svg = surface.to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"100\""));
        assert!(svg.contains("class=\"literal\" transform=\"translate(10,5)\""));
        assert!(svg.contains(">“a”</text>"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(surface.count_class("label"), 1);
        assert_eq!(surface.texts(), vec!["“a”"]);
    }

    #[test]
    fn test_clear_resets_elements_and_size() {
        let mut surface = SvgSurface::new();
        surface.set_size(10.0, 10.0);
        surface.push(SvgElement::Circle {
            center: Point::new(1.0, 1.0),
            radius: 1.0,
            class: "terminal".to_string(),
        });
        surface.clear();
        assert!(surface.is_empty());
        assert_eq!(surface.width(), 0.0);
    }
}
