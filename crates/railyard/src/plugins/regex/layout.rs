//! Railroad layout for regex syntax trees
//!
//! Walks the tree bottom-up and produces an immutable [`Fragment`] tree: each
//! fragment has a bounding box in its own coordinates (top-left at the
//! origin), the anchors where tracks attach, backend-neutral shapes, and its
//! children at offsets. Painting is a separate pass.
//!
//! Coordinates are abstract units. With [`LayoutConfig::text`] one unit is a
//! character cell and every position lands on a whole cell; a shape's right
//! and bottom edges then sit one cell inside its width and height
//! (`stroke_inset`).

use anyhow::Result;
use tracing::{debug, info, span, trace, warn, Level};

use super::ast::{
    Alternation, Charset, CharsetItem, CharsetRange, Group, GroupKind, Node, Quantified, Root,
    Sequence,
};
use super::labels::{
    anchor_label, charset_caption, flags_caption, group_caption, literal_label, repeat_label,
    WILDCARD_LABEL,
};
use crate::core::{
    BBox, DiagramError, Direction, LayoutAlgorithm, Measure, Point, Rect, TextExtent,
};

/// Spacing constants for the layout pass
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub label_padding_x: f64,
    pub label_padding_y: f64,
    /// Corner radius of label boxes
    pub label_radius: f64,
    /// Horizontal gap between items of a sequence
    pub sequence_gap: f64,
    /// Vertical gap between stacked branches and class members
    pub branch_gap: f64,
    /// Room on each side of an alternation for its connectors
    pub branch_indent: f64,
    pub curve_radius: f64,
    /// Branches closer than this to the midline get a direct connector
    pub near_threshold: f64,
    pub group_padding: f64,
    /// Space between a caption and what it labels
    pub caption_gap: f64,
    pub terminal_radius: f64,
    pub terminal_stub: f64,
    pub margin: f64,
    /// Round halves down to whole units
    pub snap: bool,
    /// Distance from a shape's width to its right edge line
    pub stroke_inset: f64,
    /// Replace typographic quotes and ellipses with ASCII
    pub ascii_text: bool,
}

impl LayoutConfig {
    /// Spacing for SVG output, in pixels
    pub fn svg() -> Self {
        Self {
            label_padding_x: 5.0,
            label_padding_y: 2.0,
            label_radius: 3.0,
            sequence_gap: 10.0,
            branch_gap: 5.0,
            branch_indent: 20.0,
            curve_radius: 10.0,
            near_threshold: 15.0,
            group_padding: 10.0,
            caption_gap: 2.0,
            terminal_radius: 5.0,
            terminal_stub: 10.0,
            margin: 10.0,
            snap: false,
            stroke_inset: 0.0,
            ascii_text: false,
        }
    }

    /// Spacing for character-cell output
    pub fn text() -> Self {
        Self {
            label_padding_x: 2.0,
            label_padding_y: 1.0,
            label_radius: 0.0,
            sequence_gap: 2.0,
            branch_gap: 1.0,
            branch_indent: 4.0,
            curve_radius: 1.0,
            near_threshold: 1.0,
            group_padding: 2.0,
            caption_gap: 0.0,
            terminal_radius: 0.0,
            terminal_stub: 2.0,
            margin: 1.0,
            snap: true,
            stroke_inset: 1.0,
            ascii_text: false,
        }
    }

    /// Character-cell spacing restricted to ASCII label text
    pub fn text_ascii() -> Self {
        Self {
            ascii_text: true,
            ..Self::text()
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::svg()
    }
}

/// A piece of a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
}

/// A drawing primitive in fragment coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        rect: Rect,
        radius: f64,
        dashed: bool,
        class: &'static str,
    },
    Text {
        /// Top-left corner of the line box
        origin: Point,
        extent: TextExtent,
        text: String,
        class: &'static str,
    },
    Path {
        segments: Vec<Segment>,
        class: &'static str,
    },
    Circle {
        center: Point,
        radius: f64,
        class: &'static str,
    },
    Arrow {
        at: Point,
        direction: Direction,
    },
}

/// A laid out node
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Structural class naming what the fragment draws
    pub class: &'static str,
    pub bbox: BBox,
    pub shapes: Vec<Shape>,
    pub children: Vec<Placed>,
}

impl Fragment {
    fn new(class: &'static str, bbox: BBox) -> Self {
        Self {
            class,
            bbox,
            shapes: Vec::new(),
            children: Vec::new(),
        }
    }

    fn place(&mut self, offset: Point, fragment: Fragment) {
        self.children.push(Placed { offset, fragment });
    }

    /// Fragments in this subtree, this one first
    pub fn descendants(&self) -> Vec<&Fragment> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.fragment.descendants());
        }
        out
    }

    /// All text shapes in this subtree
    pub fn texts(&self) -> Vec<&str> {
        self.descendants()
            .into_iter()
            .flat_map(|f| f.shapes.iter())
            .filter_map(|shape| match shape {
                Shape::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A child fragment and its top-left corner in the parent
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub offset: Point,
    pub fragment: Fragment,
}

impl Placed {
    /// The child's box in parent coordinates
    pub fn bbox(&self) -> BBox {
        self.fragment.bbox.translate(self.offset.x, self.offset.y)
    }
}

/// Layout output: the fragment tree and the canvas size
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDiagram {
    pub fragment: Fragment,
    pub width: f64,
    pub height: f64,
}

impl LaidOutDiagram {
    /// Fails when a measurement context produced a size no backend can draw
    pub fn check_size(&self) -> Result<(), DiagramError> {
        let drawable = |v: f64| v.is_finite() && v >= 0.0;
        if drawable(self.width) && drawable(self.height) {
            Ok(())
        } else {
            Err(DiagramError::render_error(format!(
                "diagram size {}x{} cannot be drawn",
                self.width, self.height
            )))
        }
    }
}

struct PathBuilder {
    segments: Vec<Segment>,
}

impl PathBuilder {
    fn start(x: f64, y: f64) -> Self {
        Self {
            segments: vec![Segment::MoveTo(Point::new(x, y))],
        }
    }

    fn line(mut self, x: f64, y: f64) -> Self {
        self.segments.push(Segment::LineTo(Point::new(x, y)));
        self
    }

    fn quad(mut self, cx: f64, cy: f64, x: f64, y: f64) -> Self {
        self.segments.push(Segment::QuadTo {
            ctrl: Point::new(cx, cy),
            to: Point::new(x, y),
        });
        self
    }

    fn connector(self) -> Shape {
        Shape::Path {
            segments: self.segments,
            class: "connector",
        }
    }
}

/// Railroad layout algorithm implementation
pub struct RegexLayoutAlgorithm {
    config: LayoutConfig,
}

impl RegexLayoutAlgorithm {
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
        }
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out a parsed pattern; never fails
    pub fn layout_root(&self, root: &Root, measure: &dyn Measure) -> LaidOutDiagram {
        let layout_span = span!(Level::INFO, "layout_regex", pattern_len = root.text.len());
        let _enter = layout_span.enter();

        trace!("Starting railroad layout");
        let mut state = LayoutState {
            config: &self.config,
            measure,
            group_counter: 0,
        };
        let diagram = state.root(root);

        info!(
            width = diagram.width,
            height = diagram.height,
            groups = state.group_counter,
            "Layout completed"
        );
        diagram
    }
}

impl Default for RegexLayoutAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutAlgorithm<Root> for RegexLayoutAlgorithm {
    type Output = LaidOutDiagram;

    fn layout(&self, root: &Root, measure: &dyn Measure) -> Result<LaidOutDiagram> {
        Ok(self.layout_root(root, measure))
    }

    fn name(&self) -> &'static str {
        "railroad"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

/// Per-call state; the group counter restarts with every layout
struct LayoutState<'a> {
    config: &'a LayoutConfig,
    measure: &'a dyn Measure,
    group_counter: u32,
}

enum SequenceItem<'n> {
    Merged(String),
    Node(&'n Node),
}

impl LayoutState<'_> {
    fn snap(&self, value: f64) -> f64 {
        if self.config.snap {
            value.floor()
        } else {
            value
        }
    }

    fn display_text(&self, text: String) -> String {
        if self.config.ascii_text {
            text.replace(['“', '”'], "\"").replace('…', "..")
        } else {
            text
        }
    }

    fn measure_text(&self, text: &str) -> TextExtent {
        match self.measure.measure(text) {
            Ok(extent) => extent,
            Err(err) => {
                warn!(error = %err, "Falling back to zero-sized text");
                TextExtent::zero()
            }
        }
    }

    fn text_shape(&self, text: String, origin: Point, class: &'static str) -> Shape {
        let extent = self.measure_text(&text);
        Shape::Text {
            origin,
            extent,
            text,
            class,
        }
    }

    fn root(&mut self, root: &Root) -> LaidOutDiagram {
        let c = self.config;
        let content = self.alternation(&root.alternation);
        let cb = content.bbox;

        let mut shapes = Vec::new();
        let mut top = c.margin;
        let mut min_width = 0.0;
        if let Some(caption) = flags_caption(&root.flags) {
            let shape = self.text_shape(
                self.display_text(caption),
                Point::new(c.margin, c.margin),
                "flags",
            );
            if let Shape::Text { extent, .. } = &shape {
                top += extent.height + c.caption_gap;
                min_width = extent.width + 2.0 * c.margin;
            }
            shapes.push(shape);
        }

        let offset = Point::new(c.margin + 2.0 * c.terminal_radius + c.terminal_stub, top);
        let line_y = top + cb.ay;
        let start_x = c.margin + c.terminal_radius;
        let right = cb.ax2.max(cb.width - c.stroke_inset);
        let end_x = offset.x + right + c.terminal_stub;

        shapes.push(
            PathBuilder::start(start_x + c.terminal_radius, line_y)
                .line(offset.x + cb.ax, line_y)
                .connector(),
        );
        shapes.push(
            PathBuilder::start(offset.x + cb.ax2, line_y)
                .line(end_x, line_y)
                .connector(),
        );
        for x in [start_x, end_x + c.terminal_radius] {
            shapes.push(Shape::Circle {
                center: Point::new(x, line_y),
                radius: c.terminal_radius,
                class: "terminal",
            });
        }

        let width = (end_x + 2.0 * c.terminal_radius + c.stroke_inset + c.margin).max(min_width);
        let height = top + cb.height + c.margin;
        let bbox = BBox::new(0.0, 0.0, width, height).with_anchors(start_x, end_x, line_y);

        let mut fragment = Fragment::new("root", bbox);
        fragment.shapes = shapes;
        fragment.place(offset, content);
        debug!(width, height, "Laid out root");
        LaidOutDiagram {
            fragment,
            width,
            height,
        }
    }

    fn alternation(&mut self, alternation: &Alternation) -> Fragment {
        if let [only] = alternation.branches.as_slice() {
            return self.sequence(only);
        }
        let c = self.config;
        let branches: Vec<Fragment> = alternation
            .branches
            .iter()
            .map(|branch| self.sequence(branch))
            .collect();

        let max_width = branches
            .iter()
            .map(|f| f.bbox.width)
            .fold(0.0_f64, f64::max);
        let indent = c.branch_indent;
        let width = max_width + 2.0 * indent;
        let right = width - c.stroke_inset;

        let mut placed = Vec::with_capacity(branches.len());
        let mut y = 0.0;
        for branch in branches {
            let x = indent + self.snap((max_width - branch.bbox.width) / 2.0);
            let height = branch.bbox.height;
            placed.push(Placed {
                offset: Point::new(x, y),
                fragment: branch,
            });
            y += height + c.branch_gap;
        }
        let height = (y - c.branch_gap).max(0.0);
        let mid = self.snap(height / 2.0);

        let mut fragment = Fragment::new(
            "alternation",
            BBox::new(0.0, 0.0, width, height).with_anchors(0.0, right, mid),
        );
        for child in &placed {
            let b = child.bbox();
            let (left, right_side) = self.branch_connectors(&b, mid, right);
            fragment.shapes.push(left);
            fragment.shapes.push(right_side);
        }
        trace!(branches = placed.len(), width, height, "Laid out alternation");
        fragment.children = placed;
        fragment
    }

    /// Connectors from the shared midline into a branch and back out
    fn branch_connectors(&self, b: &BBox, mid: f64, right: f64) -> (Shape, Shape) {
        let c = self.config;
        let dy = b.ay - mid;
        let half = c.branch_indent / 2.0;

        if dy == 0.0 {
            return (
                PathBuilder::start(0.0, mid).line(b.ax, b.ay).connector(),
                PathBuilder::start(b.ax2, b.ay).line(right, mid).connector(),
            );
        }

        if dy.abs() < c.near_threshold {
            let left = PathBuilder::start(0.0, mid)
                .quad(half, mid, half, mid + dy / 2.0)
                .quad(half, b.ay, c.branch_indent, b.ay)
                .line(b.ax, b.ay)
                .connector();
            let right_side = PathBuilder::start(b.ax2, b.ay)
                .line(right - c.branch_indent, b.ay)
                .quad(right - half, b.ay, right - half, b.ay - dy / 2.0)
                .quad(right - half, mid, right, mid)
                .connector();
            return (left, right_side);
        }

        let mut r = c.curve_radius.min(half);
        if !c.snap {
            r = r.min(dy.abs() / 2.0);
        }
        let s = dy.signum();
        let left = PathBuilder::start(0.0, mid)
            .quad(r, mid, r, mid + s * r)
            .line(r, b.ay - s * r)
            .quad(r, b.ay, 2.0 * r, b.ay)
            .line(b.ax, b.ay)
            .connector();
        let right_side = PathBuilder::start(b.ax2, b.ay)
            .line(right - 2.0 * r, b.ay)
            .quad(right - r, b.ay, right - r, b.ay - s * r)
            .line(right - r, mid + s * r)
            .quad(right - r, mid, right, mid)
            .connector();
        (left, right_side)
    }

    fn sequence(&mut self, sequence: &Sequence) -> Fragment {
        let c = self.config;
        let items = merge_literals(&sequence.items);
        if items.is_empty() {
            // Keeps an empty group's frame visible
            return Fragment::new("sequence", BBox::empty());
        }

        let mut fragments: Vec<Fragment> = items
            .into_iter()
            .map(|item| match item {
                SequenceItem::Merged(value) => {
                    let text = self.display_text(literal_label(&value));
                    self.label_box("literal", text)
                }
                SequenceItem::Node(node) => self.node(node),
            })
            .collect();
        if fragments.len() == 1 {
            if let Some(only) = fragments.pop() {
                return only;
            }
        }

        let center = fragments
            .iter()
            .map(|f| f.bbox.ay_offset())
            .fold(0.0_f64, f64::max);

        let mut placed: Vec<Placed> = Vec::with_capacity(fragments.len());
        let mut x = 0.0;
        let mut height: f64 = 0.0;
        for fragment in fragments {
            let offset = Point::new(x, center - fragment.bbox.ay);
            x += fragment.bbox.width + c.sequence_gap;
            height = height.max(offset.y + fragment.bbox.height);
            placed.push(Placed { offset, fragment });
        }
        let width = x - c.sequence_gap;

        let mut shapes = Vec::new();
        for pair in placed.windows(2) {
            let (a, b) = (pair[0].bbox(), pair[1].bbox());
            shapes.push(
                PathBuilder::start(a.ax2, center)
                    .line(b.ax, center)
                    .connector(),
            );
        }

        let first = placed[0].bbox();
        let last = placed[placed.len() - 1].bbox();
        let mut fragment = Fragment::new(
            "sequence",
            BBox::new(0.0, 0.0, width, height).with_anchors(first.ax, last.ax2, center),
        );
        fragment.shapes = shapes;
        fragment.children = placed;
        trace!(items = fragment.children.len(), width, height, "Laid out sequence");
        fragment
    }

    fn node(&mut self, node: &Node) -> Fragment {
        match node {
            Node::Literal(literal) => {
                let text = self.display_text(literal_label(&literal.value));
                self.label_box("literal", text)
            }
            Node::Escape(escape) => self.label_box("escape", escape.label.clone()),
            Node::Anchor(anchor) => self.label_box("anchor", anchor_label(anchor.kind).to_string()),
            Node::Wildcard(_) => self.label_box("any-character", WILDCARD_LABEL.to_string()),
            Node::Charset(charset) => self.charset(charset),
            Node::Group(group) => self.group(group),
            Node::Quantified(quantified) => self.quantified(quantified),
        }
    }

    /// A box sized to its text plus padding
    fn label_box(&self, class: &'static str, text: String) -> Fragment {
        let c = self.config;
        let extent = self.measure_text(&text);
        let width = extent.width + 2.0 * c.label_padding_x;
        let height = extent.height + 2.0 * c.label_padding_y;
        trace!(class, text = %text, width, height, "Laid out label");

        let bbox = BBox::new(0.0, 0.0, width, height).with_anchors(
            0.0,
            width - c.stroke_inset,
            self.snap(height / 2.0),
        );
        let mut fragment = Fragment::new(class, bbox);
        fragment.shapes.push(Shape::Rect {
            rect: Rect::new(0.0, 0.0, width, height),
            radius: c.label_radius,
            dashed: false,
            class: "label",
        });
        fragment.shapes.push(Shape::Text {
            origin: Point::new(c.label_padding_x, c.label_padding_y),
            extent,
            text,
            class: "label",
        });
        fragment
    }

    fn charset(&mut self, charset: &Charset) -> Fragment {
        let c = self.config;
        let caption = self.text_shape(
            charset_caption(charset.invert).to_string(),
            Point::new(0.0, 0.0),
            "caption",
        );
        let caption_extent = match &caption {
            Shape::Text { extent, .. } => *extent,
            _ => TextExtent::zero(),
        };

        let members: Vec<Fragment> = charset
            .items
            .iter()
            .map(|item| self.charset_item(item))
            .collect();
        let inner_width = members
            .iter()
            .map(|f| f.bbox.width)
            .fold(0.0_f64, f64::max);

        let frame_y = caption_extent.height + c.caption_gap;
        let mut y = frame_y + c.label_padding_y;
        let mut placed = Vec::with_capacity(members.len());
        for member in members {
            let x = c.label_padding_x + self.snap((inner_width - member.bbox.width) / 2.0);
            let height = member.bbox.height;
            placed.push(Placed {
                offset: Point::new(x, y),
                fragment: member,
            });
            y += height + c.branch_gap;
        }
        if !placed.is_empty() {
            y -= c.branch_gap;
        }

        // The caption is measured apart from the frame and never widens it
        let frame_width = inner_width + 2.0 * c.label_padding_x;
        let frame_height = y + c.label_padding_y - frame_y;
        let bbox = BBox::new(
            0.0,
            0.0,
            frame_width.max(caption_extent.width),
            frame_y + frame_height,
        )
        .with_anchors(
            0.0,
            frame_width - c.stroke_inset,
            frame_y + self.snap(frame_height / 2.0),
        );

        let mut fragment = Fragment::new("charset", bbox);
        fragment.shapes.push(caption);
        fragment.shapes.push(Shape::Rect {
            rect: Rect::new(0.0, frame_y, frame_width, frame_height),
            radius: 0.0,
            dashed: false,
            class: "",
        });
        trace!(
            members = placed.len(),
            invert = charset.invert,
            "Laid out charset"
        );
        fragment.children = placed;
        fragment
    }

    fn charset_item(&mut self, item: &CharsetItem) -> Fragment {
        match item {
            CharsetItem::Literal(literal) => {
                let text = self.display_text(literal_label(&literal.value));
                self.label_box("literal", text)
            }
            CharsetItem::Escape(escape) => self.label_box("charset-escape", escape.label.clone()),
            CharsetItem::Range(range) => self.charset_range(range),
        }
    }

    /// First bound, hyphen, last bound, centred on the tallest
    fn charset_range(&mut self, range: &CharsetRange) -> Fragment {
        let c = self.config;
        let first = self.charset_item(&range.first);
        let last = self.charset_item(&range.last);
        let hyphen = self.measure_text("-");
        let spacing = self.snap(c.label_padding_x / 2.0);

        let height = first
            .bbox
            .height
            .max(last.bbox.height)
            .max(hyphen.height);
        let hyphen_x = first.bbox.width + spacing;
        let last_x = hyphen_x + hyphen.width + spacing;
        let width = last_x + last.bbox.width;

        let mut fragment = Fragment::new(
            "charset-range",
            BBox::new(0.0, 0.0, width, height).with_anchors(
                0.0,
                width - c.stroke_inset,
                self.snap(height / 2.0),
            ),
        );
        fragment.shapes.push(Shape::Text {
            origin: Point::new(hyphen_x, self.snap((height - hyphen.height) / 2.0)),
            extent: hyphen,
            text: "-".to_string(),
            class: "label",
        });
        let first_y = self.snap((height - first.bbox.height) / 2.0);
        let last_y = self.snap((height - last.bbox.height) / 2.0);
        fragment.place(Point::new(0.0, first_y), first);
        fragment.place(Point::new(last_x, last_y), last);
        fragment
    }

    fn group(&mut self, group: &Group) -> Fragment {
        if group.kind == GroupKind::NonCapturing {
            return self.alternation(&group.alternation);
        }
        let c = self.config;

        // Numbered before the content so outer groups come first
        let number = if group.kind.is_capturing() {
            self.group_counter += 1;
            Some(self.group_counter)
        } else {
            None
        };
        let caption_text = group_caption(&group.kind, number).unwrap_or_default();
        let caption = self.text_shape(caption_text, Point::new(0.0, 0.0), "caption");
        let caption_extent = match &caption {
            Shape::Text { extent, .. } => *extent,
            _ => TextExtent::zero(),
        };

        let content = self.alternation(&group.alternation);
        let cb = content.bbox;
        let pad = c.group_padding;
        let frame_width = caption_extent.width.max(cb.width + 2.0 * pad);
        let frame_height = cb.height + 2.0 * pad;
        let frame_y = caption_extent.height + c.caption_gap;
        let offset = Point::new(self.snap((frame_width - cb.width) / 2.0), frame_y + pad);
        let anchors = cb.translate(offset.x, offset.y);

        let mut fragment = Fragment::new(
            "subexp",
            BBox::new(0.0, 0.0, frame_width, frame_y + frame_height).with_anchors(
                anchors.ax,
                anchors.ax2,
                anchors.ay,
            ),
        );
        fragment.shapes.push(caption);
        fragment.shapes.push(Shape::Rect {
            rect: Rect::new(0.0, frame_y, frame_width, frame_height),
            radius: 0.0,
            dashed: true,
            class: "",
        });
        fragment.place(offset, content);
        trace!(number = ?number, kind = ?group.kind, "Laid out group");
        fragment
    }

    fn quantified(&mut self, quantified: &Quantified) -> Fragment {
        let repeat = quantified.repeat;
        if repeat.is_once() {
            return self.node(&quantified.atom);
        }
        let c = self.config;
        let inner = self.node(&quantified.atom);
        let b = inner.bbox;
        let r = c.curve_radius;
        let skip = repeat.can_skip();
        let looping = repeat.can_repeat();

        let dx = 2.0 * r;
        let dy = if skip { r.max(2.0 * r - b.ay) } else { 0.0 };
        let line_y = dy + b.ay;
        let left_anchor = dx + b.ax;
        let right_anchor = dx + b.ax2;

        let loop_y = (dy + b.height - c.stroke_inset + r).max(line_y + 2.0 * r);
        let label = if looping { repeat_label(&repeat) } else { None };
        let label_shape = label.map(|text| {
            let text = self.display_text(text);
            let extent = self.measure_text(&text);
            let x = (right_anchor + r - extent.width).max(0.0);
            let y = loop_y + c.stroke_inset + c.caption_gap;
            Shape::Text {
                origin: Point::new(x, y),
                extent,
                text,
                class: "repeat-label",
            }
        });

        let mut width = b.width + 2.0 * dx;
        let mut height = dy + b.height;
        if looping {
            height = height.max(loop_y + c.stroke_inset);
        }
        if let Some(Shape::Text { origin, extent, .. }) = &label_shape {
            width = width.max(origin.x + extent.width);
            height = height.max(origin.y + extent.height);
        }
        let right = width - c.stroke_inset;

        let mut fragment = Fragment::new(
            "quantified",
            BBox::new(0.0, 0.0, width, height).with_anchors(0.0, right, line_y),
        );
        fragment.shapes.push(
            PathBuilder::start(0.0, line_y)
                .line(left_anchor, line_y)
                .connector(),
        );
        fragment.shapes.push(
            PathBuilder::start(right_anchor, line_y)
                .line(right, line_y)
                .connector(),
        );

        if skip {
            fragment.shapes.push(
                PathBuilder::start(0.0, line_y)
                    .quad(r, line_y, r, line_y - r)
                    .line(r, r)
                    .quad(r, 0.0, 2.0 * r, 0.0)
                    .line(right - 2.0 * r, 0.0)
                    .quad(right - r, 0.0, right - r, r)
                    .line(right - r, line_y - r)
                    .quad(right - r, line_y, right, line_y)
                    .connector(),
            );
            if !repeat.greedy {
                fragment.shapes.push(Shape::Arrow {
                    at: Point::new(self.snap(right / 2.0), 0.0),
                    direction: Direction::Right,
                });
            }
        }

        if looping {
            fragment.shapes.push(
                PathBuilder::start(right_anchor, line_y)
                    .quad(right_anchor + r, line_y, right_anchor + r, line_y + r)
                    .line(right_anchor + r, loop_y - r)
                    .quad(right_anchor + r, loop_y, right_anchor, loop_y)
                    .line(left_anchor, loop_y)
                    .quad(left_anchor - r, loop_y, left_anchor - r, loop_y - r)
                    .line(left_anchor - r, line_y + r)
                    .quad(left_anchor - r, line_y, left_anchor, line_y)
                    .connector(),
            );
            if repeat.greedy {
                fragment.shapes.push(Shape::Arrow {
                    at: Point::new(self.snap((left_anchor + right_anchor) / 2.0), loop_y),
                    direction: Direction::Left,
                });
            }
        }

        if let Some(shape) = label_shape {
            fragment.shapes.push(shape);
        }
        fragment.place(Point::new(dx, dy), inner);
        trace!(repeat = %repeat, width, height, "Laid out quantifier");
        fragment
    }
}

/// Collapse runs of bare literals into single labels
fn merge_literals(items: &[Node]) -> Vec<SequenceItem<'_>> {
    let mut out: Vec<SequenceItem<'_>> = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Node::Literal(literal) => {
                if let Some(SequenceItem::Merged(value)) = out.last_mut() {
                    value.push_str(&literal.value);
                } else {
                    out.push(SequenceItem::Merged(literal.value.clone()));
                }
            }
            other => out.push(SequenceItem::Node(other)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CellMetrics, FontMetrics};
    use crate::plugins::regex::parser::parse_pattern;

    fn svg_layout(pattern: &str) -> LaidOutDiagram {
        let root = parse_pattern(pattern).root;
        RegexLayoutAlgorithm::new().layout_root(&root, &FontMetrics::default())
    }

    fn text_layout(pattern: &str) -> LaidOutDiagram {
        let root = parse_pattern(pattern).root;
        RegexLayoutAlgorithm::with_config(LayoutConfig::text()).layout_root(&root, &CellMetrics)
    }

    fn classes(diagram: &LaidOutDiagram) -> Vec<&'static str> {
        diagram
            .fragment
            .descendants()
            .iter()
            .map(|f| f.class)
            .collect()
    }

    #[test]
    fn test_literal_run_merges_into_one_label() {
        let diagram = svg_layout("abc");
        let literals: Vec<_> = diagram
            .fragment
            .descendants()
            .into_iter()
            .filter(|f| f.class == "literal")
            .collect();
        assert_eq!(literals.len(), 1);
        assert!(diagram.fragment.texts().contains(&"“abc”"));
    }

    #[test]
    fn test_single_branch_and_single_item_are_transparent() {
        let diagram = svg_layout("a");
        assert_eq!(classes(&diagram), vec!["root", "literal"]);
    }

    #[test]
    fn test_non_capturing_group_is_transparent() {
        let diagram = svg_layout("(?:a)");
        assert_eq!(classes(&diagram), vec!["root", "literal"]);
    }

    #[test]
    fn test_once_quantifier_is_transparent() {
        let diagram = svg_layout("a{1}");
        assert_eq!(classes(&diagram), vec!["root", "literal"]);
    }

    #[test]
    fn test_sequence_aligns_main_lines() {
        let diagram = svg_layout("a(b)c");
        let sequence = &diagram.fragment.children[0].fragment;
        assert_eq!(sequence.class, "sequence");
        let lines: Vec<f64> = sequence.children.iter().map(|c| c.bbox().ay).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|y| (*y - sequence.bbox.ay).abs() < 1e-9));
        // Connectors join neighbours
        assert_eq!(sequence.shapes.len(), 2);
    }

    #[test]
    fn test_alternation_stacks_and_centres_branches() {
        let diagram = svg_layout("a|bbbb|c");
        let alternation = &diagram.fragment.children[0].fragment;
        assert_eq!(alternation.class, "alternation");
        assert_eq!(alternation.children.len(), 3);
        let widest = alternation
            .children
            .iter()
            .map(|c| c.fragment.bbox.width)
            .fold(0.0, f64::max);
        for child in &alternation.children {
            let b = child.bbox();
            let centre = b.x + b.width / 2.0;
            let expected = 20.0 + widest / 2.0;
            assert!((centre - expected).abs() < 1e-9);
        }
        assert!(alternation.children[1].offset.y > alternation.children[0].offset.y);
        // One connector into and one out of every branch
        assert_eq!(alternation.shapes.len(), 6);
    }

    #[test]
    fn test_far_branch_curves_are_bounded() {
        let diagram = svg_layout("a|b|c|d");
        let alternation = &diagram.fragment.children[0].fragment;
        for shape in &alternation.shapes {
            if let Shape::Path { segments, .. } = shape {
                if let Some(Segment::QuadTo { ctrl, to }) = segments.get(1) {
                    assert!((to.x - ctrl.x).abs() <= 10.0);
                    assert!((to.y - ctrl.y).abs() <= 10.0);
                }
            }
        }
    }

    #[test]
    fn test_group_anchors_are_content_anchors() {
        let diagram = svg_layout("(ab)");
        let group = &diagram.fragment.children[0].fragment;
        assert_eq!(group.class, "subexp");
        let content = group.children[0].bbox();
        assert_eq!(group.bbox.ax, content.ax);
        assert_eq!(group.bbox.ax2, content.ax2);
        assert_eq!(group.bbox.ay, content.ay);
        assert!(group.bbox.ax > 0.0);
        assert!(group.texts().contains(&"group #1"));
    }

    #[test]
    fn test_group_numbering_is_preorder_and_resets() {
        let layout = RegexLayoutAlgorithm::new();
        let root = parse_pattern("((a)(b))").root;
        for _ in 0..2 {
            let diagram = layout.layout_root(&root, &FontMetrics::default());
            let texts = diagram.fragment.texts();
            let captions: Vec<&str> = texts
                .iter()
                .copied()
                .filter(|t| t.starts_with("group"))
                .collect();
            assert_eq!(captions, vec!["group #1", "group #2", "group #3"]);
        }
    }

    #[test]
    fn test_long_caption_widens_group_frame() {
        let diagram = svg_layout("(?<a_rather_long_group_name>x)");
        let group = &diagram.fragment.children[0].fragment;
        let caption = FontMetrics::default()
            .measure("group #1 (a_rather_long_group_name)")
            .unwrap();
        assert!(group.bbox.width >= caption.width);
    }

    #[test]
    fn test_charset_caption_does_not_widen_frame() {
        let diagram = svg_layout("[a]");
        let charset = &diagram.fragment.children[0].fragment;
        assert_eq!(charset.class, "charset");
        let frame = charset
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .unwrap();
        let member = charset.children[0].fragment.bbox.width;
        assert_eq!(frame.width, member + 10.0);
        assert!(charset.texts().contains(&"One of:"));
    }

    #[test]
    fn test_charset_range_centres_parts() {
        let diagram = svg_layout("[a-z]");
        let charset = &diagram.fragment.children[0].fragment;
        let range = &charset.children[0].fragment;
        assert_eq!(range.class, "charset-range");
        assert_eq!(range.children.len(), 2);
        assert!(range.texts().contains(&"-"));
        assert!(range.children[1].offset.x > range.children[0].fragment.bbox.width);
    }

    #[test]
    fn test_star_has_skip_and_loop_without_label() {
        let diagram = svg_layout("(?:a)*");
        let quantified = &diagram.fragment.children[0].fragment;
        assert_eq!(quantified.class, "quantified");
        let paths = quantified
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Path { .. }))
            .count();
        // Lead-in, lead-out, skip, loop
        assert_eq!(paths, 4);
        assert!(!quantified
            .shapes
            .iter()
            .any(|s| matches!(s, Shape::Text { class: "repeat-label", .. })));
    }

    #[test]
    fn test_zero_count_only_skips() {
        for pattern in ["a{0}", "a{0,0}"] {
            let diagram = svg_layout(pattern);
            let quantified = &diagram.fragment.children[0].fragment;
            assert_eq!(quantified.class, "quantified");
            let paths = quantified
                .shapes
                .iter()
                .filter(|s| matches!(s, Shape::Path { .. }))
                .count();
            // Lead-in, lead-out, skip
            assert_eq!(paths, 3, "{pattern}");
            assert!(
                !quantified.shapes.iter().any(|s| matches!(s, Shape::Arrow { .. })),
                "{pattern}"
            );
        }
    }

    #[test]
    fn test_arrows_follow_greediness() {
        let greedy = svg_layout("a*");
        let lazy = svg_layout("a*?");
        let arrows = |d: &LaidOutDiagram| -> Vec<Direction> {
            d.fragment.children[0]
                .fragment
                .shapes
                .iter()
                .filter_map(|s| match s {
                    Shape::Arrow { direction, .. } => Some(*direction),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(arrows(&greedy), vec![Direction::Left]);
        assert_eq!(arrows(&lazy), vec![Direction::Right]);
    }

    #[test]
    fn test_repeat_label_under_loop() {
        let diagram = svg_layout("a{2,5}");
        let quantified = &diagram.fragment.children[0].fragment;
        assert!(quantified.texts().contains(&"1…4 times"));
        let inner = quantified.children[0].bbox();
        let label_y = quantified
            .shapes
            .iter()
            .find_map(|s| match s {
                Shape::Text { origin, .. } => Some(origin.y),
                _ => None,
            })
            .unwrap();
        assert!(label_y > inner.y2());
    }

    #[test]
    fn test_optional_has_no_loop() {
        let diagram = svg_layout("a?");
        let quantified = &diagram.fragment.children[0].fragment;
        let paths = quantified
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Path { .. }))
            .count();
        assert_eq!(paths, 3);
    }

    #[test]
    fn test_root_has_terminals_and_margin() {
        let diagram = svg_layout("a");
        let root = &diagram.fragment;
        let terminals = root
            .shapes
            .iter()
            .filter(|s| matches!(s, Shape::Circle { .. }))
            .count();
        assert_eq!(terminals, 2);
        let content = root.children[0].bbox();
        assert!(diagram.width > content.x2());
        assert!(diagram.height >= content.y2() + 10.0);
    }

    #[test]
    fn test_flags_caption_on_root() {
        let diagram = svg_layout("/a/gi");
        assert!(diagram
            .fragment
            .texts()
            .contains(&"Flags: global, ignore case"));
    }

    #[test]
    fn test_empty_pattern_lays_out() {
        let diagram = svg_layout("");
        assert!(diagram.width > 0.0);
        let group = svg_layout("()");
        assert!(group.fragment.texts().contains(&"group #1"));
    }

    #[test]
    fn test_text_layout_uses_whole_cells() {
        let diagram = text_layout("^(a|bc)+[x-z]$");
        for fragment in diagram.fragment.descendants() {
            let b = fragment.bbox;
            for v in [b.width, b.height, b.ax, b.ax2, b.ay] {
                assert_eq!(v.fract(), 0.0, "{} has fractional {}", fragment.class, v);
            }
        }
    }

    #[test]
    fn test_measure_failure_falls_back_to_zero() {
        struct Broken;
        impl Measure for Broken {
            fn measure(&self, text: &str) -> Result<TextExtent, crate::core::DiagramError> {
                Err(crate::core::DiagramError::measure_error(text, "unavailable"))
            }
        }
        let root = parse_pattern("ab|c").root;
        let diagram = RegexLayoutAlgorithm::new().layout_root(&root, &Broken);
        assert!(diagram.width > 0.0);
    }

    #[test]
    fn test_ascii_text_replaces_typography() {
        let root = parse_pattern("a{2,3}").root;
        let diagram = RegexLayoutAlgorithm::with_config(LayoutConfig::text_ascii())
            .layout_root(&root, &CellMetrics);
        let texts = diagram.fragment.texts();
        assert!(texts.contains(&"\"a\""));
        assert!(texts.contains(&"1..2 times"));
    }
}
