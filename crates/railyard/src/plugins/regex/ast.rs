//! Regex syntax tree
//!
//! A closed set of node types, one per construct. Every node records the
//! exact source text it was parsed from and the byte offset of that text in
//! the original input, including any leading `/` of a `/pattern/flags`
//! literal. Nodes are never modified after parsing.

use std::fmt;

use serde::Serialize;

/// Fieldless tag naming each kind of node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Alternation,
    Sequence,
    QuantifiedAtom,
    Literal,
    Escape,
    CharsetEscape,
    Charset,
    CharsetRange,
    Anchor,
    Wildcard,
    Group,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Root => "root",
            NodeKind::Alternation => "alternation",
            NodeKind::Sequence => "sequence",
            NodeKind::QuantifiedAtom => "quantified atom",
            NodeKind::Literal => "literal",
            NodeKind::Escape => "escape",
            NodeKind::CharsetEscape => "charset escape",
            NodeKind::Charset => "charset",
            NodeKind::CharsetRange => "charset range",
            NodeKind::Anchor => "anchor",
            NodeKind::Wildcard => "wildcard",
            NodeKind::Group => "group",
        };
        f.write_str(name)
    }
}

/// Source location shared by every node
pub trait Spanned {
    /// Exact source text of the node
    fn text(&self) -> &str;

    /// Byte offset of [`Spanned::text`] in the original input
    fn offset(&self) -> usize;

    fn end(&self) -> usize {
        self.offset() + self.text().len()
    }
}

macro_rules! spanned {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Spanned for $ty {
                fn text(&self) -> &str {
                    &self.text
                }

                fn offset(&self) -> usize {
                    self.offset
                }
            }
        )*
    };
}

spanned!(
    Root,
    Alternation,
    Sequence,
    Quantified,
    Literal,
    Escape,
    Charset,
    CharsetRange,
    Anchor,
    Wildcard,
    Group,
);

/// Top of the tree: the whole input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Root {
    pub text: String,
    pub offset: usize,
    /// Flag letters of a `/pattern/flags` literal, unparsed
    pub flags: String,
    pub alternation: Alternation,
}

impl Root {
    pub fn kind(&self) -> NodeKind {
        NodeKind::Root
    }

    /// Every node in the tree, parents before children, left to right
    pub fn descendants(&self) -> Vec<NodeRef<'_>> {
        let mut out = vec![NodeRef::Root(self)];
        self.alternation.collect(&mut out);
        out
    }
}

/// One or more branches separated by `|`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternation {
    pub text: String,
    pub offset: usize,
    pub branches: Vec<Sequence>,
}

impl Alternation {
    pub fn kind(&self) -> NodeKind {
        NodeKind::Alternation
    }

    fn collect<'a>(&'a self, out: &mut Vec<NodeRef<'a>>) {
        out.push(NodeRef::Alternation(self));
        for branch in &self.branches {
            branch.collect(out);
        }
    }
}

/// Atoms matched one after another; may be empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sequence {
    pub text: String,
    pub offset: usize,
    pub items: Vec<Node>,
}

impl Sequence {
    pub fn kind(&self) -> NodeKind {
        NodeKind::Sequence
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn collect<'a>(&'a self, out: &mut Vec<NodeRef<'a>>) {
        out.push(NodeRef::Sequence(self));
        for item in &self.items {
            item.collect(out);
        }
    }
}

/// An item of a sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Quantified(Quantified),
    Literal(Literal),
    Escape(Escape),
    Charset(Charset),
    Anchor(Anchor),
    Wildcard(Wildcard),
    Group(Group),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Quantified(_) => NodeKind::QuantifiedAtom,
            Node::Literal(_) => NodeKind::Literal,
            Node::Escape(_) => NodeKind::Escape,
            Node::Charset(_) => NodeKind::Charset,
            Node::Anchor(_) => NodeKind::Anchor,
            Node::Wildcard(_) => NodeKind::Wildcard,
            Node::Group(_) => NodeKind::Group,
        }
    }

    fn as_spanned(&self) -> &dyn Spanned {
        match self {
            Node::Quantified(n) => n,
            Node::Literal(n) => n,
            Node::Escape(n) => n,
            Node::Charset(n) => n,
            Node::Anchor(n) => n,
            Node::Wildcard(n) => n,
            Node::Group(n) => n,
        }
    }

    fn collect<'a>(&'a self, out: &mut Vec<NodeRef<'a>>) {
        out.push(NodeRef::Node(self));
        match self {
            Node::Quantified(q) => q.atom.collect(out),
            Node::Charset(c) => {
                for item in &c.items {
                    item.collect(out);
                }
            }
            Node::Group(g) => g.alternation.collect(out),
            Node::Literal(_) | Node::Escape(_) | Node::Anchor(_) | Node::Wildcard(_) => {}
        }
    }
}

impl Spanned for Node {
    fn text(&self) -> &str {
        self.as_spanned().text()
    }

    fn offset(&self) -> usize {
        self.as_spanned().offset()
    }
}

/// An atom followed by a quantifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quantified {
    pub text: String,
    pub offset: usize,
    pub atom: Box<Node>,
    pub repeat: RepeatSpec,
}

/// Repetition bounds of a quantifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RepeatSpec {
    pub min: u32,
    /// `None` when unbounded
    pub max: Option<u32>,
    pub greedy: bool,
}

impl RepeatSpec {
    pub fn new(min: u32, max: Option<u32>, greedy: bool) -> Self {
        Self { min, max, greedy }
    }

    /// `{1,1}`: no visible effect
    pub fn is_once(&self) -> bool {
        self.min == 1 && self.max == Some(1)
    }

    /// The atom may be skipped entirely
    pub fn can_skip(&self) -> bool {
        self.min == 0
    }

    /// The atom may occur more than once; `{0}` and `{1}` cannot
    pub fn can_repeat(&self) -> bool {
        self.max.map_or(true, |max| max > 1)
    }
}

impl fmt::Display for RepeatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{{{}}}", self.min)?,
            Some(max) => write!(f, "{{{},{}}}", self.min, max)?,
            None => write!(f, "{{{},}}", self.min)?,
        }
        if !self.greedy {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// A character standing for itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    pub text: String,
    pub offset: usize,
    pub value: String,
}

/// A backslash escape resolved to a readable label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Escape {
    pub text: String,
    pub offset: usize,
    pub label: String,
    /// Code point of hex, octal, unicode, control and null escapes
    pub ordinal: Option<u32>,
}

/// A bracketed character class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Charset {
    pub text: String,
    pub offset: usize,
    pub invert: bool,
    pub items: Vec<CharsetItem>,
}

/// A member of a character class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CharsetItem {
    Literal(Literal),
    Escape(Escape),
    Range(CharsetRange),
}

impl CharsetItem {
    pub fn kind(&self) -> NodeKind {
        match self {
            CharsetItem::Literal(_) => NodeKind::Literal,
            CharsetItem::Escape(_) => NodeKind::CharsetEscape,
            CharsetItem::Range(_) => NodeKind::CharsetRange,
        }
    }

    fn collect<'a>(&'a self, out: &mut Vec<NodeRef<'a>>) {
        out.push(NodeRef::CharsetItem(self));
        if let CharsetItem::Range(range) = self {
            range.first.collect(out);
            range.last.collect(out);
        }
    }
}

impl Spanned for CharsetItem {
    fn text(&self) -> &str {
        match self {
            CharsetItem::Literal(n) => n.text(),
            CharsetItem::Escape(n) => n.text(),
            CharsetItem::Range(n) => n.text(),
        }
    }

    fn offset(&self) -> usize {
        match self {
            CharsetItem::Literal(n) => n.offset(),
            CharsetItem::Escape(n) => n.offset(),
            CharsetItem::Range(n) => n.offset(),
        }
    }
}

/// `first-last` inside a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharsetRange {
    pub text: String,
    pub offset: usize,
    pub first: Box<CharsetItem>,
    pub last: Box<CharsetItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorKind {
    Start,
    End,
}

/// `^` or `$`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anchor {
    pub text: String,
    pub offset: usize,
    pub kind: AnchorKind,
}

/// `.`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wildcard {
    pub text: String,
    pub offset: usize,
}

/// How a parenthesised group captures
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    NonCapturing,
    Capturing,
    Named(String),
    Lookahead { negative: bool },
    Lookbehind { negative: bool },
}

impl GroupKind {
    /// Capturing groups take a number when rendered
    pub fn is_capturing(&self) -> bool {
        matches!(self, GroupKind::Capturing | GroupKind::Named(_))
    }
}

/// A parenthesised sub-expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub text: String,
    pub offset: usize,
    pub kind: GroupKind,
    pub alternation: Alternation,
}

/// Borrowed view of any node in the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Root(&'a Root),
    Alternation(&'a Alternation),
    Sequence(&'a Sequence),
    Node(&'a Node),
    CharsetItem(&'a CharsetItem),
}

impl NodeRef<'_> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Root(n) => n.kind(),
            NodeRef::Alternation(n) => n.kind(),
            NodeRef::Sequence(n) => n.kind(),
            NodeRef::Node(n) => n.kind(),
            NodeRef::CharsetItem(n) => n.kind(),
        }
    }
}

impl Spanned for NodeRef<'_> {
    fn text(&self) -> &str {
        match self {
            NodeRef::Root(n) => n.text(),
            NodeRef::Alternation(n) => n.text(),
            NodeRef::Sequence(n) => n.text(),
            NodeRef::Node(n) => n.text(),
            NodeRef::CharsetItem(n) => n.text(),
        }
    }

    fn offset(&self) -> usize {
        match self {
            NodeRef::Root(n) => n.offset(),
            NodeRef::Alternation(n) => n.offset(),
            NodeRef::Sequence(n) => n.offset(),
            NodeRef::Node(n) => n.offset(),
            NodeRef::CharsetItem(n) => n.offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(value: &str, offset: usize) -> Literal {
        Literal {
            text: value.to_string(),
            offset,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_repeat_spec_predicates() {
        assert!(RepeatSpec::new(1, Some(1), true).is_once());
        assert!(RepeatSpec::new(0, None, true).can_skip());
        assert!(RepeatSpec::new(0, None, true).can_repeat());
        assert!(!RepeatSpec::new(0, Some(1), true).can_repeat());
        assert!(!RepeatSpec::new(0, Some(0), true).can_repeat());
        assert!(RepeatSpec::new(0, Some(2), true).can_repeat());
        assert!(!RepeatSpec::new(2, Some(3), false).can_skip());
    }

    #[test]
    fn test_repeat_spec_display() {
        assert_eq!(RepeatSpec::new(2, Some(2), true).to_string(), "{2}");
        assert_eq!(RepeatSpec::new(2, Some(5), true).to_string(), "{2,5}");
        assert_eq!(RepeatSpec::new(3, None, false).to_string(), "{3,}?");
    }

    #[test]
    fn test_charset_item_kinds() {
        let range = CharsetItem::Range(CharsetRange {
            text: "a-z".to_string(),
            offset: 1,
            first: Box::new(CharsetItem::Literal(literal("a", 1))),
            last: Box::new(CharsetItem::Literal(literal("z", 3))),
        });
        assert_eq!(range.kind(), NodeKind::CharsetRange);
        assert_eq!(range.end(), 4);
        let escape = CharsetItem::Escape(Escape {
            text: "\\b".to_string(),
            offset: 0,
            label: "backspace".to_string(),
            ordinal: None,
        });
        assert_eq!(escape.kind(), NodeKind::CharsetEscape);
    }

    #[test]
    fn test_descendants_are_preorder() {
        let root = Root {
            text: "a".to_string(),
            offset: 0,
            flags: String::new(),
            alternation: Alternation {
                text: "a".to_string(),
                offset: 0,
                branches: vec![Sequence {
                    text: "a".to_string(),
                    offset: 0,
                    items: vec![Node::Literal(literal("a", 0))],
                }],
            },
        };
        let kinds: Vec<NodeKind> = root.descendants().iter().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Root,
                NodeKind::Alternation,
                NodeKind::Sequence,
                NodeKind::Literal
            ]
        );
    }

    #[test]
    fn test_group_kind_capturing() {
        assert!(GroupKind::Capturing.is_capturing());
        assert!(GroupKind::Named("year".to_string()).is_capturing());
        assert!(!GroupKind::Lookahead { negative: true }.is_capturing());
        assert!(!GroupKind::NonCapturing.is_capturing());
    }
}
