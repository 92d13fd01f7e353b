//! Regex parser implementation
//!
//! A lenient recursive-descent parser over a byte cursor:
//! alternation → sequence → quantified atom → atom. It never fails. Anything
//! it cannot make sense of is read as literal text and recorded as an
//! [`Anomaly`], so callers that want strict validation can still reject the
//! pattern.

use std::fmt;

use anyhow::Result;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, span, trace, Level};

use super::ast::{
    Alternation, Anchor, AnchorKind, Charset, CharsetItem, CharsetRange, Escape, Group,
    GroupKind, Literal, Node, Quantified, RepeatSpec, Root, Sequence, Wildcard,
};
use super::bounds::parse_bounds;
use super::escapes::{
    is_class_shorthand, resolve_class_escape, resolve_escape, Resolved, ResolvedEscape,
};
use crate::core::{DiagramError, Parser};

/// A construct the parser recovered from
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    #[error("unterminated group")]
    UnterminatedGroup,

    #[error("unterminated character class")]
    UnterminatedCharset,

    #[error("unmatched closing parenthesis")]
    UnmatchedParen,

    #[error("malformed quantifier")]
    MalformedQuantifier,

    #[error("nothing to repeat")]
    NothingToRepeat,

    #[error("unknown escape \\{0}")]
    UnknownEscape(char),

    #[error("incomplete escape \\{0}")]
    IncompleteEscape(char),

    #[error("trailing backslash")]
    TrailingBackslash,

    #[error("unterminated group name")]
    UnterminatedGroupName,
}

/// An anomaly and the byte offset where it starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub offset: usize,
    pub kind: AnomalyKind,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl Anomaly {
    /// Strict-mode error with a 1-based line and column in `input`
    pub fn to_error(&self, input: &str) -> DiagramError {
        let before = input.get(..self.offset).unwrap_or(input);
        let line = before.matches('\n').count() + 1;
        let column = before
            .rsplit('\n')
            .next()
            .map(|tail| tail.chars().count())
            .unwrap_or(0)
            + 1;
        DiagramError::parse_error(self.kind.to_string(), line, column)
    }
}

/// Result of a lenient parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub root: Root,
    pub anomalies: Vec<Anomaly>,
}

impl ParseOutcome {
    /// True when nothing had to be recovered
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// The tree, or an error for the first anomaly
    pub fn into_strict(self) -> Result<Root, DiagramError> {
        match self.anomalies.first() {
            Some(anomaly) => Err(anomaly.to_error(&self.root.text)),
            None => Ok(self.root),
        }
    }
}

/// Regex parser implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexParser {
    strict: bool,
}

impl RegexParser {
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// A parser that fails on the first anomaly
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

impl Parser for RegexParser {
    type Output = ParseOutcome;

    fn parse(&self, input: &str) -> Result<ParseOutcome> {
        let outcome = parse_pattern(input);
        if self.strict {
            if let Some(anomaly) = outcome.anomalies.first() {
                return Err(anomaly.to_error(input).into());
            }
        }
        Ok(outcome)
    }

    fn name(&self) -> &'static str {
        "regex"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}

/// Parse a pattern, optionally written as `/pattern/flags`
pub fn parse_pattern(input: &str) -> ParseOutcome {
    let parse_span = span!(Level::INFO, "parse_regex", input_len = input.len());
    let _enter = parse_span.enter();

    let (start, end, flags) = split_literal(input);
    trace!(body_start = start, body_end = end, flags = %flags, "Split pattern literal");

    let mut cursor = Cursor::new(input, start, end);
    let alternation = cursor.parse_alternation(false);
    let anomalies = cursor.anomalies;

    info!(
        branch_count = alternation.branches.len(),
        anomaly_count = anomalies.len(),
        "Parsing completed"
    );

    ParseOutcome {
        root: Root {
            text: input.to_string(),
            offset: 0,
            flags,
            alternation,
        },
        anomalies,
    }
}

/// Body bounds and flags of a `/pattern/flags` literal
///
/// Input that is not in literal form is all body.
fn split_literal(input: &str) -> (usize, usize, String) {
    if let Some(body) = input.strip_prefix('/') {
        if let Some(slash) = body.rfind('/') {
            let flags = &body[slash + 1..];
            if flags.chars().all(|c| c.is_ascii_alphabetic()) {
                return (1, 1 + slash, flags.to_string());
            }
        }
    }
    (0, input.len(), String::new())
}

enum Escaped {
    Label(Escape),
    Char(Literal),
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    end: usize,
    anomalies: Vec<Anomaly>,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str, start: usize, end: usize) -> Self {
        Self {
            input,
            pos: start,
            end,
            anomalies: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..self.end]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn since(&self, start: usize) -> String {
        self.input[start..self.pos].to_string()
    }

    fn note(&mut self, offset: usize, kind: AnomalyKind) {
        debug!(offset, anomaly = %kind, "Recovered from malformed construct");
        self.anomalies.push(Anomaly { offset, kind });
    }

    fn literal(&self, start: usize, value: impl Into<String>) -> Literal {
        Literal {
            text: self.since(start),
            offset: start,
            value: value.into(),
        }
    }

    fn parse_alternation(&mut self, in_group: bool) -> Alternation {
        let start = self.pos;
        let mut branches = vec![self.parse_sequence(in_group)];
        while self.eat('|') {
            branches.push(self.parse_sequence(in_group));
        }
        trace!(offset = start, branches = branches.len(), "Parsed alternation");
        Alternation {
            text: self.since(start),
            offset: start,
            branches,
        }
    }

    fn parse_sequence(&mut self, in_group: bool) -> Sequence {
        let start = self.pos;
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None | Some('|') => break,
                Some(')') if in_group => break,
                Some(_) => items.push(self.parse_quantified_atom()),
            }
        }
        Sequence {
            text: self.since(start),
            offset: start,
            items,
        }
    }

    fn parse_quantified_atom(&mut self) -> Node {
        let start = self.pos;
        let atom = self.parse_atom();

        let bounds = match self.peek() {
            Some('*') => {
                self.bump();
                Some((0, None))
            }
            Some('+') => {
                self.bump();
                Some((1, None))
            }
            Some('?') => {
                self.bump();
                Some((0, Some(1)))
            }
            Some('{') => match self.brace_quantifier() {
                Some((min, max, len)) => {
                    self.pos += len;
                    Some((min, max))
                }
                None => {
                    // Left in place; the next atom reads `{` literally
                    self.note(self.pos, AnomalyKind::MalformedQuantifier);
                    None
                }
            },
            _ => None,
        };

        let Some((min, max)) = bounds else {
            return atom;
        };
        let greedy = !self.eat('?');
        let repeat = RepeatSpec::new(min, max, greedy);
        trace!(offset = start, repeat = %repeat, "Parsed quantifier");
        Node::Quantified(Quantified {
            text: self.since(start),
            offset: start,
            atom: Box::new(atom),
            repeat,
        })
    }

    /// Bounds and byte length of a well-formed `{...}` at the cursor
    fn brace_quantifier(&self) -> Option<(u32, Option<u32>, usize)> {
        let rest = self.rest();
        let close = rest.find('}')?;
        let bounds = parse_bounds(&rest[..=close])?;
        Some((bounds.min, bounds.max, close + 1))
    }

    fn parse_atom(&mut self) -> Node {
        let start = self.pos;
        if self.peek() == Some('{') && self.brace_quantifier().is_some() {
            self.note(start, AnomalyKind::NothingToRepeat);
        }
        let Some(c) = self.bump() else {
            return Node::Literal(self.literal(start, ""));
        };
        match c {
            '^' | '$' => Node::Anchor(Anchor {
                text: self.since(start),
                offset: start,
                kind: if c == '^' {
                    AnchorKind::Start
                } else {
                    AnchorKind::End
                },
            }),
            '.' => Node::Wildcard(Wildcard {
                text: self.since(start),
                offset: start,
            }),
            '[' => self.parse_charset(start),
            '(' => self.parse_group(start),
            '\\' => match self.parse_escape(start, false) {
                Escaped::Label(escape) => Node::Escape(escape),
                Escaped::Char(literal) => Node::Literal(literal),
            },
            ')' => {
                self.note(start, AnomalyKind::UnmatchedParen);
                Node::Literal(self.literal(start, ")"))
            }
            '*' | '+' | '?' => {
                self.note(start, AnomalyKind::NothingToRepeat);
                Node::Literal(self.literal(start, c))
            }
            c => Node::Literal(self.literal(start, c)),
        }
    }

    /// Read an escape whose backslash starts at `start` and is consumed
    fn parse_escape(&mut self, start: usize, in_class: bool) -> Escaped {
        let rest = self.rest();
        let ResolvedEscape {
            resolved,
            len,
            anomaly,
        } = if in_class {
            resolve_class_escape(rest)
        } else {
            resolve_escape(rest)
        };
        self.pos += len;
        if let Some(kind) = anomaly {
            self.note(start, kind);
        }
        match resolved {
            Resolved::Label { label, ordinal } => {
                trace!(offset = start, label = %label, in_class, "Parsed escape");
                Escaped::Label(Escape {
                    text: self.since(start),
                    offset: start,
                    label,
                    ordinal,
                })
            }
            Resolved::Literal(value) => Escaped::Char(self.literal(start, value)),
        }
    }

    /// Parse a group whose `(` at `start` is consumed
    fn parse_group(&mut self, start: usize) -> Node {
        let kind = if self.eat_str("?:") {
            GroupKind::NonCapturing
        } else if self.eat_str("?=") {
            GroupKind::Lookahead { negative: false }
        } else if self.eat_str("?!") {
            GroupKind::Lookahead { negative: true }
        } else if self.eat_str("?<=") {
            GroupKind::Lookbehind { negative: false }
        } else if self.eat_str("?<!") {
            GroupKind::Lookbehind { negative: true }
        } else if self.rest().starts_with("?<") {
            self.parse_group_name()
        } else {
            GroupKind::Capturing
        };

        let alternation = self.parse_alternation(true);
        if !self.eat(')') {
            self.note(start, AnomalyKind::UnterminatedGroup);
        }
        trace!(offset = start, kind = ?kind, "Parsed group");
        Node::Group(Group {
            text: self.since(start),
            offset: start,
            kind,
            alternation,
        })
    }

    /// `?<name>`; a missing or invalid name leaves a plain capturing group
    fn parse_group_name(&mut self) -> GroupKind {
        let name_start = self.pos;
        self.pos += "?<".len();
        let rest = self.rest();
        let name = rest.find('>').map(|close| &rest[..close]).filter(|name| {
            !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        });
        match name {
            Some(name) => {
                self.pos += name.len() + 1;
                GroupKind::Named(name.to_string())
            }
            None => {
                self.note(name_start, AnomalyKind::UnterminatedGroupName);
                GroupKind::Capturing
            }
        }
    }

    /// Parse a class whose `[` at `start` is consumed
    fn parse_charset(&mut self, start: usize) -> Node {
        let invert = self.eat('^');
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => {
                    self.note(start, AnomalyKind::UnterminatedCharset);
                    break;
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                Some(_) => {}
            }

            let member_start = self.pos;
            let (first, first_is_shorthand) = self.parse_charset_member();
            let range_follows = self.peek() == Some('-')
                && !matches!(self.peek_nth(1), None | Some(']'))
                && !first_is_shorthand;
            if !range_follows {
                items.push(first);
                continue;
            }

            let dash = self.pos;
            let anomaly_mark = self.anomalies.len();
            self.bump();
            let (last, last_is_shorthand) = self.parse_charset_member();
            if last_is_shorthand {
                // `a-\d` is three members
                self.pos = dash;
                self.anomalies.truncate(anomaly_mark);
                items.push(first);
                continue;
            }
            items.push(CharsetItem::Range(CharsetRange {
                text: self.since(member_start),
                offset: member_start,
                first: Box::new(first),
                last: Box::new(last),
            }));
        }

        trace!(offset = start, invert, members = items.len(), "Parsed charset");
        Node::Charset(Charset {
            text: self.since(start),
            offset: start,
            invert,
            items,
        })
    }

    /// One class member and whether it is a class shorthand such as `\d`
    fn parse_charset_member(&mut self) -> (CharsetItem, bool) {
        let start = self.pos;
        match self.bump() {
            Some('\\') => {
                let shorthand = is_class_shorthand(self.rest());
                let item = match self.parse_escape(start, true) {
                    Escaped::Label(escape) => CharsetItem::Escape(escape),
                    Escaped::Char(literal) => CharsetItem::Literal(literal),
                };
                (item, shorthand)
            }
            Some(c) => (CharsetItem::Literal(self.literal(start, c)), false),
            None => (CharsetItem::Literal(self.literal(start, "")), false),
        }
    }
}
