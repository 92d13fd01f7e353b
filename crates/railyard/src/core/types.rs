//! Core type definitions for diagram processing
//!
//! This module contains the fundamental types used throughout Railyard:
//! the output character set for text diagrams, arrow headings, and the
//! geometry values (points, rectangles, anchored bounding boxes) shared by layout
//! and painting.

use std::fmt;
use std::str::FromStr;

/// Character set for plain-text rendering output
///
/// Controls which characters are used for drawing boxes and tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CharacterSet {
    /// Pure ASCII characters only: + - | < > ^ v
    /// Maximum compatibility but limited visual quality
    Ascii,
    /// Unicode box-drawing characters: ┌ ┐ └ ┘ ─ │ ┄ ┆
    #[default]
    Unicode,
}

impl CharacterSet {
    /// Returns true if this character set uses only ASCII
    pub fn is_ascii(&self) -> bool {
        matches!(self, CharacterSet::Ascii)
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterSet::Ascii => write!(f, "ascii"),
            CharacterSet::Unicode => write!(f, "unicode"),
        }
    }
}

impl FromStr for CharacterSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ascii" => Ok(CharacterSet::Ascii),
            "unicode" => Ok(CharacterSet::Unicode),
            _ => Err(format!("Unknown character set: {}", s)),
        }
    }
}

/// Heading of an arrowhead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// A point in diagram units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this point moved by `(dx, dy)`
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn x2(&self) -> f64 {
        self.x + self.width
    }

    pub fn y2(&self) -> f64 {
        self.y + self.height
    }
}

/// Bounding box of a laid out fragment plus its attachment anchors
///
/// `ax`/`ax2` are the x-coordinates where incoming and outgoing tracks
/// attach; they need not be the box edges (a group exposes its content's
/// anchors, inset from its frame). `ay` is the y-coordinate of the
/// fragment's main line.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub ax: f64,
    pub ax2: f64,
    pub ay: f64,
}

impl BBox {
    /// Create a box whose anchors sit on its left/right edges at mid-height
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ax: x,
            ax2: x + width,
            ay: y + height / 2.0,
        }
    }

    /// Zero-sized box at the origin
    pub fn empty() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn with_anchors(mut self, ax: f64, ax2: f64, ay: f64) -> Self {
        self.ax = ax;
        self.ax2 = ax2;
        self.ay = ay;
        self
    }

    pub fn x2(&self) -> f64 {
        self.x + self.width
    }

    pub fn y2(&self) -> f64 {
        self.y + self.height
    }

    /// Main-line offset measured from the top edge
    pub fn ay_offset(&self) -> f64 {
        self.ay - self.y
    }

    /// Return this box moved by `(dx, dy)`, anchors included
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            width: self.width,
            height: self.height,
            ax: self.ax + dx,
            ax2: self.ax2 + dx,
            ay: self.ay + dy,
        }
    }
}
