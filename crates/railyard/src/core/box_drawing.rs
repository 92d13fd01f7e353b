//! Box drawing glyphs for the plain-text backend
//!
//! Tracks are drawn cell by cell. Each cell records which of its four sides a
//! line leaves through; overlapping lines OR their sides together and the
//! combined mask picks the glyph, so a track meeting a box edge becomes a
//! junction instead of overwriting it.

use super::{CharacterSet, Direction};

/// Line leaves the cell through its top side
pub const UP: u8 = 0b0001;
/// Line leaves the cell through its bottom side
pub const DOWN: u8 = 0b0010;
/// Line leaves the cell through its left side
pub const LEFT: u8 = 0b0100;
/// Line leaves the cell through its right side
pub const RIGHT: u8 = 0b1000;

const VERTICAL: u8 = UP | DOWN;
const HORIZONTAL: u8 = LEFT | RIGHT;

/// How a line is stroked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Stroke {
    /// Dashed lines only apply to straight runs
    pub dashed: bool,
    /// Rounded corners only apply to plain corners
    pub rounded: bool,
}

impl Stroke {
    pub fn solid() -> Self {
        Self::default()
    }

    pub fn dashed() -> Self {
        Self {
            dashed: true,
            rounded: false,
        }
    }

    pub fn rounded() -> Self {
        Self {
            dashed: false,
            rounded: true,
        }
    }

    /// Stroke of a cell where two lines overlap
    pub fn merge(self, other: Stroke) -> Self {
        Self {
            dashed: self.dashed && other.dashed,
            rounded: self.rounded || other.rounded,
        }
    }
}

/// Glyph set for a character set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineChars {
    style: CharacterSet,
}

impl LineChars {
    /// Get line characters for the given style
    pub fn new(style: CharacterSet) -> Self {
        Self { style }
    }

    pub fn style(&self) -> CharacterSet {
        self.style
    }

    /// Glyph for a combination of sides
    pub fn glyph(&self, mask: u8, stroke: Stroke) -> char {
        match self.style {
            CharacterSet::Ascii => ascii_glyph(mask, stroke),
            CharacterSet::Unicode => unicode_glyph(mask, stroke),
        }
    }

    /// Sides and stroke of a glyph previously drawn by [`LineChars::glyph`]
    ///
    /// Returns `None` for anything that is not a line glyph (text, arrows,
    /// blank cells).
    pub fn decode(&self, c: char) -> Option<(u8, Stroke)> {
        match self.style {
            CharacterSet::Ascii => decode_ascii(c),
            CharacterSet::Unicode => decode_unicode(c),
        }
    }

    pub fn arrow(&self, direction: Direction) -> char {
        match (self.style, direction) {
            (CharacterSet::Ascii, Direction::Up) => '^',
            (CharacterSet::Ascii, Direction::Down) => 'v',
            (CharacterSet::Ascii, Direction::Left) => '<',
            (CharacterSet::Ascii, Direction::Right) => '>',
            (CharacterSet::Unicode, Direction::Up) => '▲',
            (CharacterSet::Unicode, Direction::Down) => '▼',
            (CharacterSet::Unicode, Direction::Left) => '◀',
            (CharacterSet::Unicode, Direction::Right) => '▶',
        }
    }

    /// Start and end marker
    pub fn terminal(&self) -> char {
        match self.style {
            CharacterSet::Ascii => 'o',
            CharacterSet::Unicode => '●',
        }
    }
}

impl Default for LineChars {
    fn default() -> Self {
        Self::new(CharacterSet::Unicode)
    }
}

fn ascii_glyph(mask: u8, stroke: Stroke) -> char {
    if mask == 0 {
        ' '
    } else if mask & VERTICAL == 0 {
        '-'
    } else if mask & HORIZONTAL == 0 {
        if stroke.dashed {
            ':'
        } else {
            '|'
        }
    } else {
        '+'
    }
}

fn decode_ascii(c: char) -> Option<(u8, Stroke)> {
    match c {
        '-' => Some((HORIZONTAL, Stroke::solid())),
        '|' => Some((VERTICAL, Stroke::solid())),
        ':' => Some((VERTICAL, Stroke::dashed())),
        '+' => Some((VERTICAL | HORIZONTAL, Stroke::solid())),
        _ => None,
    }
}

fn unicode_glyph(mask: u8, stroke: Stroke) -> char {
    let straight = if mask & VERTICAL == 0 {
        Some(if stroke.dashed { '┄' } else { '─' })
    } else if mask & HORIZONTAL == 0 {
        Some(if stroke.dashed { '┆' } else { '│' })
    } else {
        None
    };
    if mask == 0 {
        return ' ';
    }
    if let Some(c) = straight {
        return c;
    }
    match (mask, stroke.rounded) {
        (m, false) if m == DOWN | RIGHT => '┌',
        (m, false) if m == DOWN | LEFT => '┐',
        (m, false) if m == UP | RIGHT => '└',
        (m, false) if m == UP | LEFT => '┘',
        (m, true) if m == DOWN | RIGHT => '╭',
        (m, true) if m == DOWN | LEFT => '╮',
        (m, true) if m == UP | RIGHT => '╰',
        (m, true) if m == UP | LEFT => '╯',
        (m, _) if m == VERTICAL | RIGHT => '├',
        (m, _) if m == VERTICAL | LEFT => '┤',
        (m, _) if m == HORIZONTAL | DOWN => '┬',
        (m, _) if m == HORIZONTAL | UP => '┴',
        _ => '┼',
    }
}

fn decode_unicode(c: char) -> Option<(u8, Stroke)> {
    let solid = Stroke::solid();
    let rounded = Stroke::rounded();
    let decoded = match c {
        '─' => (HORIZONTAL, solid),
        '│' => (VERTICAL, solid),
        '┄' => (HORIZONTAL, Stroke::dashed()),
        '┆' => (VERTICAL, Stroke::dashed()),
        '┌' => (DOWN | RIGHT, solid),
        '┐' => (DOWN | LEFT, solid),
        '└' => (UP | RIGHT, solid),
        '┘' => (UP | LEFT, solid),
        '╭' => (DOWN | RIGHT, rounded),
        '╮' => (DOWN | LEFT, rounded),
        '╰' => (UP | RIGHT, rounded),
        '╯' => (UP | LEFT, rounded),
        '├' => (VERTICAL | RIGHT, solid),
        '┤' => (VERTICAL | LEFT, solid),
        '┬' => (HORIZONTAL | DOWN, solid),
        '┴' => (HORIZONTAL | UP, solid),
        '┼' => (VERTICAL | HORIZONTAL, solid),
        _ => return None,
    };
    Some(decoded)
}
