//! ASCII canvas for the plain-text backend
//!
//! A growable character grid. Text is written by display width, so a wide
//! character takes two cells; line drawing merges with what is already on
//! the grid through [`LineChars`].

use unicode_width::UnicodeWidthChar;

use super::box_drawing::{Stroke, DOWN, LEFT, RIGHT, UP};
use super::LineChars;

/// Marks the second cell covered by a wide character
const WIDE_CONTINUATION: char = '\0';

/// ASCII canvas representing a character grid for diagram rendering
#[derive(Debug, Clone)]
pub struct AsciiCanvas {
    pub width: usize,
    pub height: usize,
    pub grid: Vec<Vec<char>>,
    /// Sides and stroke of the line drawn through each cell
    lines: Vec<Vec<(u8, Stroke)>>,
}

impl AsciiCanvas {
    /// Create a new canvas with the specified dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let grid = vec![vec![' '; width.max(1)]; height.max(1)];
        let lines = vec![vec![(0, Stroke::solid()); width.max(1)]; height.max(1)];
        Self {
            width,
            height,
            grid,
            lines,
        }
    }

    /// Ensure the canvas is at least the specified size, expanding if needed
    pub fn ensure_size(&mut self, min_width: usize, min_height: usize) {
        if min_width > self.width {
            for row in &mut self.grid {
                row.resize(min_width, ' ');
            }
            for row in &mut self.lines {
                row.resize(min_width, (0, Stroke::solid()));
            }
            self.width = min_width;
        }
        if min_height > self.height {
            let extra_rows = min_height - self.height;
            self.grid
                .extend((0..extra_rows).map(|_| vec![' '; self.width]));
            self.lines
                .extend((0..extra_rows).map(|_| vec![(0, Stroke::solid()); self.width]));
            self.height = min_height;
        }
    }

    /// Set a character at the specified position
    pub fn set_char(&mut self, x: usize, y: usize, c: char) {
        self.ensure_size(x + 1, y + 1);
        self.grid[y][x] = c;
        self.lines[y][x] = (0, Stroke::solid());
    }

    /// Get the character at the specified position
    pub fn get_char(&self, x: usize, y: usize) -> char {
        if y < self.height && x < self.width {
            self.grid[y][x]
        } else {
            ' '
        }
    }

    /// Draw text at the specified position (left-aligned)
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str) {
        let mut col = x;
        for c in text.chars() {
            let width = UnicodeWidthChar::width(c).unwrap_or(0);
            if width == 0 {
                continue;
            }
            self.set_char(col, y, c);
            for extra in 1..width {
                self.set_char(col + extra, y, WIDE_CONTINUATION);
            }
            col += width;
        }
    }

    /// Add the given sides to the line glyph at a cell
    ///
    /// Cells holding text or markers are left alone.
    pub fn merge_line(&mut self, x: usize, y: usize, mask: u8, stroke: Stroke, chars: &LineChars) {
        if mask == 0 {
            return;
        }
        self.ensure_size(x + 1, y + 1);
        let (old_mask, old_stroke) = self.lines[y][x];
        let (mask, stroke) = if old_mask != 0 {
            (old_mask | mask, old_stroke.merge(stroke))
        } else if self.grid[y][x] == ' ' {
            (mask, stroke)
        } else {
            return;
        };
        self.grid[y][x] = chars.glyph(mask, stroke);
        self.lines[y][x] = (mask, stroke);
    }

    /// Sides of the line drawn through a cell, 0 when there is none
    pub fn line_mask(&self, x: usize, y: usize) -> u8 {
        self.lines
            .get(y)
            .and_then(|row| row.get(x))
            .map_or(0, |(mask, _)| *mask)
    }

    /// Draw a horizontal line covering columns `x0..=x1`
    pub fn draw_horizontal_line(
        &mut self,
        x0: usize,
        x1: usize,
        y: usize,
        stroke: Stroke,
        chars: &LineChars,
    ) {
        let (start, end) = (x0.min(x1), x0.max(x1));
        if start == end {
            return;
        }
        for x in start..=end {
            let mut mask = 0;
            if x > start {
                mask |= LEFT;
            }
            if x < end {
                mask |= RIGHT;
            }
            self.merge_line(x, y, mask, stroke, chars);
        }
    }

    /// Draw a vertical line covering rows `y0..=y1`
    pub fn draw_vertical_line(
        &mut self,
        x: usize,
        y0: usize,
        y1: usize,
        stroke: Stroke,
        chars: &LineChars,
    ) {
        let (start, end) = (y0.min(y1), y0.max(y1));
        if start == end {
            return;
        }
        for y in start..=end {
            let mut mask = 0;
            if y > start {
                mask |= UP;
            }
            if y < end {
                mask |= DOWN;
            }
            self.merge_line(x, y, mask, stroke, chars);
        }
    }

    /// Draw a rectangle outline whose corners are `(x, y)` and `(x2, y2)`
    pub fn draw_rect(
        &mut self,
        x: usize,
        y: usize,
        x2: usize,
        y2: usize,
        stroke: Stroke,
        chars: &LineChars,
    ) {
        self.draw_horizontal_line(x, x2, y, stroke, chars);
        self.draw_horizontal_line(x, x2, y2, stroke, chars);
        self.draw_vertical_line(x, y, y2, stroke, chars);
        self.draw_vertical_line(x2, y, y2, stroke, chars);
    }
}

impl std::fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rows: Vec<String> = self
            .grid
            .iter()
            .map(|row| {
                let s: String = row.iter().filter(|c| **c != WIDE_CONTINUATION).collect();
                s.trim_end().to_string()
            })
            .collect();

        // Trim empty rows from top and bottom
        while rows.first().is_some_and(|row| row.is_empty()) {
            rows.remove(0);
        }
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }

        if rows.is_empty() {
            return Ok(());
        }

        // Remove common leading whitespace
        let min_indent = rows
            .iter()
            .filter(|row| !row.is_empty())
            .map(|row| row.chars().take_while(|c| *c == ' ').count())
            .min()
            .unwrap_or(0);

        if min_indent > 0 {
            for row in &mut rows {
                *row = row.chars().skip(min_indent).collect();
            }
        }

        write!(f, "{}", rows.join("\n"))
    }
}
