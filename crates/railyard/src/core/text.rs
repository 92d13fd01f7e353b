//! Text measurement contexts
//!
//! Layout needs to know how large a label will be before it is placed.
//! Instead of probing a hidden drawing surface, every layout call receives a
//! [`Measure`] implementation explicitly, so renders share no state and can
//! run side by side.

use unicode_width::UnicodeWidthStr;

use super::DiagramError;

/// Extent of a single line of text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
    /// Distance from the top of the line box to the text baseline
    pub baseline: f64,
}

impl TextExtent {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Measurement context used by the layout pass
pub trait Measure {
    /// Measure a single line of text
    fn measure(&self, text: &str) -> Result<TextExtent, DiagramError>;
}

fn reject_control(text: &str) -> Result<(), DiagramError> {
    match text.chars().find(|c| c.is_control()) {
        Some(c) => Err(DiagramError::measure_error(
            text,
            format!("control character U+{:04X} has no width", c as u32),
        )),
        None => Ok(()),
    }
}

/// Approximate proportional-font metrics for SVG output
///
/// Widths are display columns times an average advance; this is the
/// browser-free stand-in for measuring a rendered `<text>` element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub advance: f64,
    pub line_height: f64,
    pub ascent: f64,
}

impl FontMetrics {
    pub fn new(advance: f64, line_height: f64, ascent: f64) -> Self {
        Self {
            advance,
            line_height,
            ascent,
        }
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::new(7.0, 14.0, 11.0)
    }
}

impl Measure for FontMetrics {
    fn measure(&self, text: &str) -> Result<TextExtent, DiagramError> {
        reject_control(text)?;
        let columns = UnicodeWidthStr::width(text) as f64;
        Ok(TextExtent {
            width: columns * self.advance,
            height: self.line_height,
            baseline: self.ascent,
        })
    }
}

/// Character-cell metrics for the plain-text backend
///
/// One unit is one terminal column or row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellMetrics;

impl Measure for CellMetrics {
    fn measure(&self, text: &str) -> Result<TextExtent, DiagramError> {
        reject_control(text)?;
        Ok(TextExtent {
            width: UnicodeWidthStr::width(text) as f64,
            height: 1.0,
            baseline: 0.0,
        })
    }
}
