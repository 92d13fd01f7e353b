//! Core error types for diagram processing
//!
//! This module defines the error types used throughout the regex diagram
//! pipeline. Parsing itself is lenient and never produces these; they show up
//! when a caller asks for strict validation, when a measurement context
//! cannot size a piece of text, or when output cannot be written.

use thiserror::Error;

/// Core error types for diagram processing
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Parse error: {message} at line {line}, column {column}")]
    ParseError {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Measure error: cannot measure {text:?}: {reason}")]
    MeasureError { text: String, reason: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new parse error
    pub fn parse_error(message: String, line: usize, column: usize) -> Self {
        Self::ParseError {
            message,
            line,
            column,
        }
    }

    /// Create a new measurement error
    pub fn measure_error(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MeasureError {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Create a new render error
    pub fn render_error(message: String) -> Self {
        Self::RenderError { message }
    }
}
