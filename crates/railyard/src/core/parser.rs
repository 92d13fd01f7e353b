//! Core parser trait for diagram markup
//!
//! This trait defines the interface for turning source text into the
//! structured value the layout pass consumes.

use anyhow::Result;

/// Core trait for diagram parsers
///
/// # Example
/// ```
/// use railyard::core::Parser;
/// use railyard::plugins::regex::RegexParser;
///
/// let parser = RegexParser::new();
/// let outcome = parser.parse("a|b").unwrap();
/// assert_eq!(outcome.root.alternation.branches.len(), 2);
/// ```
pub trait Parser: Send + Sync {
    /// The parsed representation
    type Output;

    /// Parse source text
    fn parse(&self, input: &str) -> Result<Self::Output>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::regex::{ParseOutcome, RegexParser};

    #[test]
    fn test_parser_trait_metadata() {
        let parser = RegexParser::new();
        assert_eq!(parser.name(), "regex");
        assert_eq!(parser.version(), "0.1.0");
    }

    #[test]
    fn test_parser_through_trait_object() {
        let parser: Box<dyn Parser<Output = ParseOutcome>> = Box::new(RegexParser::new());
        let outcome = parser.parse("abc").unwrap();
        assert!(outcome.is_clean());
    }
}
