//! Core layout trait for diagram positioning
//!
//! A layout algorithm turns parsed input into positioned geometry without
//! drawing anything. Text sizes come from the measurement context passed in
//! with each call.

use anyhow::Result;

use super::Measure;

/// Core trait for layout algorithms
///
/// # Example
/// ```
/// use railyard::core::{FontMetrics, LayoutAlgorithm};
/// use railyard::plugins::regex::RegexLayoutAlgorithm;
///
/// let root = railyard::parse("a+");
/// let layout = RegexLayoutAlgorithm::new();
/// let diagram = layout.layout(&root, &FontMetrics::default()).unwrap();
/// assert!(diagram.width > 0.0);
/// ```
pub trait LayoutAlgorithm<I: ?Sized>: Send + Sync {
    /// The output type of this layout algorithm
    type Output;

    /// Arrange the input, measuring text with `measure`
    fn layout(&self, input: &I, measure: &dyn Measure) -> Result<Self::Output>;

    /// Get the name of this layout algorithm
    fn name(&self) -> &'static str;

    /// Get the version of this layout algorithm
    fn version(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellMetrics;
    use crate::plugins::regex::{LayoutConfig, RegexLayoutAlgorithm};

    #[test]
    fn test_layout_algorithm_metadata() {
        let layout = RegexLayoutAlgorithm::new();
        assert_eq!(layout.name(), "railroad");
        assert_eq!(layout.version(), "0.1.0");
    }

    #[test]
    fn test_layout_with_cell_metrics() {
        let root = crate::parse("ab");
        let layout = RegexLayoutAlgorithm::with_config(LayoutConfig::text());
        let diagram = layout.layout(&root, &CellMetrics).unwrap();
        assert!(diagram.width >= 4.0);
        assert_eq!(diagram.width.fract(), 0.0);
    }
}
