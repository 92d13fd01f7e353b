//! Core renderer trait for diagram output
//!
//! This trait defines the interface for painting laid out geometry into an
//! output format (SVG, plain text).

use anyhow::Result;

/// Core trait for diagram renderers
///
/// # Example
/// ```
/// use railyard::core::{FontMetrics, LayoutAlgorithm, Renderer};
/// use railyard::plugins::regex::{RegexLayoutAlgorithm, RegexSvgRenderer};
///
/// let root = railyard::parse("x|y");
/// let diagram = RegexLayoutAlgorithm::new()
///     .layout(&root, &FontMetrics::default())
///     .unwrap();
/// let surface = RegexSvgRenderer::new().render(&diagram).unwrap();
/// assert!(surface.to_svg().contains("class=\"alternation\""));
/// ```
pub trait Renderer<I: ?Sized>: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Paint the input into the output format
    fn render(&self, input: &I) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the version of this renderer
    fn version(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
