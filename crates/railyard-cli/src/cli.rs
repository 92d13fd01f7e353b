//! Command-line interface for the railyard utility
//!
//! Provides a CLI to draw regular expressions as railroad diagrams, either
//! as SVG documents or as character art for the terminal.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::colorizer::colorize_output;
use railyard::core::logging::init_logging;
use railyard::plugins::regex::{
    Alternation, CharsetItem, Node, ParseOutcome, RegexParser, Sequence, Spanned,
};
use railyard::{render_regex_svg, render_text, CharacterSet, Parser as _, Theme};

/// Railyard - Draw regular expressions as railroad diagrams
#[derive(Parser)]
#[command(name = "railyard")]
#[command(about = "A Rust utility to turn regular expressions into railroad diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Where the pattern comes from
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PatternSource {
    /// Pattern given directly on the command line
    #[arg(short, long, conflicts_with = "input")]
    pub pattern: Option<String>,

    /// File containing the pattern (use - for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Draw a pattern as a railroad diagram
    Render {
        #[command(flatten)]
        source: PatternSource,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = FormatChoice::Svg)]
        format: FormatChoice,

        /// Character set for text output
        #[arg(long, value_enum, default_value_t = StyleChoice::Unicode)]
        style: StyleChoice,

        /// Stylesheet embedded in SVG output
        #[arg(long, value_enum, default_value_t = ThemeChoice::Light)]
        theme: ThemeChoice,

        /// When to use colors in text output
        #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
        color: ColorChoice,
    },

    /// Print the syntax tree of a pattern
    Parse {
        #[command(flatten)]
        source: PatternSource,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Report every construct that needed recovery
    Check {
        #[command(flatten)]
        source: PatternSource,
    },
}

/// Output formats
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum FormatChoice {
    #[default]
    Svg,
    Text,
}

/// Supported output character sets
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum StyleChoice {
    Ascii,
    Unicode,
}

impl From<StyleChoice> for CharacterSet {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Ascii => CharacterSet::Ascii,
            StyleChoice::Unicode => CharacterSet::Unicode,
        }
    }
}

/// SVG stylesheet choices
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ThemeChoice {
    #[default]
    Light,
    Dark,
    /// Leave styling to the embedding page
    None,
}

impl From<ThemeChoice> for Option<Theme> {
    fn from(value: ThemeChoice) -> Self {
        match value {
            ThemeChoice::Light => Some(Theme::Light),
            ThemeChoice::Dark => Some(Theme::Dark),
            ThemeChoice::None => None,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Main CLI application
#[derive(Debug, Default)]
pub struct RailyardApp {
    parser: RegexParser,
}

impl RailyardApp {
    /// Create a new application instance
    pub fn new() -> Self {
        Self {
            parser: RegexParser::new(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("RAILYARD_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("RAILYARD_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Railyard v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                source,
                output,
                format,
                style,
                theme,
                color,
            } => {
                let options = RenderOptions {
                    format,
                    style,
                    theme,
                    color,
                };
                self.render_command(source, output, options, cli.verbose)
            }
            Commands::Parse { source, json } => self.parse_command(source, json, cli.verbose),
            Commands::Check { source } => self.check_command(source, cli.verbose),
        }
    }

    /// Handle the render command
    fn render_command(
        &self,
        source: PatternSource,
        output: Option<PathBuf>,
        options: RenderOptions,
        verbose: bool,
    ) -> Result<()> {
        let pattern = self.read_pattern(source)?;

        if verbose {
            eprintln!("Rendering {} bytes of pattern", pattern.len());
        }

        let rendered = match options.format {
            FormatChoice::Svg => render_regex_svg(&pattern, options.theme.into()),
            FormatChoice::Text => {
                let style = options.style.into();
                let text = render_text(&pattern, style);
                if self.should_colorize(&output, options.color) {
                    colorize_output(&text, style)
                } else {
                    text
                }
            }
        };

        debug!(format = ?options.format, bytes = rendered.len(), "Rendered diagram");
        self.write_output(output, &rendered)
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: &Option<PathBuf>, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                    Some(ref p) if p.to_str() == Some("-") => {
                        crossterm::tty::IsTty::is_tty(&std::io::stdout())
                    }
                    Some(_) => false,
                }
            }
        }
    }

    /// Handle the parse command
    fn parse_command(&self, source: PatternSource, json: bool, verbose: bool) -> Result<()> {
        let pattern = self.read_pattern(source)?;
        let outcome = self.parser.parse(&pattern)?;

        if verbose {
            eprintln!("Parsed {} nodes", outcome.root.descendants().len());
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            print!("{}", outline(&outcome));
        }
        Ok(())
    }

    /// Handle the check command
    fn check_command(&self, source: PatternSource, verbose: bool) -> Result<()> {
        let pattern = self.read_pattern(source)?;
        let outcome = self.parser.parse(&pattern)?;

        if verbose {
            eprintln!("Found {} anomalies", outcome.anomalies.len());
        }

        if outcome.is_clean() {
            println!("✓ Valid pattern");
            return Ok(());
        }

        for anomaly in &outcome.anomalies {
            println!("✗ {}", anomaly.to_error(&pattern));
        }
        Err(anyhow!(
            "Pattern needed {} recoveries",
            outcome.anomalies.len()
        ))
    }

    /// Resolve the pattern from a flag, a file or stdin
    ///
    /// A single trailing line break from a file or stdin is dropped; it is
    /// never part of the pattern.
    pub fn read_pattern(&self, source: PatternSource) -> Result<String> {
        if let Some(pattern) = source.pattern {
            return Ok(pattern);
        }
        let content = self.read_input(source.input)?;
        let trimmed = content
            .strip_suffix('\n')
            .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
            .unwrap_or(&content);
        Ok(trimmed.to_string())
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

/// Rendering flags of the render command
#[derive(Debug, Clone, Copy)]
struct RenderOptions {
    format: FormatChoice,
    style: StyleChoice,
    theme: ThemeChoice,
    color: ColorChoice,
}

/// Indented tree listing with one node per line
pub fn outline(outcome: &ParseOutcome) -> String {
    let mut out = String::new();
    let root = &outcome.root;
    let _ = writeln!(out, "root {:?}", root.text);
    if !root.flags.is_empty() {
        let _ = writeln!(out, "  flags {:?}", root.flags);
    }
    outline_alternation(&mut out, &root.alternation, 1);
    for anomaly in &outcome.anomalies {
        let _ = writeln!(out, "warning: {}", anomaly);
    }
    out
}

fn line(out: &mut String, depth: usize, label: impl std::fmt::Display, node: &dyn Spanned) {
    let _ = writeln!(
        out,
        "{:indent$}{} {:?} @{}",
        "",
        label,
        node.text(),
        node.offset(),
        indent = depth * 2
    );
}

fn outline_alternation(out: &mut String, alternation: &Alternation, depth: usize) {
    if alternation.branches.len() == 1 {
        outline_sequence(out, &alternation.branches[0], depth);
        return;
    }
    line(out, depth, alternation.kind(), alternation);
    for branch in &alternation.branches {
        outline_sequence(out, branch, depth + 1);
    }
}

fn outline_sequence(out: &mut String, sequence: &Sequence, depth: usize) {
    line(out, depth, sequence.kind(), sequence);
    for item in &sequence.items {
        outline_node(out, item, depth + 1);
    }
}

fn outline_node(out: &mut String, node: &Node, depth: usize) {
    match node {
        Node::Quantified(quantified) => {
            line(out, depth, format!("repeat {}", quantified.repeat), node);
            outline_node(out, &quantified.atom, depth + 1);
        }
        Node::Escape(escape) => line(out, depth, format!("escape ({})", escape.label), node),
        Node::Charset(charset) => {
            let label = if charset.invert { "charset (inverted)" } else { "charset" };
            line(out, depth, label, node);
            for item in &charset.items {
                outline_charset_item(out, item, depth + 1);
            }
        }
        Node::Group(group) => {
            line(out, depth, format!("group ({:?})", group.kind), node);
            outline_alternation(out, &group.alternation, depth + 1);
        }
        Node::Literal(_) | Node::Anchor(_) | Node::Wildcard(_) => {
            line(out, depth, node.kind(), node)
        }
    }
}

fn outline_charset_item(out: &mut String, item: &CharsetItem, depth: usize) {
    match item {
        CharsetItem::Range(range) => {
            line(out, depth, item.kind(), item);
            outline_charset_item(out, &range.first, depth + 1);
            outline_charset_item(out, &range.last, depth + 1);
        }
        CharsetItem::Escape(escape) => {
            line(out, depth, format!("escape ({})", escape.label), item)
        }
        CharsetItem::Literal(_) => line(out, depth, item.kind(), item),
    }
}
