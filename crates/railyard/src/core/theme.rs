//! External stylesheets for SVG output
//!
//! Renderers only emit structural class names. A theme maps those classes to
//! colours and strokes; it is attached to a surface by the caller.

use std::fmt;
use std::str::FromStr;

/// Built-in colour palettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

struct Palette {
    background: &'static str,
    text: &'static str,
    stroke: &'static str,
    literal: &'static str,
    escape: &'static str,
    anchor: &'static str,
    charset: &'static str,
    subexp: &'static str,
    muted: &'static str,
}

impl Theme {
    fn palette(&self) -> Palette {
        match self {
            Theme::Light => Palette {
                background: "#ffffff",
                text: "#1b1f23",
                stroke: "#24292e",
                literal: "#dae9e5",
                escape: "#bada55",
                anchor: "#6b6659",
                charset: "#cbcbba",
                subexp: "#908c83",
                muted: "#6a737d",
            },
            Theme::Dark => Palette {
                background: "#0d1117",
                text: "#e6edf3",
                stroke: "#c9d1d9",
                literal: "#1f3a36",
                escape: "#3b4d12",
                anchor: "#3d3a33",
                charset: "#3a3a2e",
                subexp: "#8b949e",
                muted: "#8b949e",
            },
        }
    }

    /// CSS for every class the renderers emit
    pub fn stylesheet(&self) -> String {
        let p = self.palette();
        format!(
            "svg {{ background-color: {bg}; }} \
text {{ font: 12px monospace; fill: {text}; }} \
path {{ fill: none; stroke: {stroke}; stroke-width: 2px; }} \
rect {{ stroke: {stroke}; stroke-width: 1px; }} \
.literal rect {{ fill: {literal}; }} \
.escape rect, .charset-escape rect {{ fill: {escape}; }} \
.anchor rect, .any-character rect {{ fill: {anchor}; }} \
.anchor text, .any-character text {{ fill: {bg}; }} \
.charset > rect {{ fill: {charset}; }} \
.subexp > rect {{ fill: none; stroke: {subexp}; stroke-dasharray: 6,2; }} \
.caption, .repeat-label, .flags {{ fill: {muted}; font-size: 10px; }} \
.terminal {{ fill: {bg}; stroke: {stroke}; stroke-width: 2px; }} \
.arrow {{ stroke-width: 2px; }}",
            bg = p.background,
            text = p.text,
            stroke = p.stroke,
            literal = p.literal,
            escape = p.escape,
            anchor = p.anchor,
            charset = p.charset,
            subexp = p.subexp,
            muted = p.muted,
        )
    }

    /// Get all valid theme names
    pub fn variants() -> &'static [&'static str] {
        &["light", "dark"]
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}
