//! Display text for diagram labels and captions

use std::collections::BTreeSet;

use super::ast::{AnchorKind, GroupKind, RepeatSpec};

pub const WILDCARD_LABEL: &str = "any character";

/// Literal text wrapped in curly quotes
///
/// Control characters are spelled out so every label has a printable width.
pub fn literal_label(value: &str) -> String {
    let mut label = String::with_capacity(value.len() + 6);
    label.push('“');
    for c in value.chars() {
        match c {
            '\t' => label.push_str("\\t"),
            '\n' => label.push_str("\\n"),
            '\r' => label.push_str("\\r"),
            c if c.is_control() => label.push_str(&format!("U+{:04X}", c as u32)),
            c => label.push(c),
        }
    }
    label.push('”');
    label
}

pub fn anchor_label(kind: AnchorKind) -> &'static str {
    match kind {
        AnchorKind::Start => "start of line",
        AnchorKind::End => "end of line",
    }
}

pub fn charset_caption(invert: bool) -> &'static str {
    if invert {
        "None of:"
    } else {
        "One of:"
    }
}

/// Count caption under a repeat loop
///
/// Counts are repetitions beyond the first pass through the atom, so `{2,5}`
/// reads "1…4 times". Plain `*` and `+` get no caption.
pub fn repeat_label(repeat: &RepeatSpec) -> Option<String> {
    let lo = repeat.min.saturating_sub(1);
    match repeat.max {
        Some(max) => {
            let hi = max.saturating_sub(1);
            if lo == hi {
                match hi {
                    0 => None,
                    1 => Some("once".to_string()),
                    n => Some(format!("{} times", n)),
                }
            } else if repeat.min <= 1 && max >= 2 {
                if hi == 1 {
                    Some("at most once".to_string())
                } else {
                    Some(format!("at most {} times", hi))
                }
            } else {
                Some(format!("{}…{} times", lo, hi))
            }
        }
        None if lo == 0 => None,
        None => Some(format!("{}+ times", lo)),
    }
}

/// Caption above a group frame; `None` for non-capturing groups
///
/// `number` is the capturing-group number assigned during layout.
pub fn group_caption(kind: &GroupKind, number: Option<u32>) -> Option<String> {
    let n = number.unwrap_or(0);
    match kind {
        GroupKind::NonCapturing => None,
        GroupKind::Capturing => Some(format!("group #{}", n)),
        GroupKind::Named(name) => Some(format!("group #{} ({})", n, name)),
        GroupKind::Lookahead { negative } => Some(format!("{} lookahead", polarity(*negative))),
        GroupKind::Lookbehind { negative } => {
            Some(format!("{} lookbehind", polarity(*negative)))
        }
    }
}

fn polarity(negative: bool) -> &'static str {
    if negative {
        "negative"
    } else {
        "positive"
    }
}

fn flag_name(flag: char) -> String {
    match flag {
        'd' => "has indices".to_string(),
        'g' => "global".to_string(),
        'i' => "ignore case".to_string(),
        'm' => "multiline".to_string(),
        's' => "dot all".to_string(),
        'u' => "unicode".to_string(),
        'v' => "unicode sets".to_string(),
        'y' => "sticky".to_string(),
        other => other.to_string(),
    }
}

/// "Flags: …" caption, deduplicated and sorted by letter
pub fn flags_caption(flags: &str) -> Option<String> {
    let letters: BTreeSet<char> = flags.chars().collect();
    if letters.is_empty() {
        return None;
    }
    let names: Vec<String> = letters.into_iter().map(flag_name).collect();
    Some(format!("Flags: {}", names.join(", ")))
}
