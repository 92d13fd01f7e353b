//! Backslash escape tables
//!
//! Escapes mean different things inside and outside a character class, most
//! visibly `\b` (word boundary outside, backspace inside). The two tables are
//! kept as separate functions so neither can fall through to the other.

use super::parser::AnomalyKind;

/// What an escape stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Shown as a labelled box
    Label {
        label: String,
        ordinal: Option<u32>,
    },
    /// Shown as the character itself
    Literal(String),
}

/// Result of reading one escape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEscape {
    pub resolved: Resolved,
    /// Bytes consumed after the backslash
    pub len: usize,
    pub anomaly: Option<AnomalyKind>,
}

impl ResolvedEscape {
    fn label(label: impl Into<String>, len: usize) -> Self {
        Self {
            resolved: Resolved::Label {
                label: label.into(),
                ordinal: None,
            },
            len,
            anomaly: None,
        }
    }

    fn numbered(label: String, ordinal: u32, len: usize) -> Self {
        Self {
            resolved: Resolved::Label {
                label,
                ordinal: Some(ordinal),
            },
            len,
            anomaly: None,
        }
    }

    fn literal(c: char) -> Self {
        Self {
            resolved: Resolved::Literal(c.to_string()),
            len: c.len_utf8(),
            anomaly: None,
        }
    }

    /// A lone backslash at the end of the input
    fn trailing() -> Self {
        Self {
            resolved: Resolved::Literal("\\".to_string()),
            len: 0,
            anomaly: Some(AnomalyKind::TrailingBackslash),
        }
    }

    fn with_anomaly(mut self, anomaly: AnomalyKind) -> Self {
        self.anomaly = Some(anomaly);
        self
    }
}

/// Resolve an escape outside a character class
///
/// `rest` starts right after the backslash.
pub fn resolve_escape(rest: &str) -> ResolvedEscape {
    let Some(c) = rest.chars().next() else {
        return ResolvedEscape::trailing();
    };
    match c {
        'd' => ResolvedEscape::label("digit", 1),
        'D' => ResolvedEscape::label("non-digit", 1),
        's' => ResolvedEscape::label("white space", 1),
        'S' => ResolvedEscape::label("non-white space", 1),
        'w' => ResolvedEscape::label("word", 1),
        'W' => ResolvedEscape::label("non-word", 1),
        'b' => ResolvedEscape::label("word boundary", 1),
        'B' => ResolvedEscape::label("non-word boundary", 1),
        'f' | 'n' | 'r' | 't' | 'v' => control_code(c),
        '0' => null_or_octal(rest),
        '1'..='9' => ResolvedEscape::label(format!("back reference #{}", c), 1),
        'k' => named_back_reference(rest),
        'c' => control_letter(rest),
        'x' => hex(rest),
        'u' => unicode(rest),
        'p' | 'P' => property(rest, c == 'P'),
        c => identity(c),
    }
}

/// Resolve an escape inside a character class
///
/// `rest` starts right after the backslash.
pub fn resolve_class_escape(rest: &str) -> ResolvedEscape {
    let Some(c) = rest.chars().next() else {
        return ResolvedEscape::trailing();
    };
    match c {
        'd' => ResolvedEscape::label("digit", 1),
        'D' => ResolvedEscape::label("non-digit", 1),
        's' => ResolvedEscape::label("white space", 1),
        'S' => ResolvedEscape::label("non-white space", 1),
        'w' => ResolvedEscape::label("word", 1),
        'W' => ResolvedEscape::label("non-word", 1),
        'b' => ResolvedEscape::label("backspace", 1),
        'B' => ResolvedEscape::literal('B'),
        'f' | 'n' | 'r' | 't' | 'v' => control_code(c),
        '0' => null_or_octal(rest),
        '1'..='7' => octal(rest),
        'c' => control_letter(rest),
        'x' => hex(rest),
        'u' => unicode(rest),
        'p' | 'P' => property(rest, c == 'P'),
        c => identity(c),
    }
}

/// Whether an escape is a class shorthand, which cannot bound a range
pub fn is_class_shorthand(rest: &str) -> bool {
    matches!(
        rest.chars().next(),
        Some('d' | 'D' | 's' | 'S' | 'w' | 'W' | 'p' | 'P')
    )
}

fn control_code(c: char) -> ResolvedEscape {
    let label = match c {
        'f' => "form feed",
        'n' => "line feed",
        'r' => "carriage return",
        't' => "tab",
        _ => "vertical tab",
    };
    ResolvedEscape::label(label, 1)
}

fn null_or_octal(rest: &str) -> ResolvedEscape {
    let digits = leading(&rest[1..], 3, |c| c.is_digit(8));
    if digits.is_empty() {
        ResolvedEscape::numbered("null".to_string(), 0, 1)
    } else {
        octal_digits(digits, 1 + digits.len())
    }
}

fn octal(rest: &str) -> ResolvedEscape {
    let digits = leading(rest, 3, |c| c.is_digit(8));
    octal_digits(digits, digits.len())
}

fn octal_digits(digits: &str, len: usize) -> ResolvedEscape {
    match u32::from_str_radix(digits, 8) {
        Ok(value) => ResolvedEscape::numbered(format!("0o{:o}", value), value, len),
        Err(_) => ResolvedEscape::numbered("null".to_string(), 0, 1),
    }
}

fn named_back_reference(rest: &str) -> ResolvedEscape {
    let after = &rest[1..];
    if let Some(body) = after.strip_prefix('<') {
        if let Some(close) = body.find('>') {
            let name = &body[..close];
            if !name.is_empty() {
                return ResolvedEscape::label(
                    format!("back reference ({})", name),
                    1 + 1 + close + 1,
                );
            }
        }
    }
    ResolvedEscape::literal('k').with_anomaly(AnomalyKind::IncompleteEscape('k'))
}

fn control_letter(rest: &str) -> ResolvedEscape {
    match rest[1..].chars().next() {
        Some(letter) if letter.is_ascii_alphabetic() => {
            let upper = letter.to_ascii_uppercase();
            ResolvedEscape::numbered(format!("ctrl-{}", upper), letter as u32 % 32, 2)
        }
        _ => ResolvedEscape::literal('c').with_anomaly(AnomalyKind::IncompleteEscape('c')),
    }
}

fn hex(rest: &str) -> ResolvedEscape {
    let digits = leading(&rest[1..], 2, |c| c.is_ascii_hexdigit());
    match u32::from_str_radix(digits, 16) {
        Ok(value) if digits.len() == 2 => {
            ResolvedEscape::numbered(format!("0x{:02X}", value), value, 3)
        }
        _ => ResolvedEscape::literal('x').with_anomaly(AnomalyKind::IncompleteEscape('x')),
    }
}

fn unicode(rest: &str) -> ResolvedEscape {
    let after = &rest[1..];
    if let Some(body) = after.strip_prefix('{') {
        let digits = leading(body, 6, |c| c.is_ascii_hexdigit());
        if !digits.is_empty() && body[digits.len()..].starts_with('}') {
            if let Ok(value) = u32::from_str_radix(digits, 16) {
                return ResolvedEscape::numbered(
                    format!("U+{:04X}", value),
                    value,
                    1 + 1 + digits.len() + 1,
                );
            }
        }
    } else {
        let digits = leading(after, 4, |c| c.is_ascii_hexdigit());
        if digits.len() == 4 {
            if let Ok(value) = u32::from_str_radix(digits, 16) {
                return ResolvedEscape::numbered(format!("U+{:04X}", value), value, 5);
            }
        }
    }
    ResolvedEscape::literal('u').with_anomaly(AnomalyKind::IncompleteEscape('u'))
}

fn property(rest: &str, negated: bool) -> ResolvedEscape {
    let letter = if negated { 'P' } else { 'p' };
    if let Some(body) = rest[1..].strip_prefix('{') {
        if let Some(close) = body.find('}') {
            let name = &body[..close];
            if !name.is_empty() {
                let label = if negated {
                    format!("not unicode property {}", name)
                } else {
                    format!("unicode property {}", name)
                };
                return ResolvedEscape::label(label, 1 + 1 + close + 1);
            }
        }
    }
    ResolvedEscape::literal(letter).with_anomaly(AnomalyKind::IncompleteEscape(letter))
}

/// Any other character stands for itself
fn identity(c: char) -> ResolvedEscape {
    let escape = ResolvedEscape::literal(c);
    if c.is_ascii_alphanumeric() {
        escape.with_anomaly(AnomalyKind::UnknownEscape(c))
    } else {
        escape
    }
}

/// Longest prefix of at most `max` characters matching `pred`
fn leading(s: &str, max: usize, pred: impl Fn(char) -> bool) -> &str {
    let end = s
        .char_indices()
        .take(max)
        .take_while(|(_, c)| pred(*c))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_of(escape: &ResolvedEscape) -> &str {
        match &escape.resolved {
            Resolved::Label { label, .. } => label,
            Resolved::Literal(text) => text,
        }
    }

    #[test]
    fn test_b_differs_between_tables() {
        assert_eq!(label_of(&resolve_escape("b")), "word boundary");
        assert_eq!(label_of(&resolve_class_escape("b")), "backspace");
        assert_eq!(label_of(&resolve_escape("B")), "non-word boundary");
        assert_eq!(
            resolve_class_escape("B").resolved,
            Resolved::Literal("B".to_string())
        );
    }

    #[test]
    fn test_shorthands_and_control_codes() {
        assert_eq!(label_of(&resolve_escape("d")), "digit");
        assert_eq!(label_of(&resolve_escape("W")), "non-word");
        assert_eq!(label_of(&resolve_escape("S")), "non-white space");
        assert_eq!(label_of(&resolve_escape("n")), "line feed");
        assert_eq!(label_of(&resolve_class_escape("t")), "tab");
        assert_eq!(label_of(&resolve_escape("v")), "vertical tab");
    }

    #[test]
    fn test_numeric_escapes_carry_ordinals() {
        let hex = resolve_escape("x41rest");
        assert_eq!(
            hex.resolved,
            Resolved::Label {
                label: "0x41".to_string(),
                ordinal: Some(0x41)
            }
        );
        assert_eq!(hex.len, 3);

        let unicode = resolve_escape("u00e9");
        assert_eq!(label_of(&unicode), "U+00E9");
        assert_eq!(unicode.len, 5);

        let braced = resolve_escape("u{1F600}");
        assert_eq!(label_of(&braced), "U+1F600");
        assert_eq!(braced.len, 8);

        let ctrl = resolve_escape("cj");
        assert_eq!(
            ctrl.resolved,
            Resolved::Label {
                label: "ctrl-J".to_string(),
                ordinal: Some(10)
            }
        );
    }

    #[test]
    fn test_null_and_octal() {
        let null = resolve_escape("0");
        assert_eq!(
            null.resolved,
            Resolved::Label {
                label: "null".to_string(),
                ordinal: Some(0)
            }
        );
        let octal = resolve_escape("0101");
        assert_eq!(label_of(&octal), "0o101");
        assert_eq!(octal.len, 4);
        let class_octal = resolve_class_escape("12");
        assert_eq!(label_of(&class_octal), "0o12");
        assert_eq!(class_octal.len, 2);
    }

    #[test]
    fn test_back_references_only_outside_class() {
        assert_eq!(label_of(&resolve_escape("3")), "back reference #3");
        assert_eq!(label_of(&resolve_escape("k<year>")), "back reference (year)");
        assert_eq!(resolve_escape("k<year>").len, 7);
        assert_ne!(label_of(&resolve_class_escape("3")), "back reference #3");
    }

    #[test]
    fn test_incomplete_escapes_become_literals() {
        let bad_hex = resolve_escape("xZ");
        assert_eq!(bad_hex.resolved, Resolved::Literal("x".to_string()));
        assert_eq!(bad_hex.anomaly, Some(AnomalyKind::IncompleteEscape('x')));
        assert_eq!(bad_hex.len, 1);
        assert_eq!(
            resolve_escape("u12").anomaly,
            Some(AnomalyKind::IncompleteEscape('u'))
        );
        assert_eq!(
            resolve_escape("c1").anomaly,
            Some(AnomalyKind::IncompleteEscape('c'))
        );
    }

    #[test]
    fn test_identity_escapes() {
        let dot = resolve_escape(".");
        assert_eq!(dot.resolved, Resolved::Literal(".".to_string()));
        assert_eq!(dot.anomaly, None);
        let unknown = resolve_escape("q");
        assert_eq!(unknown.anomaly, Some(AnomalyKind::UnknownEscape('q')));
        let wide = resolve_escape("é");
        assert_eq!(wide.len, 2);
    }

    #[test]
    fn test_trailing_backslash_consumes_nothing() {
        let trailing = resolve_escape("");
        assert_eq!(trailing.len, 0);
        assert_eq!(trailing.anomaly, Some(AnomalyKind::TrailingBackslash));
        assert_eq!(resolve_class_escape("").len, 0);
    }

    #[test]
    fn test_unicode_property() {
        assert_eq!(label_of(&resolve_escape("p{L}")), "unicode property L");
        assert_eq!(label_of(&resolve_class_escape("P{Lu}")), "not unicode property Lu");
        assert!(is_class_shorthand("p{L}"));
        assert!(!is_class_shorthand("x41"));
    }
}
