//! Parser integration tests

use railyard::parse;
use railyard::plugins::regex::{
    AnomalyKind, CharsetItem, GroupKind, Node, NodeKind, RegexParser, Spanned,
};
use railyard::Parser;

fn only_item(pattern: &str) -> Node {
    let root = parse(pattern);
    assert_eq!(root.alternation.branches.len(), 1, "{}", pattern);
    let items = &root.alternation.branches[0].items;
    assert_eq!(items.len(), 1, "{}", pattern);
    items[0].clone()
}

#[test]
fn test_charset_range() {
    let Node::Charset(charset) = only_item("[a-z]") else {
        panic!("expected charset");
    };
    assert!(!charset.invert);
    assert_eq!(charset.items.len(), 1);
    let CharsetItem::Range(range) = &charset.items[0] else {
        panic!("expected range");
    };
    assert_eq!(range.first.text(), "a");
    assert_eq!(range.last.text(), "z");
    assert_eq!(range.text, "a-z");
    assert_eq!(range.offset, 1);
}

#[test]
fn test_inverted_charset() {
    let Node::Charset(charset) = only_item("[^abc]") else {
        panic!("expected charset");
    };
    assert!(charset.invert);
    assert_eq!(charset.items.len(), 3);
    assert!(charset
        .items
        .iter()
        .all(|item| item.kind() == NodeKind::Literal));
}

#[test]
fn test_empty_charset() {
    let Node::Charset(charset) = only_item("[]") else {
        panic!("expected charset");
    };
    assert!(charset.items.is_empty());
}

#[test]
fn test_word_boundary_depends_on_context() {
    let Node::Escape(outside) = only_item("\\b") else {
        panic!("expected escape");
    };
    assert_eq!(outside.label, "word boundary");

    let Node::Charset(charset) = only_item("[\\b]") else {
        panic!("expected charset");
    };
    let CharsetItem::Escape(inside) = &charset.items[0] else {
        panic!("expected class escape");
    };
    assert_eq!(inside.label, "backspace");
    assert_eq!(charset.items[0].kind(), NodeKind::CharsetEscape);
}

#[test]
fn test_named_group() {
    let Node::Group(group) = only_item("(?<year>\\d{4})") else {
        panic!("expected group");
    };
    assert_eq!(group.kind, GroupKind::Named("year".to_string()));
    assert_eq!(group.alternation.text, "\\d{4}");
}

#[test]
fn test_group_kinds() {
    let cases = [
        ("(a)", GroupKind::Capturing),
        ("(?:a)", GroupKind::NonCapturing),
        ("(?=a)", GroupKind::Lookahead { negative: false }),
        ("(?!a)", GroupKind::Lookahead { negative: true }),
        ("(?<=a)", GroupKind::Lookbehind { negative: false }),
        ("(?<!a)", GroupKind::Lookbehind { negative: true }),
    ];
    for (pattern, expected) in cases {
        let Node::Group(group) = only_item(pattern) else {
            panic!("expected group for {}", pattern);
        };
        assert_eq!(group.kind, expected, "{}", pattern);
    }
}

#[test]
fn test_quantifier_forms() {
    let cases = [
        ("a*", 0, None, true),
        ("a+", 1, None, true),
        ("a?", 0, Some(1), true),
        ("a{3}", 3, Some(3), true),
        ("a{3,}", 3, None, true),
        ("a{2,5}?", 2, Some(5), false),
        ("a{1}", 1, Some(1), true),
    ];
    for (pattern, min, max, greedy) in cases {
        let Node::Quantified(quantified) = only_item(pattern) else {
            panic!("expected quantifier for {}", pattern);
        };
        assert_eq!(quantified.repeat.min, min, "{}", pattern);
        assert_eq!(quantified.repeat.max, max, "{}", pattern);
        assert_eq!(quantified.repeat.greedy, greedy, "{}", pattern);
        assert_eq!(quantified.text, pattern);
    }
}

#[test]
fn test_date_pattern_shape() {
    let root = parse("^(\\d{4})-(\\d{2})-(\\d{2})$");
    let items = &root.alternation.branches[0].items;
    let kinds: Vec<NodeKind> = items.iter().map(|item| item.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Anchor,
            NodeKind::Group,
            NodeKind::Literal,
            NodeKind::Group,
            NodeKind::Literal,
            NodeKind::Group,
            NodeKind::Anchor,
        ]
    );
    let Node::Group(year) = &items[1] else {
        panic!("expected group");
    };
    let Node::Quantified(digits) = &year.alternation.branches[0].items[0] else {
        panic!("expected quantifier");
    };
    assert_eq!(digits.atom.kind(), NodeKind::Escape);
    assert_eq!(digits.repeat.min, 4);
}

#[test]
fn test_literal_form_offsets() {
    let root = parse("/ab/gm");
    assert_eq!(root.flags, "gm");
    assert_eq!(root.text, "/ab/gm");
    let items = &root.alternation.branches[0].items;
    assert_eq!(items[0].offset(), 1);
    assert_eq!(items[1].offset(), 2);
}

#[test]
fn test_not_a_literal_form() {
    let root = parse("/a/1");
    assert_eq!(root.flags, "");
    assert_eq!(root.alternation.branches[0].items.len(), 4);
}

#[test]
fn test_escape_ordinals() {
    let cases = [
        ("\\x41", "0x41", Some(0x41)),
        ("\\u00e9", "U+00E9", Some(0xe9)),
        ("\\0", "null", Some(0)),
        ("\\cJ", "ctrl-J", Some(10)),
        ("\\n", "line feed", None),
    ];
    for (pattern, label, ordinal) in cases {
        let Node::Escape(escape) = only_item(pattern) else {
            panic!("expected escape for {}", pattern);
        };
        assert_eq!(escape.label, label, "{}", pattern);
        if ordinal.is_some() {
            assert_eq!(escape.ordinal, ordinal, "{}", pattern);
        }
    }
}

#[test]
fn test_back_references() {
    let Node::Escape(numbered) = only_item("\\2") else {
        panic!("expected escape");
    };
    assert_eq!(numbered.label, "back reference #2");

    let Node::Escape(named) = only_item("\\k<year>") else {
        panic!("expected escape");
    };
    assert_eq!(named.label, "back reference (year)");
}

#[test]
fn test_recovery_anomalies() {
    let parser = RegexParser::new();
    let cases = [
        ("(a", AnomalyKind::UnterminatedGroup),
        ("[a", AnomalyKind::UnterminatedCharset),
        ("a)", AnomalyKind::UnmatchedParen),
        ("a{2", AnomalyKind::MalformedQuantifier),
        ("*a", AnomalyKind::NothingToRepeat),
        ("\\q", AnomalyKind::UnknownEscape('q')),
        ("a\\", AnomalyKind::TrailingBackslash),
    ];
    for (pattern, expected) in cases {
        let outcome = parser.parse(pattern).unwrap();
        let kinds: Vec<&AnomalyKind> = outcome.anomalies.iter().map(|a| &a.kind).collect();
        assert!(kinds.contains(&&expected), "{}: {:?}", pattern, kinds);
    }
}

#[test]
fn test_descendants_cover_tree() {
    let root = parse("a(b|[c-d])*");
    let kinds: Vec<NodeKind> = root.descendants().iter().map(|n| n.kind()).collect();
    assert_eq!(kinds[0], NodeKind::Root);
    assert!(kinds.contains(&NodeKind::QuantifiedAtom));
    assert!(kinds.contains(&NodeKind::CharsetRange));
    assert_eq!(
        kinds.iter().filter(|k| **k == NodeKind::Alternation).count(),
        2
    );
}
