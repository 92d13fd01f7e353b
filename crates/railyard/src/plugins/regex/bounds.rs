//! Brace quantifier bounds using chumsky
//!
//! Parses the `{m}`, `{m,}` and `{m,n}` forms. The caller hands over the
//! candidate text up to and including the first `}`; anything that is not
//! exactly one of those forms is rejected so the `{` can be read as a
//! literal instead.

use chumsky::prelude::*;

/// Bounds read from a brace quantifier; `max` is `None` when unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u32,
    pub max: Option<u32>,
}

fn number<'src>() -> impl Parser<'src, &'src str, String> + Clone {
    one_of('0'..='9').repeated().at_least(1).collect::<String>()
}

/// `{` min [`,` [max]] `}`
fn bounds_parser<'src>() -> impl Parser<'src, &'src str, (String, Option<Option<String>>)> + Clone
{
    just('{')
        .ignore_then(number())
        .then(just(',').ignore_then(number().or_not()).or_not())
        .then_ignore(just('}'))
        .then_ignore(end())
}

/// Parse a complete brace quantifier such as `{2,5}`
///
/// Returns `None` for malformed text, numbers that overflow, or `min > max`.
pub fn parse_bounds(candidate: &str) -> Option<Bounds> {
    let (min, rest) = bounds_parser().parse(candidate).into_result().ok()?;
    let min: u32 = min.parse().ok()?;
    let max = match rest {
        None => Some(min),
        Some(None) => None,
        Some(Some(max)) => Some(max.parse::<u32>().ok()?),
    };
    if max.is_some_and(|max| max < min) {
        return None;
    }
    Some(Bounds { min, max })
}
