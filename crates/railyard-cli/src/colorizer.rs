//! Terminal colorization for character-art diagrams
//!
//! Applies ANSI escape codes to diagram elements using crossterm.

use crossterm::style::{Color, Stylize};
use railyard::core::box_drawing::LineChars;
use railyard::CharacterSet;

/// Colorize a character-art diagram using ANSI escape codes
///
/// - Track lines, boxes and frames: Cyan
/// - Arrowheads on skip and loop curves: Yellow
/// - Start and end markers: Green
/// - Quoted literal text: Magenta
/// - Other labels: Default (terminal color)
pub fn colorize_output(input: &str, style: CharacterSet) -> String {
    let chars = LineChars::new(style);
    let arrows = [
        chars.arrow(railyard::Direction::Up),
        chars.arrow(railyard::Direction::Down),
        chars.arrow(railyard::Direction::Left),
        chars.arrow(railyard::Direction::Right),
    ];
    let mut result = String::with_capacity(input.len() * 2);

    for line in input.lines() {
        let cells: Vec<char> = line.chars().collect();
        let mut quoted = false;
        for (i, &c) in cells.iter().enumerate() {
            let opens_or_closes = match style {
                CharacterSet::Unicode => c == '“' || c == '”',
                CharacterSet::Ascii => c == '"',
            };
            if opens_or_closes {
                quoted = match style {
                    CharacterSet::Unicode => c == '“',
                    CharacterSet::Ascii => !quoted,
                };
                push_colored(&mut result, c, Color::Magenta);
                continue;
            }
            if quoted {
                push_colored(&mut result, c, Color::Magenta);
                continue;
            }

            // ASCII markers double as letters, so they need a track beside them
            let on_track = style == CharacterSet::Unicode || touches_track(&cells, i, &chars);
            if chars.decode(c).is_some() {
                push_colored(&mut result, c, Color::Cyan);
            } else if arrows.contains(&c) && on_track {
                push_colored(&mut result, c, Color::Yellow);
            } else if c == chars.terminal() && on_track {
                push_colored(&mut result, c, Color::Green);
            } else {
                result.push(c);
            }
        }
        result.push('\n');
    }

    // Remove trailing newline to match input format
    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    result
}

fn push_colored(out: &mut String, c: char, color: Color) {
    out.push_str(&format!("{}", c.to_string().with(color)));
}

/// True when a horizontal neighbour is a line glyph
fn touches_track(cells: &[char], i: usize, chars: &LineChars) -> bool {
    let before = i.checked_sub(1).and_then(|j| cells.get(j));
    let after = cells.get(i + 1);
    [before, after]
        .into_iter()
        .flatten()
        .any(|&c| chars.decode(c).is_some())
}
