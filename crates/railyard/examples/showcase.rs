use railyard::prelude::*;
use railyard::{render_regex_svg, render_text};

fn main() {
    let patterns = [
        "^(\\d{4})-(\\d{2})-(\\d{2})$",
        "/colou?r/gi",
        "[^a-z0-9_-]+?",
        "(?<word>\\w+)\\s\\k<word>",
    ];

    for pattern in patterns {
        println!("=== {} ===", pattern);
        println!("{}", render_text(pattern, CharacterSet::Unicode));
        println!();
    }

    println!("=== ASCII ===");
    println!("{}", render_text("a{2,5}|b*", CharacterSet::Ascii));

    let svg = render_regex_svg(patterns[0], Some(Theme::Light));
    println!();
    println!("SVG document: {} bytes", svg.len());
}
