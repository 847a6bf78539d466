//! Text extraction from search result markup

use scraper::{ElementRef, Html};

/// Visible text of an HTML fragment with whitespace collapsed
///
/// Tags are dropped and every character reference is decoded.
pub fn to_text(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    collapse(parsed.root_element().text())
}

/// Visible text of a parsed element with whitespace collapsed
pub fn element_text(element: ElementRef<'_>) -> String {
    collapse(element.text())
}

fn collapse<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
