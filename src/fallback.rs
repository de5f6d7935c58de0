//! Generated fallback icons
//!
//! When no provider yields an image the resolver draws a 64x64 rounded tile
//! with the first letter of the domain. The tile colour comes from a hash of
//! the domain, so the same domain always renders the same icon.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Prefix of every generated icon
pub const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

/// Letter used when the input has nothing printable
const PLACEHOLDER_LETTER: char = '?';

/// Generate the fallback tile for a domain
pub fn for_domain(domain: &str) -> String {
    let letter = domain
        .chars()
        .next()
        .map(|c| c.to_uppercase().next().unwrap_or(c))
        .unwrap_or(PLACEHOLDER_LETTER);
    render(letter, &hue_color(domain))
}

/// Generate the fallback tile for input that is not a usable URL
///
/// Keyed by the raw input: the first alphanumeric character picks the letter.
pub fn for_raw_input(input: &str) -> String {
    let letter = input
        .chars()
        .find(|c| c.is_alphanumeric())
        .map(|c| c.to_uppercase().next().unwrap_or(c))
        .unwrap_or(PLACEHOLDER_LETTER);
    render(letter, &hue_color(input))
}

/// Colour for a string as `hsl(h, 65%, 45%)`
pub fn hue_color(s: &str) -> String {
    format!("hsl({}, 65%, 45%)", hue(s))
}

/// Hue in `0..360` from a rolling hash over UTF-16 code units
///
/// Only the shift truncates to 32 bits; the sum is carried wide, so long
/// inputs leave the `i32` range and keep their full value.
fn hue(s: &str) -> u32 {
    let hash = s.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = (hash as i32).wrapping_shl(5);
        i64::from(unit) + i64::from(shifted) - hash
    });
    (hash % 360).unsigned_abs() as u32
}

fn render(letter: char, color: &str) -> String {
    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">"#,
            r#"<rect width="64" height="64" rx="12" fill="{color}"/>"#,
            r#"<text x="32" y="32" font-family="Arial" font-size="32" fill="white" "#,
            r#"text-anchor="middle" dominant-baseline="central">{letter}</text>"#,
            "</svg>"
        ),
        color = color,
        letter = escape_xml(letter),
    );
    format!("{}{}", SVG_DATA_URI_PREFIX, STANDARD.encode(svg))
}

fn escape_xml(c: char) -> String {
    match c {
        '<' => "&lt;".to_string(),
        '>' => "&gt;".to_string(),
        '&' => "&amp;".to_string(),
        '"' => "&quot;".to_string(),
        '\'' => "&apos;".to_string(),
        other => other.to_string(),
    }
}
