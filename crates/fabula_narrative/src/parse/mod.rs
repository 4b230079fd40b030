//! Parsers for the informal text contracts of stage answers.
//!
//! Model output is untrusted input. Each parser either returns a structured
//! value or reports exactly what was missing.

mod numbered;
mod profile;
mod review;
mod setting;

pub use numbered::parse_numbered_list;
pub use profile::parse_profiles;
pub use review::{APPROVAL_FEEDBACK, BLANK_FEEDBACK, ReviewMarkers, parse_review};
pub use setting::parse_setting;

/// Drop markdown headings, emphasis, list bullets and list numbering from
/// the start of a line.
fn strip_decoration(line: &str) -> &str {
    let line = strip_marks(line);
    strip_marks(strip_numbering(line).unwrap_or(line))
}

/// Drop heading hashes, bullets and emphasis, keeping any list number.
fn strip_marks(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '#' | '-' | '*' | '•' | '·'))
        .trim_end()
}

/// Split a leading `1.`, `1)`, `1、` or `1．` off a line.
fn split_list_number(line: &str) -> Option<(u32, &str)> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 || digits > 3 {
        return None;
    }
    let rest = &line[digits..];
    let sep = rest.chars().next()?;
    if !matches!(sep, '.' | ')' | '、' | '．') {
        return None;
    }
    let number = line[..digits].parse().ok()?;
    Some((number, rest[sep.len_utf8()..].trim()))
}

fn strip_numbering(line: &str) -> Option<&str> {
    split_list_number(line).map(|(_, rest)| rest)
}

/// Split `name: value` on the first ASCII or full-width colon.
fn split_label(line: &str) -> Option<(&str, &str)> {
    let idx = line.find([':', '：'])?;
    let sep_len = line[idx..].chars().next().map(char::len_utf8).unwrap_or(1);
    Some((&line[..idx], &line[idx + sep_len..]))
}

/// Remove bold markers and surrounding whitespace from a field value.
fn clean_value(value: &str) -> String {
    value
        .trim()
        .trim_start_matches("**")
        .trim_end_matches("**")
        .trim()
        .to_string()
}
