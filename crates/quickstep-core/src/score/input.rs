//! Score-input text handling.
//!
//! The score cell is typed one character at a time; these functions are the
//! edit-time guard (`accept_typed`) and the blur-time normalizer
//! (`finalize`). They operate on plain text so the UI can echo exactly what
//! the judge will see. The authoritative range clamp lives in
//! [`crate::score::clamp_score`] and runs again wherever a cell is persisted.

use super::cell::{SCORE_MAX, SCORE_MIN, clamp_score};

/// Validate and auto-format in-progress input.
///
/// Rules:
/// - empty input is allowed (cell not yet scored)
/// - the first character must be a digit 5-9
/// - a second digit auto-inserts the decimal point ("75" -> "7.5")
/// - any combination below 5.5 is rejected outright ("54" -> rejected)
/// - input longer than three characters is truncated
///
/// Returns the formatted text, or `None` when the edit is rejected and the
/// previous content should be kept.
pub fn accept_typed(text: &str) -> Option<String> {
    if text.is_empty() {
        return Some(String::new());
    }

    let mut chars: Vec<char> = text.chars().collect();
    chars.truncate(3);

    let first = chars[0];
    if !('5'..='9').contains(&first) {
        return None;
    }
    if chars.len() == 1 {
        return Some(first.to_string());
    }

    // Two characters: either "d." or "dd" (dot inserted automatically).
    let second = chars[1];
    let formatted = match (chars.len(), second) {
        (2, '.') => format!("{first}."),
        (2, d) if d.is_ascii_digit() => format!("{first}.{d}"),
        (3, '.') => {
            let third = chars[2];
            if !third.is_ascii_digit() {
                return None;
            }
            format!("{first}.{third}")
        }
        _ => return None,
    };

    // Reject combinations that can never reach the floor, e.g. "5.4".
    if let Some(value) = parse_partial(&formatted)
        && value < SCORE_MIN
        && !formatted.ends_with('.')
    {
        return None;
    }
    Some(formatted)
}

/// Normalize the cell on blur.
///
/// An incomplete value is auto-completed ("6" -> "6.0", "5" -> "5.5" since
/// 5.0 is below the floor); anything out of range is clamped into
/// [5.5, 9.9]. Empty input stays empty (`None`).
pub fn finalize(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    let value = parse_partial(text)?;
    Some(format_score(clamp_score(value)))
}

/// Canonical one-decimal rendering used in drafts and console output.
pub fn format_score(value: f64) -> String {
    format!("{value:.1}")
}

/// Parse possibly-incomplete input ("7", "7.", "7.5"). The stray trailing
/// dot parses fine with `f64::from_str`, so this is a checked passthrough.
fn parse_partial(text: &str) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// True when the text holds a complete, in-range score.
pub fn is_complete(text: &str) -> bool {
    matches!(text.trim().parse::<f64>(), Ok(v) if (SCORE_MIN..=SCORE_MAX).contains(&v))
}
