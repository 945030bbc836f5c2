//! Fit a title into a box: greedy word wrap, then ellipsis truncation.
//!
//! The measurement function is supplied by the renderer (DOM text metrics, PDF
//! font metrics, ...). The only guarantee made here is that no returned line
//! measures wider than `max_width`.

use serde::{Deserialize, Serialize};

/// Appended to any line that lost content.
pub const ELLIPSIS: &str = "…";

/// A wrapped and possibly truncated title.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FittedText {
    pub lines: Vec<String>,
    pub truncated: bool,
}

/// A measure function for fixed-width glyphs: `char_width` per character.
pub fn monospace(char_width: f64) -> impl Fn(&str) -> f64 {
    move |s: &str| s.chars().count() as f64 * char_width
}

/// Wrap `text` into at most `floor(max_height / line_height)` lines of at most
/// `max_width`, as measured by `measure`.
///
/// At least one line is always kept, so a box too short for a full line still
/// shows an ellipsis. A word wider than `max_width` is placed alone on its line
/// and shortened like any other clipped line.
pub fn fit<F>(
    text: &str,
    max_width: f64,
    max_height: f64,
    line_height: f64,
    measure: F,
) -> FittedText
where
    F: Fn(&str) -> f64,
{
    let mut lines = wrap(text, max_width, &measure);
    if lines.is_empty() {
        return FittedText::default();
    }

    let mut truncated = false;

    let max_lines = max_line_count(max_height, line_height);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        truncated = true;
        if let Some(last) = lines.last_mut() {
            *last = ellipsize(last, max_width, &measure);
        }
    }

    for line in lines.iter_mut() {
        if measure(line) > max_width {
            *line = ellipsize(line, max_width, &measure);
            truncated = true;
        }
    }

    FittedText { lines, truncated }
}

fn max_line_count(max_height: f64, line_height: f64) -> usize {
    if line_height.is_nan() || line_height <= 0.0 || !max_height.is_finite() {
        return usize::MAX;
    }
    let count = (max_height / line_height).floor();
    if count < 1.0 {
        1
    } else {
        count as usize
    }
}

fn wrap<F>(text: &str, max_width: f64, measure: &F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Drop trailing characters until `line + …` fits. Empty if not even the
/// ellipsis fits.
fn ellipsize<F>(line: &str, max_width: f64, measure: &F) -> String
where
    F: Fn(&str) -> f64,
{
    let mut kept = line.trim_end().to_string();
    loop {
        let candidate = format!("{}{}", kept, ELLIPSIS);
        if measure(&candidate) <= max_width {
            return candidate;
        }
        if kept.pop().is_none() {
            return String::new();
        }
        let trimmed = kept.trim_end().len();
        kept.truncate(trimmed);
    }
}
