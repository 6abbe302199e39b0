//! Greedy word wrap
//!
//! Breaks a logical line into rows that fit a pixel width. Words are the
//! pieces between single spaces, so runs of spaces survive as empty words
//! and joining the rows back with `' '` gives the original text.

/// Wrap `text` into rows no wider than `max_width`.
///
/// The first word of a row is always taken, even when it is wider than
/// `max_width` on its own; there is no character-level breaking. Every later
/// word joins the row only if the row plus a space plus the word still fits.
///
/// Always returns at least one row: `""` wraps to `[""]`.
pub fn wrap_words(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current: Option<String> = None;

    for word in text.split(' ') {
        current = Some(match current.take() {
            None => word.to_string(),
            Some(row) => {
                let candidate = format!("{} {}", row, word);
                if measure(&candidate) <= max_width {
                    candidate
                } else {
                    rows.push(row);
                    word.to_string()
                }
            }
        });
    }

    // split(' ') yields at least one piece, so the last row is always open
    if let Some(row) = current {
        rows.push(row);
    }

    rows
}
