//! Cursor placement in the wrapped input line
//!
//! The input line sits to the right of the prompt on its first row and uses
//! the full width afterwards. Since the cursor can sit mid-word, the walk is
//! per character rather than per word, and the input rows are drawn from
//! the same walk so the glyph lands where the text is.

/// Where the cursor glyph goes: a row of the input and an x offset from the
/// left text margin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorPosition {
    pub row: usize,
    pub x: f64,
}

/// Walks `text` one character at a time, opening a new row whenever the next
/// character would overflow the current one. Stops after `limit` characters.
///
/// Returns the closed rows and the row still being filled.
fn walk(
    text: &str,
    limit: usize,
    prompt_width: f64,
    max_width: f64,
    measure: &impl Fn(&str) -> f64,
) -> (Vec<String>, String) {
    let mut rows = Vec::new();
    let mut current = String::new();

    for ch in text.chars().take(limit) {
        let available = if rows.is_empty() {
            max_width - prompt_width
        } else {
            max_width
        };
        current.push(ch);
        // A row always holds at least one character
        if current.chars().count() > 1 && measure(&current) > available {
            current.pop();
            rows.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }

    (rows, current)
}

/// Map a character index in `text` to a row and x offset.
///
/// Row 0 has `max_width - prompt_width` pixels available and its x offset
/// includes `prompt_width`; later rows start at the margin. An index past
/// the end of `text` is clamped, putting the cursor after the last char.
pub fn locate_cursor(
    text: &str,
    cursor_index: usize,
    prompt_width: f64,
    max_width: f64,
    measure: impl Fn(&str) -> f64,
) -> CursorPosition {
    let limit = cursor_index.min(text.chars().count());
    let (rows, current) = walk(text, limit, prompt_width, max_width, &measure);
    let row = rows.len();
    let offset = if row == 0 { prompt_width } else { 0.0 };

    CursorPosition {
        row,
        x: offset + measure(&current),
    }
}

/// The rows of the character walk over the whole of `text`.
///
/// Always at least one row, so an empty input still gets a line to put the
/// cursor on.
pub fn break_chars(
    text: &str,
    prompt_width: f64,
    max_width: f64,
    measure: impl Fn(&str) -> f64,
) -> Vec<String> {
    let (mut rows, current) = walk(text, usize::MAX, prompt_width, max_width, &measure);
    rows.push(current);
    rows
}
