//! Scrollback fitting
//!
//! Only the newest part of the history fits on the screen. Walking back from
//! the newest line, lines are taken while their rows still fit the budget;
//! the first line that does not fit ends the walk, so the result is always a
//! contiguous suffix.

/// The longest suffix of `history` whose rows add up to at most `row_budget`.
///
/// `rows_of` gives the number of visual rows a line occupies once wrapped.
pub fn fit_scrollback<T>(
    history: &[T],
    row_budget: usize,
    rows_of: impl Fn(&T) -> usize,
) -> &[T] {
    let mut used = 0usize;
    let mut start = history.len();

    for (i, line) in history.iter().enumerate().rev() {
        let rows = rows_of(line);
        if used + rows > row_budget {
            break;
        }
        used += rows;
        start = i;
    }

    &history[start..]
}
