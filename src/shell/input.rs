//! Command line editing state
//!
//! The input buffer and the history of submitted lines. Cursor positions
//! count characters, never bytes.

use std::collections::VecDeque;

/// The line being typed
#[derive(Debug, Clone)]
pub struct InputBuffer {
    text: String,
    /// Cursor position in characters, always in `0..=len()`
    cursor: usize,
    capacity: usize,
}

impl InputBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            capacity,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Insert at the cursor. Returns false when the buffer is full.
    pub fn insert(&mut self, ch: char) -> bool {
        if self.is_full() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
        true
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
        true
    }

    /// Delete the character under the cursor
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.len();
    }

    /// Replace the content, truncated to capacity, with the cursor at the end
    pub fn replace(&mut self, text: &str) {
        self.text = text.chars().take(self.capacity).collect();
        self.cursor = self.len();
    }

    /// Take the content, leaving the buffer empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

/// Previously submitted lines, newest first
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    /// Entry being shown; `None` when not browsing
    index: Option<usize>,
    /// What was being typed before browsing started
    draft: String,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push_front(line.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&str> {
        self.entries.get(i).map(|s| s.as_str())
    }

    /// Browsing position, -1 when not browsing
    pub fn index(&self) -> isize {
        self.index.map(|i| i as isize).unwrap_or(-1)
    }

    /// Stop browsing
    pub fn reset(&mut self) {
        self.index = None;
        self.draft.clear();
    }

    /// Step to an older entry. `current` is saved as the draft when browsing
    /// starts. Returns the text to show, or `None` at the oldest entry.
    pub fn older(&mut self, current: &str) -> Option<&str> {
        let next = match self.index {
            None => 0,
            Some(i) => i + 1,
        };
        if next >= self.entries.len() {
            return None;
        }
        if self.index.is_none() {
            self.draft = current.to_string();
        }
        self.index = Some(next);
        self.get(next)
    }

    /// Step to a newer entry; stepping past the newest gives back the draft.
    /// Returns `None` when not browsing.
    pub fn newer(&mut self) -> Option<String> {
        match self.index? {
            0 => {
                self.index = None;
                Some(std::mem::take(&mut self.draft))
            }
            i => {
                self.index = Some(i - 1);
                self.get(i - 1).map(str::to_string)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> InputBuffer {
        let mut input = InputBuffer::new(50);
        for ch in s.chars() {
            input.insert(ch);
        }
        input
    }

    #[test]
    fn test_insert_at_cursor() {
        let mut input = typed("hllo");
        input.home();
        input.move_right();
        input.insert('e');
        assert_eq!(input.text(), "hello");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_capacity() {
        let input = typed(&"x".repeat(60));
        assert_eq!(input.len(), 50);
        assert!(input.is_full());
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut input = typed("hello");
        assert!(input.backspace());
        assert_eq!(input.text(), "hell");
        assert!(!input.delete());

        input.home();
        assert!(!input.backspace());
        assert!(input.delete());
        assert_eq!(input.text(), "ell");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_cursor_clamped() {
        let mut input = typed("ab");
        input.move_right();
        input.move_right();
        assert_eq!(input.cursor(), 2);
        input.move_left();
        input.move_left();
        input.move_left();
        assert_eq!(input.cursor(), 0);
        input.end();
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = typed("añb");
        input.move_left();
        assert!(input.backspace());
        assert_eq!(input.text(), "ab");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_take_clears() {
        let mut input = typed("ls");
        assert_eq!(input.take(), "ls");
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn test_history_browse() {
        let mut history = CommandHistory::new();
        history.push("ls");
        history.push("pwd");
        assert_eq!(history.index(), -1);

        assert_eq!(history.older("dra"), Some("pwd"));
        assert_eq!(history.older("ignored"), Some("ls"));
        assert_eq!(history.older("ignored"), None);
        assert_eq!(history.index(), 1);

        assert_eq!(history.newer().as_deref(), Some("pwd"));
        assert_eq!(history.newer().as_deref(), Some("dra"));
        assert_eq!(history.index(), -1);
        assert_eq!(history.newer(), None);
    }

    #[test]
    fn test_history_empty() {
        let mut history = CommandHistory::new();
        assert_eq!(history.older(""), None);
        assert_eq!(history.index(), -1);
    }
}
