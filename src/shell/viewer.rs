//! Pager state
//!
//! Text content is split into lines up front; an empty line marks a
//! paragraph break. Scrolling moves one content line at a time.

/// What the viewer is showing
#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    content_lines: Vec<String>,
    scroll_index: usize,
    active: bool,
    /// Path of the image on screen, if this is an image view
    image: Option<String>,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a text page at the top
    pub fn open_text(&mut self, content: &str) {
        self.content_lines = paginate(content);
        self.scroll_index = 0;
        self.image = None;
        self.active = true;
    }

    /// Open an image view
    pub fn open_image(&mut self, path: impl Into<String>) {
        self.content_lines.clear();
        self.scroll_index = 0;
        self.image = Some(path.into());
        self.active = true;
    }

    pub fn close(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn content_lines(&self) -> &[String] {
        &self.content_lines
    }

    pub fn scroll_index(&self) -> usize {
        self.scroll_index
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Lines from the scroll position on, at most `page` of them
    pub fn visible(&self, page: usize) -> &[String] {
        let start = self.scroll_index.min(self.content_lines.len());
        let end = (start + page).min(self.content_lines.len());
        &self.content_lines[start..end]
    }

    /// Scroll down one line. Returns whether the position changed.
    pub fn scroll_down(&mut self) -> bool {
        let last = self.content_lines.len().saturating_sub(1);
        if self.scroll_index < last {
            self.scroll_index += 1;
            true
        } else {
            false
        }
    }

    /// Scroll up one line. Returns whether the position changed.
    pub fn scroll_up(&mut self) -> bool {
        if self.scroll_index > 0 {
            self.scroll_index -= 1;
            true
        } else {
            false
        }
    }
}

/// Split content into trimmed lines; blank lines stay as paragraph breaks
pub fn paginate(content: &str) -> Vec<String> {
    content.split('\n').map(|l| l.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_keeps_paragraph_breaks() {
        let lines = paginate("First para\r\n\r\n  Second para  \n");
        assert_eq!(lines, vec!["First para", "", "Second para", ""]);
    }

    #[test]
    fn test_open_text_resets_scroll() {
        let mut viewer = ViewerState::new();
        viewer.open_text("a\nb\nc");
        viewer.scroll_down();
        viewer.open_text("x\ny");
        assert_eq!(viewer.scroll_index(), 0);
        assert!(viewer.is_active());
        assert_eq!(viewer.image(), None);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut viewer = ViewerState::new();
        viewer.open_text("a\nb\nc");
        assert!(!viewer.scroll_up());
        assert!(viewer.scroll_down());
        assert!(viewer.scroll_down());
        assert!(!viewer.scroll_down());
        assert_eq!(viewer.scroll_index(), 2);
        assert_eq!(viewer.visible(15), ["c"]);
    }

    #[test]
    fn test_visible_page() {
        let mut viewer = ViewerState::new();
        let content: Vec<String> = (0..30).map(|i| format!("line {}", i)).collect();
        viewer.open_text(&content.join("\n"));
        assert_eq!(viewer.visible(15).len(), 15);
        assert_eq!(viewer.visible(15)[0], "line 0");
    }

    #[test]
    fn test_image_view() {
        let mut viewer = ViewerState::new();
        viewer.open_image("/images/Portrait.jpeg");
        assert_eq!(viewer.image(), Some("/images/Portrait.jpeg"));
        assert!(!viewer.scroll_down());
        viewer.close();
        assert!(!viewer.is_active());
    }
}
