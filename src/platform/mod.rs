//! Platform Abstraction Layer
//!
//! The terminal engine is platform-agnostic. A host supplies key events, a
//! clock, text measurement and painting (see [`crate::render`]), and a
//! [`ContentSource`] that loads file content and images:
//!
//! - Browser (via wasm-bindgen, web-sys): Fetch API, `<img>`, Canvas2D
//! - Native: a directory on disk, read with `std::fs`

#[cfg(target_arch = "wasm32")]
pub mod web;

use futures::future::LocalBoxFuture;
use std::path::PathBuf;

/// Content loading errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The server answered with a non-success status
    Http { status: u16, path: String },
    /// The request never completed
    Network(String),
    /// The content arrived but could not be decoded
    Decode(String),
    /// No content at this path
    NotFound(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Http { status, path } => write!(f, "HTTP {} for {}", status, path),
            LoadError::Network(s) => write!(f, "network error: {}", s),
            LoadError::Decode(s) => write!(f, "decode error: {}", s),
            LoadError::NotFound(p) => write!(f, "{} not found", p),
        }
    }
}

impl std::error::Error for LoadError {}

/// Key event from input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key value (e.g., "a", "Enter", "Backspace")
    pub key: String,
    /// Modifier keys
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyEvent {
    /// A key pressed without modifiers
    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            alt: false,
            meta: false,
        }
    }

    /// The character a single-character key types, if any
    pub fn printable(&self) -> Option<char> {
        if self.ctrl || self.meta {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_control() => Some(ch),
            _ => None,
        }
    }
}

/// Content-loading collaborator.
///
/// Paths are absolute terminal paths such as `/files/Notes.txt`. Both loads
/// are fire-and-forget from the terminal's point of view; the returned
/// futures are driven by the host.
pub trait ContentSource {
    /// Fetch a text file
    fn fetch_text(&self, path: &str) -> LocalBoxFuture<'static, Result<String, LoadError>>;

    /// Load an image so the surface can draw it
    fn load_image(&self, path: &str) -> LocalBoxFuture<'static, Result<(), LoadError>>;
}

/// Content served from a directory on disk
#[derive(Debug, Clone)]
pub struct LocalContentSource {
    root: PathBuf,
}

impl LocalContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl ContentSource for LocalContentSource {
    fn fetch_text(&self, path: &str) -> LocalBoxFuture<'static, Result<String, LoadError>> {
        let file = self.resolve(path);
        let path = path.to_string();
        Box::pin(async move {
            let bytes = std::fs::read(&file).map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LoadError::NotFound(path.clone()),
                _ => LoadError::Network(e.to_string()),
            })?;
            String::from_utf8(bytes).map_err(|e| LoadError::Decode(e.to_string()))
        })
    }

    fn load_image(&self, path: &str) -> LocalBoxFuture<'static, Result<(), LoadError>> {
        let file = self.resolve(path);
        let path = path.to_string();
        Box::pin(async move {
            if file.is_file() {
                Ok(())
            } else {
                Err(LoadError::NotFound(path))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_printable() {
        assert_eq!(KeyEvent::plain("a").printable(), Some('a'));
        assert_eq!(KeyEvent::plain(" ").printable(), Some(' '));
        assert_eq!(KeyEvent::plain("Enter").printable(), None);
        assert_eq!(KeyEvent::plain("").printable(), None);

        let ctrl_c = KeyEvent {
            ctrl: true,
            ..KeyEvent::plain("c")
        };
        assert_eq!(ctrl_c.printable(), None);
    }

    #[test]
    fn test_load_error_display() {
        let err = LoadError::Http {
            status: 404,
            path: "/files/x.txt".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404 for /files/x.txt");
    }

    #[test]
    fn test_local_source_missing_file() {
        let source = LocalContentSource::new(std::env::temp_dir().join("retroterm-no-such-dir"));
        let result = block_on(source.fetch_text("/files/Notes.txt"));
        assert_eq!(result, Err(LoadError::NotFound("/files/Notes.txt".into())));
        assert!(block_on(source.load_image("/images/a.jpg")).is_err());
    }

    #[test]
    fn test_local_source_reads_file() {
        let root = std::env::temp_dir().join(format!("retroterm-test-{}", std::process::id()));
        std::fs::create_dir_all(root.join("files")).unwrap();
        std::fs::write(root.join("files/Notes.txt"), "hello\nworld").unwrap();

        let source = LocalContentSource::new(&root);
        assert_eq!(
            block_on(source.fetch_text("/files/Notes.txt")).unwrap(),
            "hello\nworld"
        );

        let _ = std::fs::remove_dir_all(&root);
    }
}
