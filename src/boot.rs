//! Boot sequence
//!
//! Reads optional configuration from the page, builds the session and its
//! collaborators, and hands them to the runtime.
//!
//! The page may provide either of these as JSON text:
//! - `<script type="application/json" id="retroterm-config">`
//! - `<script type="application/json" id="retroterm-tree">`

use crate::config::TerminalConfig;
use crate::console_log;
use crate::platform::web::{ImageCache, WebContentSource};
use crate::render::canvas::CanvasSurface;
use crate::runtime;
use crate::shell::TerminalSession;
use crate::vfs::DirectoryTree;

const CONFIG_ELEMENT: &str = "retroterm-config";
const TREE_ELEMENT: &str = "retroterm-tree";

/// Boot the terminal
pub fn boot() {
    let config = match embedded_json(CONFIG_ELEMENT) {
        Some(json) => TerminalConfig::from_json(&json).unwrap_or_else(|e| {
            web_sys::console::error_1(&format!("[boot] {}; using defaults", e).into());
            TerminalConfig::default()
        }),
        None => TerminalConfig::default(),
    };

    let tree = match embedded_json(TREE_ELEMENT) {
        Some(json) => DirectoryTree::from_json(&json).unwrap_or_else(|e| {
            web_sys::console::error_1(&format!("[boot] {}; using default tree", e).into());
            DirectoryTree::default()
        }),
        None => DirectoryTree::default(),
    };

    let images = ImageCache::default();
    let surface = match CanvasSurface::new(&config, images.clone()) {
        Ok(s) => s,
        Err(e) => {
            web_sys::console::error_1(&format!("[boot] Surface init failed: {}", e).into());
            return;
        }
    };
    let source = WebContentSource::new(config.content_root.clone(), images);

    console_log!(
        "[boot] {}x{} surface, {} scrollback rows",
        config.screen.width,
        config.screen.height,
        config.screen.row_budget()
    );

    // Start the runtime loop (this returns immediately, loop runs via rAF)
    runtime::start(TerminalSession::new(config, tree), surface, source);
}

/// Text of a page element, if present
fn embedded_json(id: &str) -> Option<String> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .text_content()
}
