//! retroterm - a retro text terminal drawn onto a texture surface
//!
//! A fixed-size canvas shows a banner, a scrollback of commands and their
//! responses, and a prompt with a blinking cursor. Commands browse a small
//! static directory tree; text files open in a pager, images full-screen.
//!
//! The engine is platform-agnostic:
//! - `layout`: word wrapping, cursor placement, scrollback fitting
//! - `shell`: line editing, the interpreter, the pager, the session
//! - `render`: frames of positioned text, and sinks that paint them
//! - `vfs`: the directory tree
//! - `platform`: key events and content loading
//!
//! Platform support:
//! - Browser (wasm32-unknown-unknown): Canvas2D texture, Fetch API
//! - Native: `retroterm-cli`, a line-driven console front end

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod config;
pub mod layout;
pub mod platform;
pub mod render;
pub mod shell;
pub mod vfs;

pub use config::TerminalConfig;
pub use shell::TerminalSession;
pub use vfs::DirectoryTree;

#[cfg(target_arch = "wasm32")]
mod boot;

#[cfg(target_arch = "wasm32")]
mod runtime;

/// Initialize panic hook for better error messages in browser console
#[cfg(target_arch = "wasm32")]
fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Boot the terminal. This is the WASM entry point.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    init_panic_hook();
    boot::boot();
}

/// Console logging helper
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

/// Log to browser console (WASM)
#[cfg(target_arch = "wasm32")]
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => {
        $crate::log(&format!($($t)*))
    };
}

/// Log to stderr (native)
#[cfg(not(target_arch = "wasm32"))]
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => {
        eprintln!($($t)*)
    };
}
