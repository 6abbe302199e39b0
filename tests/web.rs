//! Browser tests for the Canvas2D surface
//!
//! Run with: wasm-pack test --headless --firefox

#![cfg(target_arch = "wasm32")]

use retroterm::config::TerminalConfig;
use retroterm::layout::{FontSpec, TextMeasurer};
use retroterm::platform::KeyEvent;
use retroterm::platform::web::ImageCache;
use retroterm::render::canvas::CanvasSurface;
use retroterm::shell::TerminalSession;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_surface_matches_config_size() {
    let config = TerminalConfig::default();
    let surface = CanvasSurface::new(&config, ImageCache::default()).unwrap();
    assert_eq!(surface.canvas().width(), 512);
    assert_eq!(surface.canvas().height(), 512);
}

#[wasm_bindgen_test]
fn test_canvas_measures_text() {
    let config = TerminalConfig::default();
    let surface = CanvasSurface::new(&config, ImageCache::default()).unwrap();
    let font = FontSpec::monospace(18.0);

    assert_eq!(surface.measure_width("", &font), 0.0);
    let one = surface.measure_width("a", &font);
    let ten = surface.measure_width("aaaaaaaaaa", &font);
    assert!(one > 0.0);
    assert!((ten - one * 10.0).abs() < 1.0);
}

#[wasm_bindgen_test]
fn test_session_renders_to_canvas() {
    let config = TerminalConfig::default();
    let mut surface = CanvasSurface::new(&config, ImageCache::default()).unwrap();
    let mut session = TerminalSession::default();

    for ch in "ls".chars() {
        session.handle_key(&KeyEvent::plain(ch.to_string()), 0.0);
    }
    session.handle_key(&KeyEvent::plain("Enter"), 0.0);
    session.render(&mut surface);

    assert_eq!(session.lines().len(), 2);
}
