//! Browser runtime integration
//!
//! Bridges the terminal session to the browser's event loop:
//! - requestAnimationFrame drives the blink tick and redraws
//! - keydown events are fed to the session
//! - load requests are spawned as futures and completed back into the session

use crate::console_log;
use crate::platform::web::WebContentSource;
use crate::platform::KeyEvent;
use crate::render::canvas::CanvasSurface;
use crate::shell::{fulfil, LoadCompletion, TerminalSession};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// State for the animation frame loop
struct RuntimeState {
    /// Callback for requestAnimationFrame (stored to prevent GC)
    frame_closure: Option<Closure<dyn FnMut(f64)>>,
    running: bool,
    /// Something changed since the last paint
    dirty: bool,
    session: Option<TerminalSession>,
    surface: Option<CanvasSurface>,
    source: Option<WebContentSource>,
}

thread_local! {
    static STATE: RefCell<RuntimeState> = RefCell::new(RuntimeState {
        frame_closure: None,
        running: false,
        dirty: false,
        session: None,
        surface: None,
        source: None,
    });
}

/// Start the runtime loop with a ready session, surface and content source
pub fn start(session: TerminalSession, surface: CanvasSurface, source: WebContentSource) {
    let already_running = STATE.with(|state| {
        let mut state = state.borrow_mut();
        if state.running {
            return true;
        }
        state.running = true;
        state.dirty = true;
        state.session = Some(session);
        state.surface = Some(surface);
        state.source = Some(source);
        false
    });

    if already_running {
        console_log!("[runtime] Already running");
        return;
    }

    console_log!("[runtime] Starting frame loop...");
    setup_event_listeners();
    request_animation_frame();
}

/// Request the next animation frame
fn request_animation_frame() {
    let window = match web_sys::window() {
        Some(w) => w,
        None => {
            console_log!("[runtime] No window object");
            return;
        }
    };

    let closure = Closure::wrap(Box::new(move |timestamp: f64| {
        frame_tick(timestamp);
    }) as Box<dyn FnMut(f64)>);

    STATE.with(|state| {
        let mut state = state.borrow_mut();
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        state.frame_closure = Some(closure);
    });
}

/// Called every frame by requestAnimationFrame
fn frame_tick(timestamp: f64) {
    let should_continue = STATE.with(|state| {
        let mut state = state.borrow_mut();
        if !state.running {
            return false;
        }
        let state = &mut *state;
        if let Some(session) = state.session.as_mut() {
            if session.tick(timestamp) {
                state.dirty = true;
            }
        }
        true
    });

    if !should_continue {
        return;
    }

    pump();
    request_animation_frame();
}

/// Start any queued load, hand off visualizer requests, and repaint if needed
fn pump() {
    STATE.with(|state| {
        let mut state = state.borrow_mut();
        let state = &mut *state;
        let Some(session) = state.session.as_mut() else {
            return;
        };

        let request = session.take_load_request();
        if let (Some(request), Some(source)) = (request, state.source.as_ref()) {
            console_log!("[load] {} {:?}", request.path, request.kind);
            let load = fulfil(request, source);
            wasm_bindgen_futures::spawn_local(async move {
                let completion = load.await;
                complete_load(completion);
            });
        }

        if let Some(numbers) = session.take_visualization() {
            console_log!("[runtime] visualizer requested for {:?}", numbers);
        }

        if state.dirty {
            if let Some(surface) = state.surface.as_mut() {
                session.render(surface);
            }
            state.dirty = false;
        }
    });
}

fn complete_load(completion: LoadCompletion) {
    STATE.with(|state| {
        let mut state = state.borrow_mut();
        let state = &mut *state;
        if let Some(session) = state.session.as_mut() {
            if session.complete_load(completion) {
                state.dirty = true;
            }
        }
    });
}

fn handle_key(event: &web_sys::KeyboardEvent) {
    let key = KeyEvent::from(event);
    let consumed = STATE.with(|state| {
        let mut state = state.borrow_mut();
        let state = &mut *state;
        let Some(session) = state.session.as_mut() else {
            return false;
        };
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now);
        // Asked before handling: `q` leaves the viewer
        let consumed = session.consumes_key(&key);
        state.dirty |= session.handle_key(&key, now);
        consumed
    });

    // Keep the page from scrolling or navigating on keys the terminal owns
    if consumed {
        event.prevent_default();
    }
    pump();
}

/// Set up event listeners for input
fn setup_event_listeners() {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return,
    };

    let document = match window.document() {
        Some(d) => d,
        None => return,
    };

    let closure = Closure::wrap(Box::new(|event: web_sys::KeyboardEvent| {
        handle_key(&event);
    }) as Box<dyn FnMut(_)>);

    let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget(); // Leak intentionally - lives for page lifetime

    console_log!("[runtime] Event listeners installed");
}
