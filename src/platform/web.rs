//! Browser Platform Implementation
//!
//! - Fetch API for text content
//! - `<img>` elements for images, kept in a cache the canvas draws from
//! - DOM keyboard events translated to [`KeyEvent`]

use super::{ContentSource, KeyEvent, LoadError};
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Loaded images by terminal path, shared with the canvas
pub type ImageCache = Rc<RefCell<HashMap<String, web_sys::HtmlImageElement>>>;

impl From<&web_sys::KeyboardEvent> for KeyEvent {
    fn from(event: &web_sys::KeyboardEvent) -> Self {
        Self {
            key: event.key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        }
    }
}

/// Content fetched over HTTP from the page's origin
pub struct WebContentSource {
    /// Prefix put in front of every path
    base: String,
    images: ImageCache,
}

impl WebContentSource {
    pub fn new(base: impl Into<String>, images: ImageCache) -> Self {
        Self {
            base: base.into(),
            images,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl ContentSource for WebContentSource {
    fn fetch_text(&self, path: &str) -> LocalBoxFuture<'static, Result<String, LoadError>> {
        Box::pin(fetch_text(self.url(path), path.to_string()))
    }

    fn load_image(&self, path: &str) -> LocalBoxFuture<'static, Result<(), LoadError>> {
        Box::pin(load_image(self.url(path), path.to_string(), self.images.clone()))
    }
}

fn js_error(e: JsValue) -> LoadError {
    LoadError::Network(format!("{:?}", e))
}

async fn fetch_text(url: String, path: String) -> Result<String, LoadError> {
    let window = web_sys::window().ok_or_else(|| LoadError::Network("no window object".into()))?;

    let resp: web_sys::Response = JsFuture::from(window.fetch_with_str(&url))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| LoadError::Decode("failed to cast response".into()))?;

    if !resp.ok() {
        return Err(LoadError::Http {
            status: resp.status(),
            path,
        });
    }

    JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .ok_or_else(|| LoadError::Decode(format!("{} is not text", path)))
}

/// Load an image through an `<img>` element and cache it on success
async fn load_image(url: String, path: String, images: ImageCache) -> Result<(), LoadError> {
    let img = web_sys::HtmlImageElement::new().map_err(js_error)?;

    // onload and onerror race to resolve the same channel
    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_load = {
        let tx = tx.clone();
        Closure::wrap(Box::new(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(true);
            }
        }) as Box<dyn FnMut()>)
    };
    let on_error = Closure::wrap(Box::new(move || {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(false);
        }
    }) as Box<dyn FnMut()>);

    img.set_onload(Some(on_load.as_ref().unchecked_ref()));
    img.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    img.set_src(&url);

    let loaded = rx.await.unwrap_or(false);
    img.set_onload(None);
    img.set_onerror(None);

    if loaded {
        images.borrow_mut().insert(path, img);
        Ok(())
    } else {
        Err(LoadError::Decode(format!("could not decode image at {}", url)))
    }
}
