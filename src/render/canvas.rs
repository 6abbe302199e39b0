//! Canvas2D texture surface
//!
//! The terminal paints into an off-screen sized canvas that the page can use
//! as a texture. Measuring and painting go through the same 2D context so
//! layout widths match what is drawn.

use super::{Frame, RenderSink};
use crate::config::{Palette, TerminalConfig};
use crate::layout::{FontSpec, TextMeasurer};
use crate::platform::web::ImageCache;
use wasm_bindgen::JsCast;

/// Id the canvas is looked up by, or created with
pub const CANVAS_ID: &str = "retroterm-canvas";

/// The rendering surface
pub struct CanvasSurface {
    canvas: web_sys::HtmlCanvasElement,
    ctx: web_sys::CanvasRenderingContext2d,
    palette: Palette,
    images: ImageCache,
}

impl CanvasSurface {
    /// Attach to the canvas with [`CANVAS_ID`], creating it if the page has none
    pub fn new(config: &TerminalConfig, images: ImageCache) -> Result<Self, String> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;

        let canvas = match document.get_element_by_id(CANVAS_ID) {
            Some(el) => el,
            None => {
                let el = document
                    .create_element("canvas")
                    .map_err(|_| "Failed to create canvas")?;
                el.set_id(CANVAS_ID);
                document
                    .body()
                    .ok_or("No body")?
                    .append_child(&el)
                    .map_err(|_| "Failed to append canvas")?;
                el
            }
        }
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| "Not a canvas")?;

        canvas.set_width(config.screen.width);
        canvas.set_height(config.screen.height);

        let ctx = canvas
            .get_context("2d")
            .map_err(|_| "Failed to get context")?
            .ok_or("No context")?
            .dyn_into::<web_sys::CanvasRenderingContext2d>()
            .map_err(|_| "Not a 2D context")?;

        Ok(Self {
            canvas,
            ctx,
            palette: config.palette.clone(),
            images,
        })
    }

    pub fn canvas(&self) -> &web_sys::HtmlCanvasElement {
        &self.canvas
    }

    fn clear(&self) {
        self.ctx.set_fill_style_str(&self.palette.background);
        self.ctx.fill_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn draw_image(&self, path: &str) {
        let images = self.images.borrow();
        let Some(img) = images.get(path) else {
            web_sys::console::error_1(&format!("[canvas] image {} not loaded", path).into());
            return;
        };
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }
}

impl TextMeasurer for CanvasSurface {
    fn measure_width(&self, text: &str, font: &FontSpec) -> f64 {
        self.ctx.set_font(&font.css());
        self.ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
    }
}

impl RenderSink for CanvasSurface {
    fn paint(&mut self, frame: &Frame) {
        self.clear();

        let font = match frame {
            Frame::Terminal(t) => &t.font,
            Frame::Viewer(v) => {
                if let Some(path) = &v.image {
                    self.draw_image(path);
                }
                &v.font
            }
        };

        self.ctx.set_font(&font.css());
        self.ctx.set_text_baseline("top");
        for run in frame.runs() {
            self.ctx.set_fill_style_str(run.tag.css(&self.palette));
            let _ = self.ctx.fill_text(&run.text, run.x, run.y);
        }
    }
}
