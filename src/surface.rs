use crate::dom;
use hero_core::{Cursor, HeroError, Surface};
use wasm_bindgen::JsCast;
use web_sys as web;

/// The canvas the hero draws into, inserted into its container element.
pub struct WebSurface {
    container: web::HtmlElement,
    canvas: web::HtmlCanvasElement,
}

impl WebSurface {
    /// Create a canvas and append it to `container`.
    pub fn attach(document: &web::Document, container: web::HtmlElement) -> anyhow::Result<Self> {
        let canvas = dom::create_canvas(document)?;
        container
            .append_child(&canvas)
            .map_err(|e| anyhow::anyhow!("append canvas: {:?}", e))?;
        Ok(Self { container, canvas })
    }

    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }

    /// Resize the backing store to the container and return the new size.
    pub fn sync_size(&self) -> (u32, u32) {
        dom::sync_canvas_backing_size(&self.container, &self.canvas)
    }

    /// Whether an event target is the canvas or inside it.
    pub fn contains(&self, target: Option<web::EventTarget>) -> bool {
        target
            .and_then(|t| t.dyn_into::<web::Node>().ok())
            .map(|node| {
                let canvas: &web::Node = self.canvas.as_ref();
                canvas.contains(Some(&node))
            })
            .unwrap_or(false)
    }
}

impl Surface for WebSurface {
    fn set_cursor(&self, cursor: Cursor) {
        if let Err(e) = self.canvas.style().set_property("cursor", cursor.css()) {
            log::debug!("[surface] cursor not set: {:?}", e);
        }
    }

    fn detach(&self) -> Result<(), HeroError> {
        let canvas: &web::Node = self.canvas.as_ref();
        if !self.container.contains(Some(canvas)) {
            return Err(HeroError::Detached);
        }
        self.container
            .remove_child(canvas)
            .map(|_| ())
            .map_err(|e| HeroError::Surface(format!("{:?}", e)))
    }
}
