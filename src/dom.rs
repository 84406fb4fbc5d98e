use crate::constants::{CANVAS_CLASS, CANVAS_STYLE, MODEL_SIZE_ATTR, MODEL_URL_ATTR};
use crate::input;
use hero_core::HeroParams;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn container(document: &web::Document, id: &str) -> Option<web::HtmlElement> {
    document
        .get_element_by_id(id)?
        .dyn_into::<web::HtmlElement>()
        .ok()
}

pub fn create_canvas(document: &web::Document) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("create canvas: {:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("not a canvas: {:?}", e))?;
    canvas.set_class_name(CANVAS_CLASS);
    _ = canvas.set_attribute("style", CANVAS_STYLE);
    Ok(canvas)
}

/// Match the canvas backing store to the container's CSS size times
/// `devicePixelRatio`. Returns the new size in physical pixels.
pub fn sync_canvas_backing_size(
    container: &web::HtmlElement,
    canvas: &web::HtmlCanvasElement,
) -> (u32, u32) {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let rect = container.get_bounding_client_rect();
    let (w, h) = input::backing_size(rect.width(), rect.height(), dpr);
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
    (w, h)
}

/// Window inner size in CSS pixels.
pub fn viewport_size(window: &web::Window) -> (f64, f64) {
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1.0);
    (w, h)
}

/// Defaults plus any overrides set on the container element.
pub fn read_params(container: &web::HtmlElement) -> HeroParams {
    let mut params = HeroParams::default();
    if let Some(raw) = container.get_attribute(MODEL_URL_ATTR) {
        if let Some(url) = input::parse_model_url(&raw) {
            params = params.with_model_path(url);
        }
    }
    if let Some(raw) = container.get_attribute(MODEL_SIZE_ATTR) {
        match input::parse_model_size(&raw) {
            Some(size) => params = params.with_model_size(size),
            None => log::warn!("[mount] ignoring {}={:?}", MODEL_SIZE_ATTR, raw),
        }
    }
    params
}
