// Pure helpers for DOM input. Kept free of web-sys so host tests can include
// this file directly.

use hero_core::PointerSample;

/// Pointer event position against the window's inner size.
#[inline]
pub fn pointer_sample(client_x: f64, client_y: f64, inner_width: f64, inner_height: f64) -> PointerSample {
    PointerSample::new(
        client_x as f32,
        client_y as f32,
        inner_width as f32,
        inner_height as f32,
    )
}

/// Backing-store size in physical pixels for a CSS box; never zero.
pub fn backing_size(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> (u32, u32) {
    let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    let w = (css_width.max(0.0) * dpr).round() as u32;
    let h = (css_height.max(0.0) * dpr).round() as u32;
    (w.max(1), h.max(1))
}

/// Parse a `data-model-size` value.
pub fn parse_model_size(raw: &str) -> Option<f32> {
    raw.trim().parse::<f32>().ok()
}

/// Non-blank `data-model-url` value, trimmed.
pub fn parse_model_url(raw: &str) -> Option<&str> {
    let url = raw.trim();
    (!url.is_empty()).then_some(url)
}
