// Web front-end constants. Scene tuning lives in `hero_core::constants`.

// Container attributes read once at mount
pub const MODEL_URL_ATTR: &str = "data-model-url";
pub const MODEL_SIZE_ATTR: &str = "data-model-size";

// Canvas created inside the container
pub const CANVAS_CLASS: &str = "hero-canvas";
pub const CANVAS_STYLE: &str = "display:block;width:100%;height:100%;touch-action:none;";

// Window events
pub const EV_POINTER_MOVE: &str = "pointermove";
pub const EV_POINTER_DOWN: &str = "pointerdown";
pub const EV_POINTER_UP: &str = "pointerup";
pub const EV_RESIZE: &str = "resize";

// WebGPU
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
