//! Pointer tracking: normalized position, smoothed offset and drag rotation.

use glam::Vec2;

/// Cursor affordance shown over the render surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Grab,
    Grabbing,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }
}

/// One pointer event in window pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub client_x: f32,
    pub client_y: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl PointerSample {
    pub fn new(client_x: f32, client_y: f32, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            client_x,
            client_y,
            viewport_width,
            viewport_height,
        }
    }
}

/// Map window pixels to [-1, 1] per axis with +y up.
pub fn normalize_pointer(sample: &PointerSample) -> Vec2 {
    let w = sample.viewport_width.max(1.0);
    let h = sample.viewport_height.max(1.0);
    Vec2::new(
        (sample.client_x / w) * 2.0 - 1.0,
        -(sample.client_y / h) * 2.0 + 1.0,
    )
}

#[derive(Clone, Debug)]
pub struct InteractionTracker {
    raw: Vec2,
    smoothed: Vec2,
    dragging: bool,
    last_x: f32,
    drag_rotation: f32,
    sensitivity: f32,
    smoothing: f32,
}

impl InteractionTracker {
    /// `smoothing` is the per-frame blend factor in (0, 1]; `sensitivity` is
    /// radians of rotation per horizontal pixel dragged.
    pub fn new(smoothing: f32, sensitivity: f32) -> Self {
        Self {
            raw: Vec2::ZERO,
            smoothed: Vec2::ZERO,
            dragging: false,
            last_x: 0.0,
            drag_rotation: 0.0,
            sensitivity,
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    pub fn raw(&self) -> Vec2 {
        self.raw
    }

    pub fn smoothed(&self) -> Vec2 {
        self.smoothed
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Accumulated rotation about the vertical axis, radians. Unbounded.
    pub fn drag_rotation(&self) -> f32 {
        self.drag_rotation
    }

    pub fn pointer_moved(&mut self, sample: &PointerSample) {
        self.raw = normalize_pointer(sample);
        if self.dragging {
            let dx = sample.client_x - self.last_x;
            self.drag_rotation += dx * self.sensitivity;
            self.last_x = sample.client_x;
        }
    }

    /// Start a drag when the press landed on the render surface. Returns the
    /// cursor to show, if it changes.
    pub fn pointer_pressed(&mut self, sample: &PointerSample, on_surface: bool) -> Option<Cursor> {
        if !on_surface {
            return None;
        }
        self.dragging = true;
        self.last_x = sample.client_x;
        Some(Cursor::Grabbing)
    }

    /// End any drag, wherever the pointer is.
    pub fn pointer_released(&mut self) -> Cursor {
        self.dragging = false;
        Cursor::Grab
    }

    /// Blend the smoothed offset one step toward the raw position.
    pub fn smooth(&mut self) -> Vec2 {
        self.smoothed += (self.raw - self.smoothed) * self.smoothing;
        self.smoothed
    }
}
