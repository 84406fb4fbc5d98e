//! Per-frame motion: spotlight aim, model float and drag rotation.

use crate::asset::ModelGroup;
use crate::interaction::InteractionTracker;
use crate::params::MotionParams;
use crate::stage::Stage;
use glam::{Vec2, Vec3};
use instant::Instant;

/// Monotonic wall clock started with the scene.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

#[derive(Clone, Debug)]
pub struct AnimationDriver {
    motion: MotionParams,
    base_target: Vec3,
}

impl AnimationDriver {
    pub fn new(motion: MotionParams, base_target: Vec3) -> Self {
        Self {
            motion,
            base_target,
        }
    }

    /// Aim point for the spotlight given the smoothed pointer offset.
    pub fn spotlight_target(&self, smoothed: Vec2) -> Vec3 {
        let k = self.motion.influence;
        self.base_target
            + Vec3::new(
                smoothed.x * k,
                smoothed.y * k * self.motion.vertical_scale,
                0.0,
            )
    }

    /// Group height at `elapsed` seconds.
    pub fn float_height(&self, base: f32, elapsed: f32) -> f32 {
        base + (elapsed * self.motion.float_frequency).sin() * self.motion.float_amplitude
    }

    /// Model rotation: initial x/z kept, drag added to the initial y.
    pub fn model_rotation(initial: Vec3, drag: f32) -> Vec3 {
        Vec3::new(initial.x, initial.y + drag, initial.z)
    }

    /// Advance one frame. Order matters: smoothing, then the spotlight
    /// target, then the model transform.
    pub fn step(
        &self,
        tracker: &mut InteractionTracker,
        stage: &mut Stage,
        model: Option<&ModelGroup>,
        elapsed: f32,
    ) {
        let smoothed = tracker.smooth();
        stage.set_spot_target(self.spotlight_target(smoothed));

        let Some(model) = model else {
            return;
        };
        let height = self.float_height(model.base_height, elapsed);
        let rotation = Self::model_rotation(model.initial_rotation, tracker.drag_rotation());
        let scene = &mut stage.scene;
        if let Some(group) = scene.node_mut(model.group) {
            group.transform.position.y = height;
        }
        if let Some(node) = scene.node_mut(model.model) {
            node.transform.set_euler(rotation);
        }
        scene.update_world(model.group);
    }
}
