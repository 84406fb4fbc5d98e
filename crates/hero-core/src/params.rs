//! Runtime parameters for one hero activation.
//!
//! Every field defaults to the matching value in [`crate::constants`]; front-ends
//! override individual fields (for example the model path read from the container).

use crate::constants::*;
use glam::Vec3;

#[derive(Clone, Debug)]
pub struct CameraParams {
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub look_at: Vec3,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            fov_deg: CAMERA_FOV_DEG,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            eye: CAMERA_EYE,
            look_at: CAMERA_LOOK_AT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BackdropParams {
    pub background_hex: u32,
    pub wall_hex: u32,
    pub floor_hex: u32,
    pub wall_size: [f32; 2],
    pub wall_z: f32,
    pub floor_size: [f32; 2],
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
}

impl Default for BackdropParams {
    fn default() -> Self {
        Self {
            background_hex: BACKGROUND_HEX,
            wall_hex: WALL_HEX,
            floor_hex: FLOOR_HEX,
            wall_size: [WALL_WIDTH, WALL_HEIGHT],
            wall_z: WALL_Z,
            floor_size: [FLOOR_WIDTH, FLOOR_DEPTH],
            roughness: BACKDROP_ROUGHNESS,
            metalness: BACKDROP_METALNESS,
            opacity: BACKDROP_OPACITY,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LightingParams {
    pub ambient_hex: u32,
    pub ambient_intensity: f32,
    pub spot_hex: u32,
    pub spot_intensity: f32,
    pub spot_position: Vec3,
    pub spot_angle: f32,
    pub spot_penumbra: f32,
    pub spot_decay: f32,
    pub spot_distance: f32,
    pub base_target: Vec3,
    pub shadow_map_size: u32,
    pub shadow_radius: f32,
    pub shadow_bias: f32,
    pub shadow_normal_bias: f32,
    pub shadow_near: f32,
    pub shadow_far: f32,
}

impl Default for LightingParams {
    fn default() -> Self {
        Self {
            ambient_hex: AMBIENT_HEX,
            ambient_intensity: AMBIENT_INTENSITY,
            spot_hex: SPOT_HEX,
            spot_intensity: SPOT_INTENSITY,
            spot_position: SPOT_POSITION,
            spot_angle: SPOT_ANGLE,
            spot_penumbra: SPOT_PENUMBRA,
            spot_decay: SPOT_DECAY,
            spot_distance: SPOT_DISTANCE,
            base_target: SPOT_BASE_TARGET,
            shadow_map_size: SHADOW_MAP_SIZE,
            shadow_radius: SHADOW_RADIUS,
            shadow_bias: SHADOW_BIAS,
            shadow_normal_bias: SHADOW_NORMAL_BIAS,
            shadow_near: SHADOW_NEAR,
            shadow_far: SHADOW_FAR,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ModelParams {
    pub path: String,
    pub desired_size: f32,
    /// Euler XYZ angles applied after normalization.
    pub rotation: Vec3,
    pub position: Vec3,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            path: MODEL_PATH.to_string(),
            desired_size: MODEL_DESIRED_SIZE,
            rotation: MODEL_ROTATION,
            position: MODEL_POSITION,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MotionParams {
    pub smoothing: f32,
    pub influence: f32,
    pub vertical_scale: f32,
    pub drag_sensitivity: f32,
    pub float_amplitude: f32,
    pub float_frequency: f32,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            smoothing: POINTER_SMOOTHING,
            influence: POINTER_INFLUENCE,
            vertical_scale: POINTER_VERTICAL_SCALE,
            drag_sensitivity: DRAG_SENSITIVITY,
            float_amplitude: FLOAT_AMPLITUDE,
            float_frequency: FLOAT_FREQUENCY,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct HeroParams {
    pub camera: CameraParams,
    pub backdrop: BackdropParams,
    pub lighting: LightingParams,
    pub model: ModelParams,
    pub motion: MotionParams,
}

impl HeroParams {
    pub fn with_model_path(mut self, path: impl Into<String>) -> Self {
        self.model.path = path.into();
        self
    }

    pub fn with_model_size(mut self, desired_size: f32) -> Self {
        if desired_size.is_finite() && desired_size > 0.0 {
            self.model.desired_size = desired_size;
        } else {
            log::warn!("[params] ignoring model size {}", desired_size);
        }
        self
    }
}
