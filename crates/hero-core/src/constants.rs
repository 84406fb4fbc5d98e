use glam::Vec3;

// Visual tuning constants for the hero scene. `HeroParams::default()` is built from these.

// Camera
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 7.0, 15.0);
pub const CAMERA_LOOK_AT: Vec3 = Vec3::new(0.0, 6.5, 0.0);

// Backdrop
pub const BACKGROUND_HEX: u32 = 0xfafafa;
pub const WALL_HEX: u32 = 0xe8e7e9;
pub const FLOOR_HEX: u32 = 0x555555; // light enough for shadows to read
pub const WALL_WIDTH: f32 = 100.0;
pub const WALL_HEIGHT: f32 = 50.0;
pub const WALL_Z: f32 = -5.0;
pub const FLOOR_WIDTH: f32 = 100.0;
pub const FLOOR_DEPTH: f32 = 30.0;
pub const BACKDROP_ROUGHNESS: f32 = 0.9;
pub const BACKDROP_METALNESS: f32 = 0.1;
pub const BACKDROP_OPACITY: f32 = 0.5;

// Ambient fill
pub const AMBIENT_HEX: u32 = 0xffffff;
pub const AMBIENT_INTENSITY: f32 = 0.25;

// Spotlight
pub const SPOT_HEX: u32 = 0xffffff;
pub const SPOT_INTENSITY: f32 = 90.0;
pub const SPOT_POSITION: Vec3 = Vec3::new(-35.0, 25.0, 2.0); // top left
pub const SPOT_ANGLE: f32 = std::f32::consts::PI / 10.0; // ~18 degree cone
pub const SPOT_PENUMBRA: f32 = 0.1;
pub const SPOT_DECAY: f32 = 1.0;
pub const SPOT_DISTANCE: f32 = 0.0; // 0 = unbounded
pub const SPOT_BASE_TARGET: Vec3 = Vec3::new(3.5, 2.0, 2.5);

// Spotlight shadow
pub const SHADOW_MAP_SIZE: u32 = 2048;
pub const SHADOW_RADIUS: f32 = 4.0;
pub const SHADOW_BIAS: f32 = -0.0001; // shadow acne
pub const SHADOW_NORMAL_BIAS: f32 = 0.02;
pub const SHADOW_NEAR: f32 = 0.1;
pub const SHADOW_FAR: f32 = 100.0;

// Model
pub const MODEL_PATH: &str = "/concrete.glb";
pub const MODEL_DESIRED_SIZE: f32 = 4.5;
pub const MODEL_ROTATION: Vec3 = Vec3::new(0.6, 0.3, -0.4); // tilt, yaw, roll
pub const MODEL_POSITION: Vec3 = Vec3::new(3.5, 6.5, 2.5);

// Interaction and motion
pub const POINTER_SMOOTHING: f32 = 0.05; // per-frame blend, lower = slower
pub const POINTER_INFLUENCE: f32 = 3.0;
pub const POINTER_VERTICAL_SCALE: f32 = 0.5;
pub const DRAG_SENSITIVITY: f32 = 0.005; // radians per pixel
pub const FLOAT_AMPLITUDE: f32 = 0.25;
pub const FLOAT_FREQUENCY: f32 = 0.7; // rad/s
