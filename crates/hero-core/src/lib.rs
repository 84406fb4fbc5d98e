//! Platform-neutral core of the interactive hero scene: scene graph, model
//! normalization, interaction and animation state, and the activation /
//! teardown lifecycle. Front-ends supply a [`Renderer`], a [`Surface`] and a
//! [`Host`].

pub mod animation;
pub mod asset;
pub mod bounds;
pub mod camera;
pub mod color;
pub mod constants;
pub mod error;
pub mod hero;
pub mod interaction;
pub mod lifecycle;
pub mod params;
pub mod render;
pub mod scene;
pub mod stage;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static SHADOW_WGSL: &str = include_str!("../shaders/shadow.wgsl");

pub use animation::{AnimationDriver, Clock};
pub use asset::{install, ModelAsset, ModelGroup};
pub use bounds::{Aabb, Normalization};
pub use camera::Camera;
pub use error::HeroError;
pub use hero::Hero;
pub use interaction::{normalize_pointer, Cursor, InteractionTracker, PointerSample};
pub use lifecycle::{activate, CancelToken, FrameLoop, Host, Lifetime, Mount, SharedHero, Subscription};
pub use params::HeroParams;
pub use render::{collect_draws, DrawItem, FrameStatus, Renderer, SceneLights, SpotSnapshot, Surface};
pub use scene::{GeometryId, MaterialId, NodeId, SceneGraph};
pub use stage::Stage;
