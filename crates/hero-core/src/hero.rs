//! One activation of the hero scene: the state every callback acts on.
//!
//! All entry points check the mount lifetime first, so callbacks that fire
//! after teardown (late pointer events, a queued frame, a model that finished
//! downloading) leave the scene untouched and never reach the renderer.

use crate::animation::{AnimationDriver, Clock};
use crate::asset::{self, ModelAsset, ModelGroup};
use crate::camera::Camera;
use crate::error::HeroError;
use crate::interaction::{Cursor, InteractionTracker, PointerSample};
use crate::lifecycle::Lifetime;
use crate::params::HeroParams;
use crate::render::{FrameStatus, Renderer};
use crate::scene::{Node, NodeId, NodeKind, SceneGraph};
use crate::stage::Stage;

pub struct Hero<R: Renderer> {
    params: HeroParams,
    lifetime: Lifetime,
    stage: Stage,
    camera: Camera,
    tracker: InteractionTracker,
    driver: AnimationDriver,
    clock: Clock,
    model: Option<ModelGroup>,
    renderer: R,
    frames: u64,
    disposed: bool,
}

impl<R: Renderer> Hero<R> {
    pub fn new(params: HeroParams, lifetime: Lifetime, renderer: R, width: u32, height: u32) -> Self {
        let stage = Stage::build(&params);
        let camera = Camera::from_params(&params.camera, width, height);
        let tracker = InteractionTracker::new(params.motion.smoothing, params.motion.drag_sensitivity);
        let driver = AnimationDriver::new(params.motion.clone(), params.lighting.base_target);
        let mut renderer = renderer;
        renderer.resize(width, height);
        Self {
            params,
            lifetime,
            stage,
            camera,
            tracker,
            driver,
            clock: Clock::start(),
            model: None,
            renderer,
            frames: 0,
            disposed: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lifetime.is_alive() && !self.disposed
    }

    pub fn params(&self) -> &HeroParams {
        &self.params
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.stage.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn tracker(&self) -> &InteractionTracker {
        &self.tracker
    }

    pub fn model(&self) -> Option<&ModelGroup> {
        self.model.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Frames the renderer actually presented.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    // ---------------- input ----------------

    pub fn pointer_moved(&mut self, sample: &PointerSample) {
        if !self.is_alive() {
            return;
        }
        self.tracker.pointer_moved(sample);
    }

    pub fn pointer_pressed(&mut self, sample: &PointerSample, on_surface: bool) -> Option<Cursor> {
        if !self.is_alive() {
            return None;
        }
        self.tracker.pointer_pressed(sample, on_surface)
    }

    pub fn pointer_released(&mut self) -> Option<Cursor> {
        if !self.is_alive() {
            return None;
        }
        Some(self.tracker.pointer_released())
    }

    pub fn resized(&mut self, width: u32, height: u32) {
        if !self.is_alive() {
            return;
        }
        self.camera.set_viewport(width, height);
        self.renderer.resize(width, height);
        log::debug!("[resize] {}x{}", width, height);
    }

    // ---------------- asset ----------------

    /// Completion of the model download. Bytes that arrive after teardown are
    /// dropped unparsed.
    pub fn model_fetched(&mut self, bytes: Result<Vec<u8>, HeroError>) -> bool {
        if !self.is_alive() {
            log::debug!("[asset] {} arrived after teardown; discarded", self.params.model.path);
            return false;
        }
        self.model_loaded(bytes.and_then(|b| ModelAsset::from_glb(&b)))
    }

    /// Completion of the model request. Returns whether a model was installed.
    pub fn model_loaded(&mut self, result: Result<ModelAsset, HeroError>) -> bool {
        if !self.is_alive() {
            log::debug!("[asset] model resolved after teardown; discarded");
            return false;
        }
        let asset = match result {
            Ok(asset) => asset,
            Err(e) => {
                log::error!("[asset] failed to load {}: {}", self.params.model.path, e);
                return false;
            }
        };
        if self.model.is_some() {
            log::warn!("[asset] model already installed; ignoring {}", self.params.model.path);
            return false;
        }
        match asset::install(&mut self.stage.scene, &asset, &self.params.model) {
            Ok(group) => {
                self.model = Some(group);
                true
            }
            Err(e) => {
                log::error!("[asset] failed to install {}: {}", self.params.model.path, e);
                false
            }
        }
    }

    // ---------------- frame ----------------

    /// Animate and render using wall-clock time since activation.
    pub fn frame(&mut self) -> bool {
        let elapsed = self.clock.elapsed_secs();
        self.advance(elapsed)
    }

    /// Animate to `elapsed` seconds and render. Returns whether a frame was presented.
    pub fn advance(&mut self, elapsed: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.driver
            .step(&mut self.tracker, &mut self.stage, self.model.as_ref(), elapsed);
        match self.renderer.render(&self.stage.scene, &self.camera) {
            Ok(FrameStatus::Presented) => {
                self.frames += 1;
                true
            }
            Ok(FrameStatus::Skipped) => {
                log::debug!("[frame] skipped");
                false
            }
            Err(e) => {
                log::warn!("[frame] render failed: {}", e);
                false
            }
        }
    }

    // ---------------- teardown ----------------

    /// Release everything this activation created: model meshes, then the
    /// backdrop, then the lights, then the renderer. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        let mut meshes = 0;
        if let Some(model) = self.model.take() {
            let removed = self.stage.scene.remove_subtree(model.group);
            meshes += dispose_meshes(&mut self.stage.scene, &mut self.renderer, removed);
        }
        let backdrop = self.stage.remove_backdrop();
        meshes += dispose_meshes(&mut self.stage.scene, &mut self.renderer, backdrop);
        let lights = self.stage.remove_lights();
        self.renderer.release();

        log::info!(
            "[lifecycle] disposed {} meshes and {} light nodes after {} frames",
            meshes,
            lights,
            self.frames
        );
    }
}

/// Free the geometry and every material of each mesh among `nodes`. Other
/// node kinds carry no GPU resources. Shared resources are freed once.
fn dispose_meshes<R: Renderer>(
    scene: &mut SceneGraph,
    renderer: &mut R,
    nodes: Vec<(NodeId, Node)>,
) -> usize {
    let mut count = 0;
    for (_, node) in nodes {
        let NodeKind::Mesh(mesh) = node.kind else {
            continue;
        };
        if scene.remove_geometry(mesh.geometry).is_some() {
            renderer.dispose_geometry(mesh.geometry);
        }
        for material in mesh.materials.iter() {
            if scene.remove_material(material).is_some() {
                renderer.dispose_material(material);
            }
        }
        count += 1;
    }
    count
}
