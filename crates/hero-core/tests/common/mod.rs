// Shared fakes for the integration tests: a renderer, surface and host that
// record what the core asks of them, plus a tiny GLB writer.

#![allow(dead_code)]

use hero_core::asset::{AssetMesh, AssetNode, ModelAsset};
use hero_core::lifecycle::{CancelToken, FrameLoop, Host, SharedHero, Subscription};
use hero_core::scene::{DrawGroup, Geometry, Material, SceneGraph, Transform};
use hero_core::{Camera, Cursor, FrameStatus, GeometryId, HeroError, MaterialId, Renderer, Surface};
use smallvec::smallvec;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default, Debug)]
pub struct Calls {
    pub events: Vec<String>,
    pub renders: usize,
    pub resizes: Vec<(u32, u32)>,
    pub geometries: Vec<GeometryId>,
    pub materials: Vec<MaterialId>,
    pub releases: usize,
    pub models_requested: Vec<String>,
    /// Report frames as skipped, like a surface being reconfigured.
    pub skip_frames: bool,
}

pub type CallLog = Rc<RefCell<Calls>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Calls::default()))
}

pub struct RecordingRenderer {
    pub log: CallLog,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, _scene: &SceneGraph, _camera: &Camera) -> Result<FrameStatus, HeroError> {
        let mut log = self.log.borrow_mut();
        log.renders += 1;
        Ok(if log.skip_frames {
            FrameStatus::Skipped
        } else {
            FrameStatus::Presented
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().resizes.push((width, height));
    }

    fn dispose_geometry(&mut self, id: GeometryId) {
        let mut log = self.log.borrow_mut();
        log.geometries.push(id);
        log.events.push("dispose-geometry".into());
    }

    fn dispose_material(&mut self, id: MaterialId) {
        let mut log = self.log.borrow_mut();
        log.materials.push(id);
        log.events.push("dispose-material".into());
    }

    fn release(&mut self) {
        let mut log = self.log.borrow_mut();
        log.releases += 1;
        log.events.push("release".into());
    }
}

pub struct FakeSurface {
    pub attached: Cell<bool>,
    pub cursor: Cell<Option<Cursor>>,
    pub log: CallLog,
}

impl FakeSurface {
    pub fn new(log: &CallLog) -> Rc<Self> {
        Rc::new(Self {
            attached: Cell::new(true),
            cursor: Cell::new(None),
            log: log.clone(),
        })
    }
}

impl Surface for FakeSurface {
    fn set_cursor(&self, cursor: Cursor) {
        self.cursor.set(Some(cursor));
    }

    fn detach(&self) -> Result<(), HeroError> {
        if self.attached.replace(false) {
            self.log.borrow_mut().events.push("detach".into());
            Ok(())
        } else {
            Err(HeroError::Detached)
        }
    }
}

/// Keeps a handle on the hero the way real listeners do, so tests can fire
/// "late" callbacks after teardown.
pub struct FakeHost {
    pub log: CallLog,
    pub hero: Option<SharedHero<RecordingRenderer>>,
    pub surface: Option<Rc<FakeSurface>>,
    pub frame_token: Option<CancelToken>,
}

impl FakeHost {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            hero: None,
            surface: None,
            frame_token: None,
        }
    }

    fn subscription(&self, label: &'static str) -> Subscription {
        let log = self.log.clone();
        Subscription::new(label, move || {
            log.borrow_mut().events.push(format!("unsubscribe:{label}"));
        })
    }
}

impl Host for FakeHost {
    type Renderer = RecordingRenderer;
    type Surface = FakeSurface;

    fn subscribe_input(
        &mut self,
        hero: &SharedHero<RecordingRenderer>,
        surface: &Rc<FakeSurface>,
    ) -> Vec<Subscription> {
        self.hero = Some(hero.clone());
        self.surface = Some(surface.clone());
        vec![
            self.subscription("pointermove"),
            self.subscription("pointerdown"),
            self.subscription("pointerup"),
        ]
    }

    fn subscribe_resize(&mut self, _hero: &SharedHero<RecordingRenderer>) -> Subscription {
        self.subscription("resize")
    }

    fn start_frames(&mut self, _hero: &SharedHero<RecordingRenderer>) -> FrameLoop {
        let token = CancelToken::new();
        self.frame_token = Some(token.clone());
        let log = self.log.clone();
        FrameLoop::new(token, move || log.borrow_mut().events.push("cancel-frames".into()))
    }

    fn request_model(&mut self, path: &str, _hero: &SharedHero<RecordingRenderer>) {
        self.log.borrow_mut().models_requested.push(path.to_string());
    }
}

/// A box from (1,1,1) to (3,5,3) split into two draw groups with their own
/// materials, the second one transparent.
pub fn two_material_box() -> ModelAsset {
    let mut geometry = Geometry {
        positions: vec![
            [1.0, 1.0, 1.0],
            [3.0, 1.0, 1.0],
            [3.0, 5.0, 1.0],
            [1.0, 5.0, 1.0],
            [1.0, 1.0, 3.0],
            [3.0, 1.0, 3.0],
            [3.0, 5.0, 3.0],
            [1.0, 5.0, 3.0],
        ],
        normals: Vec::new(),
        indices: vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7],
        groups: smallvec![
            DrawGroup {
                start: 0,
                count: 6,
                material_index: 0,
            },
            DrawGroup {
                start: 6,
                count: 6,
                material_index: 1,
            },
        ],
    };
    geometry.compute_normals();
    ModelAsset {
        name: Some("box".into()),
        nodes: vec![AssetNode {
            name: Some("box".into()),
            transform: Transform::IDENTITY,
            mesh: Some(AssetMesh {
                geometry: 0,
                materials: smallvec![0, 1],
            }),
            children: Vec::new(),
        }],
        roots: vec![0],
        geometries: vec![geometry],
        materials: vec![
            Material::default(),
            Material {
                opacity: 0.4,
                transparent: true,
                ..Material::default()
            },
        ],
    }
}

/// Assemble a binary glTF container from a JSON document and its BIN chunk.
pub fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }
    let total = 12 + 8 + json.len() + if bin.is_empty() { 0 } else { 8 + bin.len() };

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json);
    if !bin.is_empty() {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
    }
    out
}

const BOX_CORNERS: [[f32; 3]; 8] = [
    [1.0, 1.0, 1.0],
    [3.0, 1.0, 1.0],
    [3.0, 5.0, 1.0],
    [1.0, 5.0, 1.0],
    [1.0, 1.0, 3.0],
    [3.0, 1.0, 3.0],
    [3.0, 5.0, 3.0],
    [1.0, 5.0, 3.0],
];

fn box_bin() -> Vec<u8> {
    let mut bin = Vec::new();
    for p in BOX_CORNERS {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u32, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin
}

/// The same box as a GLB, under a root node translated by +10 on x, with one
/// mesh of two primitives. `mode` is the glTF primitive mode (4 = triangles).
pub fn box_glb(mode: u32) -> Vec<u8> {
    let json = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "name": "box-scene", "nodes": [0] }}],
  "nodes": [
    {{ "name": "root", "translation": [10.0, 0.0, 0.0], "children": [1] }},
    {{ "name": "box", "mesh": 0 }}
  ],
  "meshes": [{{
    "primitives": [
      {{ "attributes": {{ "POSITION": 0 }}, "indices": 1, "material": 0, "mode": {mode} }},
      {{ "attributes": {{ "POSITION": 0 }}, "indices": 2, "material": 1, "mode": {mode} }}
    ]
  }}],
  "materials": [
    {{ "name": "stone", "pbrMetallicRoughness": {{ "baseColorFactor": [0.5, 0.5, 0.5, 1.0], "metallicFactor": 0.0, "roughnessFactor": 0.8 }} }},
    {{ "name": "glass", "pbrMetallicRoughness": {{ "baseColorFactor": [1.0, 1.0, 1.0, 0.4] }}, "alphaMode": "BLEND", "doubleSided": true }}
  ],
  "buffers": [{{ "byteLength": 144 }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 96 }},
    {{ "buffer": 0, "byteOffset": 96, "byteLength": 48 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 8, "type": "VEC3", "min": [1.0, 1.0, 1.0], "max": [3.0, 5.0, 3.0] }},
    {{ "bufferView": 1, "byteOffset": 0, "componentType": 5125, "count": 6, "type": "SCALAR" }},
    {{ "bufferView": 1, "byteOffset": 24, "componentType": 5125, "count": 6, "type": "SCALAR" }}
  ]
}}"#
    );
    glb(&json, &box_bin())
}
