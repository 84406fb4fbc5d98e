//! Model import and installation into the scene.
//!
//! [`ModelAsset::from_glb`] turns a binary glTF into plain geometry, materials
//! and a node hierarchy without touching any scene. [`install`] then normalizes
//! that asset, applies the artistic orientation and wraps it in a positioned
//! group. The split keeps parsing (which may fail) apart from graph mutation
//! (which only happens while the mount is alive).

use crate::bounds::{Aabb, Normalization};
use crate::error::HeroError;
use crate::params::ModelParams;
use crate::scene::{
    DrawGroup, Geometry, GeometryId, Material, MaterialId, Materials, Mesh, Node, NodeId, NodeKind,
    SceneGraph, Transform,
};
use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;

/// Mesh reference inside an asset: indices into the asset's tables.
#[derive(Clone, Debug)]
pub struct AssetMesh {
    pub geometry: usize,
    /// One entry per draw group of the geometry.
    pub materials: SmallVec<[usize; 1]>,
}

#[derive(Clone, Debug)]
pub struct AssetNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub mesh: Option<AssetMesh>,
    pub children: Vec<usize>,
}

/// A parsed model, not yet part of any scene.
#[derive(Clone, Debug, Default)]
pub struct ModelAsset {
    pub name: Option<String>,
    pub nodes: Vec<AssetNode>,
    pub roots: Vec<usize>,
    pub geometries: Vec<Geometry>,
    pub materials: Vec<Material>,
}

impl ModelAsset {
    /// Parse a binary glTF (`.glb`) or embedded `.gltf` document.
    ///
    /// Only triangle primitives are imported. Textures are ignored.
    pub fn from_glb(bytes: &[u8]) -> Result<Self, HeroError> {
        let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
        let buffers = gltf::import_buffers(&document, None, blob)?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or(HeroError::EmptyModel)?;

        let mut materials: Vec<Material> = document.materials().map(convert_material).collect();
        let mut fallback: Option<usize> = None;
        let mut geometries = Vec::new();
        let meshes: Vec<Option<AssetMesh>> = document
            .meshes()
            .map(|mesh| {
                let (geometry, mats) = convert_mesh(&mesh, &buffers, &mut materials, &mut fallback)?;
                geometries.push(geometry);
                Some(AssetMesh {
                    geometry: geometries.len() - 1,
                    materials: mats,
                })
            })
            .collect();

        let nodes = document
            .nodes()
            .map(|node| {
                let (t, r, s) = node.transform().decomposed();
                AssetNode {
                    name: node.name().map(str::to_owned),
                    transform: Transform {
                        position: Vec3::from_array(t),
                        rotation: Quat::from_array(r),
                        scale: Vec3::from_array(s),
                    },
                    mesh: node.mesh().and_then(|m| meshes[m.index()].clone()),
                    children: node.children().map(|c| c.index()).collect(),
                }
            })
            .collect();

        let asset = Self {
            name: scene.name().map(str::to_owned),
            nodes,
            roots: scene.nodes().map(|n| n.index()).collect(),
            geometries,
            materials,
        };
        log::info!(
            "[asset] parsed {:?}: {} nodes, {} meshes, {} materials",
            asset.name,
            asset.nodes.len(),
            asset.mesh_count(),
            asset.materials.len()
        );
        Ok(asset)
    }

    /// Visit every node reachable from the roots with its transform relative
    /// to the asset root.
    fn walk(&self, mut visit: impl FnMut(&AssetNode, Mat4)) {
        let mut stack: Vec<(usize, Mat4)> = self.roots.iter().map(|r| (*r, Mat4::IDENTITY)).collect();
        let mut seen = vec![false; self.nodes.len()];
        while let Some((idx, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(idx) else {
                continue;
            };
            if std::mem::replace(&mut seen[idx], true) {
                continue;
            }
            let m = parent * node.transform.matrix();
            visit(node, m);
            stack.extend(node.children.iter().map(|c| (*c, m)));
        }
    }

    /// Bounds of all reachable meshes in the asset's root frame.
    pub fn bounds(&self) -> Option<Aabb> {
        let mut out: Option<Aabb> = None;
        self.walk(|node, m| {
            let Some(b) = node
                .mesh
                .as_ref()
                .and_then(|mesh| self.geometries.get(mesh.geometry))
                .and_then(Geometry::bounds)
            else {
                return;
            };
            let b = b.transformed(&m);
            out = Some(match out {
                Some(o) => o.union(&b),
                None => b,
            });
        });
        out
    }

    /// Number of reachable mesh nodes.
    pub fn mesh_count(&self) -> usize {
        let mut n = 0;
        self.walk(|node, _| n += node.mesh.is_some() as usize);
        n
    }
}

fn convert_material(m: gltf::Material) -> Material {
    let pbr = m.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();
    let transparent = m.alpha_mode() == gltf::material::AlphaMode::Blend;
    Material {
        name: m.name().map(str::to_owned),
        color: Vec3::new(r, g, b),
        roughness: pbr.roughness_factor(),
        metalness: pbr.metallic_factor(),
        opacity: if transparent { a } else { 1.0 },
        transparent,
        double_sided: m.double_sided(),
    }
}

/// Merge a mesh's triangle primitives into one geometry with a draw group per
/// primitive. Returns `None` when nothing drawable remains.
fn convert_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    materials: &mut Vec<Material>,
    fallback: &mut Option<usize>,
) -> Option<(Geometry, SmallVec<[usize; 1]>)> {
    let mut geometry = Geometry::default();
    let mut mats: SmallVec<[usize; 1]> = SmallVec::new();
    let mut missing_normals = false;

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "[asset] skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                mesh.name()
            );
            continue;
        }
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
        let Some(positions) = reader.read_positions() else {
            log::warn!("[asset] primitive without positions in mesh {:?}", mesh.name());
            continue;
        };
        let base = geometry.positions.len() as u32;
        geometry.positions.extend(positions);
        let added = geometry.positions.len() as u32 - base;

        match reader.read_normals() {
            Some(normals) => geometry.normals.extend(normals),
            None => missing_normals = true,
        }
        geometry.normals.resize(geometry.positions.len(), [0.0; 3]);

        let start = geometry.indices.len() as u32;
        match reader.read_indices() {
            Some(indices) => geometry
                .indices
                .extend(indices.into_u32().map(|i| i + base)),
            None => geometry.indices.extend(base..base + added),
        }
        let count = geometry.indices.len() as u32 - start;

        let material = match primitive.material().index() {
            Some(i) => i,
            None => *fallback.get_or_insert_with(|| {
                materials.push(Material::default());
                materials.len() - 1
            }),
        };
        geometry.groups.push(DrawGroup {
            start,
            count,
            material_index: mats.len() as u32,
        });
        mats.push(material);
    }

    if geometry.indices.is_empty() {
        return None;
    }
    if missing_normals {
        geometry.compute_normals();
    }
    if mats.len() == 1 {
        geometry.groups.clear();
    }
    Some((geometry, mats))
}

/// The installed model: a positioned group whose sole child carries the
/// artistic rotation, with the normalized asset below that.
#[derive(Clone, Debug)]
pub struct ModelGroup {
    /// Positioned wrapper; the float offset moves this node.
    pub group: NodeId,
    /// Sole child of `group`; drag rotation is applied here.
    pub model: NodeId,
    /// Rotation of `model` captured right after installation.
    pub initial_rotation: Vec3,
    /// Resting height of `group`.
    pub base_height: f32,
    pub normalization: Normalization,
}

/// Normalize `asset`, orient it, wrap it in a positioned group and attach
/// that group to the scene. Every mesh is marked to cast shadows.
///
/// The asset sits under a scale/translate node so its geometric center lands
/// on the model node's origin; rotating the model then spins it in place.
pub fn install(
    scene: &mut SceneGraph,
    asset: &ModelAsset,
    params: &ModelParams,
) -> Result<ModelGroup, HeroError> {
    let bounds = asset.bounds().ok_or(HeroError::EmptyModel)?;
    let normalization = Normalization::fit(&bounds, params.desired_size);

    let pivot = scene.create(Node::group().named("normalized").with_transform(Transform {
        position: normalization.translation,
        rotation: Quat::IDENTITY,
        scale: Vec3::splat(normalization.scale),
    }));

    let mut geometries: Vec<Option<GeometryId>> = vec![None; asset.geometries.len()];
    let mut materials: Vec<Option<MaterialId>> = vec![None; asset.materials.len()];
    let mut seen = vec![false; asset.nodes.len()];
    let mut stack: Vec<(usize, NodeId)> = asset.roots.iter().map(|r| (*r, pivot)).collect();
    while let Some((idx, parent)) = stack.pop() {
        let Some(src) = asset.nodes.get(idx) else {
            continue;
        };
        if std::mem::replace(&mut seen[idx], true) {
            continue;
        }
        let kind = match &src.mesh {
            Some(mesh) => {
                let geometry = *geometries[mesh.geometry]
                    .get_or_insert_with(|| scene.add_geometry(asset.geometries[mesh.geometry].clone()));
                let ids: SmallVec<[MaterialId; 4]> = mesh
                    .materials
                    .iter()
                    .map(|m| {
                        *materials[*m]
                            .get_or_insert_with(|| scene.add_material(asset.materials[*m].clone()))
                    })
                    .collect();
                let mesh_materials = if ids.len() == 1 {
                    Materials::Single(ids[0])
                } else {
                    Materials::Multi(ids)
                };
                NodeKind::Mesh(Mesh {
                    geometry,
                    materials: mesh_materials,
                    cast_shadow: true,
                    receive_shadow: false,
                })
            }
            None => NodeKind::Group,
        };
        let mut node = Node::new(kind).with_transform(src.transform);
        node.name = src.name.clone();
        let id = scene.create(node);
        scene.add_child(parent, id);
        stack.extend(src.children.iter().map(|c| (*c, id)));
    }

    let model = scene.create(
        Node::group()
            .named(asset.name.clone().unwrap_or_else(|| "model".to_string()))
            .with_transform(Transform::IDENTITY.with_euler(params.rotation)),
    );
    scene.add_child(model, pivot);

    let group = scene.create(
        Node::group()
            .named("model-group")
            .with_transform(Transform::from_position(params.position)),
    );
    scene.add_child(group, model);
    scene.set_cast_shadow(group, true);

    let initial_rotation = scene
        .node(model)
        .map(|n| n.transform.euler())
        .unwrap_or(params.rotation);
    scene.attach(group);
    scene.update_world(group);

    log::info!(
        "[asset] installed model: scale {:.4}, center {:?}",
        normalization.scale,
        normalization.center
    );
    Ok(ModelGroup {
        group,
        model,
        initial_rotation,
        base_height: params.position.y,
        normalization,
    })
}
