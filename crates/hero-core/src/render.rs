//! Seams between the scene and whatever draws it.
//!
//! [`Renderer`] and [`Surface`] are implemented by the front-end (WebGPU on the
//! web) and by recording fakes in tests. The helpers below flatten the scene
//! graph into what a renderer needs each frame: the light rig and an ordered
//! draw list.

use crate::camera::Camera;
use crate::error::HeroError;
use crate::interaction::Cursor;
use crate::scene::{DrawGroup, GeometryId, MaterialId, NodeId, NodeKind, SceneGraph, ShadowParams};
use glam::{Mat4, Vec3};

/// Outcome of a frame handed to a [`Renderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Presented,
    /// Nothing reached the screen, e.g. the surface had to be reconfigured.
    Skipped,
}

pub trait Renderer {
    /// Draw one frame. Geometry and materials are uploaded lazily.
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<FrameStatus, HeroError>;

    /// Drawable size in physical pixels changed.
    fn resize(&mut self, width: u32, height: u32);

    /// Free GPU buffers for a geometry. Unknown ids are ignored.
    fn dispose_geometry(&mut self, id: GeometryId);

    /// Free GPU state for a material. Unknown ids are ignored.
    fn dispose_material(&mut self, id: MaterialId);

    /// Drop the device and every remaining GPU resource. Called once, last.
    fn release(&mut self);
}

/// The element the renderer draws into, as seen by its container.
pub trait Surface {
    fn set_cursor(&self, cursor: Cursor);

    /// Remove the surface from its container. Fails with
    /// [`HeroError::Detached`] when it is no longer there.
    fn detach(&self) -> Result<(), HeroError>;
}

/// The spotlight resolved to world space for one frame.
#[derive(Clone, Debug)]
pub struct SpotSnapshot {
    pub position: Vec3,
    pub direction: Vec3,
    /// Color times intensity.
    pub radiance: Vec3,
    pub cos_outer: f32,
    pub cos_inner: f32,
    /// 0 means unbounded.
    pub range: f32,
    pub decay: f32,
    pub cast_shadow: bool,
    pub shadow: ShadowParams,
    pub view_projection: Mat4,
}

#[derive(Clone, Debug, Default)]
pub struct SceneLights {
    /// Sum of ambient contributions, color times intensity.
    pub ambient: Vec3,
    pub spot: Option<SpotSnapshot>,
}

impl SceneLights {
    /// Gather attached lights. Only the first spotlight is used.
    pub fn collect(scene: &SceneGraph) -> Self {
        let mut lights = SceneLights::default();
        scene.walk(|_, node| match &node.kind {
            NodeKind::Ambient(a) => lights.ambient += a.color * a.intensity,
            NodeKind::Spot(s) if lights.spot.is_none() => {
                let position = node.world_position();
                let target = scene
                    .node(s.target)
                    .map(|t| t.world_position())
                    .unwrap_or(position - Vec3::Y);
                let direction = (target - position).normalize_or_zero();
                let up = if direction.cross(Vec3::Y).length_squared() < 1e-6 {
                    Vec3::Z
                } else {
                    Vec3::Y
                };
                let view = Mat4::look_at_rh(position, target, up);
                let proj = Mat4::perspective_rh(2.0 * s.angle, 1.0, s.shadow.near, s.shadow.far);
                lights.spot = Some(SpotSnapshot {
                    position,
                    direction,
                    radiance: s.color * s.intensity,
                    cos_outer: s.angle.cos(),
                    cos_inner: (s.angle * (1.0 - s.penumbra)).cos(),
                    range: s.distance,
                    decay: s.decay,
                    cast_shadow: s.cast_shadow,
                    shadow: s.shadow,
                    view_projection: proj * view,
                });
            }
            _ => {}
        });
        lights
    }
}

/// One draw call: a mesh's draw group with its resolved material.
#[derive(Clone, Copy, Debug)]
pub struct DrawItem {
    pub node: NodeId,
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub group: DrawGroup,
    pub model: Mat4,
    pub transparent: bool,
    /// Both faces are drawn; otherwise back faces are culled.
    pub double_sided: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Distance from the camera eye to the node's origin.
    pub distance: f32,
}

/// Every attached mesh group, opaque ones first in scene order, then
/// transparent ones from farthest to nearest.
pub fn collect_draws(scene: &SceneGraph, camera: &Camera) -> Vec<DrawItem> {
    let mut opaque = Vec::new();
    let mut transparent = Vec::new();
    scene.walk(|id, node| {
        let NodeKind::Mesh(mesh) = &node.kind else {
            return;
        };
        let Some(geometry) = scene.geometry(mesh.geometry) else {
            return;
        };
        let distance = node.world_position().distance(camera.eye);
        for group in geometry.draw_groups() {
            let Some(material_id) = mesh.materials.get(group.material_index) else {
                continue;
            };
            let Some(material) = scene.material(material_id) else {
                continue;
            };
            let item = DrawItem {
                node: id,
                geometry: mesh.geometry,
                material: material_id,
                group,
                model: node.world(),
                transparent: material.transparent,
                double_sided: material.double_sided,
                cast_shadow: mesh.cast_shadow,
                receive_shadow: mesh.receive_shadow,
                distance,
            };
            if item.transparent {
                transparent.push(item);
            } else {
                opaque.push(item);
            }
        }
    });
    transparent.sort_by(|a, b| b.distance.total_cmp(&a.distance));
    opaque.extend(transparent);
    opaque
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{CameraParams, HeroParams};
    use crate::scene::{Geometry, Material, Materials, Mesh, Node};
    use crate::stage::Stage;

    #[test]
    fn stage_lights_resolve_to_world_space() {
        let params = HeroParams::default();
        let stage = Stage::build(&params);
        let lights = SceneLights::collect(&stage.scene);
        assert!((lights.ambient - Vec3::splat(0.25)).length() < 1e-5);
        let spot = lights.spot.expect("stage has a spotlight");
        let expected = (params.lighting.base_target - params.lighting.spot_position).normalize();
        assert!((spot.direction - expected).length() < 1e-5);
        assert!(spot.cos_inner > spot.cos_outer);
        assert_eq!(spot.range, 0.0);
    }

    #[test]
    fn target_projects_to_center_of_shadow_map() {
        let params = HeroParams::default();
        let stage = Stage::build(&params);
        let spot = SceneLights::collect(&stage.scene).spot.unwrap();
        let clip = spot.view_projection * params.lighting.base_target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn transparent_backdrop_sorts_far_to_near() {
        let stage = Stage::build(&HeroParams::default());
        let camera = Camera::from_params(&CameraParams::default(), 16, 9);
        let draws = collect_draws(&stage.scene, &camera);
        assert_eq!(draws.len(), 2);
        assert!(draws.iter().all(|d| d.transparent));
        assert!(draws[0].distance >= draws[1].distance);
        assert_eq!(draws[0].node, stage.wall);
    }

    #[test]
    fn draws_carry_material_sidedness() {
        let mut stage = Stage::build(&HeroParams::default());
        let camera = Camera::from_params(&CameraParams::default(), 16, 9);
        assert!(collect_draws(&stage.scene, &camera)
            .iter()
            .all(|d| !d.double_sided));

        let geometry = stage.scene.add_geometry(Geometry::plane(1.0, 1.0));
        let material = stage.scene.add_material(Material {
            double_sided: true,
            ..Material::default()
        });
        let leaf = stage.scene.create(Node::new(NodeKind::Mesh(Mesh {
            geometry,
            materials: Materials::Single(material),
            cast_shadow: true,
            receive_shadow: false,
        })));
        stage.scene.attach(leaf);
        stage.scene.update_world(leaf);

        let draws = collect_draws(&stage.scene, &camera);
        let leaf_draw = draws.iter().find(|d| d.node == leaf).unwrap();
        assert!(leaf_draw.double_sided);
        assert!(!leaf_draw.transparent);
        assert!(draws.iter().filter(|d| d.node != leaf).all(|d| !d.double_sided));
    }
}
