//! Static backdrop and lighting, built once per activation.

use crate::color::hex_to_linear;
use crate::params::{BackdropParams, HeroParams};
use crate::scene::{
    AmbientLight, Geometry, Material, Materials, Mesh, Node, NodeId, NodeKind, SceneGraph,
    ShadowParams, SpotLight, Transform,
};
use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

/// The scene graph plus handles to the nodes built here.
pub struct Stage {
    pub scene: SceneGraph,
    pub wall: NodeId,
    pub floor: NodeId,
    pub ambient: NodeId,
    pub spot: NodeId,
    pub spot_target: NodeId,
}

impl Stage {
    pub fn build(params: &HeroParams) -> Self {
        let mut scene = SceneGraph::new();
        let b = &params.backdrop;
        scene.background = hex_to_linear(b.background_hex);

        // Wall stands on the floor line; floor runs forward from the wall.
        let [wall_w, wall_h] = b.wall_size;
        let wall = backdrop_plane(
            &mut scene,
            "wall",
            b,
            b.wall_hex,
            Geometry::plane(wall_w, wall_h),
            Transform::from_position(Vec3::new(0.0, wall_h * 0.5, b.wall_z)),
        );
        let [floor_w, floor_d] = b.floor_size;
        let floor = backdrop_plane(
            &mut scene,
            "floor",
            b,
            b.floor_hex,
            Geometry::plane(floor_w, floor_d),
            Transform {
                position: Vec3::new(0.0, 0.0, b.wall_z + floor_d * 0.5),
                rotation: Quat::from_rotation_x(-FRAC_PI_2),
                scale: Vec3::ONE,
            },
        );

        let l = &params.lighting;
        let ambient = scene.create(
            Node::new(NodeKind::Ambient(AmbientLight {
                color: hex_to_linear(l.ambient_hex),
                intensity: l.ambient_intensity,
            }))
            .named("ambient"),
        );
        scene.attach(ambient);

        let spot_target = scene.create(
            Node::new(NodeKind::Target)
                .named("spot-target")
                .with_transform(Transform::from_position(l.base_target)),
        );
        scene.attach(spot_target);

        let spot = scene.create(
            Node::new(NodeKind::Spot(SpotLight {
                color: hex_to_linear(l.spot_hex),
                intensity: l.spot_intensity,
                angle: l.spot_angle,
                penumbra: l.spot_penumbra,
                decay: l.spot_decay,
                distance: l.spot_distance,
                cast_shadow: true,
                shadow: ShadowParams {
                    map_size: l.shadow_map_size,
                    radius: l.shadow_radius,
                    bias: l.shadow_bias,
                    normal_bias: l.shadow_normal_bias,
                    near: l.shadow_near,
                    far: l.shadow_far,
                },
                target: spot_target,
            }))
            .named("spot")
            .with_transform(Transform::from_position(l.spot_position)),
        );
        scene.attach(spot);

        scene.update_world_all();
        log::debug!("[stage] built backdrop and lights ({} nodes)", scene.len());

        Self {
            scene,
            wall,
            floor,
            ambient,
            spot,
            spot_target,
        }
    }

    /// Move the spotlight's aim point and refresh its world transform so the
    /// next render sees it.
    pub fn set_spot_target(&mut self, position: Vec3) {
        if let Some(node) = self.scene.node_mut(self.spot_target) {
            node.transform.position = position;
        }
        self.scene.update_world(self.spot_target);
    }

    pub fn spot_target_position(&self) -> Option<Vec3> {
        self.scene.node(self.spot_target).map(Node::world_position)
    }

    /// Remove the wall and floor from the graph, returning them for disposal.
    pub fn remove_backdrop(&mut self) -> Vec<(NodeId, Node)> {
        let mut removed = self.scene.remove_subtree(self.wall);
        removed.extend(self.scene.remove_subtree(self.floor));
        removed
    }

    /// Remove both lights and the spot target. Returns how many nodes went.
    pub fn remove_lights(&mut self) -> usize {
        [self.ambient, self.spot, self.spot_target]
            .into_iter()
            .map(|id| self.scene.remove_subtree(id).len())
            .sum()
    }
}

fn backdrop_plane(
    scene: &mut SceneGraph,
    name: &str,
    b: &BackdropParams,
    hex: u32,
    geometry: Geometry,
    transform: Transform,
) -> NodeId {
    let geometry = scene.add_geometry(geometry);
    let material = scene.add_material(
        Material::standard(hex, b.roughness, b.metalness).translucent(b.opacity),
    );
    let id = scene.create(
        Node::new(NodeKind::Mesh(Mesh {
            geometry,
            materials: Materials::Single(material),
            cast_shadow: false,
            receive_shadow: true,
        }))
        .named(name)
        .with_transform(transform),
    );
    scene.attach(id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backdrop_sits_behind_and_below_the_model() {
        let stage = Stage::build(&HeroParams::default());
        let wall = stage.scene.node(stage.wall).unwrap().world_position();
        let floor = stage.scene.node(stage.floor).unwrap().world_position();
        assert!((wall - Vec3::new(0.0, 25.0, -5.0)).length() < 1e-5);
        assert!((floor - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-5);
    }

    #[test]
    fn floor_normal_points_up() {
        let stage = Stage::build(&HeroParams::default());
        let world = stage.scene.node(stage.floor).unwrap().world();
        let n = world.transform_vector3(Vec3::Z);
        assert!((n - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn backdrop_receives_but_does_not_cast() {
        let stage = Stage::build(&HeroParams::default());
        for id in [stage.wall, stage.floor] {
            let mesh = stage.scene.node(id).unwrap().as_mesh().unwrap();
            assert!(mesh.receive_shadow);
            assert!(!mesh.cast_shadow);
            let Materials::Single(m) = mesh.materials else {
                panic!("backdrop uses one material");
            };
            let material = stage.scene.material(m).unwrap();
            assert!(material.transparent);
            assert!((material.opacity - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn spot_target_updates_world_immediately() {
        let mut stage = Stage::build(&HeroParams::default());
        stage.set_spot_target(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(stage.spot_target_position(), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn removal_is_repeatable() {
        let mut stage = Stage::build(&HeroParams::default());
        assert_eq!(stage.remove_backdrop().len(), 2);
        assert_eq!(stage.remove_lights(), 3);
        assert!(stage.remove_backdrop().is_empty());
        assert_eq!(stage.remove_lights(), 0);
        assert!(stage.scene.is_empty());
    }
}
