// CPU-side mirrors of the WGSL uniform blocks in scene.wgsl and shadow.wgsl.
// Free of wgpu so host tests can include this file.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use hero_core::camera::Camera;
use hero_core::render::SceneLights;
use hero_core::scene::Material;

/// Interleaved position + normal, 24 bytes.
pub const VERTEX_STRIDE: u64 = std::mem::size_of::<[f32; 6]>() as u64;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GlobalUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    pub spot_pos: [f32; 4],
    pub spot_dir: [f32; 4],
    pub spot_color: [f32; 4],
    pub spot_cone: [f32; 4],
    pub shadow: [f32; 4],
}

impl GlobalUniforms {
    pub fn new(camera: &Camera, lights: &SceneLights) -> Self {
        let mut u = Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            light_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: camera.eye.extend(1.0).to_array(),
            ambient: lights.ambient.extend(0.0).to_array(),
            spot_pos: [0.0; 4],
            spot_dir: [0.0, -1.0, 0.0, 0.0],
            spot_color: [0.0; 4],
            // outer above inner and both above 1: the cone never lights anything
            spot_cone: [2.0, 3.0, 0.0, 0.0],
            shadow: [1.0, 0.0, 0.0, 0.0],
        };
        if let Some(spot) = &lights.spot {
            u.light_view_proj = spot.view_projection.to_cols_array_2d();
            u.spot_pos = spot.position.extend(spot.range).to_array();
            u.spot_dir = spot.direction.extend(spot.decay).to_array();
            let cast = if spot.cast_shadow { 1.0 } else { 0.0 };
            u.spot_color = spot.radiance.extend(cast).to_array();
            u.spot_cone = [
                spot.cos_outer,
                spot.cos_inner,
                spot.shadow.bias,
                spot.shadow.normal_bias,
            ];
            u.shadow = [spot.shadow.map_size as f32, spot.shadow.radius, 0.0, 0.0];
        }
        u
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub flags: [f32; 4],
}

impl ObjectUniforms {
    pub fn new(model: Mat4, receive_shadow: bool) -> Self {
        let normal = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            Mat4::IDENTITY
        };
        Self {
            model: model.to_cols_array_2d(),
            normal: normal.to_cols_array_2d(),
            flags: [if receive_shadow { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MaterialUniforms {
    pub color: [f32; 4],
    pub params: [f32; 4],
}

impl MaterialUniforms {
    pub fn new(material: &Material) -> Self {
        let alpha = if material.transparent {
            material.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            color: material.color.extend(alpha).to_array(),
            params: [material.roughness, material.metalness, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ShadowUniforms {
    pub view_proj: [[f32; 4]; 4],
}

impl ShadowUniforms {
    pub fn new(lights: &SceneLights) -> Self {
        let m = lights
            .spot
            .as_ref()
            .map(|s| s.view_projection)
            .unwrap_or(Mat4::IDENTITY);
        Self {
            view_proj: m.to_cols_array_2d(),
        }
    }
}

/// Interleave positions with normals. Missing normals face +Z.
pub fn interleave(positions: &[[f32; 3]], normals: &[[f32; 3]]) -> Vec<[f32; 6]> {
    positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let n = normals
                .get(i)
                .copied()
                .unwrap_or(Vec3::Z.to_array());
            [p[0], p[1], p[2], n[0], n[1], n[2]]
        })
        .collect()
}
