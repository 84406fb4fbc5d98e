use crate::params::CameraParams;
use glam::{Mat4, Vec3};

/// Right-handed perspective camera.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn from_params(params: &CameraParams, width: u32, height: u32) -> Self {
        let mut camera = Self {
            eye: params.eye,
            target: params.look_at,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: params.fov_deg.to_radians(),
            znear: params.near,
            zfar: params.far,
        };
        camera.set_viewport(width, height);
        camera
    }

    /// Track the drawable size. A zero dimension leaves the aspect unchanged.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_at_point_projects_to_screen_center() {
        let cam = Camera::from_params(&CameraParams::default(), 1600, 900);
        let clip = cam.view_projection() * cam.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn zero_height_keeps_previous_aspect() {
        let mut cam = Camera::from_params(&CameraParams::default(), 200, 100);
        cam.set_viewport(300, 0);
        assert!((cam.aspect - 2.0).abs() < 1e-6);
    }
}
