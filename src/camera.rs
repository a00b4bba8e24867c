use glam::{Mat4, Quat, Vec3, Vec4};
use wgpu::util::DeviceExt;

use crate::{animation::tween::Interpolate, math::plane::Plane};

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub position: Vec3,
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.5, 8.0),
            fov_y_degrees: 70.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

/// The part of the camera that transitions animate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Interpolate for CameraState {
    fn interpolate(self, to: Self, t: f32) -> Self {
        Self {
            position: self.position.interpolate(to.position, t),
            orientation: self.orientation.interpolate(to.orientation, t),
        }
    }
}

/// Right-handed perspective camera looking down its local -Z axis.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: config.position,
            orientation: Quat::IDENTITY,
            fov_y: config.fov_y_degrees.to_radians(),
            aspect,
            z_near: config.z_near,
            z_far: config.z_far,
        }
    }

    pub fn state(&self) -> CameraState {
        CameraState {
            position: self.position,
            orientation: self.orientation,
        }
    }

    pub fn set_state(&mut self, state: CameraState) {
        self.position = state.position;
        self.orientation = state.orientation;
    }

    /// Degenerate sizes keep the previous aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: Mat4,
    position: Vec4,
    // Fragments with dot(clip_plane.xyz, p) + clip_plane.w < 0 are discarded
    clip_plane: Vec4,
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection(),
            position: camera.position.extend(1.0),
            clip_plane: Vec4::W,
        }
    }

    /// The view of `camera` mirrored across `mirror`, clipping everything
    /// closer to the mirror than `clip_bias` on its back side.
    pub fn mirrored(camera: &Camera, mirror: &Plane, clip_bias: f32) -> Self {
        let reflection = mirror.reflection_matrix();
        let clip_plane = mirror.as_vec4() - Vec4::new(0.0, 0.0, 0.0, clip_bias);

        Self {
            view_proj: camera.view_projection() * reflection,
            position: reflection.transform_point3(camera.position).extend(1.0),
            clip_plane,
        }
    }

    pub fn create_buffer(&self, device: &wgpu::Device, label: &str) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&[*self]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    pub fn update_buffer(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[*self]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_orientation_looks_down_negative_z() {
        let camera = Camera::new(&CameraConfig::default(), 16.0 / 9.0);
        let in_front = camera.view_matrix().transform_point3(Vec3::new(0.0, 0.5, 0.0));
        assert!((in_front - Vec3::new(0.0, 0.0, -8.0)).length() < 1e-5);
    }

    #[test]
    fn test_resize_only_changes_aspect() {
        let mut camera = Camera::new(&CameraConfig::default(), 1920.0 / 1080.0);
        let state = camera.state();

        camera.resize(800, 600);
        assert!((camera.aspect - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(camera.state(), state);

        camera.resize(0, 600);
        assert!((camera.aspect - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_mirrored_camera_sits_below_floor() {
        let camera = Camera::new(&CameraConfig::default(), 1.0);
        let floor = Plane::from_point_normal(Vec3::new(0.0, -1.0, 0.0), Vec3::Y);
        let uniform = CameraUniform::mirrored(&camera, &floor, 0.003);

        assert!((uniform.position.truncate() - Vec3::new(0.0, -2.5, 8.0)).length() < 1e-5);
        assert!((uniform.clip_plane - Vec4::new(0.0, 1.0, 0.0, 0.997)).length() < 1e-6);
    }
}
