use glam::{Mat4, Vec2, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `eye` through a point in normalized device coordinates,
    /// unprojected with the inverse view-projection matrix. wgpu clip space
    /// puts the far plane at z = 1. Starting at the eye rather than the near
    /// plane keeps `t` equal to the distance from the camera.
    pub fn from_ndc(ndc: Vec2, inverse_view_projection: Mat4, eye: Vec3) -> Self {
        let far = inverse_view_projection * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let far = far.truncate() / far.w;

        Self::new(eye, far - eye)
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Transforms the ray without renormalizing, so a parameter `t` on the
    /// result maps to the same point as `t` on the original ray.
    pub fn transformed(&self, matrix: &Mat4) -> Ray {
        Ray {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_of_screen_points_down_view_axis() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let projection = Mat4::perspective_rh(60f32.to_radians(), 1.0, 0.1, 100.0);

        let eye = Vec3::new(0.0, 0.0, 5.0);
        let ray = Ray::from_ndc(Vec2::ZERO, (projection * view).inverse(), eye);

        assert_eq!(ray.origin, eye);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_off_center_ray_passes_through_unprojected_point() {
        let eye = Vec3::new(1.0, 2.0, 5.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let view_projection = Mat4::perspective_rh(60f32.to_radians(), 1.5, 0.1, 100.0) * view;
        let ndc = Vec2::new(0.3, -0.6);

        let ray = Ray::from_ndc(ndc, view_projection.inverse(), eye);

        // Any point along the ray projects back onto the same NDC position
        let projected = view_projection.project_point3(ray.at(3.0));
        assert!((projected.truncate() - ndc).length() < 1e-4);
    }

    #[test]
    fn test_transformed_ray_keeps_parameterization() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let matrix = Mat4::from_scale(Vec3::splat(2.0)) * Mat4::from_rotation_y(0.7);
        let local = ray.transformed(&matrix);

        let t = 2.5;
        let expected = matrix.transform_point3(ray.at(t));
        assert!((local.at(t) - expected).length() < 1e-5);
    }
}
