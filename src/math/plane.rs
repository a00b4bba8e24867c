use glam::{Mat4, Vec3, Vec4};

/// Plane in Hessian normal form: `dot(normal, p) + distance = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: -normal.dot(point),
        }
    }

    /// Householder reflection across the plane.
    pub fn reflection_matrix(&self) -> Mat4 {
        let n = self.normal;
        let d = self.distance;

        Mat4::from_cols(
            Vec4::new(1.0 - 2.0 * n.x * n.x, -2.0 * n.y * n.x, -2.0 * n.z * n.x, 0.0),
            Vec4::new(-2.0 * n.x * n.y, 1.0 - 2.0 * n.y * n.y, -2.0 * n.z * n.y, 0.0),
            Vec4::new(-2.0 * n.x * n.z, -2.0 * n.y * n.z, 1.0 - 2.0 * n.z * n.z, 0.0),
            Vec4::new(-2.0 * d * n.x, -2.0 * d * n.y, -2.0 * d * n.z, 1.0),
        )
    }

    pub fn as_vec4(&self) -> Vec4 {
        self.normal.extend(self.distance)
    }
}
