use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::math::bounds::AABB;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

pub struct ModelPrimitive {
    pub index: usize,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

pub struct Model {
    pub name: String,
    pub primitives: Vec<ModelPrimitive>,
}

impl Model {
    pub fn bounds(&self) -> AABB {
        AABB::from_points(
            self.primitives
                .iter()
                .flat_map(|primitive| primitive.vertices.iter().map(|vertex| vertex.position)),
        )
        .unwrap_or(AABB::new(Vec3::ZERO, Vec3::ZERO))
    }
}

/// Appends a quad centered at `center`, spanned by `right` and `up` (half
/// extents), facing `normal`. Texture coordinates put v = 0 at the top edge.
fn push_quad(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    center: Vec3,
    right: Vec3,
    up: Vec3,
    normal: Vec3,
) {
    let base = vertices.len() as u32;

    let corners = [
        (center - right + up, Vec2::new(0.0, 0.0)),
        (center - right - up, Vec2::new(0.0, 1.0)),
        (center + right - up, Vec2::new(1.0, 1.0)),
        (center + right + up, Vec2::new(1.0, 0.0)),
    ];

    vertices.extend(corners.into_iter().map(|(position, tex_coords)| Vertex {
        position,
        normal,
        tex_coords,
    }));

    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

/// Axis-aligned box centered at the origin.
pub fn box_geometry(width: f32, height: f32, depth: f32) -> Model {
    let half = Vec3::new(width, height, depth) * 0.5;
    let (x, y, z) = (Vec3::X * half.x, Vec3::Y * half.y, Vec3::Z * half.z);

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    // (center, right, up, normal) for +X, -X, +Y, -Y, +Z, -Z
    let faces = [
        (x, -z, y, Vec3::X),
        (-x, z, y, Vec3::NEG_X),
        (y, x, -z, Vec3::Y),
        (-y, x, z, Vec3::NEG_Y),
        (z, x, y, Vec3::Z),
        (-z, -x, y, Vec3::NEG_Z),
    ];

    for (center, right, up, normal) in faces {
        push_quad(&mut vertices, &mut indices, center, right, up, normal);
    }

    Model {
        name: format!("Box {width}x{height}x{depth}"),
        primitives: vec![ModelPrimitive {
            index: 0,
            vertices,
            indices,
        }],
    }
}

/// Plane in the XY plane facing +Z, centered at the origin.
pub fn plane_geometry(width: f32, height: f32) -> Model {
    let mut vertices = Vec::with_capacity(4);
    let mut indices = Vec::with_capacity(6);

    push_quad(
        &mut vertices,
        &mut indices,
        Vec3::ZERO,
        Vec3::X * width * 0.5,
        Vec3::Y * height * 0.5,
        Vec3::Z,
    );

    Model {
        name: format!("Plane {width}x{height}"),
        primitives: vec![ModelPrimitive {
            index: 0,
            vertices,
            indices,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_bounds_match_dimensions() {
        let model = box_geometry(1.0, 2.0, 0.05);
        let bounds = model.bounds();

        assert_eq!(bounds.min, Vec3::new(-0.5, -1.0, -0.025));
        assert_eq!(bounds.max, Vec3::new(0.5, 1.0, 0.025));
        assert_eq!(model.primitives[0].vertices.len(), 24);
        assert_eq!(model.primitives[0].indices.len(), 36);
    }

    #[test]
    fn test_box_faces_wind_counter_clockwise_outward() {
        let model = box_geometry(1.0, 1.0, 1.0);
        let primitive = &model.primitives[0];

        for triangle in primitive.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| primitive.vertices[triangle[i] as usize]);
            let face_normal = (b.position - a.position).cross(c.position - a.position);
            assert!(face_normal.dot(a.normal) > 0.0);
        }
    }

    #[test]
    fn test_plane_is_flat_and_faces_viewer() {
        let model = plane_geometry(0.9, 1.8);
        let bounds = model.bounds();

        assert_eq!(bounds.min.z, 0.0);
        assert_eq!(bounds.max.z, 0.0);
        assert!((bounds.max.x - 0.45).abs() < 1e-6);
        assert!(model.primitives[0]
            .vertices
            .iter()
            .all(|vertex| vertex.normal == Vec3::Z));
    }
}
