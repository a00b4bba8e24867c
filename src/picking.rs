//! Pointer picking: screen position → world ray → nearest mesh → owning group.

use glam::{Vec2, Vec3};

use crate::{
    camera::Camera,
    math::ray::Ray,
    scene_graph::{object3d::ObjectId, scene::Scene},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Parent of the mesh that was hit, i.e. the container that owns it.
    pub object: ObjectId,
    pub mesh: ObjectId,
    pub distance: f32,
    pub point: Vec3,
}

/// Maps a pixel position (origin top-left) to normalized device coordinates
/// with +Y up. Returns `None` for an empty viewport.
pub fn screen_to_ndc(screen: Vec2, viewport: Vec2) -> Option<Vec2> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }

    Some(Vec2::new(
        (screen.x / viewport.x) * 2.0 - 1.0,
        -(screen.y / viewport.y) * 2.0 + 1.0,
    ))
}

pub fn screen_ray(screen: Vec2, viewport: Vec2, camera: &Camera) -> Option<Ray> {
    let ndc = screen_to_ndc(screen, viewport)?;
    Some(Ray::from_ndc(
        ndc,
        camera.view_projection().inverse(),
        camera.position,
    ))
}

/// Tests `ray` against the local bounds of every mesh in `meshes` and
/// returns the strictly nearest hit. On exact ties the earlier mesh wins.
pub fn intersect_meshes(ray: &Ray, scene: &Scene, meshes: &[ObjectId]) -> Option<(ObjectId, f32)> {
    let mut nearest: Option<(ObjectId, f32)> = None;

    for &mesh_id in meshes {
        let Some(object) = scene.get_object(mesh_id) else {
            continue;
        };
        let Some(model) = object.model_id.and_then(|id| scene.get_model(id)) else {
            continue;
        };

        let world_to_local = object.transform.get_world_matrix().inverse();
        let local_ray = ray.transformed(&world_to_local);

        if let Some(distance) = model.bounds.intersect_ray(&local_ray) {
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((mesh_id, distance));
            }
        }
    }

    nearest
}

/// Resolves a click at `screen` to the container of the nearest mesh under
/// the pointer. World transforms must be up to date.
pub fn pick(
    screen: Vec2,
    viewport: Vec2,
    camera: &Camera,
    scene: &Scene,
    meshes: &[ObjectId],
) -> Option<PickHit> {
    let ray = screen_ray(screen, viewport, camera)?;
    let (mesh, distance) = intersect_meshes(&ray, scene, meshes)?;
    let object = scene.get_object(mesh)?.parent_id?;

    Some(PickHit {
        object,
        mesh,
        distance,
        point: ray.at(distance),
    })
}
