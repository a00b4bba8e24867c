//! The gallery's static frame table and the scene objects built from it.

use std::{
    f32::consts::PI,
    path::{Path, PathBuf},
};

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

use crate::{
    animation::hover::HoverAnimation,
    model::{box_geometry, plane_geometry},
    scene_graph::{
        material::Material,
        object3d::{Object3D, ObjectId},
        scene::Scene,
        scene_model::SceneModelId,
        transform::Transform,
    },
};

pub const GOLDEN_RATIO: f32 = 1.61803398875;

pub const FRAME_WIDTH: f32 = 1.0;
pub const FRAME_HEIGHT: f32 = GOLDEN_RATIO * 1.2;
pub const FRAME_DEPTH: f32 = 0.05;
pub const IMAGE_WIDTH: f32 = 0.9;
pub const IMAGE_HEIGHT: f32 = GOLDEN_RATIO * 1.15;
/// Pushes the picture in front of the backing box to avoid z-fighting.
pub const IMAGE_OFFSET_Z: f32 = 0.03;

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// A photo on images.pexels.com, by numeric id.
    Pexels(u32),
    File(PathBuf),
}

impl ImageSource {
    /// Remote location for network-backed sources.
    pub fn url(&self) -> Option<String> {
        match self {
            ImageSource::Pexels(id) => Some(format!(
                "https://images.pexels.com/photos/{id}/pexels-photo-{id}.jpeg?auto=compress&cs=tinysrgb&dpr=2&h=750&w=1260"
            )),
            ImageSource::File(_) => None,
        }
    }

    /// The same picture read from `dir` instead of the network. Pexels
    /// photos are expected under their download name,
    /// `pexels-photo-{id}.jpeg`.
    pub fn local_copy(&self, dir: &Path) -> ImageSource {
        match self {
            ImageSource::Pexels(id) => ImageSource::File(dir.join(format!("pexels-photo-{id}.jpeg"))),
            ImageSource::File(path) => ImageSource::File(dir.join(path)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpec {
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    pub rotation: Vec3,
    pub image: ImageSource,
}

impl FrameSpec {
    pub const fn new(position: Vec3, rotation: Vec3, image: ImageSource) -> Self {
        Self {
            position,
            rotation,
            image,
        }
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }
}

const SIDE_ANGLE: f32 = PI / 2.5;

pub static FRAME_SPECS: [FrameSpec; 9] = [
    // Center, slightly forward
    FrameSpec::new(Vec3::new(0.0, 0.25, 2.0), Vec3::ZERO, ImageSource::Pexels(1103970)),
    FrameSpec::new(Vec3::new(-1.2, 4.0, -1.0), Vec3::new(0.0, 0.4, 0.0), ImageSource::Pexels(416430)),
    FrameSpec::new(Vec3::new(1.2, 2.5, -1.0), Vec3::new(0.0, -0.4, 0.0), ImageSource::Pexels(310452)),
    // Left wing
    FrameSpec::new(Vec3::new(-2.5, 1.7, 0.4), Vec3::new(0.0, SIDE_ANGLE, 0.0), ImageSource::Pexels(327482)),
    FrameSpec::new(Vec3::new(-3.0, 0.4, 1.7), Vec3::new(0.0, SIDE_ANGLE, 0.0), ImageSource::Pexels(325185)),
    FrameSpec::new(Vec3::new(-2.8, 2.2, 3.5), Vec3::new(0.0, SIDE_ANGLE, 0.0), ImageSource::Pexels(358574)),
    // Right wing
    FrameSpec::new(Vec3::new(2.5, 0.7, 0.4), Vec3::new(0.0, -SIDE_ANGLE, 0.0), ImageSource::Pexels(227675)),
    FrameSpec::new(Vec3::new(3.0, 3.0, 1.7), Vec3::new(0.0, -SIDE_ANGLE, 0.0), ImageSource::Pexels(911738)),
    FrameSpec::new(Vec3::new(2.8, 1.3, 3.5), Vec3::new(0.0, -SIDE_ANGLE, 0.0), ImageSource::Pexels(1738986)),
];

/// Geometry shared by every frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameModels {
    pub backing: SceneModelId,
    pub picture: SceneModelId,
}

impl FrameModels {
    pub fn create(scene: &mut Scene) -> Self {
        Self {
            backing: scene.add_model(box_geometry(FRAME_WIDTH, FRAME_HEIGHT, FRAME_DEPTH)),
            picture: scene.add_model(plane_geometry(IMAGE_WIDTH, IMAGE_HEIGHT)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrameInstance {
    pub group: ObjectId,
    pub picture_mesh: ObjectId,
    pub rest_position: Vec3,
    pub hover: HoverAnimation,
    pub image: ImageSource,
}

impl FrameInstance {
    /// Moves the group to its hover height at session time `now`.
    pub fn animate(&self, scene: &mut Scene, now: f32) {
        let position = Vec3::new(
            self.rest_position.x,
            self.hover.offset(now),
            self.rest_position.z,
        );
        scene.set_object_translation(self.group, position);
    }
}

/// Builds a frame group under `parent`: a black backing box and the picture
/// plane just in front of it. The picture starts blank; its image is loaded
/// separately.
pub fn build_frame(
    scene: &mut Scene,
    parent: ObjectId,
    models: &FrameModels,
    spec: &FrameSpec,
    rng: &mut impl Rng,
) -> FrameInstance {
    let group = scene.spawn(
        Object3D::group("Frame", Transform::new(spec.position, spec.orientation())),
        Some(parent),
    );

    scene.spawn(
        Object3D::mesh(
            "Frame backing",
            Transform::from_translation(Vec3::ZERO),
            models.backing,
            Material::Standard {
                color: Vec3::ZERO,
                metalness: 0.5,
                roughness: 0.0,
            },
        ),
        Some(group),
    );

    let picture_mesh = scene.spawn(
        Object3D::mesh(
            "Frame picture",
            Transform::from_translation(Vec3::new(0.0, 0.0, IMAGE_OFFSET_Z)),
            models.picture,
            Material::Basic {
                color: Vec3::ONE,
                textured: true,
            },
        ),
        Some(group),
    );

    FrameInstance {
        group,
        picture_mesh,
        rest_position: spec.position,
        hover: HoverAnimation::random(spec.position.y, rng),
        image: spec.image.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_pexels_url() {
        assert_eq!(
            ImageSource::Pexels(325185).url().as_deref(),
            Some("https://images.pexels.com/photos/325185/pexels-photo-325185.jpeg?auto=compress&cs=tinysrgb&dpr=2&h=750&w=1260")
        );
        assert_eq!(ImageSource::File("a.jpg".into()).url(), None);
    }

    #[test]
    fn test_local_copy_reads_from_directory() {
        let dir = Path::new("photos");
        assert_eq!(
            ImageSource::Pexels(325185).local_copy(dir),
            ImageSource::File(PathBuf::from("photos/pexels-photo-325185.jpeg"))
        );
        assert_eq!(
            ImageSource::File("a.jpg".into()).local_copy(dir),
            ImageSource::File(PathBuf::from("photos/a.jpg"))
        );
        assert_eq!(ImageSource::Pexels(1).local_copy(dir).url(), None);
    }

    #[test]
    fn test_build_frame_places_group_and_meshes() {
        let mut scene = Scene::new();
        let models = FrameModels::create(&mut scene);
        let root = scene.spawn(Object3D::group("Frames", Transform::from_translation(Vec3::ZERO)), None);
        let mut rng = StdRng::seed_from_u64(1);

        let spec = &FRAME_SPECS[4];
        let frame = build_frame(&mut scene, root, &models, spec, &mut rng);
        scene.late_update();

        assert!((scene.world_position(frame.group).unwrap() - Vec3::new(-3.0, 0.4, 1.7)).length() < 1e-5);
        assert!(scene
            .world_rotation(frame.group)
            .unwrap()
            .angle_between(Quat::from_rotation_y(PI / 2.5))
            < 1e-3);

        let meshes = scene.mesh_descendants(frame.group);
        assert_eq!(meshes.len(), 2);
        assert_eq!(meshes[1], frame.picture_mesh);
        assert!(matches!(
            scene.get_object(meshes[0]).unwrap().material,
            Material::Standard { metalness, roughness, .. } if metalness == 0.5 && roughness == 0.0
        ));
        for mesh in meshes {
            assert_eq!(scene.get_object(mesh).unwrap().parent_id, Some(frame.group));
        }

        // The picture sits in front of the backing along the frame's facing
        let picture = scene.world_position(frame.picture_mesh).unwrap();
        let facing = Quat::from_rotation_y(PI / 2.5) * Vec3::Z;
        assert!(((picture - Vec3::new(-3.0, 0.4, 1.7)).dot(facing) - IMAGE_OFFSET_Z).abs() < 1e-5);
    }

    #[test]
    fn test_animate_only_moves_vertically() {
        let mut scene = Scene::new();
        let models = FrameModels::create(&mut scene);
        let root = scene.spawn(Object3D::group("Frames", Transform::from_translation(Vec3::ZERO)), None);
        let mut rng = StdRng::seed_from_u64(2);
        let frame = build_frame(&mut scene, root, &models, &FRAME_SPECS[7], &mut rng);

        frame.animate(&mut scene, frame.hover.period * 0.25);
        scene.late_update();

        let position = scene.world_position(frame.group).unwrap();
        assert_eq!(position.x, 3.0);
        assert_eq!(position.z, 1.7);
        assert!((position.y - 3.2).abs() < 1e-4);
    }

    #[test]
    fn test_table_has_nine_distinct_images() {
        for (i, a) in FRAME_SPECS.iter().enumerate() {
            for b in &FRAME_SPECS[i + 1..] {
                assert_ne!(a.image, b.image);
            }
        }
    }
}
