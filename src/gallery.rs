use std::{path::PathBuf, time::Instant};

use glam::{Quat, Vec2, Vec3};
use rand::Rng;

use crate::{
    animation::camera_transition::{CameraController, FocusTarget},
    camera::{Camera, CameraConfig},
    frames::{build_frame, FrameInstance, FrameModels, ImageSource, FRAME_SPECS},
    image_loader::ImageLoader,
    math::plane::Plane,
    model::plane_geometry,
    picking::pick,
    rendering::config::RenderConfig,
    scene_graph::{
        material::Material,
        object3d::{Object3D, ObjectId},
        scene::Scene,
        transform::Transform,
    },
};

/// When set, pictures are read from this directory instead of the network.
pub const IMAGE_DIR_ENV: &str = "GALLERY_IMAGE_DIR";

/// Everything the render loop and the input handler share.
pub struct GalleryState {
    pub camera: Camera,
    pub config: RenderConfig,
    pub start_time: Instant,
    pub scene: Scene,
    pub frames: Vec<FrameInstance>,
    pub image_loader: ImageLoader,
    image_dir: Option<PathBuf>,
    selection: Option<usize>,
    camera_controller: CameraController,
    pickable_meshes: Vec<ObjectId>,
}

impl GalleryState {
    pub fn new() -> Self {
        let image_dir = std::env::var_os(IMAGE_DIR_ENV).map(PathBuf::from);
        if let Some(dir) = &image_dir {
            log::info!("Loading pictures from {}", dir.display());
        }

        Self::with_rng(&mut rand::thread_rng(), image_dir)
    }

    pub fn with_rng(rng: &mut impl Rng, image_dir: Option<PathBuf>) -> Self {
        let config = RenderConfig::default();
        let camera = Camera::new(&CameraConfig::default(), 16.0 / 9.0);
        let camera_controller = CameraController::new(camera.state());

        let mut scene = Scene::new();

        let floor_model = scene.add_model(plane_geometry(config.floor.size, config.floor.size));
        scene.spawn(
            Object3D::mesh(
                "Floor",
                Transform::new(
                    Vec3::new(0.0, config.floor.height, 0.0),
                    Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
                ),
                floor_model,
                Material::Reflector {
                    color: config.floor.color,
                },
            ),
            None,
        );

        let frames_group = scene.spawn(
            Object3D::group("Frames", Transform::from_translation(Vec3::ZERO)),
            None,
        );
        let models = FrameModels::create(&mut scene);
        let frames: Vec<FrameInstance> = FRAME_SPECS
            .iter()
            .map(|spec| build_frame(&mut scene, frames_group, &models, spec, rng))
            .collect();

        scene.late_update();
        let pickable_meshes = scene.mesh_descendants(frames_group);

        log::info!(
            "Gallery ready: {} frames, {} pickable meshes",
            frames.len(),
            pickable_meshes.len()
        );

        Self {
            camera,
            config,
            start_time: Instant::now(),
            scene,
            frames,
            image_loader: ImageLoader::new(),
            image_dir,
            selection: None,
            camera_controller,
            pickable_meshes,
        }
    }

    /// Where the picture of `frame` is loaded from.
    pub fn image_source(&self, frame: &FrameInstance) -> ImageSource {
        match &self.image_dir {
            Some(dir) => frame.image.local_copy(dir),
            None => frame.image.clone(),
        }
    }

    /// Kicks off background loads for every frame picture.
    pub fn request_images(&self) {
        for frame in &self.frames {
            self.image_loader
                .request(frame.picture_mesh, self.image_source(frame));
        }
    }

    /// Session time in seconds; all animations are functions of it.
    pub fn elapsed(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }

    pub fn mirror_plane(&self) -> Plane {
        Plane::from_point_normal(Vec3::new(0.0, self.config.floor.height, 0.0), Vec3::Y)
    }

    pub fn update(&mut self, now: f32) {
        for frame in &self.frames {
            frame.animate(&mut self.scene, now);
        }

        self.camera_controller.update(&mut self.camera, now);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Picks the frame under `screen` and starts the camera toward it, or
    /// back to the default view when nothing was hit.
    pub fn handle_click(&mut self, screen: Vec2, viewport: Vec2, now: f32) -> Option<usize> {
        let hit = pick(
            screen,
            viewport,
            &self.camera,
            &self.scene,
            &self.pickable_meshes,
        );

        if let Some(hit) = &hit {
            log::debug!(
                "Picked {:?} at distance {:.3} ({})",
                hit.mesh,
                hit.distance,
                hit.point
            );
        }

        self.selection =
            hit.and_then(|hit| self.frames.iter().position(|frame| frame.group == hit.object));

        let focus = self.selection.and_then(|index| {
            let group = self.frames[index].group;
            Some(FocusTarget {
                position: self.scene.world_position(group)?,
                orientation: self.scene.world_rotation(group)?,
            })
        });

        match self.selection {
            Some(index) => log::info!("Focusing frame {}", index),
            None => log::info!("Returning to the default view"),
        }

        self.camera_controller
            .on_selection_changed(focus, &self.camera, now);

        self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::camera_transition::{TransitionState, FOCUS_DISTANCE, TRANSITION_DURATION};
    use rand::{rngs::StdRng, SeedableRng};
    use std::f32::consts::PI;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);
    const EMPTY_CORNER: Vec2 = Vec2::new(5.0, 5.0);

    fn gallery() -> GalleryState {
        let mut gallery = GalleryState::with_rng(&mut StdRng::seed_from_u64(42), None);
        gallery.resize(VIEWPORT.x as u32, VIEWPORT.y as u32);
        gallery.update(0.0);
        gallery.scene.late_update();
        gallery
    }

    fn project(gallery: &GalleryState, world: Vec3) -> Vec2 {
        let ndc = gallery.camera.view_projection().project_point3(world);
        Vec2::new((ndc.x + 1.0) * 0.5 * VIEWPORT.x, (1.0 - ndc.y) * 0.5 * VIEWPORT.y)
    }

    fn frame_on_screen(gallery: &GalleryState, index: usize) -> Vec2 {
        project(gallery, FRAME_SPECS[index].position)
    }

    fn run_to_end(gallery: &mut GalleryState, from: f32) {
        gallery.update(from + TRANSITION_DURATION + 0.01);
        gallery.scene.late_update();
    }

    #[test]
    fn test_every_frame_is_pickable_from_default_view() {
        let mut gallery = gallery();

        for index in 0..FRAME_SPECS.len() {
            let screen = frame_on_screen(&gallery, index);
            assert_eq!(gallery.handle_click(screen, VIEWPORT, 0.0), Some(index), "frame {index}");
        }
    }

    #[test]
    fn test_click_on_frame_four_focuses_it() {
        let mut gallery = gallery();
        let screen = frame_on_screen(&gallery, 4);

        assert_eq!(gallery.handle_click(screen, VIEWPORT, 0.0), Some(4));
        run_to_end(&mut gallery, 0.0);

        let orientation = Quat::from_rotation_y(PI / 2.5);
        let expected = Vec3::new(-3.0, 0.4, 1.7) + orientation * Vec3::new(0.0, 0.0, FOCUS_DISTANCE);

        assert!((gallery.camera.position - expected).length() < 1e-4);
        assert!(gallery.camera.orientation.angle_between(orientation) < 1e-3);
        assert_eq!(gallery.camera_controller.state(), TransitionState::Idle);
    }

    #[test]
    fn test_click_on_empty_space_resets_view() {
        let mut gallery = gallery();

        let screen = frame_on_screen(&gallery, 4);
        gallery.handle_click(screen, VIEWPORT, 0.0);
        gallery.update(0.5);
        gallery.scene.late_update();
        assert_ne!(gallery.camera.position, Vec3::new(0.0, 0.5, 8.0));

        assert_eq!(gallery.handle_click(EMPTY_CORNER, VIEWPORT, 0.5), None);
        run_to_end(&mut gallery, 0.5);

        assert!((gallery.camera.position - Vec3::new(0.0, 0.5, 8.0)).length() < 1e-5);
        assert!(gallery.camera.orientation.angle_between(Quat::IDENTITY) < 1e-3);
    }

    #[test]
    fn test_second_click_wins_over_first() {
        let mut gallery = gallery();
        let frame_a = frame_on_screen(&gallery, 4);
        let frame_b = frame_on_screen(&gallery, 0);

        gallery.handle_click(frame_a, VIEWPORT, 0.0);
        assert_eq!(gallery.handle_click(frame_b, VIEWPORT, 0.0), Some(0));
        run_to_end(&mut gallery, 0.0);

        let expected = Vec3::new(0.0, 0.25, 2.0 + FOCUS_DISTANCE);
        assert!((gallery.camera.position - expected).length() < 1e-4);
        assert_eq!(gallery.selection, Some(0));
    }

    #[test]
    fn test_hover_keeps_running_while_focused() {
        let mut gallery = gallery();
        let group = gallery.frames[2].group;
        let period = gallery.frames[2].hover.period;

        gallery.handle_click(frame_on_screen(&gallery, 2), VIEWPORT, 0.0);
        gallery.update(period * 0.25);
        gallery.scene.late_update();

        let y = gallery.scene.world_position(group).unwrap().y;
        assert!((y - 2.7).abs() < 1e-3, "got {y}");
    }

    #[test]
    fn test_resize_leaves_frames_untouched() {
        let mut gallery = gallery();
        gallery.resize(1920, 1080);
        let before: Vec<_> = gallery
            .frames
            .iter()
            .map(|frame| *gallery.scene.get_object(frame.group).unwrap().transform.get_world_matrix())
            .collect();

        gallery.resize(800, 600);
        gallery.scene.late_update();

        let after: Vec<_> = gallery
            .frames
            .iter()
            .map(|frame| *gallery.scene.get_object(frame.group).unwrap().transform.get_world_matrix())
            .collect();
        assert_eq!(before, after);
        assert!((gallery.camera.aspect - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_floor_is_not_pickable() {
        let mut gallery = gallery();
        // Straight down in front of the camera only meets the floor
        let screen = Vec2::new(400.0, 590.0);
        assert_eq!(gallery.handle_click(screen, VIEWPORT, 0.0), None);
        for &mesh in &gallery.pickable_meshes {
            let object = gallery.scene.get_object(mesh).unwrap();
            assert!(!matches!(object.material, Material::Reflector { .. }));
        }
    }

    #[test]
    fn test_image_dir_switches_pictures_to_local_files() {
        let dir = PathBuf::from("offline");
        let gallery = GalleryState::with_rng(&mut StdRng::seed_from_u64(7), Some(dir.clone()));

        for (frame, spec) in gallery.frames.iter().zip(FRAME_SPECS.iter()) {
            let source = gallery.image_source(frame);
            assert_eq!(source, spec.image.local_copy(&dir));
            assert!(matches!(source, ImageSource::File(path) if path.starts_with("offline")));
        }

        let online = self::gallery();
        assert_eq!(online.image_source(&online.frames[0]), ImageSource::Pexels(1103970));
    }
}
