use glam::{Mat4, Quat, Vec3};
use id_arena::Arena;

use crate::model::Model;
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::scene_model::{SceneModel, SceneModelId};

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub models: Arena<SceneModel>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            models: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    /// Adds an object and attaches it to `parent` in one step.
    pub fn spawn(&mut self, object: Object3D, parent: Option<ObjectId>) -> ObjectId {
        let object_id = self.add_object(object);

        if parent.is_some() {
            self.set_object_parent(object_id, parent);
        }

        object_id
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn add_model(&mut self, model: Model) -> SceneModelId {
        self.models.alloc(SceneModel::new(model))
    }

    pub fn get_model(&self, id: SceneModelId) -> Option<&SceneModel> {
        self.models.get(id)
    }

    /// Updates all object transforms in hierarchical order
    fn update_transforms(&self) {
        let root_objects = self
            .objects
            .iter()
            .filter(|(_, object)| object.parent_id.is_none())
            .map(|(id, _)| id);

        for root_id in root_objects {
            self.update_object_transform_recursive(root_id, Mat4::IDENTITY);
        }
    }

    /// Recursively updates an object's world transform and its children
    fn update_object_transform_recursive(&self, object_id: ObjectId, parent_world_matrix: Mat4) {
        if let Some(object) = self.objects.get(object_id) {
            if object.transform.is_world_dirty() {
                let local_matrix = *object.transform.get_local_matrix();
                object
                    .transform
                    .set_world_matrix(parent_world_matrix * local_matrix);
            }

            let world_matrix = *object.transform.get_world_matrix();
            for &child_id in &object.child_ids {
                self.update_object_transform_recursive(child_id, world_matrix);
            }
        }
    }

    /// Invalidates world transforms for an object and all its descendants
    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
        }
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(old_parent_id) = self.objects.get(child_id).and_then(|c| c.parent_id) {
            if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                old_parent.child_ids.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;
        }

        if let Some(new_parent) = new_parent_id.and_then(|id| self.objects.get_mut(id)) {
            new_parent.child_ids.push(child_id);
        }

        self.invalidate_object_hierarchy(child_id);
    }

    pub fn set_object_translation(&mut self, object_id: ObjectId, translation: Vec3) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_translation(translation);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    pub fn world_position(&self, object_id: ObjectId) -> Option<Vec3> {
        self.get_object(object_id)
            .map(|object| object.transform.world_translation())
    }

    pub fn world_rotation(&self, object_id: ObjectId) -> Option<Quat> {
        self.get_object(object_id)
            .map(|object| object.transform.world_rotation())
    }

    /// Collects every mesh object below `root` (including `root` itself) in
    /// depth-first order.
    pub fn mesh_descendants(&self, root: ObjectId) -> Vec<ObjectId> {
        let mut meshes = Vec::new();
        self.collect_meshes(root, &mut meshes);
        meshes
    }

    fn collect_meshes(&self, object_id: ObjectId, meshes: &mut Vec<ObjectId>) {
        if let Some(object) = self.objects.get(object_id) {
            if object.is_mesh() {
                meshes.push(object_id);
            }

            for &child_id in &object.child_ids {
                self.collect_meshes(child_id, meshes);
            }
        }
    }

    pub fn early_update(&mut self) {
        for (_, object) in self.objects.iter() {
            object.transform.reset_flags();
        }
    }

    pub fn late_update(&mut self) {
        self.update_transforms();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::box_geometry;
    use crate::scene_graph::material::Material;
    use crate::scene_graph::transform::Transform;

    #[test]
    fn test_child_world_position_follows_parent() {
        let mut scene = Scene::new();
        let parent = scene.spawn(
            Object3D::group(
                "parent",
                Transform::new(Vec3::new(1.0, 0.0, 0.0), Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
            ),
            None,
        );
        let child = scene.spawn(
            Object3D::group("child", Transform::from_translation(Vec3::new(0.0, 0.0, 1.0))),
            Some(parent),
        );

        scene.late_update();

        let position = scene.world_position(child).unwrap();
        assert!((position - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);

        scene.set_object_translation(parent, Vec3::new(1.0, 3.0, 0.0));
        scene.late_update();

        let position = scene.world_position(child).unwrap();
        assert!((position - Vec3::new(2.0, 3.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_mesh_descendants_skip_groups() {
        let mut scene = Scene::new();
        let model = scene.add_model(box_geometry(1.0, 1.0, 1.0));
        let root = scene.spawn(Object3D::group("root", Transform::from_translation(Vec3::ZERO)), None);
        let group = scene.spawn(Object3D::group("group", Transform::from_translation(Vec3::ZERO)), Some(root));
        let mesh = scene.spawn(
            Object3D::mesh("mesh", Transform::from_translation(Vec3::ZERO), model, Material::default()),
            Some(group),
        );
        scene.spawn(Object3D::group("outside", Transform::from_translation(Vec3::ZERO)), None);

        assert_eq!(scene.mesh_descendants(root), vec![mesh]);
        assert_eq!(scene.get_object(mesh).unwrap().parent_id, Some(group));
    }
}
