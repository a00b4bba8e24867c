use glam::Vec3;
use id_arena::Id;

use crate::scene_graph::material::Material;
use crate::scene_graph::scene_model::SceneModelId;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub model_id: Option<SceneModelId>,
    pub material: Material,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
}

impl Object3D {
    pub fn group(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            ..Default::default()
        }
    }

    pub fn mesh(
        name: impl Into<String>,
        transform: Transform,
        model_id: SceneModelId,
        material: Material,
    ) -> Self {
        Self {
            name: name.into(),
            transform,
            model_id: Some(model_id),
            material,
            ..Default::default()
        }
    }

    pub fn is_mesh(&self) -> bool {
        self.model_id.is_some()
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Transform::from_translation(Vec3::ZERO),
            model_id: None,
            material: Material::default(),
            parent_id: None,
            child_ids: Vec::new(),
        }
    }
}
