use id_arena::Id;

use crate::math::bounds::AABB;
use crate::model::Model;
use crate::rendering::render_model::RenderModelId;

pub type SceneModelId = Id<SceneModel>;

pub struct SceneModel {
    pub model: Model,
    pub bounds: AABB,
    /// Set once the renderer has uploaded the model.
    pub render_model: Option<RenderModelId>,
}

impl SceneModel {
    pub fn new(model: Model) -> Self {
        let bounds = model.bounds();
        Self {
            model,
            bounds,
            render_model: None,
        }
    }
}
