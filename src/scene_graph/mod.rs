pub mod material;
pub mod object3d;
pub mod scene;
pub mod scene_model;
pub mod transform;
