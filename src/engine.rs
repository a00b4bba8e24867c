use crate::{gallery::GalleryState, rendering::renderer::Renderer};

/// Advances the gallery by one frame: animations first, then world
/// transforms, then any pictures that finished loading.
pub fn update(state: &mut GalleryState, renderer: &mut Renderer) {
    let now = state.elapsed();

    state.scene.early_update();
    state.update(now);
    state.scene.late_update();

    renderer.upload_loaded_images(state);
}
