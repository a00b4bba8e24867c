use anyhow::Result;

mod animation;
mod camera;
mod engine;
mod frames;
mod gallery;
mod image_loader;
mod math;
mod model;
mod picking;
mod rendering;
mod scene_graph;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    pollster::block_on(window::run())?;

    Ok(())
}
