use std::sync::Arc;

use anyhow::Context;
use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{engine, gallery::GalleryState, rendering::renderer::Renderer};

struct App {
    renderer: Option<Renderer>,
    gallery: GalleryState,
    mouse_pos: Vec2,
}

impl App {
    fn from_gallery(gallery: GalleryState) -> Self {
        Self {
            renderer: None,
            gallery,
            mouse_pos: Vec2::ZERO,
        }
    }

    fn create_renderer(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<Renderer> {
        let window_attributes = Window::default_attributes().with_title("Frame Gallery");
        let window = event_loop
            .create_window(window_attributes)
            .context("Failed to create window")?;

        pollster::block_on(Renderer::new(Arc::new(window), &mut self.gallery))
            .context("Failed to create renderer")
    }

    fn on_click(&mut self) {
        let Some(renderer) = self.renderer.as_ref() else {
            return;
        };

        let viewport = Vec2::new(renderer.size.width as f32, renderer.size.height as f32);
        let now = self.gallery.elapsed();
        self.gallery.handle_click(self.mouse_pos, viewport, now);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        match self.create_renderer(event_loop) {
            Ok(renderer) => {
                self.gallery.request_images();
                renderer.window.request_redraw();
                self.renderer = Some(renderer);
            }
            Err(e) => {
                log::error!("{:#}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(new_size);
                }
                self.gallery.resize(new_size.width, new_size.height);
            }
            WindowEvent::RedrawRequested => {
                let Some(renderer) = self.renderer.as_mut() else {
                    return;
                };

                renderer.window.request_redraw();

                engine::update(&mut self.gallery, renderer);

                match renderer.render(&self.gallery) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Timeout");
                    }
                    Err(other) => {
                        log::error!("Unexpected error: {:?}", other);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_pos = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.on_click();
            }
            _ => (),
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let gallery = GalleryState::new();
    let mut app = App::from_gallery(gallery);
    event_loop.run_app(&mut app)?;

    Ok(())
}
