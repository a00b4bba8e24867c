use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use id_arena::Arena;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    camera::CameraUniform,
    gallery::GalleryState,
    rendering::{
        global_uniform::{GlobalUniform, GlobalUniformState},
        passes::scene_pass::{
            pipeline_factory, render_scene_pass, ScenePassTextureViews, GALLERY_SHADER,
        },
        render_model::RenderModel,
        render_object::{create_object_bind_group_layout, RenderObject},
        shader_loader::ShaderLoader,
        texture::{ColorTarget, DepthTexture, Texture},
    },
    scene_graph::object3d::ObjectId,
};

struct RenderCamera {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl RenderCamera {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform: CameraUniform,
        label: &str,
    ) -> Self {
        let buffer = uniform.create_buffer(device, label);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { buffer, bind_group }
    }
}

fn create_camera_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Camera bind group layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Draws every render object, optionally skipping mirrors so they do not
/// show up in their own reflection.
fn draw_render_objects(
    render_pass: &mut wgpu::RenderPass,
    render_models: &Arena<RenderModel>,
    render_objects: &HashMap<ObjectId, RenderObject>,
    include_reflectors: bool,
) {
    for render_object in render_objects.values() {
        if render_object.is_reflector && !include_reflectors {
            continue;
        }

        let Some(render_model) = render_models.get(render_object.render_model) else {
            continue;
        };

        render_pass.set_bind_group(2, render_object.bind_group(), &[]);
        for primitive in &render_model.primitives {
            primitive.draw(render_pass);
        }
    }
}

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    depth_texture: DepthTexture,
    reflection_target: ColorTarget,
    reflection_depth: DepthTexture,

    camera: RenderCamera,
    mirrored_camera: RenderCamera,
    global_uniform: GlobalUniform,

    object_bind_group_layout: wgpu::BindGroupLayout,
    render_models: Arena<RenderModel>,
    render_objects: HashMap<ObjectId, RenderObject>,
    placeholder_texture: Texture,

    shader_loader: ShaderLoader,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, gallery: &mut GalleryState) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter found")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let size = PhysicalSize::new(config.width, config.height);

        gallery.resize(config.width, config.height);

        let depth_texture = DepthTexture::new(&device, &config, "Depth Texture");
        let reflection_target = ColorTarget::new(&device, &config, "Reflection Target");
        let reflection_depth = DepthTexture::new(&device, &config, "Reflection Depth Texture");

        let camera_layout = create_camera_bind_group_layout(&device);
        let camera = RenderCamera::new(
            &device,
            &camera_layout,
            CameraUniform::from_camera(&gallery.camera),
            "Camera",
        );
        let mirrored_camera = RenderCamera::new(
            &device,
            &camera_layout,
            CameraUniform::mirrored(
                &gallery.camera,
                &gallery.mirror_plane(),
                gallery.config.floor.clip_bias,
            ),
            "Mirrored Camera",
        );

        let global_uniform = GlobalUniform::new(
            &device,
            GlobalUniformState::new(size, 0.0, &gallery.config.light),
        );

        let object_bind_group_layout = create_object_bind_group_layout(&device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Gallery pipeline layout"),
            bind_group_layouts: &[
                &camera_layout,
                &global_uniform.bind_group_layout,
                &object_bind_group_layout,
            ],
            push_constant_ranges: &[],
        });

        let shader_loader = ShaderLoader::new(
            device.clone(),
            GALLERY_SHADER,
            pipeline_factory(pipeline_layout, surface_format),
        )?;

        let placeholder_texture = Texture::placeholder(&device, &queue);

        let mut renderer = Self {
            window,
            size,
            surface,
            device,
            queue,
            config,
            depth_texture,
            reflection_target,
            reflection_depth,
            camera,
            mirrored_camera,
            global_uniform,
            object_bind_group_layout,
            render_models: Arena::new(),
            render_objects: HashMap::new(),
            placeholder_texture,
            shader_loader,
        };

        renderer.load_models(gallery);
        renderer.create_render_objects(gallery);

        Ok(renderer)
    }

    fn load_models(&mut self, gallery: &mut GalleryState) {
        for (_id, scene_model) in gallery.scene.models.iter_mut() {
            let render_model = RenderModel::from_model(&self.device, &scene_model.model);
            scene_model.render_model = Some(self.render_models.alloc(render_model));
            log::debug!(
                "Uploaded model {} with {} primitives",
                scene_model.model.name,
                scene_model.model.primitives.len()
            );
        }
    }

    fn create_render_objects(&mut self, gallery: &GalleryState) {
        let scene = &gallery.scene;

        for (object_id, object) in scene.objects.iter() {
            let Some(render_model) = object
                .model_id
                .and_then(|model_id| scene.get_model(model_id))
                .and_then(|model| model.render_model)
            else {
                continue;
            };

            let mut render_object = RenderObject::new(
                &self.device,
                &self.object_bind_group_layout,
                object,
                render_model,
                &self.placeholder_texture,
            );

            if render_object.is_reflector {
                render_object.bind_shared_texture(
                    &self.device,
                    &self.object_bind_group_layout,
                    self.reflection_target.texture(),
                );
            }

            self.render_objects.insert(object_id, render_object);
        }

        log::info!("Created {} render objects", self.render_objects.len());
    }

    /// Swaps placeholders for any pictures that finished loading.
    pub fn upload_loaded_images(&mut self, gallery: &GalleryState) {
        for loaded in gallery.image_loader.drain_loaded() {
            let Some(render_object) = self.render_objects.get_mut(&loaded.object) else {
                continue;
            };

            let texture = Texture::from_image(
                &self.device,
                &self.queue,
                &loaded.image,
                "Picture Texture",
            );
            render_object.set_texture(&self.device, &self.object_bind_group_layout, texture);
            log::debug!(
                "Uploaded {}x{} picture",
                loaded.image.width(),
                loaded.image.height()
            );
        }
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture.resize(&self.device, &self.config);
        self.reflection_target.resize(&self.device, &self.config);
        self.reflection_depth.resize(&self.device, &self.config);

        // The floor samples the old reflection view until rebound
        for render_object in self.render_objects.values_mut() {
            if render_object.is_reflector {
                render_object.bind_shared_texture(
                    &self.device,
                    &self.object_bind_group_layout,
                    self.reflection_target.texture(),
                );
            }
        }
    }

    /// Re-applies the current surface configuration, used after the surface
    /// was lost or became outdated.
    pub fn reconfigure(&mut self) {
        self.resize(self.size);
    }

    fn update_uniforms(&mut self, gallery: &GalleryState) {
        CameraUniform::from_camera(&gallery.camera).update_buffer(&self.queue, &self.camera.buffer);
        CameraUniform::mirrored(
            &gallery.camera,
            &gallery.mirror_plane(),
            gallery.config.floor.clip_bias,
        )
        .update_buffer(&self.queue, &self.mirrored_camera.buffer);

        self.global_uniform.update(
            &self.queue,
            GlobalUniformState::new(self.size, gallery.elapsed(), &gallery.config.light),
        );

        for (object_id, render_object) in &self.render_objects {
            if let Some(object) = gallery.scene.get_object(*object_id) {
                if object.transform.has_changed() {
                    render_object.update_uniform(&self.queue, object);
                }
            }
        }
    }

    pub fn render(&mut self, gallery: &GalleryState) -> Result<(), wgpu::SurfaceError> {
        self.shader_loader.load_pending_shaders();
        self.update_uniforms(gallery);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let background = gallery.config.background;
        let clear_color = wgpu::Color {
            r: background.x as f64,
            g: background.y as f64,
            b: background.z as f64,
            a: 1.0,
        };

        let pipeline = &self.shader_loader.pipeline;
        let render_models = &self.render_models;
        let render_objects = &self.render_objects;
        let global_bind_group = &self.global_uniform.bind_group;

        render_scene_pass(
            "Reflection Pass",
            &ScenePassTextureViews {
                color: self.reflection_target.view(),
                depth: self.reflection_depth.view(),
            },
            &mut encoder,
            pipeline,
            clear_color,
            |render_pass| {
                render_pass.set_bind_group(0, &self.mirrored_camera.bind_group, &[]);
                render_pass.set_bind_group(1, global_bind_group, &[]);
                draw_render_objects(render_pass, render_models, render_objects, false);
            },
        );

        render_scene_pass(
            "Main Pass",
            &ScenePassTextureViews {
                color: &view,
                depth: self.depth_texture.view(),
            },
            &mut encoder,
            pipeline,
            clear_color,
            |render_pass| {
                render_pass.set_bind_group(0, &self.camera.bind_group, &[]);
                render_pass.set_bind_group(1, global_bind_group, &[]);
                draw_render_objects(render_pass, render_models, render_objects, true);
            },
        );

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}
