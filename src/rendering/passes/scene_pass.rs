use wgpu::{
    DepthBiasState, Device, MultisampleState, PipelineCompilationOptions, RenderPassDescriptor,
    ShaderSource, StencilState,
};

use crate::rendering::{
    render_model::{MODEL_PRIMITIVE_STATE, RENDER_MODEL_VBL},
    shader_loader::ShaderDefinition,
    texture::DepthTexture,
};

pub(crate) const GALLERY_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Gallery Shader",
    path: "gallery.wgsl",
};

pub struct ScenePassTextureViews<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
}

/// Builds the factory the shader loader calls to (re)create the gallery
/// pipeline from WGSL source.
pub(crate) fn pipeline_factory(
    layout: wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
) -> impl FnMut(&Device, &ShaderDefinition, &str) -> anyhow::Result<wgpu::RenderPipeline>
       + Send
       + 'static {
    move |device: &Device, shader_def: &ShaderDefinition, source: &str| {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader_def.name),
            source: ShaderSource::Wgsl(source.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Gallery render pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[RENDER_MODEL_VBL],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: MODEL_PRIMITIVE_STATE,
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthTexture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(pipeline)
    }
}

/// Clears the targets to `background` and hands the open pass to
/// `render_callback` with the pipeline bound.
pub fn render_scene_pass<F>(
    label: &str,
    texture_views: &ScenePassTextureViews,
    encoder: &mut wgpu::CommandEncoder,
    pipeline: &wgpu::RenderPipeline,
    background: wgpu::Color,
    render_callback: F,
) where
    F: FnOnce(&mut wgpu::RenderPass),
{
    let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: texture_views.color,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(background),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: texture_views.depth,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        occlusion_query_set: None,
        timestamp_writes: None,
    });

    render_pass.set_pipeline(pipeline);
    render_callback(&mut render_pass);
}
