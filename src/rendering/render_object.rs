use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use crate::{
    rendering::{render_model::RenderModelId, texture::Texture},
    scene_graph::{material::Material, object3d::Object3D},
};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    model: Mat4,
    normal_matrix: Mat4,
    color: Vec4,
    // x: metalness, y: roughness, z: material kind, w: 1 when textured
    material: Vec4,
}

impl ObjectUniform {
    pub fn from_object(object: &Object3D) -> Self {
        let (metalness, roughness, textured) = match object.material {
            Material::Standard {
                metalness,
                roughness,
                ..
            } => (metalness, roughness, 0.0),
            Material::Basic { textured, .. } => (0.0, 1.0, if textured { 1.0 } else { 0.0 }),
            Material::Reflector { .. } => (0.0, 1.0, 0.0),
        };

        Self {
            model: *object.transform.get_world_matrix(),
            normal_matrix: *object.transform.get_normal_matrix(),
            color: object.material.color().extend(1.0),
            material: Vec4::new(metalness, roughness, object.material.kind() as f32, textured),
        }
    }
}

pub fn create_object_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Object bind group layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// GPU state for one drawable scene object.
pub struct RenderObject {
    pub render_model: RenderModelId,
    pub is_reflector: bool,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    // Kept alive while the bind group references it
    _texture: Option<Texture>,
}

impl RenderObject {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        object: &Object3D,
        render_model: RenderModelId,
        texture: &Texture,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Object uniform buffer ({})", object.name)),
            contents: bytemuck::cast_slice(&[ObjectUniform::from_object(object)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = Self::create_bind_group(device, layout, &uniform_buffer, texture);

        Self {
            render_model,
            is_reflector: matches!(object.material, Material::Reflector { .. }),
            uniform_buffer,
            bind_group,
            _texture: None,
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        texture: &Texture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    /// Points the object at a texture it does not own, such as the
    /// placeholder or the reflection target.
    pub fn bind_shared_texture(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        texture: &Texture,
    ) {
        self.bind_group = Self::create_bind_group(device, layout, &self.uniform_buffer, texture);
        self._texture = None;
    }

    pub fn set_texture(&mut self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout, texture: Texture) {
        self.bind_group = Self::create_bind_group(device, layout, &self.uniform_buffer, &texture);
        self._texture = Some(texture);
    }

    pub fn update_uniform(&self, queue: &wgpu::Queue, object: &Object3D) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[ObjectUniform::from_object(object)]),
        );
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
