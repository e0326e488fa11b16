//! Meshes, materials and models.
//!
//! A model exists in two forms. [`ModelData`] is plain CPU data (vertices,
//! indices, decoded images) that can be produced on any thread, for instance by
//! an asset loader running in the background. [`Model`] is the uploaded form
//! holding the GPU buffers and bind groups used while drawing.

use std::ops::Range;

use anyhow::Context as _;
use wgpu::util::DeviceExt;

use crate::data_structures::texture::Texture;

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 11]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// CPU-side mesh: triangle list vertices and indices plus the index of its material.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub material: usize,
}

/// CPU-side material: a decoded diffuse image and an optional normal map.
#[derive(Clone, Debug)]
pub struct MaterialData {
    pub name: String,
    pub diffuse: image::RgbaImage,
    pub normal: Option<image::RgbaImage>,
}

impl MaterialData {
    /// A material whose diffuse texture is a single pixel of `rgba` (sRGB).
    pub fn solid(name: &str, rgba: [u8; 4]) -> Self {
        Self {
            name: name.to_string(),
            diffuse: image::RgbaImage::from_pixel(1, 1, image::Rgba(rgba)),
            normal: None,
        }
    }

    /// Solid material from a `0xRRGGBB` colour.
    pub fn from_hex(name: &str, hex: u32) -> Self {
        let [_, r, g, b] = hex.to_be_bytes();
        Self::solid(name, [r, g, b, 255])
    }
}

/// Everything needed to upload a [`Model`].
#[derive(Clone, Debug, Default)]
pub struct ModelData {
    pub meshes: Vec<MeshData>,
    pub materials: Vec<MaterialData>,
}

impl ModelData {
    pub fn single(mesh: MeshData, material: MaterialData) -> Self {
        Self {
            meshes: vec![MeshData { material: 0, ..mesh }],
            materials: vec![material],
        }
    }
}

#[derive(Debug)]
pub struct Material {
    pub name: String,
    // The bind group refers to these views and samplers; they live as long as it does.
    pub diffuse_texture: Texture,
    pub normal_texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        diffuse_texture: Texture,
        normal_texture: Texture,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&diffuse_texture.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&normal_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&normal_texture.sampler),
                },
            ],
            label: Some(name),
        });

        Self {
            name: String::from(name),
            diffuse_texture,
            normal_texture,
            bind_group,
        }
    }
}

#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    pub material: usize,
}

#[derive(Debug)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

impl Model {
    /// Upload CPU model data to the GPU.
    ///
    /// Meshes pointing at a material that does not exist fall back to the first
    /// one; a model without materials gets a plain white one.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &ModelData,
        layout: &wgpu::BindGroupLayout,
    ) -> anyhow::Result<Self> {
        let mut materials = Vec::with_capacity(data.materials.len().max(1));
        for material in &data.materials {
            let diffuse_texture =
                Texture::from_rgba(device, queue, &material.diffuse, Some(&material.name), false)
                    .with_context(|| format!("diffuse texture of material {}", material.name))?;
            let normal_texture = match &material.normal {
                Some(normal) => Texture::from_rgba(device, queue, normal, Some(&material.name), true)
                    .with_context(|| format!("normal map of material {}", material.name))?,
                None => Texture::create_default_normal_map(1, 1, device, queue),
            };
            materials.push(Material::new(
                device,
                &material.name,
                diffuse_texture,
                normal_texture,
                layout,
            ));
        }
        if materials.is_empty() {
            let fallback = MaterialData::solid("default", [255; 4]);
            materials.push(Material::new(
                device,
                &fallback.name,
                Texture::from_rgba(device, queue, &fallback.diffuse, Some("default"), false)?,
                Texture::create_default_normal_map(1, 1, device, queue),
                layout,
            ));
        }

        let meshes = data
            .meshes
            .iter()
            .filter(|mesh| {
                if mesh.indices.is_empty() {
                    log::warn!("Skipping mesh {} without triangles.", mesh.name);
                }
                !mesh.indices.is_empty()
            })
            .map(|mesh| {
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{:?} Vertex Buffer", mesh.name)),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{:?} Index Buffer", mesh.name)),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                Mesh {
                    name: mesh.name.clone(),
                    vertex_buffer,
                    index_buffer,
                    num_elements: mesh.indices.len() as u32,
                    material: if mesh.material < materials.len() {
                        mesh.material
                    } else {
                        0
                    },
                }
            })
            .collect();

        Ok(Self { meshes, materials })
    }
}

pub trait DrawModel {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &Mesh,
        material: &Material,
        instances: Range<u32>,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    );

    fn draw_model_instanced(
        &mut self,
        model: &Model,
        instances: Range<u32>,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    );
}

impl DrawModel for wgpu::RenderPass<'_> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &Mesh,
        material: &Material,
        instances: Range<u32>,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, &material.bind_group, &[]);
        self.set_bind_group(1, camera_bind_group, &[]);
        self.set_bind_group(2, light_bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, instances);
    }

    fn draw_model_instanced(
        &mut self,
        model: &Model,
        instances: Range<u32>,
        camera_bind_group: &wgpu::BindGroup,
        light_bind_group: &wgpu::BindGroup,
    ) {
        for mesh in &model.meshes {
            let material = &model.materials[mesh.material];
            self.draw_mesh_instanced(
                mesh,
                material,
                instances.clone(),
                camera_bind_group,
                light_bind_group,
            );
        }
    }
}
