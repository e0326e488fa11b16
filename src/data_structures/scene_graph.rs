//! Scene graph of renderable objects.
//!
//! The graph is an insertion-ordered collection. Nodes are appended once at
//! startup (or when an asynchronous load completes) and live until teardown;
//! there is no removal. A [`NodeHandle`] returned by
//! [`SceneGraph::add`] stays valid for the lifetime of the graph.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        model,
        transform::Transform,
    },
    render::{Instanced, Render},
};

/// Anything with a transform the animation loop can rotate.
pub trait Spatial {
    fn transform(&self) -> &Transform;

    fn transform_mut(&mut self) -> &mut Transform;
}

impl<T: Spatial + ?Sized> Spatial for Box<T> {
    fn transform(&self) -> &Transform {
        (**self).transform()
    }

    fn transform_mut(&mut self) -> &mut Transform {
        (**self).transform_mut()
    }
}

/// A renderable object tracked by the scene graph.
pub trait SceneNode: Spatial {
    /// Push the current transform into the node's instance buffer.
    fn write_to_buffer(&self, queue: &wgpu::Queue);

    fn get_render(&self) -> Render<'_>;
}

/// Index of a node inside its [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

impl NodeHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct SceneGraph<N> {
    nodes: Vec<N>,
}

impl<N> SceneGraph<N> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn add(&mut self, node: N) -> NodeHandle {
        self.nodes.push(node);
        NodeHandle(self.nodes.len() - 1)
    }

    pub fn get(&self, handle: NodeHandle) -> Option<&N> {
        self.nodes.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut N> {
        self.nodes.get_mut(handle.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }
}

impl<N> Default for SceneGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph<Box<dyn SceneNode>> {
    /// Compose the renders of all nodes in insertion order.
    pub fn get_render(&self) -> Render<'_> {
        Render::Composed(self.nodes.iter().map(|node| node.get_render()).collect())
    }
}

/// A single model drawn once with its own transform.
pub struct MeshNode {
    transform: Transform,
    model: model::Model,
    instance_buffer: wgpu::Buffer,
}

impl MeshNode {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        model: model::Model,
        transform: Transform,
    ) -> Self {
        let raw: InstanceRaw = Instance::from(&transform).to_raw();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Instance Buffer")),
            contents: bytemuck::cast_slice(&[raw]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            transform,
            model,
            instance_buffer,
        }
    }
}

impl Spatial for MeshNode {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}

impl SceneNode for MeshNode {
    fn write_to_buffer(&self, queue: &wgpu::Queue) {
        let raw = Instance::from(&self.transform).to_raw();
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&[raw]));
    }

    fn get_render(&self) -> Render<'_> {
        Render::Default(Instanced {
            instance: &self.instance_buffer,
            model: &self.model,
            amount: 1,
        })
    }
}
