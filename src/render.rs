//! Render composition and batching.
//!
//! Scene nodes describe what they want drawn with a [`Render`]. The renderer
//! flattens the render tree into a batch of [`Instanced`] draws that all go
//! through the basic pipeline.

use crate::data_structures::model::Model;

/// Data for instanced object rendering: a model and its instance buffer.
///
/// The instance buffer contains per-instance transformation data.
#[derive(Clone, Copy)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
}

/// Specifies how a scene object should be rendered.
///
/// - `Default(Instanced)` renders a single opaque instanced object
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
pub enum Render<'a> {
    Default(Instanced<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Flatten this render tree into `batch`, preserving order.
    pub fn collect_into(self, batch: &mut Vec<Instanced<'a>>) {
        match self {
            Render::Default(instanced) => batch.push(instanced),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.collect_into(batch)),
        }
    }
}
