//! rotating-shapes
//!
//! A small wgpu scene of spinning shapes, natively and on the web. A cube, a
//! cylinder and a textured cone are built from declarative geometry; a
//! low-poly tree is loaded from OBJ/MTL in the background and joins the
//! scene when it arrives. A per-frame animation loop rotates everything and
//! redraws.
//!
//! High-level modules
//! - `animation`: the per-frame loop, its renderer and scheduler seams, and the frame clock
//! - `camera`: perspective camera, projection and uniforms
//! - `config`: runtime configuration with environment overrides
//! - `context`: GPU context that owns device, queue, surface and the lit pipeline
//! - `data_structures`: geometry, meshes, instances, textures, transforms and the scene graph
//! - `flow`: the winit event loop hosting the scene
//! - `pipelines`: the lit render pipeline and the directional light
//! - `render`: render composition for batching draws
//! - `resources`: asset access and the two-stage MTL/OBJ loader
//! - `scene`: the demo scene description
//!

pub mod animation;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Entry point of the web build.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    flow::run(config::Config::from_env()).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
