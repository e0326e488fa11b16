//! Engine data structures: models, textures, geometry, transforms and the scene graph.
//!
//! - `geometry` builds box, cylinder and cone meshes from a few parameters
//! - `instance` holds the GPU form of an object transform
//! - `model` contains mesh and material definitions in CPU and GPU form
//! - `scene_graph` is the insertion-ordered collection of renderable objects
//! - `slot` is the fill-once holder for asynchronously loaded objects
//! - `texture` contains GPU texture wrapper and creation utilities
//! - `transform` is the authored position / rotation / scale of an object

pub mod geometry;
pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod slot;
pub mod texture;
pub mod transform;
