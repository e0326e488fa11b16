//! Render pipelines.
//!
//! - `basic` builds the lit, depth-tested pipeline every mesh is drawn with
//! - `light` holds the directional light and its uniform

pub mod basic;
pub mod light;
