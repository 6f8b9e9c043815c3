//! Baking data structures: scene graph, materials, bones, meshes and chunks.
//!
//! - `transform` holds local TRS transforms and their matrix form
//! - `scene` is the read-only imported scene graph
//! - `material` contains material properties and auto-tile resolution
//! - `bones` holds the bone hierarchy discovered from the scene
//! - `mesh` contains per-bake working copies of meshes and their skin partition
//! - `render_chunk` is the output unit of chunk extraction

pub mod bones;
pub mod material;
pub mod mesh;
pub mod render_chunk;
pub mod scene;
pub mod transform;
