//! Definition generators.
//!
//! - `mesh_definition` extracts render chunks and drives the pipeline
//! - `auto_tile` reads UV projection parameters from node names
//! - `order`, `writer` and `animation` are the pluggable ordering,
//!   serialization and armature stages
//! - `file_definition` is the registry the stages write into

pub mod animation;
pub mod auto_tile;
pub mod file_definition;
pub mod mesh_definition;
pub mod order;
pub mod writer;
