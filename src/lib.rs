//! flow-bake
//!
//! Offline baking stage that turns an imported scene graph into ordered,
//! UV-finalized render chunks for a skinned renderer that blends at most two
//! bones per draw. Meshes are baked into model space once, auto-tiled
//! materials receive cube-projected texture coordinates and faces are split
//! into single-bone and two-bone chunks.
//!
//! High-level modules
//! - `data_structures`: scene graph, materials, bones, working meshes, chunks
//! - `generator`: chunk extraction, ordering, serialization and armature baking
//! - `resources`: scene importers (glTF)
//! - `settings`: bake configuration and material tables
//! - `diagnostics`: non-fatal findings such as unresolved materials
//!

pub mod data_structures;
pub mod diagnostics;
pub mod generator;
pub mod resources;
pub mod settings;
pub mod util;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use data_structures::render_chunk::{ChunkKind, RenderChunk};
pub use generator::file_definition::FileDefinition;
pub use generator::mesh_definition::{MeshDefinitionGenerator, MeshDefinitionResults};
pub use settings::DisplayListSettings;
