//! Chunk ordering.
//!
//! Chunks are reordered once per bake, after every node contributed its
//! chunks, so consecutive draws share as much renderer state as possible.

use std::cmp::Ordering;

use crate::{data_structures::render_chunk::RenderChunk, settings::DisplayListSettings};

pub trait ChunkOrder {
    fn order(&self, chunks: &mut [RenderChunk], settings: &DisplayListSettings);
}

/// Groups by material (missing materials last), then by bone pair.
/// Ties keep their extraction order.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialBoneOrder;

impl ChunkOrder for MaterialBoneOrder {
    fn order(&self, chunks: &mut [RenderChunk], _settings: &DisplayListSettings) {
        chunks.sort_by(compare_chunks);
    }
}

fn compare_chunks(a: &RenderChunk, b: &RenderChunk) -> Ordering {
    let material = match (a.material_name(), b.material_name()) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    material
        .then_with(|| a.bone_pair.cmp(&b.bone_pair))
        .then_with(|| a.attachment_index().cmp(&b.attachment_index()))
}
