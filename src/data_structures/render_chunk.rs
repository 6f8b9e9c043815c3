//! Render chunks: the unit of geometry handed to ordering and serialization.

use std::rc::Rc;

use crate::data_structures::{
    bones::BoneId,
    material::Material,
    mesh::{BonePair, ExtendedMesh},
    scene::NodeId,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChunkKind {
    /// Faces rigidly bound to one bone (or static).
    BoneExclusive,
    /// Faces blended between the two bones of the pair.
    BoneBoundary,
    /// Placeholder reserving renderer state for an attachment point.
    Attachment { index: usize },
}

#[derive(Clone, Debug)]
pub struct RenderChunk {
    pub kind: ChunkKind,
    pub bone_pair: BonePair,
    /// Baked mesh; `None` for attachments only.
    pub mesh: Option<Rc<ExtendedMesh>>,
    /// Node the mesh was baked for.
    pub node: Option<NodeId>,
    /// `None` when the material was not found.
    pub material: Option<Rc<Material>>,
}

impl RenderChunk {
    pub fn bone_exclusive(
        bone: Option<BoneId>,
        mesh: Rc<ExtendedMesh>,
        node: NodeId,
        material: Option<Rc<Material>>,
    ) -> Self {
        Self {
            kind: ChunkKind::BoneExclusive,
            bone_pair: (bone, bone),
            mesh: Some(mesh),
            node: Some(node),
            material,
        }
    }

    pub fn bone_boundary(
        bone_pair: BonePair,
        mesh: Rc<ExtendedMesh>,
        node: NodeId,
        material: Option<Rc<Material>>,
    ) -> Self {
        Self {
            kind: ChunkKind::BoneBoundary,
            bone_pair,
            mesh: Some(mesh),
            node: Some(node),
            material,
        }
    }

    pub fn attachment(bone: BoneId, index: usize) -> Self {
        Self {
            kind: ChunkKind::Attachment { index },
            bone_pair: (Some(bone), Some(bone)),
            mesh: None,
            node: None,
            material: None,
        }
    }

    /// Indices into the mesh faces drawn by this chunk.
    pub fn faces(&self) -> &[usize] {
        let Some(mesh) = &self.mesh else {
            return &[];
        };
        let faces = match self.kind {
            ChunkKind::BoneExclusive => mesh.faces_for_bone.get(&self.bone_pair.0),
            ChunkKind::BoneBoundary => mesh.bone_spanning_faces.get(&self.bone_pair),
            ChunkKind::Attachment { .. } => None,
        };
        faces.map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn attachment_index(&self) -> Option<usize> {
        match self.kind {
            ChunkKind::Attachment { index } => Some(index),
            _ => None,
        }
    }

    pub fn material_name(&self) -> Option<&str> {
        self.material.as_deref().map(|m| m.name.as_str())
    }
}
