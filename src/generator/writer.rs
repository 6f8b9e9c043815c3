//! Serialization of ordered chunks into geometry definitions.

use std::collections::HashMap;

use crate::{
    data_structures::{
        bones::BoneId,
        material::material_index_macro_name,
        mesh::ExtendedMesh,
        render_chunk::RenderChunk,
        scene::Scene,
    },
    generator::file_definition::{DataChunk, FileDefinition},
    settings::DisplayListSettings,
};

pub trait MeshWriter {
    /// Writes `chunks` in the given order and returns the symbol of the
    /// generated geometry.
    fn write_mesh(
        &mut self,
        scene: &Scene,
        file: &mut FileDefinition,
        chunks: &[RenderChunk],
        settings: &DisplayListSettings,
        suffix: &str,
    ) -> anyhow::Result<String>;
}

/// Vertex layout of the packed vertex buffers.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

/**
 * Writes one vertex buffer and one index buffer per chunk plus a model
 * table listing every chunk with its material macro, bone pair and
 * attachment index (`-1` where not applicable).
 */
#[derive(Clone, Copy, Debug, Default)]
pub struct PackedMeshWriter;

impl MeshWriter for PackedMeshWriter {
    fn write_mesh(
        &mut self,
        _scene: &Scene,
        file: &mut FileDefinition,
        chunks: &[RenderChunk],
        _settings: &DisplayListSettings,
        suffix: &str,
    ) -> anyhow::Result<String> {
        let mut chunk_table = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            let (vertices, vertex_count, indices, index_count) = match &chunk.mesh {
                Some(mesh) => {
                    let (vertices, indices) = pack_chunk(mesh, chunk.faces());
                    let name = format!("chunk_{}", index);
                    let vertices_name = file.add_data_definition(
                        &name,
                        "struct PackedVertex",
                        true,
                        "_vtx",
                        DataChunk::Bytes(bytemuck::cast_slice(&vertices).to_vec()),
                    );
                    let indices_name = file.add_data_definition(
                        &name,
                        "unsigned int",
                        true,
                        "_idx",
                        DataChunk::Bytes(bytemuck::cast_slice(&indices).to_vec()),
                    );
                    (vertices_name, vertices.len(), indices_name, indices.len())
                }
                None => ("0".to_string(), 0, "0".to_string(), 0),
            };

            let material = chunk
                .material_name()
                .map(material_index_macro_name)
                .unwrap_or_else(|| "-1".to_string());

            chunk_table.push(DataChunk::Structure(vec![
                DataChunk::Primitive(vertices),
                DataChunk::primitive(vertex_count),
                DataChunk::Primitive(indices),
                DataChunk::primitive(index_count),
                DataChunk::Primitive(material),
                bone_reference(chunk.bone_pair.0),
                bone_reference(chunk.bone_pair.1),
                chunk
                    .attachment_index()
                    .map_or_else(|| DataChunk::primitive(-1), DataChunk::primitive),
            ]));
        }

        let model = file.add_data_definition(
            "model",
            "struct RenderChunkDefinition",
            true,
            suffix,
            DataChunk::Array(chunk_table),
        );
        file.add_macro(&format!("model{}_chunk_count", suffix), chunks.len());
        log::info!("Wrote {} with {} chunks", model, chunks.len());
        Ok(model)
    }
}

fn bone_reference(bone: Option<BoneId>) -> DataChunk {
    bone.map_or_else(|| DataChunk::primitive(-1), DataChunk::primitive)
}

/// Vertices used by `faces`, in order of first use, and the remapped indices.
pub fn pack_chunk(mesh: &ExtendedMesh, faces: &[usize]) -> (Vec<PackedVertex>, Vec<u32>) {
    let mut remap: HashMap<u32, u32> = HashMap::new();
    let mut vertices = Vec::new();
    let mut indices = Vec::with_capacity(faces.len() * 3);

    for face in faces.iter().filter_map(|&f| mesh.faces.get(f)) {
        for &vertex in face {
            let packed = *remap.entry(vertex).or_insert_with(|| {
                let v = vertex as usize;
                vertices.push(PackedVertex {
                    position: mesh.positions[v].into(),
                    normal: mesh.normals[v].into(),
                    tex_coords: mesh.tex_coords[v].into(),
                });
                (vertices.len() - 1) as u32
            });
            indices.push(packed);
        }
    }

    (vertices, indices)
}
