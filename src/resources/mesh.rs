use crate::data_structures::scene::{MeshBone, SourceMesh};

/**
 * Reads a triangle primitive into a [`SourceMesh`].
 *
 * `joint_names` are the node names of the skin joints the primitive's
 * `JOINTS_0` attribute indexes into. Primitives that are not triangle lists
 * or have no positions are skipped.
 */
pub fn read_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    name: &str,
    material: usize,
    joint_names: &[String],
) -> Option<SourceMesh> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        log::warn!("Skipping primitive of {}: only triangle lists are supported", name);
        return None;
    }
    let reader = primitive.reader(|buffer| Some(buffers[buffer.index()].0.as_slice()));

    let positions: Vec<cgmath::Vector3<f32>> = match reader.read_positions() {
        Some(positions) => positions.map(Into::into).collect(),
        None => {
            log::warn!("Skipping primitive of {}: no positions", name);
            return None;
        }
    };
    let normals: Vec<cgmath::Vector3<f32>> = reader
        .read_normals()
        .map(|normals| normals.map(Into::into).collect())
        .unwrap_or_default();
    let tex_coords: Vec<cgmath::Vector2<f32>> = reader
        .read_tex_coords(0)
        .map(|tex_coords| tex_coords.into_f32().map(Into::into).collect())
        .unwrap_or_default();

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    if indices.len() % 3 != 0 {
        log::warn!("Primitive of {} has {} trailing indices", name, indices.len() % 3);
    }
    let faces: Vec<[u32; 3]> = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

    let mut bones: Vec<MeshBone> = joint_names
        .iter()
        .map(|joint| MeshBone {
            name: joint.clone(),
            weights: Vec::new(),
        })
        .collect();
    if let (Some(joints), Some(weights)) = (reader.read_joints(0), reader.read_weights(0)) {
        for (vertex, (joints, weights)) in joints.into_u16().zip(weights.into_f32()).enumerate() {
            for (joint, weight) in joints.into_iter().zip(weights) {
                if weight <= 0.0 {
                    continue;
                }
                match bones.get_mut(joint as usize) {
                    Some(bone) => bone.weights.push((vertex as u32, weight)),
                    None => log::warn!("Vertex {} of {} references missing joint {}", vertex, name, joint),
                }
            }
        }
    }
    bones.retain(|bone| !bone.weights.is_empty());

    Some(SourceMesh {
        name: name.to_string(),
        positions,
        normals,
        tex_coords,
        faces,
        material,
        bones,
    })
}
