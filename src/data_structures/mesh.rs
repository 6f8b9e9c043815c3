//! Working copies of imported meshes.
//!
//! An [`ExtendedMesh`] is built once per source mesh and bake. It resolves
//! the skin into a rigid bone per vertex and splits the faces into groups a
//! skinned renderer with a two-bone limit can draw. Every node that
//! references the mesh transforms its own copy (see [`ExtendedMesh::transform`]).

use std::collections::BTreeMap;

use cgmath::{InnerSpace, Matrix, SquareMatrix, Zero};

use crate::data_structures::{
    bones::{BoneHierarchy, BoneId},
    scene::SourceMesh,
};

/// Ordered bone pair; `None` is the static (unskinned) bone.
pub type BonePair = (Option<BoneId>, Option<BoneId>);

/// Input of [`ExtendedMesh::cube_project_tex`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeProjection {
    pub s_scale: f64,
    pub t_scale: f64,
    pub rotation: cgmath::Quaternion<f64>,
    pub translation: cgmath::Vector3<f64>,
}

#[derive(Clone, Debug)]
pub struct ExtendedMesh {
    pub name: String,
    /// Index of the mesh in the imported scene.
    pub source: usize,
    /// Index into the scene materials.
    pub material: usize,
    pub positions: Vec<cgmath::Vector3<f32>>,
    pub normals: Vec<cgmath::Vector3<f32>>,
    pub tex_coords: Vec<cgmath::Vector2<f32>>,
    pub faces: Vec<[u32; 3]>,
    pub vertex_bones: Vec<Option<BoneId>>,
    /// Faces whose vertices all follow one bone.
    pub faces_for_bone: BTreeMap<Option<BoneId>, Vec<usize>>,
    /// Faces whose vertices follow two bones.
    pub bone_spanning_faces: BTreeMap<BonePair, Vec<usize>>,
}

impl ExtendedMesh {
    pub fn new(source: usize, mesh: &SourceMesh, bones: &BoneHierarchy) -> Self {
        let vertex_count = mesh.positions.len();

        let mut normals = mesh.normals.clone();
        normals.resize(vertex_count, cgmath::Vector3::zero());
        let mut tex_coords = mesh.tex_coords.clone();
        tex_coords.resize(vertex_count, cgmath::Vector2::zero());

        let faces: Vec<[u32; 3]> = mesh
            .faces
            .iter()
            .filter(|face| face.iter().all(|&v| (v as usize) < vertex_count))
            .copied()
            .collect();
        if faces.len() != mesh.faces.len() {
            log::warn!(
                "Mesh {} has {} faces referencing missing vertices, they were dropped",
                mesh.name,
                mesh.faces.len() - faces.len()
            );
        }

        let vertex_bones = rigid_vertex_bones(mesh, bones);
        let (faces_for_bone, bone_spanning_faces) = partition_faces(&mesh.name, &faces, &vertex_bones);

        Self {
            name: mesh.name.clone(),
            source,
            material: mesh.material,
            positions: mesh.positions.clone(),
            normals,
            tex_coords,
            faces,
            vertex_bones,
            faces_for_bone,
            bone_spanning_faces,
        }
    }

    /// Copy with positions and normals baked through `matrix`.
    pub fn transform(&self, matrix: &cgmath::Matrix4<f32>) -> Self {
        let linear = cgmath::Matrix3::from_cols(matrix.x.truncate(), matrix.y.truncate(), matrix.z.truncate());
        let normal_matrix = match linear.invert() {
            Some(inverse) => inverse.transpose(),
            None => {
                log::warn!("Mesh {} is transformed by a singular matrix", self.name);
                linear
            }
        };

        let mut result = self.clone();
        for position in result.positions.iter_mut() {
            *position = (*matrix * position.extend(1.0)).truncate();
        }
        for normal in result.normals.iter_mut() {
            let transformed = normal_matrix * *normal;
            *normal = if transformed.magnitude2() > 0.0 {
                transformed.normalize()
            } else {
                transformed
            };
        }
        result
    }

    /**
     * Generates texture coordinates by projecting each vertex onto the plane
     * facing the dominant axis of its normal.
     *
     * The vertex is rotated, then translated, then the two remaining axes
     * are scaled into `(s, t)`.
     */
    pub fn cube_project_tex(&mut self, projection: &CubeProjection) {
        let normals = self.projection_normals();
        for (i, position) in self.positions.iter().enumerate() {
            let position = cgmath::Vector3::new(position.x as f64, position.y as f64, position.z as f64);
            let normal = cgmath::Vector3::new(normals[i].x as f64, normals[i].y as f64, normals[i].z as f64);

            let projected = projection.rotation * position + projection.translation;
            let normal = projection.rotation * normal;

            let (s, t) = if normal.x.abs() > normal.y.abs() && normal.x.abs() > normal.z.abs() {
                (projected.y, projected.z)
            } else if normal.y.abs() > normal.z.abs() {
                (projected.x, projected.z)
            } else {
                (projected.x, projected.y)
            };

            self.tex_coords[i] = cgmath::Vector2::new(
                (s * projection.s_scale) as f32,
                (t * projection.t_scale) as f32,
            );
        }
    }

    /// Vertex normals, falling back to accumulated face normals for vertices
    /// the importer left without one.
    fn projection_normals(&self) -> Vec<cgmath::Vector3<f32>> {
        let mut normals = self.normals.clone();
        let missing: Vec<bool> = normals.iter().map(|n| n.magnitude2() == 0.0).collect();
        if !missing.contains(&true) {
            return normals;
        }
        for face in &self.faces {
            let [a, b, c] = face.map(|v| self.positions[v as usize]);
            let face_normal = (b - a).cross(c - a);
            for &v in face {
                if missing[v as usize] {
                    normals[v as usize] += face_normal;
                }
            }
        }
        normals
    }
}

/// Binds each vertex to the bone with the largest weight on it.
fn rigid_vertex_bones(mesh: &SourceMesh, bones: &BoneHierarchy) -> Vec<Option<BoneId>> {
    let mut best: Vec<(Option<BoneId>, f32)> = vec![(None, 0.0); mesh.positions.len()];
    for mesh_bone in &mesh.bones {
        let Some(bone) = bones.bone_by_name(&mesh_bone.name) else {
            log::debug!("Mesh {} is skinned to {} which is not a bone", mesh.name, mesh_bone.name);
            continue;
        };
        for &(vertex, weight) in &mesh_bone.weights {
            if let Some(slot) = best.get_mut(vertex as usize) {
                if weight > slot.1 {
                    *slot = (Some(bone.index), weight);
                }
            }
        }
    }
    best.into_iter().map(|(bone, _)| bone).collect()
}

/**
 * Splits faces by the bones of their vertices. Every face lands in exactly
 * one group: one bone goes to `faces_for_bone`, two bones to
 * `bone_spanning_faces`. Three bones cannot be drawn with two-bone
 * blending; such faces are kept under their lowest and highest bone.
 */
fn partition_faces(
    mesh_name: &str,
    faces: &[[u32; 3]],
    vertex_bones: &[Option<BoneId>],
) -> (BTreeMap<Option<BoneId>, Vec<usize>>, BTreeMap<BonePair, Vec<usize>>) {
    let mut faces_for_bone: BTreeMap<Option<BoneId>, Vec<usize>> = BTreeMap::new();
    let mut bone_spanning_faces: BTreeMap<BonePair, Vec<usize>> = BTreeMap::new();

    for (index, face) in faces.iter().enumerate() {
        let mut face_bones = face.map(|v| vertex_bones[v as usize]);
        face_bones.sort();

        let first = face_bones[0];
        let last = face_bones[2];
        if first == last {
            faces_for_bone.entry(first).or_default().push(index);
            continue;
        }
        if face_bones[1] != first && face_bones[1] != last {
            log::warn!(
                "Face {} of mesh {} spans three bones, it will be skinned to {:?} and {:?} only",
                index,
                mesh_name,
                first,
                last
            );
        }
        bone_spanning_faces.entry((first, last)).or_default().push(index);
    }

    (faces_for_bone, bone_spanning_faces)
}
