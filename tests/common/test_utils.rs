#![allow(dead_code)]

use flow_bake::{
    cgmath,
    data_structures::{
        scene::{MeshBone, Scene, SourceMesh},
        transform::Transform,
    },
};

pub const EPSILON: f32 = 1e-4;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Unit quad in the XY plane facing +Z, two faces.
pub fn quad(name: &str, material: usize) -> SourceMesh {
    SourceMesh {
        name: name.to_string(),
        positions: vec![
            cgmath::Vector3::new(0.0, 0.0, 0.0),
            cgmath::Vector3::new(1.0, 0.0, 0.0),
            cgmath::Vector3::new(1.0, 1.0, 0.0),
            cgmath::Vector3::new(0.0, 1.0, 0.0),
        ],
        normals: vec![cgmath::Vector3::new(0.0, 0.0, 1.0); 4],
        tex_coords: Vec::new(),
        faces: vec![[0, 1, 2], [0, 2, 3]],
        material,
        bones: Vec::new(),
    }
}

/// Binds vertex `i` of `mesh` with full weight to `bones[assignment[i]]`.
/// `None` leaves the vertex unskinned.
pub fn skin(mut mesh: SourceMesh, bones: &[&str], assignment: &[Option<usize>]) -> SourceMesh {
    mesh.bones = bones
        .iter()
        .enumerate()
        .map(|(bone_index, name)| MeshBone {
            name: name.to_string(),
            weights: assignment
                .iter()
                .enumerate()
                .filter(|(_, bone)| **bone == Some(bone_index))
                .map(|(vertex, _)| (vertex as u32, 1.0))
                .collect(),
        })
        .collect();
    mesh
}

/// Adds a root node holding `mesh`, returns `(node, mesh index)`.
pub fn add_mesh_node(scene: &mut Scene, name: &str, mesh: SourceMesh) -> (usize, usize) {
    let node = scene.add_node(name, Transform::new(), None);
    let mesh = scene.add_mesh(mesh);
    scene.attach_mesh(node, mesh);
    (node, mesh)
}

pub fn assert_vec3_eq(actual: cgmath::Vector3<f32>, expected: cgmath::Vector3<f32>) {
    assert!(
        (actual.x - expected.x).abs() < EPSILON
            && (actual.y - expected.y).abs() < EPSILON
            && (actual.z - expected.z).abs() < EPSILON,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

pub fn assert_vec2_eq(actual: cgmath::Vector2<f32>, expected: cgmath::Vector2<f32>) {
    assert!(
        (actual.x - expected.x).abs() < EPSILON && (actual.y - expected.y).abs() < EPSILON,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

pub fn assert_matrix_eq(actual: cgmath::Matrix4<f32>, expected: cgmath::Matrix4<f32>) {
    let actual: [[f32; 4]; 4] = actual.into();
    let expected: [[f32; 4]; 4] = expected.into();
    for (col_a, col_e) in actual.iter().zip(expected.iter()) {
        for (a, e) in col_a.iter().zip(col_e.iter()) {
            assert!(
                (a - e).abs() < EPSILON,
                "matrices differ:\n{:?}\n{:?}",
                actual,
                expected
            );
        }
    }
}
