use std::{collections::HashMap, path::Path};

use anyhow::Context;

use crate::data_structures::{
    scene::{NodeId, Scene},
    transform::Transform,
};

/**
 * This module contains all logic for importing scenes from external files.
 */
pub mod mesh;

/// Name of the material slot used by primitives without a material.
pub const DEFAULT_MATERIAL_NAME: &str = "default";

pub fn load_scene_gltf(path: impl AsRef<Path>) -> anyhow::Result<Scene> {
    let path = path.as_ref();
    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("failed to import {}", path.display()))?;
    scene_from_gltf(&document, &buffers)
}

pub fn load_scene_gltf_slice(bytes: &[u8]) -> anyhow::Result<Scene> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    scene_from_gltf(&document, &buffers)
}

/// Builds a [`Scene`] from the default scene of a glTF document (or its first
/// scene if none is marked default).
pub fn scene_from_gltf(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> anyhow::Result<Scene> {
    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .context("glTF document contains no scene")?;

    let mut importer = GltfImporter {
        scene: Scene::new(),
        buffers,
        meshes: HashMap::new(),
        default_material: None,
    };
    for material in document.materials() {
        let name = material
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("material_{}", material.index().unwrap_or_default()));
        importer.scene.add_material(&name);
    }
    for node in gltf_scene.nodes() {
        importer.add_node(&node, None);
    }

    log::info!(
        "Imported {} nodes, {} meshes and {} materials",
        importer.scene.nodes().len(),
        importer.scene.meshes.len(),
        importer.scene.materials.len()
    );
    Ok(importer.scene)
}

struct GltfImporter<'a> {
    scene: Scene,
    buffers: &'a [gltf::buffer::Data],
    /// Scene meshes created per glTF mesh and skin, since joint indices are
    /// only meaningful together with a skin.
    meshes: HashMap<(usize, Option<usize>), Vec<usize>>,
    default_material: Option<usize>,
}

impl GltfImporter<'_> {
    fn add_node(&mut self, node: &gltf::Node, parent: Option<NodeId>) {
        let (translation, rotation, scale) = node.transform().decomposed();
        let transform = Transform {
            position: translation.into(),
            rotation: rotation.into(),
            scale: scale.into(),
        };
        let id = self.scene.add_node(&node_name(node), transform, parent);

        if let Some(mesh) = node.mesh() {
            for mesh_index in self.meshes_for(&mesh, node.skin()) {
                self.scene.attach_mesh(id, mesh_index);
            }
        }
        for child in node.children() {
            self.add_node(&child, Some(id));
        }
    }

    fn meshes_for(&mut self, mesh: &gltf::Mesh, skin: Option<gltf::Skin>) -> Vec<usize> {
        let key = (mesh.index(), skin.as_ref().map(|s| s.index()));
        if let Some(indices) = self.meshes.get(&key) {
            return indices.clone();
        }

        let joint_names: Vec<String> = skin
            .map(|skin| skin.joints().map(|joint| node_name(&joint)).collect())
            .unwrap_or_default();
        let mesh_name = mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));

        let mut indices = Vec::new();
        for primitive in mesh.primitives() {
            let material = match primitive.material().index() {
                Some(index) => index,
                None => self.default_material(),
            };
            let name = format!("{}_{}", mesh_name, primitive.index());
            if let Some(source) = mesh::read_primitive(&primitive, self.buffers, &name, material, &joint_names) {
                indices.push(self.scene.add_mesh(source));
            }
        }
        self.meshes.insert(key, indices.clone());
        indices
    }

    fn default_material(&mut self) -> usize {
        match self.default_material {
            Some(index) => index,
            None => {
                let index = self.scene.add_material(DEFAULT_MATERIAL_NAME);
                self.default_material = Some(index);
                index
            }
        }
    }
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()))
}
