//! Imported scene graph.
//!
//! The scene is an arena: nodes, meshes and materials live in flat vectors
//! and refer to each other by index. A node's parent is a plain [`NodeId`]
//! back-reference, so walking up the hierarchy never touches ownership.
//!
//! Baking only ever reads a scene. Importers (see [`crate::resources`]) and
//! tests build one through the `add_*` methods.

use cgmath::SquareMatrix;

use crate::data_structures::transform::Transform;

pub type NodeId = usize;

/// Prefix that hides a node (and only that node) from mesh baking.
pub const HIDDEN_NODE_PREFIX: char = '@';

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    /// Indices into [`Scene::meshes`].
    pub meshes: Vec<usize>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

/// Skin influence of one named bone over a set of vertices.
#[derive(Clone, Debug, Default)]
pub struct MeshBone {
    pub name: String,
    /// `(vertex index, weight)` pairs.
    pub weights: Vec<(u32, f32)>,
}

/// Geometry exactly as it came out of the importer.
#[derive(Clone, Debug, Default)]
pub struct SourceMesh {
    pub name: String,
    pub positions: Vec<cgmath::Vector3<f32>>,
    pub normals: Vec<cgmath::Vector3<f32>>,
    pub tex_coords: Vec<cgmath::Vector2<f32>>,
    pub faces: Vec<[u32; 3]>,
    /// Index into [`Scene::materials`].
    pub material: usize,
    pub bones: Vec<MeshBone>,
}

/// Material slot of the imported scene. Only the name matters for baking,
/// the properties come from the material table in the settings.
#[derive(Clone, Debug)]
pub struct SceneMaterial {
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    pub meshes: Vec<SourceMesh>,
    pub materials: Vec<SceneMaterial>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &str, transform: Transform, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            name: name.to_string(),
            transform,
            meshes: Vec::new(),
            children: Vec::new(),
            parent,
        });
        match parent.and_then(|p| self.nodes.get_mut(p)) {
            Some(parent) => parent.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn add_mesh(&mut self, mesh: SourceMesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn add_material(&mut self, name: &str) -> usize {
        self.materials.push(SceneMaterial {
            name: name.to_string(),
        });
        self.materials.len() - 1
    }

    /// References `mesh` from `node`. Ignored if the node does not exist.
    pub fn attach_mesh(&mut self, node: NodeId, mesh: usize) {
        if let Some(node) = self.nodes.get_mut(node) {
            node.meshes.push(mesh);
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// All node ids, parents before children, siblings in insertion order.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        order
    }

    /// Nodes passing [`should_include_node`], in pre-order.
    pub fn included_nodes(&self) -> Vec<NodeId> {
        self.pre_order()
            .into_iter()
            .filter(|&id| should_include_node(&self.nodes[id]))
            .collect()
    }

    /**
     * Maps the node's local space into root space by applying every ancestor
     * after the node itself: `world = root * ... * parent * local`.
     *
     * Unknown ids yield the identity.
     */
    pub fn world_transform(&self, id: NodeId) -> cgmath::Matrix4<f32> {
        let mut result = cgmath::Matrix4::identity();
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            result = node.transform.to_matrix() * result;
            current = node.parent.and_then(|p| self.nodes.get(p));
        }
        result
    }

    /// First node with exactly this name, in pre-order.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.pre_order()
            .into_iter()
            .find(|&id| self.nodes[id].name == name)
    }
}

/// A node takes part in mesh baking when it is not hidden and has geometry.
pub fn should_include_node(node: &Node) -> bool {
    !node.name.starts_with(HIDDEN_NODE_PREFIX) && !node.meshes.is_empty()
}
