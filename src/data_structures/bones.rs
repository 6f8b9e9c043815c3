//! Skeleton discovered from the scene.
//!
//! Bones are scene nodes that either skin an included mesh or mark an
//! attachment point. Their indices are stable for one bake and are what
//! render chunks and the generated armature refer to.

use std::collections::{HashMap, HashSet};

use crate::data_structures::{
    scene::{NodeId, Scene},
    transform::Transform,
};

pub type BoneId = usize;

/// Bones with this name prefix are attachment points, not skin joints.
pub const ATTACHMENT_PREFIX: &str = "attachment ";

#[derive(Clone, Debug, PartialEq)]
pub struct Bone {
    pub index: BoneId,
    pub name: String,
    pub node: NodeId,
    pub parent: Option<BoneId>,
    /// Rest pose relative to the parent bone (or model space for roots).
    pub rest: Transform,
}

impl Bone {
    pub fn is_attachment(&self) -> bool {
        self.name.starts_with(ATTACHMENT_PREFIX)
    }
}

/// A node that moves on its own, as found by [`find_nodes_with_animation`].
#[derive(Clone, Debug)]
pub struct AnimatedNode {
    pub node: NodeId,
    pub name: String,
    /// Closest ancestor that is animated as well, as an index into
    /// [`AnimationNodeInfo::nodes`].
    pub parent: Option<usize>,
    /// Transform relative to the animated parent, already in model scale.
    pub relative: Transform,
}

#[derive(Clone, Debug, Default)]
pub struct AnimationNodeInfo {
    pub nodes: Vec<AnimatedNode>,
}

/**
 * Collects the skin joints referenced by meshes on `included` nodes plus all
 * attachment nodes, in scene pre-order so parents always precede children.
 */
pub fn find_nodes_with_animation(
    scene: &Scene,
    included: &[NodeId],
    model_scale: f32,
) -> AnimationNodeInfo {
    let joint_names: HashSet<&str> = included
        .iter()
        .filter_map(|&id| scene.node(id))
        .flat_map(|node| node.meshes.iter())
        .filter_map(|&mesh| scene.meshes.get(mesh))
        .flat_map(|mesh| mesh.bones.iter().map(|bone| bone.name.as_str()))
        .collect();

    let mut info = AnimationNodeInfo::default();
    let mut animated_index: HashMap<NodeId, usize> = HashMap::new();

    for id in scene.pre_order() {
        let Some(node) = scene.node(id) else { continue };
        if !joint_names.contains(node.name.as_str()) && !node.name.starts_with(ATTACHMENT_PREFIX) {
            continue;
        }

        // compose local transforms up to (excluding) the closest animated ancestor
        let mut relative = node.transform;
        let mut parent = None;
        let mut ancestor = node.parent;
        while let Some(ancestor_id) = ancestor {
            if let Some(&index) = animated_index.get(&ancestor_id) {
                parent = Some(index);
                break;
            }
            let Some(ancestor_node) = scene.node(ancestor_id) else { break };
            if !ancestor_node.transform.has_uniform_scale() {
                log::warn!(
                    "Ancestor {} of bone {} has a non-uniform scale, the rest pose is approximate",
                    ancestor_node.name,
                    node.name
                );
            }
            relative = &ancestor_node.transform * &relative;
            ancestor = ancestor_node.parent;
        }
        relative.position *= model_scale;

        animated_index.insert(id, info.nodes.len());
        info.nodes.push(AnimatedNode {
            node: id,
            name: node.name.clone(),
            parent,
            relative,
        });
    }

    info
}

#[derive(Clone, Debug, Default)]
pub struct BoneHierarchy {
    bones: Vec<Bone>,
    by_name: HashMap<String, BoneId>,
}

impl BoneHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.bones.clear();
        self.by_name.clear();
    }

    pub fn add_bone(&mut self, name: &str, node: NodeId, parent: Option<BoneId>, rest: Transform) -> BoneId {
        let index = self.bones.len();
        self.bones.push(Bone {
            index,
            name: name.to_string(),
            node,
            parent,
            rest,
        });
        self.by_name.entry(name.to_string()).or_insert(index);
        index
    }

    /**
     * Replaces the hierarchy with the discovered animation nodes.
     *
     * Bone positions are converted to fixed point and root bones are rotated
     * into the target orientation; children inherit that rotation through
     * their parents.
     */
    pub fn populate_with_animation_node_info(
        &mut self,
        info: &AnimationNodeInfo,
        fixed_point_scale: f32,
        rotate_model: cgmath::Quaternion<f32>,
    ) {
        self.clear();
        for animated in &info.nodes {
            let mut rest = animated.relative;
            rest.position *= fixed_point_scale;
            if animated.parent.is_none() {
                rest.position = rotate_model * rest.position;
                rest.rotation = rotate_model * rest.rotation;
            }
            // discovery order equals bone order, so indices carry over
            self.add_bone(&animated.name, animated.node, animated.parent, rest);
        }
        log::debug!("Populated bone hierarchy with {} bones", self.bones.len());
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn bone_by_index(&self, index: BoneId) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.by_name.get(name).and_then(|&i| self.bones.get(i))
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn has_data(&self) -> bool {
        !self.bones.is_empty()
    }

    pub fn attachment_count(&self) -> usize {
        self.bones.iter().filter(|b| b.is_attachment()).count()
    }
}
