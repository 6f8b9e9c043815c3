//! Render chunk extraction and the mesh definition pipeline.
//!
//! [`MeshDefinitionGenerator::generate`] walks the included nodes, bakes each
//! referenced mesh into world space, auto-tiles it when its material asks
//! for it and splits it into render chunks. The chunks of all nodes are
//! ordered once and serialized; scenes with a skeleton additionally get an
//! armature definition.

use std::rc::Rc;

use anyhow::Context;

use crate::{
    data_structures::{
        bones::{find_nodes_with_animation, BoneHierarchy, ATTACHMENT_PREFIX},
        material::{material_index_macro_name, resolve_auto_tile, resolve_material_name},
        render_chunk::RenderChunk,
        scene::{NodeId, Scene},
    },
    diagnostics::{Diagnostic, DiagnosticSink, LogSink},
    generator::{
        animation::{AnimationBaker, RestPoseBaker},
        auto_tile::{cube_projection, NodeNameParameters, UvParameterSource},
        file_definition::{DataChunk, FileDefinition},
        order::{ChunkOrder, MaterialBoneOrder},
        writer::{MeshWriter, PackedMeshWriter},
    },
    settings::DisplayListSettings,
};

/// Suffix of the generated geometry and armature symbols.
pub const GEOMETRY_SUFFIX: &str = "_geo";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshDefinitionResults {
    pub model_name: String,
    pub material_macro: String,
}

/// Collaborators used by chunk extraction.
pub struct ExtractContext<'a> {
    pub settings: &'a DisplayListSettings,
    pub uv_parameters: &'a dyn UvParameterSource,
    pub diagnostics: &'a mut dyn DiagnosticSink,
}

/**
 * Appends the chunks of every mesh on `node` to `chunks`.
 *
 * Each mesh is baked through the collision transform and the node's world
 * transform. A material missing from the table is reported and the chunks
 * carry no material.
 */
pub fn append_render_chunks(
    scene: &Scene,
    node: NodeId,
    file: &mut FileDefinition,
    context: &mut ExtractContext<'_>,
    chunks: &mut Vec<RenderChunk>,
) -> anyhow::Result<()> {
    let settings = context.settings;
    let scene_node = scene
        .node(node)
        .with_context(|| format!("scene has no node with id {}", node))?;
    let transform = settings.create_collision_transform() * scene.world_transform(node);

    for &mesh_index in &scene_node.meshes {
        let mut mesh = file.get_extended_mesh(scene, mesh_index)?.transform(&transform);

        let material_name = resolve_material_name(
            scene.materials.get(mesh.material),
            settings.force_material_name.as_deref(),
        );
        let material = settings.materials.get(&material_name).cloned();
        if material.is_none() {
            context
                .diagnostics
                .report(Diagnostic::MaterialNotFound {
                    name: material_name.clone(),
                });
        }

        if let Some(tile) = resolve_auto_tile(material.as_deref()) {
            if tile.is_degenerate() {
                context
                    .diagnostics
                    .report(Diagnostic::ZeroTileSize { material: material_name });
            }
            let parameters = context.uv_parameters.uv_parameters(&scene_node.name);
            mesh.cube_project_tex(&cube_projection(&tile, &parameters));
        }

        let mesh = Rc::new(mesh);
        for &bone in mesh.faces_for_bone.keys() {
            chunks.push(RenderChunk::bone_exclusive(bone, mesh.clone(), node, material.clone()));
        }
        for &pair in mesh.bone_spanning_faces.keys() {
            chunks.push(RenderChunk::bone_boundary(pair, mesh.clone(), node, material.clone()));
        }
    }

    Ok(())
}

/// Appends one chunk per attachment bone, numbered in hierarchy order.
pub fn append_attachment_chunks(bones: &BoneHierarchy, chunks: &mut Vec<RenderChunk>) {
    let attachments = bones
        .bones()
        .iter()
        .filter(|bone| bone.name.starts_with(ATTACHMENT_PREFIX));
    for (index, bone) in attachments.enumerate() {
        chunks.push(RenderChunk::attachment(bone.index, index));
    }
}

pub struct MeshDefinitionGenerator {
    settings: DisplayListSettings,
    included_nodes: Vec<NodeId>,
    order: Box<dyn ChunkOrder>,
    writer: Box<dyn MeshWriter>,
    animation: Box<dyn AnimationBaker>,
    uv_parameters: Box<dyn UvParameterSource>,
    diagnostics: Box<dyn DiagnosticSink>,
}

impl MeshDefinitionGenerator {
    pub fn new(settings: DisplayListSettings) -> Self {
        Self {
            settings,
            included_nodes: Vec::new(),
            order: Box::new(MaterialBoneOrder),
            writer: Box::new(PackedMeshWriter),
            animation: Box::new(RestPoseBaker),
            uv_parameters: Box::new(NodeNameParameters),
            diagnostics: Box::new(LogSink),
        }
    }

    pub fn with_order(mut self, order: impl ChunkOrder + 'static) -> Self {
        self.order = Box::new(order);
        self
    }

    pub fn with_writer(mut self, writer: impl MeshWriter + 'static) -> Self {
        self.writer = Box::new(writer);
        self
    }

    pub fn with_animation_baker(mut self, animation: impl AnimationBaker + 'static) -> Self {
        self.animation = Box::new(animation);
        self
    }

    pub fn with_uv_parameters(mut self, uv_parameters: impl UvParameterSource + 'static) -> Self {
        self.uv_parameters = Box::new(uv_parameters);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Box::new(diagnostics);
        self
    }

    pub fn included_nodes(&self) -> &[NodeId] {
        &self.included_nodes
    }

    /// Selects the nodes to bake.
    pub fn traverse_nodes(&mut self, scene: &Scene) {
        self.included_nodes = scene.included_nodes();
        log::debug!("Including {} of {} nodes", self.included_nodes.len(), scene.nodes().len());
    }

    /// Fills the bone hierarchy of `file` from the included nodes, unless
    /// bones are exported as vertex groups.
    pub fn populate_bones(&self, scene: &Scene, file: &mut FileDefinition) {
        let info = find_nodes_with_animation(scene, &self.included_nodes, self.settings.model_scale);
        let bones = file.bone_hierarchy_mut();
        if self.settings.bones_as_vertex_groups {
            bones.clear();
            return;
        }
        bones.populate_with_animation_node_info(&info, self.settings.fixed_point_scale, self.settings.rotate_model);
    }

    /// Chunks of every included node plus the attachment chunks, unordered.
    pub fn extract_render_chunks(&mut self, scene: &Scene, file: &mut FileDefinition) -> anyhow::Result<Vec<RenderChunk>> {
        let mut chunks = Vec::new();
        let mut context = ExtractContext {
            settings: &self.settings,
            uv_parameters: self.uv_parameters.as_ref(),
            diagnostics: self.diagnostics.as_mut(),
        };
        for &node in &self.included_nodes {
            append_render_chunks(scene, node, file, &mut context, &mut chunks)?;
        }
        append_attachment_chunks(file.bone_hierarchy(), &mut chunks);
        Ok(chunks)
    }

    /**
     * Runs the whole pipeline for `scene` and registers the results in `file`.
     *
     * Missing materials only produce diagnostics; errors come from the
     * writer or the animation baker.
     */
    pub fn generate(&mut self, scene: &Scene, file: &mut FileDefinition) -> anyhow::Result<MeshDefinitionResults> {
        self.traverse_nodes(scene);
        self.populate_bones(scene, file);

        let mut chunks = self.extract_render_chunks(scene, file)?;
        self.order.order(&mut chunks, &self.settings);

        let model_name = self
            .writer
            .write_mesh(scene, file, &chunks, &self.settings, GEOMETRY_SUFFIX)
            .context("failed to write mesh")?;
        let result = MeshDefinitionResults {
            model_name,
            material_macro: material_index_macro_name(&self.settings.default_material_name),
        };

        if file.bone_hierarchy().has_data() && !self.settings.bones_as_vertex_groups {
            let animation = self
                .animation
                .bake(scene, file, &self.settings)
                .context("failed to bake animation")?;

            file.add_header(&self.settings.armature_header);
            let armature = DataChunk::Structure(vec![
                DataChunk::primitive(&result.model_name),
                DataChunk::Primitive(animation.initial_pose_reference),
                DataChunk::Primitive(animation.bone_parent_reference),
                DataChunk::Primitive(animation.bone_count_macro),
                DataChunk::Primitive(animation.attachment_count_macro),
            ]);
            file.add_data_definition(
                "armature",
                "struct SKArmatureDefinition",
                false,
                GEOMETRY_SUFFIX,
                armature,
            );
        }

        Ok(result)
    }
}
