//! Armature data baked from the bone hierarchy.

use crate::{
    data_structures::scene::Scene,
    generator::file_definition::{DataChunk, FileDefinition},
    settings::DisplayListSettings,
};

/// Marks a root bone in the bone-parent table.
pub const NO_PARENT: &str = "0xFFFF";

/// Symbols an armature definition refers to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationResults {
    pub initial_pose_reference: String,
    pub bone_parent_reference: String,
    pub bone_count_macro: String,
    pub attachment_count_macro: String,
}

pub trait AnimationBaker {
    fn bake(
        &mut self,
        scene: &Scene,
        file: &mut FileDefinition,
        settings: &DisplayListSettings,
    ) -> anyhow::Result<AnimationResults>;
}

/// Writes the rest pose of every bone and the bone-parent table.
#[derive(Clone, Copy, Debug, Default)]
pub struct RestPoseBaker;

impl AnimationBaker for RestPoseBaker {
    fn bake(
        &mut self,
        _scene: &Scene,
        file: &mut FileDefinition,
        _settings: &DisplayListSettings,
    ) -> anyhow::Result<AnimationResults> {
        let bones = file.bone_hierarchy();
        let bone_count = bones.bone_count();
        let attachment_count = bones.attachment_count();

        let (poses, parents): (Vec<DataChunk>, Vec<DataChunk>) = bones
            .bones()
            .iter()
            .map(|bone| {
                let rest = &bone.rest;
                let pose = DataChunk::Structure(vec![
                    DataChunk::Structure(vec![
                        DataChunk::primitive(rest.position.x),
                        DataChunk::primitive(rest.position.y),
                        DataChunk::primitive(rest.position.z),
                    ]),
                    DataChunk::Structure(vec![
                        DataChunk::primitive(rest.rotation.v.x),
                        DataChunk::primitive(rest.rotation.v.y),
                        DataChunk::primitive(rest.rotation.v.z),
                        DataChunk::primitive(rest.rotation.s),
                    ]),
                    DataChunk::Structure(vec![
                        DataChunk::primitive(rest.scale.x),
                        DataChunk::primitive(rest.scale.y),
                        DataChunk::primitive(rest.scale.z),
                    ]),
                ]);
                let parent = bone
                    .parent
                    .map_or_else(|| DataChunk::primitive(NO_PARENT), DataChunk::primitive);
                (pose, parent)
            })
            .unzip();

        let initial_pose_reference = file.add_data_definition(
            "default_bones",
            "struct Transform",
            false,
            "",
            DataChunk::Array(poses),
        );
        let bone_parent_reference = file.add_data_definition(
            "bone_parent",
            "unsigned short",
            true,
            "",
            DataChunk::Array(parents),
        );
        let bone_count_macro = file.add_macro("default_bones_count", bone_count);
        let attachment_count_macro = file.add_macro("attachment_count", attachment_count);

        Ok(AnimationResults {
            initial_pose_reference,
            bone_parent_reference,
            bone_count_macro,
            attachment_count_macro,
        })
    }
}
