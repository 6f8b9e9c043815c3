//! Bake configuration.
//!
//! Settings are plain data with defaults. They can also be read from a TOML
//! document with an optional `[settings]` table and one `[materials.<name>]`
//! table per material:
//!
//! ```toml
//! [settings]
//! prefix = "crate"
//! fixed_point_scale = 256
//! rotate_model = [-90.0, 0.0, 0.0]
//!
//! [materials.wood]
//! tileSizeS = "4"
//! tileSizeT = 2
//! ```

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
    rc::Rc,
};

use anyhow::Context;
use cgmath::One;
use serde::Deserialize;

use crate::data_structures::{material::Material, transform::euler_degrees};

#[derive(Clone, Debug)]
pub struct DisplayListSettings {
    /// Prefix of every generated symbol.
    pub prefix: String,
    pub model_scale: f32,
    /// World units to fixed-point units.
    pub fixed_point_scale: f32,
    pub rotate_model: cgmath::Quaternion<f32>,
    /// Replaces every mesh's material name when set.
    pub force_material_name: Option<String>,
    pub default_material_name: String,
    /// Keep all geometry static instead of building an armature.
    pub bones_as_vertex_groups: bool,
    pub materials: HashMap<String, Rc<Material>>,
    /// Include line required by the generated armature definition.
    pub armature_header: String,
}

impl Default for DisplayListSettings {
    fn default() -> Self {
        Self {
            prefix: "output".to_string(),
            model_scale: 1.0,
            fixed_point_scale: 256.0,
            rotate_model: cgmath::Quaternion::one(),
            force_material_name: None,
            default_material_name: "default".to_string(),
            bones_as_vertex_groups: false,
            materials: HashMap::new(),
            armature_header: "\"sk64/skelatool_armature.h\"".to_string(),
        }
    }
}

impl DisplayListSettings {
    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.insert(material.name.clone(), Rc::new(material));
        self
    }

    /// Transform from model space into the space meshes are baked in.
    pub fn create_collision_transform(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from(self.rotate_model)
            * cgmath::Matrix4::from_scale(self.fixed_point_scale * self.model_scale)
    }

    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let mut settings = Self::default();
        settings.apply_toml_str(source)?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("invalid settings in {}", path.display()))
    }

    /// Overrides the fields present in `source` and adds its materials.
    pub fn apply_toml_str(&mut self, source: &str) -> anyhow::Result<()> {
        let file: SettingsFile = toml::from_str(source)?;
        let section = file.settings;

        if let Some(prefix) = section.prefix {
            self.prefix = prefix;
        }
        if let Some(model_scale) = section.model_scale {
            self.model_scale = model_scale;
        }
        if let Some(fixed_point_scale) = section.fixed_point_scale {
            self.fixed_point_scale = fixed_point_scale;
        }
        if let Some([x, y, z]) = section.rotate_model {
            self.rotate_model = euler_degrees(x, y, z);
        }
        if section.force_material_name.is_some() {
            self.force_material_name = section.force_material_name;
        }
        if let Some(default_material_name) = section.default_material_name {
            self.default_material_name = default_material_name;
        }
        if let Some(bones_as_vertex_groups) = section.bones_as_vertex_groups {
            self.bones_as_vertex_groups = bones_as_vertex_groups;
        }
        if let Some(armature_header) = section.armature_header {
            self.armature_header = armature_header;
        }

        for (name, properties) in file.materials {
            let mut material = Material::new(&name);
            for (key, value) in properties {
                match property_string(&value) {
                    Some(value) => material.set_property(&key, &value),
                    None => log::warn!("Ignoring property {} of material {}: not a scalar", key, name),
                }
            }
            self.materials.insert(name, Rc::new(material));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    settings: SettingsSection,
    materials: BTreeMap<String, BTreeMap<String, toml::Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsSection {
    prefix: Option<String>,
    model_scale: Option<f32>,
    fixed_point_scale: Option<f32>,
    /// Euler angles in degrees, applied X then Y then Z.
    rotate_model: Option<[f32; 3]>,
    force_material_name: Option<String>,
    default_material_name: Option<String>,
    bones_as_vertex_groups: Option<bool>,
    armature_header: Option<String>,
}

fn property_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}
