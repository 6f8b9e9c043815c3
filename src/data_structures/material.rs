//! Materials from the material table and the auto-tile settings they carry.

use std::collections::BTreeMap;

use crate::{data_structures::scene::SceneMaterial, util};

/// Tile width in world units; enables auto-tiling when present.
pub const TILE_SIZE_S: &str = "tileSizeS";
/// Tile height in world units; defaults to [`TILE_SIZE_S`].
pub const TILE_SIZE_T: &str = "tileSizeT";

/// A named bag of string properties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub name: String,
    properties: BTreeMap<String, String>,
}

impl Material {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&mut self, key: &str, value: &str) {
        self.properties.insert(key.to_string(), value.to_string());
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Tile dimensions of an auto-tiled material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoTile {
    pub s_tile: f64,
    pub t_tile: f64,
}

impl AutoTile {
    /// A zero tile size divides the UV scale by zero.
    pub fn is_degenerate(&self) -> bool {
        self.s_tile == 0.0 || self.t_tile == 0.0
    }
}

/// Returns the tile dimensions if `material` asks for auto-tiling.
///
/// Unparsable numbers read as `0.0`, a missing `tileSizeT` copies `tileSizeS`.
pub fn resolve_auto_tile(material: Option<&Material>) -> Option<AutoTile> {
    let material = material?;
    let s_tile = util::parse_leading_float(material.property(TILE_SIZE_S)?);
    let t_tile = material
        .property(TILE_SIZE_T)
        .map_or(s_tile, util::parse_leading_float);
    Some(AutoTile { s_tile, t_tile })
}

/// Name used to look a mesh's material up in the material table.
pub fn resolve_material_name(material: Option<&SceneMaterial>, forced: Option<&str>) -> String {
    match forced {
        Some(forced) if !forced.is_empty() => forced.to_string(),
        _ => material.map(|m| m.name.clone()).unwrap_or_default(),
    }
}

/// Macro that the generated code uses to refer to a material index.
pub fn material_index_macro_name(material_name: &str) -> String {
    format!("MATERIAL_{}", util::macro_case(material_name))
}
