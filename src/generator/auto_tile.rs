//! Auto-tiling parameters.
//!
//! Node names may embed `label value` pairs, e.g. `"Wall uvscale 2 uvrotz 90"`.
//! Those pairs, together with the tile size of the node's material, drive
//! the cube projection of [`ExtendedMesh::cube_project_tex`].
//!
//! [`ExtendedMesh::cube_project_tex`]: crate::data_structures::mesh::ExtendedMesh::cube_project_tex

use cgmath::Rotation3;

use crate::{
    data_structures::{material::AutoTile, mesh::CubeProjection},
    util,
};

pub const UV_SCALE: &str = "uvscale";
pub const UV_ROT_X: &str = "uvrotx";
pub const UV_ROT_Y: &str = "uvroty";
pub const UV_ROT_Z: &str = "uvrotz";
pub const UV_TRANS_X: &str = "uvtransx";
pub const UV_TRANS_Y: &str = "uvtransy";
pub const UV_TRANS_Z: &str = "uvtransz";

/// Value returned for a label that is missing or reads as zero.
pub const DEFAULT_NUMBER_VALUE: f64 = 1.0;

/// Finds `" <label> "` in `name` and returns the text up to the next space.
fn find_label_value<'a>(name: &'a str, label: &str) -> Option<&'a str> {
    let start = name.find(&format!(" {} ", label))? + label.len() + 2;
    let rest = &name[start..];
    let end = rest.find(' ').unwrap_or(rest.len());
    Some(&rest[..end])
}

/**
 * Reads the number following `label` in a node name.
 *
 * Returns `1.0` when the label is absent. A value that parses as `0.0`
 * (including text that is not a number) also yields `1.0`, so a zero can
 * never be expressed through a node name.
 */
pub fn extract_number_value(name: &str, label: &str) -> f64 {
    let Some(value) = find_label_value(name, label) else {
        return DEFAULT_NUMBER_VALUE;
    };
    let result = util::parse_leading_float(value);
    if result == 0.0 {
        return DEFAULT_NUMBER_VALUE;
    }
    result
}

/// Projection parameters of one node before the material tile size is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvParameters {
    pub scale: f64,
    /// Degrees around X, Y and Z.
    pub rotation: cgmath::Vector3<f64>,
    pub translation: cgmath::Vector3<f64>,
}

impl Default for UvParameters {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: cgmath::Vector3::new(0.0, 0.0, 0.0),
            translation: cgmath::Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

/// Where the per-node UV parameters come from.
pub trait UvParameterSource {
    fn uv_parameters(&self, node_name: &str) -> UvParameters;
}

/// Reads UV parameters from `label value` pairs in node names.
///
/// Rotation and translation labels that are missing leave the axis
/// untouched; present ones follow [`extract_number_value`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeNameParameters;

impl NodeNameParameters {
    fn optional(name: &str, label: &str, absent: f64) -> f64 {
        match find_label_value(name, label) {
            Some(_) => extract_number_value(name, label),
            None => absent,
        }
    }
}

impl UvParameterSource for NodeNameParameters {
    fn uv_parameters(&self, node_name: &str) -> UvParameters {
        UvParameters {
            scale: extract_number_value(node_name, UV_SCALE),
            rotation: cgmath::Vector3::new(
                Self::optional(node_name, UV_ROT_X, 0.0),
                Self::optional(node_name, UV_ROT_Y, 0.0),
                Self::optional(node_name, UV_ROT_Z, 0.0),
            ),
            translation: cgmath::Vector3::new(
                Self::optional(node_name, UV_TRANS_X, 0.0),
                Self::optional(node_name, UV_TRANS_Y, 0.0),
                Self::optional(node_name, UV_TRANS_Z, 0.0),
            ),
        }
    }
}

/// Combines node parameters with the material tile size.
pub fn cube_projection(tile: &AutoTile, parameters: &UvParameters) -> CubeProjection {
    let rotation = cgmath::Quaternion::from_axis_angle(cgmath::Vector3::unit_x(), cgmath::Deg(parameters.rotation.x))
        * cgmath::Quaternion::from_axis_angle(cgmath::Vector3::unit_y(), cgmath::Deg(parameters.rotation.y))
        * cgmath::Quaternion::from_axis_angle(cgmath::Vector3::unit_z(), cgmath::Deg(parameters.rotation.z));

    CubeProjection {
        s_scale: parameters.scale / tile.s_tile,
        t_scale: parameters.scale / tile.t_tile,
        rotation,
        translation: parameters.translation,
    }
}
