mod common;

use common::test_utils::{assert_vec2_eq, quad};
use flow_bake::{
    cgmath::{self, Rotation3},
    data_structures::{
        bones::BoneHierarchy,
        material::{resolve_auto_tile, AutoTile, Material},
        mesh::{CubeProjection, ExtendedMesh},
    },
    generator::auto_tile::{cube_projection, extract_number_value, NodeNameParameters, UvParameterSource, UvParameters},
    util::parse_leading_float,
};

#[test]
fn material_with_only_s_tile_copies_it_to_t() {
    let material = Material::new("brick").with_property("tileSizeS", "4");
    assert_eq!(
        resolve_auto_tile(Some(&material)),
        Some(AutoTile { s_tile: 4.0, t_tile: 4.0 })
    );
}

#[test]
fn material_with_both_tile_sizes() {
    let material = Material::new("brick")
        .with_property("tileSizeS", "4")
        .with_property("tileSizeT", "2");
    assert_eq!(
        resolve_auto_tile(Some(&material)),
        Some(AutoTile { s_tile: 4.0, t_tile: 2.0 })
    );
}

#[test]
fn auto_tiling_disabled_without_s_tile_or_material() {
    let plain = Material::new("plain");
    let only_t = Material::new("only_t").with_property("tileSizeT", "2");
    assert_eq!(resolve_auto_tile(Some(&plain)), None);
    assert_eq!(resolve_auto_tile(Some(&only_t)), None);
    assert_eq!(resolve_auto_tile(None), None);
}

#[test]
fn unparsable_tile_size_reads_as_zero() {
    let material = Material::new("odd").with_property("tileSizeS", "wide");
    assert_eq!(
        resolve_auto_tile(Some(&material)),
        Some(AutoTile { s_tile: 0.0, t_tile: 0.0 })
    );
}

#[test]
fn extracts_labelled_numbers_from_node_names() {
    let name = "Wall uvscale 2 uvrotz 90";
    assert_eq!(extract_number_value(name, "uvscale"), 2.0);
    assert_eq!(extract_number_value(name, "uvrotz"), 90.0);
    assert_eq!(extract_number_value(name, "uvroty"), 1.0);
    assert_eq!(extract_number_value("MyMesh uvscale 2.5 uvrotz 90", "uvscale"), 2.5);
}

#[test]
fn zero_and_garbage_values_fall_back_to_one() {
    assert_eq!(extract_number_value("Wall uvscale 0", "uvscale"), 1.0);
    assert_eq!(extract_number_value("Wall uvscale abc", "uvscale"), 1.0);
    assert_eq!(extract_number_value("Wall uvscale -0.0 x", "uvscale"), 1.0);
}

#[test]
fn labels_need_a_leading_and_trailing_space() {
    // label at the very start has no leading space
    assert_eq!(extract_number_value("uvscale 3 Wall", "uvscale"), 1.0);
    // label at the very end has no value
    assert_eq!(extract_number_value("Wall uvscale", "uvscale"), 1.0);
    // a longer label does not match a shorter one
    assert_eq!(extract_number_value("Wall uvscalex 3", "uvscale"), 1.0);
    assert_eq!(extract_number_value("Wall uvscale 3x", "uvscale"), 3.0);
}

#[test]
fn leading_float_parsing_matches_atof() {
    assert_eq!(parse_leading_float("2.5"), 2.5);
    assert_eq!(parse_leading_float("  -3e2rest"), -300.0);
    assert_eq!(parse_leading_float("4e"), 4.0);
    assert_eq!(parse_leading_float(".5"), 0.5);
    assert_eq!(parse_leading_float("7."), 7.0);
    assert_eq!(parse_leading_float("+"), 0.0);
    assert_eq!(parse_leading_float(""), 0.0);
    assert_eq!(parse_leading_float("x1"), 0.0);
}

#[test]
fn node_name_parameters_default_to_identity_projection() {
    let parameters = NodeNameParameters.uv_parameters("Box uvscale 4");
    assert_eq!(
        parameters,
        UvParameters {
            scale: 4.0,
            ..Default::default()
        }
    );
}

#[test]
fn node_name_parameters_read_every_axis() {
    let parameters =
        NodeNameParameters.uv_parameters("Box uvrotx 10 uvroty 20 uvrotz 30 uvtransx 1.5 uvtransy 2 uvtransz 0 end");
    assert_eq!(parameters.scale, 1.0);
    assert_eq!(parameters.rotation, cgmath::Vector3::new(10.0, 20.0, 30.0));
    // explicit zero follows the zero-rejection rule
    assert_eq!(parameters.translation, cgmath::Vector3::new(1.5, 2.0, 1.0));
}

#[test]
fn cube_projection_divides_scale_by_tile_size() {
    let projection = cube_projection(
        &AutoTile { s_tile: 2.0, t_tile: 4.0 },
        &UvParameters {
            scale: 4.0,
            ..Default::default()
        },
    );
    assert_eq!(projection.s_scale, 2.0);
    assert_eq!(projection.t_scale, 1.0);
    assert_eq!(projection.translation, cgmath::Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn cube_projection_uses_dominant_normal_axis() {
    let mut mesh = ExtendedMesh::new(0, &quad("quad", 0), &BoneHierarchy::new());
    mesh.cube_project_tex(&CubeProjection {
        s_scale: 2.0,
        t_scale: 3.0,
        rotation: cgmath::Quaternion::from_angle_z(cgmath::Deg(0.0)),
        translation: cgmath::Vector3::new(0.5, 0.0, 0.0),
    });
    assert_vec2_eq(mesh.tex_coords[0], cgmath::Vector2::new(1.0, 0.0));
    assert_vec2_eq(mesh.tex_coords[2], cgmath::Vector2::new(3.0, 3.0));

    // the same quad turned to face +X projects onto Y/Z
    let mut side = quad("side", 0);
    side.positions = side
        .positions
        .iter()
        .map(|p| cgmath::Vector3::new(0.0, p.x, p.y))
        .collect();
    side.normals = vec![cgmath::Vector3::new(1.0, 0.0, 0.0); 4];
    let mut side = ExtendedMesh::new(0, &side, &BoneHierarchy::new());
    side.cube_project_tex(&CubeProjection {
        s_scale: 1.0,
        t_scale: 1.0,
        rotation: cgmath::Quaternion::from_angle_z(cgmath::Deg(0.0)),
        translation: cgmath::Vector3::new(0.0, 0.0, 0.0),
    });
    assert_vec2_eq(side.tex_coords[2], cgmath::Vector2::new(1.0, 1.0));
}

#[test]
fn cube_projection_rotates_before_projecting() {
    let mut mesh = ExtendedMesh::new(0, &quad("quad", 0), &BoneHierarchy::new());
    mesh.cube_project_tex(&CubeProjection {
        s_scale: 1.0,
        t_scale: 1.0,
        rotation: cgmath::Quaternion::from_angle_z(cgmath::Deg(90.0)),
        translation: cgmath::Vector3::new(0.0, 0.0, 0.0),
    });
    // (1, 0, 0) turns into (0, 1, 0); the normal stays on +Z
    assert_vec2_eq(mesh.tex_coords[1], cgmath::Vector2::new(0.0, 1.0));
}

#[test]
fn cube_projection_falls_back_to_face_normals() {
    let mut source = quad("flat", 0);
    source.normals.clear();
    let mut mesh = ExtendedMesh::new(0, &source, &BoneHierarchy::new());
    mesh.cube_project_tex(&CubeProjection {
        s_scale: 1.0,
        t_scale: 1.0,
        rotation: cgmath::Quaternion::from_angle_z(cgmath::Deg(0.0)),
        translation: cgmath::Vector3::new(0.0, 0.0, 0.0),
    });
    assert_vec2_eq(mesh.tex_coords[2], cgmath::Vector2::new(1.0, 1.0));
}

#[test]
fn leading_float_has_no_special_forms() {
    assert_eq!(parse_leading_float("inf"), 0.0);
    assert_eq!(parse_leading_float("nan"), 0.0);
    assert_eq!(parse_leading_float("0x1p3"), 0.0);
    assert_eq!(extract_number_value("Wall uvscale inf", "uvscale"), 1.0);
    assert_eq!(extract_number_value("Wall uvscale 0x1p3", "uvscale"), 1.0);
}

#[test]
fn zero_tile_sizes_are_degenerate() {
    let zero = Material::new("zero").with_property("tileSizeS", "0");
    let zero_t = Material::new("zero_t")
        .with_property("tileSizeS", "2")
        .with_property("tileSizeT", "none");
    assert!(resolve_auto_tile(Some(&zero)).unwrap().is_degenerate());
    assert!(resolve_auto_tile(Some(&zero_t)).unwrap().is_degenerate());
    assert!(!AutoTile { s_tile: 2.0, t_tile: 1.0 }.is_degenerate());
}
