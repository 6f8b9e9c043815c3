mod common;

use common::test_utils::{assert_matrix_eq, assert_vec3_eq};
use flow_bake::{
    cgmath::{self, Rotation3},
    data_structures::material::resolve_auto_tile,
    DisplayListSettings,
};

#[test]
fn defaults() {
    let settings = DisplayListSettings::default();
    assert_eq!(settings.prefix, "output");
    assert_eq!(settings.model_scale, 1.0);
    assert_eq!(settings.fixed_point_scale, 256.0);
    assert_eq!(settings.default_material_name, "default");
    assert!(settings.force_material_name.is_none());
    assert!(!settings.bones_as_vertex_groups);
    assert!(settings.materials.is_empty());
}

#[test]
fn collision_transform_scales_then_rotates() {
    let settings = DisplayListSettings {
        model_scale: 2.0,
        fixed_point_scale: 100.0,
        rotate_model: cgmath::Quaternion::from_angle_x(cgmath::Deg(-90.0)),
        ..Default::default()
    };
    let point = settings.create_collision_transform() * cgmath::Vector4::new(0.0, 1.0, 0.0, 1.0);
    assert_vec3_eq(point.truncate(), cgmath::Vector3::new(0.0, 0.0, -200.0));
}

#[test]
fn reads_settings_and_materials_from_toml() {
    let settings = DisplayListSettings::from_toml_str(
        r#"
        [settings]
        prefix = "crate"
        fixed_point_scale = 64
        model_scale = 0.5
        rotate_model = [-90.0, 0.0, 0.0]
        default_material_name = "wood"
        bones_as_vertex_groups = true

        [materials.wood]
        tileSizeS = "4"
        tileSizeT = 2
        shiny = true

        [materials.metal]
        "#,
    )
    .unwrap();

    assert_eq!(settings.prefix, "crate");
    assert_eq!(settings.fixed_point_scale, 64.0);
    assert_eq!(settings.model_scale, 0.5);
    assert_eq!(settings.default_material_name, "wood");
    assert!(settings.bones_as_vertex_groups);
    assert_matrix_eq(
        cgmath::Matrix4::from(settings.rotate_model),
        cgmath::Matrix4::from(cgmath::Quaternion::from_angle_x(cgmath::Deg(-90.0))),
    );

    let wood = &settings.materials["wood"];
    assert_eq!(wood.property("tileSizeS"), Some("4"));
    assert_eq!(wood.property("tileSizeT"), Some("2"));
    assert_eq!(wood.property("shiny"), Some("true"));
    let tile = resolve_auto_tile(Some(&**wood)).unwrap();
    assert_eq!((tile.s_tile, tile.t_tile), (4.0, 2.0));

    assert!(resolve_auto_tile(Some(&*settings.materials["metal"])).is_none());
}

#[test]
fn missing_tables_keep_defaults() {
    let settings = DisplayListSettings::from_toml_str("").unwrap();
    assert_eq!(settings.prefix, "output");
    assert_eq!(settings.fixed_point_scale, 256.0);
}

#[test]
fn applying_overrides_only_given_fields() {
    let mut settings = DisplayListSettings {
        prefix: "keep".to_string(),
        ..Default::default()
    };
    settings
        .apply_toml_str("[settings]\nforce_material_name = \"debug\"\n")
        .unwrap();
    assert_eq!(settings.prefix, "keep");
    assert_eq!(settings.force_material_name.as_deref(), Some("debug"));
}

#[test]
fn malformed_settings_are_errors() {
    assert!(DisplayListSettings::from_toml_str("[settings]\nfixed_point_scale = \"big\"").is_err());
    assert!(DisplayListSettings::load("does/not/exist.toml").is_err());
}
