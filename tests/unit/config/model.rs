use super::*;

#[test]
fn defaults_match_component_defaults() {
    let c = LightConfig::default();
    assert_eq!(c.shadow_bias, 0.001);
    assert_eq!(c.blur_size, 0.0);
    assert_eq!(c.blur_iterations, 0);
    assert_eq!(c.resolution, 512);
    assert!(!c.high_quality_penumbras);
    assert!(!c.solid_shadow);
    assert_eq!(c.tint, Rgba::WHITE);
    assert_eq!(c.shadow_color, Rgba::BLACK);
}

#[test]
fn sanitize_clamps_ranges_and_replaces_non_finite() {
    let c = LightConfig {
        shadow_bias: 3.0,
        blur_size: f32::NAN,
        blur_iterations: 99,
        tint: Rgba::new(f32::INFINITY, 0.0, 0.0, 1.0),
        ..LightConfig::default()
    }
    .sanitized();
    assert_eq!(c.shadow_bias, MAX_SHADOW_BIAS);
    assert_eq!(c.blur_size, 0.0);
    assert_eq!(c.blur_iterations, MAX_BLUR_ITERATIONS);
    assert_eq!(c.tint, Rgba::WHITE);

    let c = LightConfig {
        shadow_bias: -1.0,
        blur_size: 40.0,
        ..LightConfig::default()
    }
    .sanitized();
    assert_eq!(c.shadow_bias, 0.0);
    assert_eq!(c.blur_size, MAX_BLUR_SIZE);
}

#[test]
fn resolution_is_normalized_on_use() {
    let mut c = LightConfig {
        resolution: 500,
        ..LightConfig::default()
    };
    assert_eq!(c.normalized_resolution(), 512);
    c.resolution = 3;
    assert_eq!(c.normalized_resolution(), 8);
    c.resolution = 1 << 20;
    assert_eq!(c.normalized_resolution(), 2048);
}

#[test]
fn blur_size_scales_with_resolution() {
    let c = LightConfig {
        blur_size: 2.0,
        resolution: 1024,
        ..LightConfig::default()
    };
    assert_eq!(c.scaled_blur_size(), 4.0);
    let c = LightConfig {
        resolution: 256,
        ..c
    };
    assert_eq!(c.scaled_blur_size(), 1.0);
}

#[test]
fn render_state_mirrors_flags() {
    let c = LightConfig {
        high_quality_penumbras: true,
        ..LightConfig::default()
    };
    let s = c.render_state();
    assert!(s.ultra_quality);
    assert!(!s.solid_shadow);
}

#[test]
fn empty_object_deserializes_to_defaults() {
    let c: LightConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(c, LightConfig::default());
    let scene = SceneFile::from_json_str("{}").unwrap();
    assert_eq!(scene.light.ortho_size, 5.0);
    assert!(scene.occluders.is_empty());
}

#[test]
fn scene_rejects_bad_inputs() {
    let err = SceneFile::from_json_str(r#"{"light":{"ortho_size":0}}"#).unwrap_err();
    assert!(err.to_string().contains("ortho_size"));

    let err =
        SceneFile::from_json_str(r#"{"occluders":[{"svg_path_d":"M0 0 L1 1","opacity":2}]}"#)
            .unwrap_err();
    assert!(err.to_string().contains("opacity"));

    let err = SceneFile::from_json_str(r#"{"occluders":[{"svg_path_d":"M0 0 X 1 1"}]}"#).unwrap_err();
    assert!(err.to_string().contains("svg_path_d"));

    assert!(SceneFile::from_json_str("{not json").is_err());
}

#[test]
fn scene_occluders_parse_paths() {
    let scene = SceneFile::from_json_str(
        r#"{"occluders":[{"svg_path_d":"M1 1 L2 1 L2 2 Z","layer":3}]}"#,
    )
    .unwrap();
    let occ = scene.occluders().unwrap();
    assert_eq!(occ.len(), 1);
    assert_eq!(occ[0].opacity, 1.0);
    assert_eq!(occ[0].layer, 3);
    assert!(occ[0].path.elements().len() >= 3);
}

#[test]
fn scene_json_roundtrips() {
    let mut scene = SceneFile::default();
    scene.light.config.shadow_bias = 0.0123;
    scene.light.config.tint = Rgba::new(0.1, 0.2, 0.3, 0.4);
    scene.occluders.push(OccluderSpec {
        svg_path_d: "M0 0 L1 0 L1 1 Z".to_string(),
        opacity: 0.5,
        layer: 0,
    });
    let s = scene.to_json().unwrap();
    let back = SceneFile::from_json_str(&s).unwrap();
    assert_eq!(back, scene);
}
