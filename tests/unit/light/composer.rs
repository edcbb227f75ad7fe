use super::*;
use crate::{
    foundation::core::{Point, Vec2},
    mock_backend::MockBackend,
};

fn light_at(x: f64, y: f64) -> Transform2D {
    Transform2D {
        translate: Vec2::new(x, y),
        rotation_rad: 0.0,
        scale: 0.25,
    }
}

#[test]
fn mesh_is_scaled_to_camera_extent() {
    let light = light_at(2.0, -1.0);
    let camera = OrthoCamera::for_light(&light, 3.0, 5);
    let a = light_mesh_transform(&light, &camera);

    // unit quad corner lands at translate + extent * corner
    let p = a * Point::new(0.5, 0.5);
    assert!((p.x - 5.0).abs() < 1e-9);
    assert!((p.y - 2.0).abs() < 1e-9);
}

#[test]
fn compose_issues_one_draw_with_output_bound() {
    let mut backend = MockBackend::default();
    let light = light_at(0.0, 0.0);
    let camera = OrthoCamera::for_light(&light, 1.0, 4);
    let draw = compose_light(
        &mut backend,
        Some(MeshId(1)),
        Some(MaterialId(2)),
        &light,
        &camera,
        4,
        SurfaceId(9),
    )
    .unwrap();

    assert_eq!(backend.draws(), vec![&draw]);
    assert_eq!(draw.layer, 4);
    assert_eq!(draw.overrides.texture(params::MAIN_TEX), Some(SurfaceId(9)));
}

#[test]
fn missing_references_are_config_errors() {
    let mut backend = MockBackend::default();
    let light = Transform2D::default();
    let camera = OrthoCamera::for_light(&light, 1.0, 0);

    let err = compose_light(&mut backend, None, Some(MaterialId(2)), &light, &camera, 0, SurfaceId(1))
        .unwrap_err();
    assert!(matches!(err, UmbraError::Config(_)));
    let err = compose_light(&mut backend, Some(MeshId(1)), None, &light, &camera, 0, SurfaceId(1))
        .unwrap_err();
    assert!(matches!(err, UmbraError::Config(_)));
    assert!(backend.draws().is_empty());
}
