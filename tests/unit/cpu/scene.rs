use super::*;
use crate::foundation::core::Transform2D;

fn camera(layer: u32) -> OrthoCamera {
    OrthoCamera::for_light(&Transform2D::default(), 1.0, layer)
}

fn at(cov: &[f32], x: usize, y: usize) -> f32 {
    cov[y * 16 + x]
}

#[test]
fn covered_pixels_follow_world_geometry() {
    let occ = [Occluder::rect(0.5, -1.0, 1.0, 1.0)];
    let cov = rasterize_coverage(&occ, &camera(31), 16, 16).unwrap();
    assert_eq!(cov.len(), 256);
    assert!(at(&cov, 14, 8) > 0.99);
    assert!(at(&cov, 13, 2) > 0.99);
    assert_eq!(at(&cov, 2, 8), 0.0);
    assert_eq!(at(&cov, 10, 8), 0.0);
}

#[test]
fn y_axis_points_up_in_world() {
    let occ = [Occluder::rect(-1.0, 0.5, 1.0, 1.0)];
    let cov = rasterize_coverage(&occ, &camera(31), 16, 16).unwrap();
    assert!(at(&cov, 8, 1) > 0.99);
    assert_eq!(at(&cov, 8, 14), 0.0);
}

#[test]
fn culled_layers_and_empty_scenes_are_clear() {
    let occ = [Occluder::rect(-1.0, -1.0, 1.0, 1.0).with_layer(3)];
    let cov = rasterize_coverage(&occ, &camera(3), 16, 16).unwrap();
    assert!(cov.iter().all(|&a| a == 0.0));

    let cov = rasterize_coverage(&[], &camera(3), 16, 16).unwrap();
    assert!(cov.iter().all(|&a| a == 0.0));
}

#[test]
fn opacity_scales_coverage() {
    let occ = [Occluder::rect(-1.0, -1.0, 1.0, 1.0).with_opacity(0.5)];
    let cov = rasterize_coverage(&occ, &camera(31), 16, 16).unwrap();
    assert!((at(&cov, 8, 8) - 0.5).abs() < 0.01);
}

#[test]
fn oversized_target_is_rejected() {
    assert!(rasterize_coverage(&[], &camera(0), 70_000, 1).is_err());
}
