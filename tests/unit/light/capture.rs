use super::*;
use crate::{
    foundation::core::{Transform2D, Vec2},
    mock_backend::{Call, MockBackend},
    render::pool::SurfacePool,
};

#[test]
fn capture_targets_acquired_surface_and_restores_camera() {
    let mut backend = MockBackend::default();
    let mut pool = SurfacePool::new();
    let mut camera = OrthoCamera::for_light(&Transform2D::from_translation(Vec2::new(3.0, 1.0)), 4.0, 7);

    let mut scope = pool.scope(&mut backend);
    let id = capture_occluders(&mut scope, &mut camera, 64).unwrap();
    assert_eq!(scope.live_count(), 1);
    drop(scope);

    assert_eq!(camera.target, None);
    assert_eq!(backend.acquired_sizes(), vec![(64, 64)]);
    assert!(backend.calls.contains(&Call::RenderOccluders {
        target: Some(id),
        ortho_size: 4.0,
    }));
    assert!(!camera.culling_mask.contains(7));
}

#[test]
fn capture_propagates_exhaustion() {
    let mut backend = MockBackend::with_max_live(0);
    let mut pool = SurfacePool::new();
    let mut camera = OrthoCamera::for_light(&Transform2D::default(), 1.0, 0);

    let mut scope = pool.scope(&mut backend);
    let err = capture_occluders(&mut scope, &mut camera, 8).unwrap_err();
    assert!(err.is_resource_exhaustion());
    assert_eq!(camera.target, None);
}
