use super::*;
use crate::{
    foundation::core::{Rgba, Transform2D},
    mock_backend::MockBackend,
    render::{
        material::ShaderRef,
        pool::SurfacePool,
        surface::{MaterialId, SurfaceDesc},
    },
};

fn run_pipeline(
    backend: &mut MockBackend,
    resolution: u32,
    blur_iterations: u32,
    state: RenderState,
) -> UmbraResult<PipelineReport> {
    let output = backend.create_texture(&SurfaceDesc::color(resolution, resolution))?;
    let material = Material::new(MaterialId(900), ShaderRef::new("shadow"));
    let mut camera = OrthoCamera::for_light(&Transform2D::default(), 1.0, 0);
    let mut pool = SurfacePool::new();
    let pipeline = ShadowPipeline {
        material: &material,
        state,
        resolution,
        blur_iterations,
    };
    let mut scope = pool.scope(backend);
    let report = pipeline.run(&mut scope, &mut camera, output)?;
    scope.finish()?;
    Ok(report)
}

#[test]
fn passes_run_in_order_with_expected_sizes() {
    let mut backend = MockBackend::default();
    let report = run_pipeline(&mut backend, 512, 0, RenderState::default()).unwrap();

    assert_eq!(report.downsample_steps, 8);
    assert_eq!(report.blur_passes, 0);

    let mut expected = vec![(512, 512), (512, 512), (512, 512)];
    let mut w = 512;
    while w > 2 {
        w /= 2;
        expected.push((w, 512));
    }
    assert_eq!(backend.acquired_sizes(), expected);

    let blits = backend.blits();
    assert_eq!(blits[0], (ShadowPass::DistanceEncode, (512, 512), (512, 512)));
    assert_eq!(blits[1], (ShadowPass::ParaboloidStretch, (512, 512), (512, 512)));
    for (i, b) in blits[2..10].iter().enumerate() {
        let w = 512 >> (i + 1);
        assert_eq!(*b, (ShadowPass::Downsample, (w * 2, 512), (w, 512)));
    }
    assert_eq!(blits[10], (ShadowPass::Resolve, (2, 512), (512, 512)));
    assert_eq!(blits.len(), 11);
    assert!(backend.temporaries.is_empty());
}

#[test]
fn downsample_count_is_log2_minus_one() {
    for log2 in 3..=11u32 {
        let mut backend = MockBackend::default();
        let r = 1u32 << log2;
        let report = run_pipeline(&mut backend, r, 0, RenderState::default()).unwrap();
        assert_eq!(report.downsample_steps, log2 - 1);
        assert_eq!(crate::foundation::math::downsample_steps(r), log2 - 1);
    }
}

#[test]
fn downsample_blits_match_shared_step_count() {
    for r in [8u32, 64, 2048] {
        let mut backend = MockBackend::default();
        run_pipeline(&mut backend, r, 0, RenderState::default()).unwrap();

        let downsamples: Vec<_> = backend
            .blits()
            .into_iter()
            .filter(|b| b.0 == ShadowPass::Downsample)
            .collect();
        assert_eq!(
            downsamples.len() as u32,
            crate::foundation::math::downsample_steps(r)
        );
        assert_eq!(downsamples.last().map(|b| b.2), Some((2, r)));
    }
}

#[test]
fn blur_runs_two_passes_per_iteration_horizontal_first() {
    for k in 0..=4u32 {
        let mut backend = MockBackend::default();
        let report = run_pipeline(&mut backend, 64, k, RenderState::default()).unwrap();
        assert_eq!(report.blur_passes, 2 * k);

        let blur: Vec<ShadowPass> = backend
            .blits()
            .into_iter()
            .map(|b| b.0)
            .filter(|p| p.is_blur())
            .collect();
        assert_eq!(blur.len() as u32, 2 * k);
        for pair in blur.chunks(2) {
            assert_eq!(pair, [ShadowPass::BlurHorizontal, ShadowPass::BlurVertical]);
        }
        assert!(backend.temporaries.is_empty());
    }
}

#[test]
fn render_state_reaches_every_pass() {
    let state = RenderState {
        ultra_quality: true,
        solid_shadow: true,
    };
    let mut backend = MockBackend::default();
    run_pipeline(&mut backend, 16, 1, state).unwrap();
    for call in &backend.calls {
        if let crate::mock_backend::Call::Blit { state: s, .. } = call {
            assert_eq!(*s, state);
        }
    }
}

#[test]
fn exhaustion_mid_pipeline_releases_everything() {
    let mut backend = MockBackend::with_max_live(4);
    let err = run_pipeline(&mut backend, 64, 0, RenderState::default()).unwrap_err();
    assert!(err.is_resource_exhaustion());
    assert!(backend.temporaries.is_empty());
}

#[test]
fn bind_shadow_params_scales_blur_with_resolution() {
    let mut material = Material::new(MaterialId(1), ShaderRef::new("shadow"));
    let config = LightConfig {
        blur_size: 3.0,
        resolution: 1000,
        shadow_bias: 0.01,
        shadow_color: Rgba::new(0.1, 0.0, 0.0, 0.5),
        ..LightConfig::default()
    };
    bind_shadow_params(&mut material, &config, SurfaceId(42));
    let p = &material.params;
    assert_eq!(p.texture(params::FALLOFF_TEX), Some(SurfaceId(42)));
    assert_eq!(p.float(params::BLUR_SIZE), Some(6.0));
    assert_eq!(p.float(params::SHADOW_OFFSET), Some(0.01));
    assert_eq!(p.color(params::SHADOW_COLOR), Some(config.shadow_color));
    assert_eq!(p.color(params::COLOR_TINT), Some(Rgba::WHITE));
}
