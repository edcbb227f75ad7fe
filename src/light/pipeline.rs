use crate::{
    config::model::LightConfig,
    foundation::{error::UmbraResult, math::downsample_steps},
    render::{
        backend::ShadowBackend,
        camera::OrthoCamera,
        material::{Material, RenderState, ShadowPass, params},
        pool::PoolScope,
        surface::SurfaceId,
    },
};

use super::capture::capture_occluders;

/// What one pipeline run did; used by tests and debug logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineReport {
    /// Normalized shadow-map resolution.
    pub resolution: u32,
    /// Width-halving passes run.
    pub downsample_steps: u32,
    /// Blur passes run, both directions counted.
    pub blur_passes: u32,
    /// 2-wide occluder distance strip fed to the resolve pass, one column per hemisphere.
    pub strip: SurfaceId,
}

/// Bind the per-frame shadow parameters onto the material.
pub fn bind_shadow_params(
    material: &mut Material,
    config: &LightConfig,
    falloff_tex: SurfaceId,
) {
    let p = &mut material.params;
    p.set_texture(params::FALLOFF_TEX, falloff_tex);
    p.set_float(params::BLUR_SIZE, config.scaled_blur_size());
    p.set_float(params::SHADOW_OFFSET, config.shadow_bias);
    p.set_color(params::SHADOW_COLOR, config.shadow_color);
    p.set_color(params::COLOR_TINT, config.tint);
}

/// Distance-field shadow pipeline for one light and one frame.
///
/// Every intermediate surface comes from `scope`; the resolved (and optionally blurred) result
/// lands in `output`, which must be a `resolution`-square persistent texture.
pub struct ShadowPipeline<'m> {
    /// Shadow material with the frame's parameters bound.
    pub material: &'m Material,
    /// Keywords for every pass.
    pub state: RenderState,
    /// Normalized shadow-map resolution.
    pub resolution: u32,
    /// Blur rounds.
    pub blur_iterations: u32,
}

impl ShadowPipeline<'_> {
    /// Capture, encode, stretch, downsample, resolve into `output` and blur.
    #[tracing::instrument(level = "debug", skip_all, fields(resolution = self.resolution))]
    pub fn run<B: ShadowBackend + ?Sized>(
        &self,
        scope: &mut PoolScope<'_, B>,
        camera: &mut OrthoCamera,
        output: SurfaceId,
    ) -> UmbraResult<PipelineReport> {
        let shadow_map = capture_occluders(scope, camera, self.resolution)?;
        let distance = self.encode_distance(scope, shadow_map)?;
        let stretched = self.stretch_paraboloid(scope, distance)?;
        let (strip, downsample_steps) = self.downsample(scope, stretched)?;
        self.resolve(scope, strip, output)?;
        let blur_passes = self.blur(scope, output)?;

        Ok(PipelineReport {
            resolution: self.resolution,
            downsample_steps,
            blur_passes,
            strip,
        })
    }

    fn pass<B: ShadowBackend + ?Sized>(
        &self,
        scope: &mut PoolScope<'_, B>,
        src: SurfaceId,
        dst: SurfaceId,
        pass: ShadowPass,
    ) -> UmbraResult<()> {
        scope
            .backend()
            .blit(src, dst, self.material, pass, self.state)
    }

    /// Pass 0: captured alpha to radial distance from the surface center.
    pub fn encode_distance<B: ShadowBackend + ?Sized>(
        &self,
        scope: &mut PoolScope<'_, B>,
        shadow_map: SurfaceId,
    ) -> UmbraResult<SurfaceId> {
        let dst = scope.acquire(self.resolution, self.resolution)?;
        self.pass(scope, shadow_map, dst, ShadowPass::DistanceEncode)?;
        Ok(dst)
    }

    /// Pass 1: distance buffer to two paraboloid halves packed side by side.
    pub fn stretch_paraboloid<B: ShadowBackend + ?Sized>(
        &self,
        scope: &mut PoolScope<'_, B>,
        distance: SurfaceId,
    ) -> UmbraResult<SurfaceId> {
        let dst = scope.acquire(self.resolution, self.resolution)?;
        self.pass(scope, distance, dst, ShadowPass::ParaboloidStretch)?;
        Ok(dst)
    }

    /// Pass 2, repeated: halve the width until it is at most 2. Height stays at the resolution.
    pub fn downsample<B: ShadowBackend + ?Sized>(
        &self,
        scope: &mut PoolScope<'_, B>,
        stretched: SurfaceId,
    ) -> UmbraResult<(SurfaceId, u32)> {
        let steps = downsample_steps(self.resolution);
        let mut current = stretched;
        let mut width = self.resolution;
        for _ in 0..steps {
            width /= 2;
            let next = scope.acquire(width, self.resolution)?;
            self.pass(scope, current, next, ShadowPass::Downsample)?;
            current = next;
        }
        Ok((current, steps))
    }

    /// Pass 3: compare pixel distance against the strip and shade into `output`.
    pub fn resolve<B: ShadowBackend + ?Sized>(
        &self,
        scope: &mut PoolScope<'_, B>,
        strip: SurfaceId,
        output: SurfaceId,
    ) -> UmbraResult<()> {
        self.pass(scope, strip, output, ShadowPass::Resolve)
    }

    /// Passes 5 then 4, `blur_iterations` times, through one temporary. Returns the pass count.
    pub fn blur<B: ShadowBackend + ?Sized>(
        &self,
        scope: &mut PoolScope<'_, B>,
        output: SurfaceId,
    ) -> UmbraResult<u32> {
        if self.blur_iterations == 0 {
            return Ok(0);
        }
        let ping_pong = scope.acquire(self.resolution, self.resolution)?;
        for _ in 0..self.blur_iterations {
            self.pass(scope, output, ping_pong, ShadowPass::BlurHorizontal)?;
            self.pass(scope, ping_pong, output, ShadowPass::BlurVertical)?;
        }
        Ok(self.blur_iterations * 2)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/light/pipeline.rs"]
mod tests;
