use crate::{
    config::model::{LightConfig, LightSpec},
    falloff::lookup::{FALLOFF_SAMPLES, FalloffAuthoring, FalloffLookup},
    foundation::{
        core::Transform2D,
        error::{UmbraError, UmbraResult},
    },
    render::{
        backend::ShadowBackend,
        camera::OrthoCamera,
        material::{Material, MeshDraw, ShaderRef},
        pool::SurfacePool,
        surface::{FilterMode, MaterialId, MeshId, ReclaimMode, Resource, SurfaceDesc, SurfaceId},
    },
};

use super::{
    composer::compose_light,
    pipeline::{PipelineReport, ShadowPipeline, bind_shadow_params},
};

/// Name of the six-pass shadow program.
pub const SHADOW_SHADER: &str = "umbra/point_light_2d_shadow";

/// Whether authoring inputs may change between frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RuntimeMode {
    /// Gradient and curve are live-edited; the falloff is re-baked whenever they change.
    Authoring,
    /// Authoring inputs are fixed; only [`PointLight2D::recompute_falloff`] re-bakes.
    #[default]
    Running,
}

/// Persistent backend resources owned by one light.
#[derive(Debug, Default)]
pub struct LightResources {
    /// Shadowed light texture, square at the normalized resolution.
    pub output: Option<SurfaceId>,
    /// 128x1 texture holding the uploaded falloff lookup.
    pub falloff_tex: Option<SurfaceId>,
    /// Instance of the shadow program.
    pub shadow_material: Option<Material>,
    /// Last baked falloff lookup.
    pub lookup: Option<FalloffLookup>,
    /// Fingerprint of the lookup currently uploaded to `falloff_tex`.
    uploaded: Option<u64>,
}

/// Result of one light frame.
#[derive(Clone, Debug, PartialEq)]
pub struct LightFrame {
    /// Texture the frame was resolved into.
    pub output: SurfaceId,
    /// Pass counts of the pipeline run.
    pub report: PipelineReport,
    /// The light mesh draw that was issued.
    pub draw: MeshDraw,
}

/// A 2D point light with distance-field shadows.
#[derive(Debug)]
pub struct PointLight2D {
    /// Shadow settings, sanitized every frame.
    pub config: LightConfig,
    /// Falloff gradient and curve.
    pub authoring: FalloffAuthoring,
    /// World placement.
    pub transform: Transform2D,
    /// Half-size of the capture camera in world units.
    pub ortho_size: f64,
    /// Render layer of the light mesh; culled from the capture camera.
    pub layer: u32,
    /// Light mesh; a unit quad centered on the origin.
    pub mesh: Option<MeshId>,
    /// Material drawing the light mesh.
    pub light_material: Option<MaterialId>,
    /// Program the shadow material is created from.
    pub shadow_shader: Option<ShaderRef>,
    /// When the falloff is re-baked.
    pub mode: RuntimeMode,
    resources: LightResources,
    pool: SurfacePool,
}

impl Default for PointLight2D {
    fn default() -> Self {
        Self::from_spec(&LightSpec::default())
    }
}

impl PointLight2D {
    /// Light with default settings, no mesh and the built-in shadow shader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Light configured from a scene file entry.
    pub fn from_spec(spec: &LightSpec) -> Self {
        Self {
            config: spec.config.clone(),
            authoring: spec.authoring.clone(),
            transform: spec.transform,
            ortho_size: spec.ortho_size,
            layer: spec.layer,
            mesh: None,
            light_material: None,
            shadow_shader: Some(ShaderRef::new(SHADOW_SHADER)),
            mode: RuntimeMode::default(),
            resources: LightResources::default(),
            pool: SurfacePool::new(),
        }
    }

    /// Assign the light mesh and its material.
    pub fn with_mesh(mut self, mesh: MeshId, material: MaterialId) -> Self {
        self.mesh = Some(mesh);
        self.light_material = Some(material);
        self
    }

    /// Persistent resources created so far.
    pub fn resources(&self) -> &LightResources {
        &self.resources
    }

    /// Per-frame surface pool.
    pub fn pool(&self) -> &SurfacePool {
        &self.pool
    }

    /// Output texture, once a frame has been rendered.
    pub fn output_texture(&self) -> Option<SurfaceId> {
        self.resources.output
    }

    /// Falloff lookup, once baked.
    pub fn falloff_lookup(&self) -> Option<&FalloffLookup> {
        self.resources.lookup.as_ref()
    }

    /// The capture camera for the light's current placement.
    pub fn camera(&self) -> OrthoCamera {
        OrthoCamera::for_light(&self.transform, self.ortho_size, self.layer)
    }

    /// Run the whole frame: capture, distance-field pipeline, resolve, blur and the mesh draw.
    ///
    /// Pooled surfaces are always released before returning, also on error.
    #[tracing::instrument(level = "debug", skip_all, fields(resolution = self.config.resolution))]
    pub fn render_frame<B: ShadowBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> UmbraResult<LightFrame> {
        if self.mesh.is_none() || self.light_material.is_none() {
            return Err(UmbraError::config("light mesh or light material is not assigned"));
        }
        if self.mode == RuntimeMode::Authoring {
            self.refresh_falloff(backend)?;
        }

        self.config.sanitize();
        let resolution = self.config.normalized_resolution();

        let output = self.ensure_output(backend, resolution)?;
        let falloff_tex = self.ensure_falloff_texture(backend)?;
        self.ensure_shadow_material(backend)?;

        let material = self
            .resources
            .shadow_material
            .as_mut()
            .ok_or_else(|| UmbraError::config("shadow material missing after ensure"))?;
        bind_shadow_params(material, &self.config, falloff_tex);

        let pipeline = ShadowPipeline {
            material,
            state: self.config.render_state(),
            resolution,
            blur_iterations: self.config.blur_iterations,
        };
        let mut camera = OrthoCamera::for_light(&self.transform, self.ortho_size, self.layer);
        let mut scope = self.pool.scope(backend);
        let report = pipeline.run(&mut scope, &mut camera, output)?;
        scope.finish()?;

        let draw = compose_light(
            backend,
            self.mesh,
            self.light_material,
            &self.transform,
            &camera,
            self.layer,
            output,
        )?;
        Ok(LightFrame {
            output,
            report,
            draw,
        })
    }

    /// Re-bake the falloff lookup from the authoring inputs and upload it.
    pub fn recompute_falloff<B: ShadowBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> UmbraResult<()> {
        self.resources.lookup = Some(self.authoring.bake());
        self.resources.uploaded = None;
        self.ensure_falloff_texture(backend)?;
        Ok(())
    }

    /// Re-bake only when the authoring inputs changed since the last bake.
    fn refresh_falloff<B: ShadowBackend + ?Sized>(&mut self, backend: &mut B) -> UmbraResult<()> {
        let current = self.authoring.fingerprint();
        let baked = self.resources.lookup.as_ref().map(FalloffLookup::fingerprint);
        if baked != Some(current) {
            self.recompute_falloff(backend)?;
        }
        Ok(())
    }

    /// Release every persistent resource and the pool. Safe to call repeatedly.
    pub fn teardown<B: ShadowBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        mode: ReclaimMode,
    ) -> UmbraResult<()> {
        let mut results = Vec::new();
        if let Some(id) = self.resources.output.take() {
            results.push(backend.reclaim(Resource::Surface(id), mode));
        }
        if let Some(id) = self.resources.falloff_tex.take() {
            results.push(backend.reclaim(Resource::Surface(id), mode));
        }
        self.resources.uploaded = None;
        if let Some(material) = self.resources.shadow_material.take() {
            results.push(backend.reclaim(Resource::Material(material.id), mode));
        }
        results.push(self.pool.release_all(backend));
        results.into_iter().collect()
    }

    /// Output texture at `resolution`, recreated when the size changed or the handle went stale.
    pub fn ensure_output<B: ShadowBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        resolution: u32,
    ) -> UmbraResult<SurfaceId> {
        if let Some(id) = self.resources.output {
            match backend.surface_desc(id) {
                Some(desc) if desc.width == resolution && desc.height == resolution => {
                    return Ok(id);
                }
                Some(_) => {
                    self.resources.output = None;
                    backend.reclaim(Resource::Surface(id), ReclaimMode::Immediate)?;
                }
                None => self.resources.output = None,
            }
        }
        let desc = SurfaceDesc::color(resolution, resolution).with_filter(FilterMode::Bilinear);
        let id = backend.create_texture(&desc)?;
        tracing::debug!(?id, resolution, "created light output texture");
        self.resources.output = Some(id);
        Ok(id)
    }

    /// Falloff texture holding the current lookup. Bakes on first use; uploads when stale.
    pub fn ensure_falloff_texture<B: ShadowBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> UmbraResult<SurfaceId> {
        let lookup = self
            .resources
            .lookup
            .get_or_insert_with(|| self.authoring.bake());
        let fingerprint = lookup.fingerprint();

        let id = match self.resources.falloff_tex {
            Some(id) if backend.surface_desc(id).is_some() => id,
            _ => {
                let desc = SurfaceDesc::color(FALLOFF_SAMPLES as u32, 1)
                    .with_filter(FilterMode::Bilinear);
                let id = backend.create_texture(&desc)?;
                tracing::debug!(?id, "created falloff texture");
                self.resources.falloff_tex = Some(id);
                self.resources.uploaded = None;
                id
            }
        };

        if self.resources.uploaded != Some(fingerprint) {
            backend.upload_texels(id, lookup.samples())?;
            self.resources.uploaded = Some(fingerprint);
            tracing::debug!(?id, fingerprint, "uploaded falloff lookup");
        }
        Ok(id)
    }

    /// Shadow material instance, created from `shadow_shader` on first use.
    pub fn ensure_shadow_material<B: ShadowBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> UmbraResult<MaterialId> {
        if let Some(m) = &self.resources.shadow_material {
            return Ok(m.id);
        }
        let shader = self
            .shadow_shader
            .clone()
            .ok_or_else(|| UmbraError::config("shadow shader is not assigned"))?;
        let id = backend.create_material(&shader)?;
        tracing::debug!(?id, shader = shader.name(), "created shadow material");
        self.resources.shadow_material = Some(Material::new(id, shader));
        Ok(id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/light/point_light.rs"]
mod tests;
