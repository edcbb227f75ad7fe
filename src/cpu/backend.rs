use std::collections::HashMap;

use crate::{
    cpu::{
        image::FloatImage,
        recycle::{ImageRecycler, RecycleOpts, RecycleStats},
        scene::{Occluder, rasterize_coverage},
        shaders::{PassParams, run_pass},
    },
    foundation::{
        core::Rgba,
        error::{UmbraError, UmbraResult},
    },
    light::point_light::SHADOW_SHADER,
    render::{
        backend::{FrameRGBA, ShadowBackend},
        camera::OrthoCamera,
        material::{Material, MeshDraw, RenderState, ShaderRef, ShadowPass, params},
        surface::{MaterialId, MeshId, ReclaimMode, Resource, SurfaceDesc, SurfaceId},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceKind {
    Temporary,
    Persistent,
}

#[derive(Debug)]
struct CpuSurface {
    desc: SurfaceDesc,
    kind: SurfaceKind,
    image: FloatImage,
}

/// Counters of a [`CpuBackend`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CpuBackendStats {
    /// Shadow passes executed.
    pub blits: u64,
    /// Occluder captures rendered.
    pub occluder_renders: u64,
    /// Mesh draws accepted.
    pub mesh_draws: u64,
    /// Temporary allocator counters.
    pub recycle: RecycleStats,
}

/// Software [`ShadowBackend`]: float surfaces, `vello_cpu` occluder rasterization and the shadow
/// passes as CPU kernels.
#[derive(Debug)]
pub struct CpuBackend {
    occluders: Vec<Occluder>,
    surfaces: HashMap<SurfaceId, CpuSurface>,
    materials: HashMap<MaterialId, ShaderRef>,
    meshes: Vec<MeshId>,
    draws: Vec<MeshDraw>,
    deferred: Vec<Resource>,
    recycler: ImageRecycler,
    next_id: u64,
    stats: CpuBackendStats,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new(RecycleOpts::default())
    }
}

impl CpuBackend {
    /// Empty backend whose temporaries are recycled under `opts`.
    pub fn new(opts: RecycleOpts) -> Self {
        Self {
            occluders: Vec::new(),
            surfaces: HashMap::new(),
            materials: HashMap::new(),
            meshes: Vec::new(),
            draws: Vec::new(),
            deferred: Vec::new(),
            recycler: ImageRecycler::new(opts),
            next_id: 0,
            stats: CpuBackendStats::default(),
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Current counters.
    pub fn stats(&self) -> CpuBackendStats {
        CpuBackendStats {
            recycle: self.recycler.stats(),
            ..self.stats.clone()
        }
    }

    /// Occluders visible to captures.
    pub fn occluders(&self) -> &[Occluder] {
        &self.occluders
    }

    /// Replace the occluder scene.
    pub fn set_occluders(&mut self, occluders: Vec<Occluder>) {
        self.occluders = occluders;
    }

    /// Add one occluder to the scene.
    pub fn add_occluder(&mut self, occluder: Occluder) {
        self.occluders.push(occluder);
    }

    /// Register a mesh handle (the light mesh is a unit quad centered on the origin).
    pub fn create_mesh(&mut self) -> MeshId {
        let id = MeshId(self.next_id());
        self.meshes.push(id);
        id
    }

    /// Draws submitted since the last [`CpuBackend::take_draws`].
    pub fn draws(&self) -> &[MeshDraw] {
        &self.draws
    }

    /// Drain the recorded draws.
    pub fn take_draws(&mut self) -> Vec<MeshDraw> {
        std::mem::take(&mut self.draws)
    }

    /// Temporaries currently handed out.
    pub fn temporary_count(&self) -> usize {
        self.surfaces
            .values()
            .filter(|s| s.kind == SurfaceKind::Temporary)
            .count()
    }

    /// Live persistent textures.
    pub fn persistent_count(&self) -> usize {
        self.surfaces
            .values()
            .filter(|s| s.kind == SurfaceKind::Persistent)
            .count()
    }

    /// Live materials.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Resources queued by deferred reclaims.
    pub fn pending_reclaims(&self) -> usize {
        self.deferred.len()
    }

    /// Free every resource queued with [`ReclaimMode::Deferred`]. Returns how many were freed.
    pub fn collect_deferred(&mut self) -> usize {
        let pending = std::mem::take(&mut self.deferred);
        pending
            .into_iter()
            .filter(|&r| self.free(r))
            .count()
    }

    /// Pixels of a live surface.
    pub fn image(&self, id: SurfaceId) -> Option<&FloatImage> {
        self.surfaces.get(&id).map(|s| &s.image)
    }

    /// Read a surface back as straight-alpha RGBA8.
    pub fn read_rgba8(&self, id: SurfaceId) -> UmbraResult<FrameRGBA> {
        let s = self.surface(id)?;
        Ok(FrameRGBA {
            width: s.desc.width,
            height: s.desc.height,
            data: s.image.to_rgba8(),
            premultiplied: false,
        })
    }

    fn surface(&self, id: SurfaceId) -> UmbraResult<&CpuSurface> {
        self.surfaces
            .get(&id)
            .ok_or_else(|| UmbraError::backend(format!("unknown surface {id:?}")))
    }

    fn free(&mut self, resource: Resource) -> bool {
        match resource {
            Resource::Surface(id) => match self.surfaces.get(&id).map(|s| s.kind) {
                Some(SurfaceKind::Persistent) => self.surfaces.remove(&id).is_some(),
                _ => false,
            },
            Resource::Material(id) => self.materials.remove(&id).is_some(),
        }
    }

    fn run_blit(
        &self,
        src: SurfaceId,
        target: &mut FloatImage,
        material: &Material,
        pass: ShadowPass,
        state: RenderState,
    ) -> UmbraResult<()> {
        let params = self.pass_params(material)?;
        let source = &self.surface(src)?.image;
        run_pass(pass, state, source, target, &params)
    }

    fn pass_params<'a>(&'a self, material: &Material) -> UmbraResult<PassParams<'a>> {
        let p = &material.params;
        let falloff = match p.texture(params::FALLOFF_TEX) {
            Some(id) => Some(&self.surface(id)?.image),
            None => None,
        };
        let defaults = PassParams::default();
        Ok(PassParams {
            falloff,
            blur_size: p.float(params::BLUR_SIZE).unwrap_or(defaults.blur_size),
            bias: p.float(params::SHADOW_OFFSET).unwrap_or(defaults.bias),
            shadow_color: p.color(params::SHADOW_COLOR).unwrap_or(defaults.shadow_color),
            tint: p.color(params::COLOR_TINT).unwrap_or(defaults.tint),
        })
    }
}

impl ShadowBackend for CpuBackend {
    fn acquire_temporary(&mut self, desc: &SurfaceDesc) -> UmbraResult<SurfaceId> {
        let image = self.recycler.take(desc)?;
        let id = SurfaceId(self.next_id());
        self.surfaces.insert(
            id,
            CpuSurface {
                desc: *desc,
                kind: SurfaceKind::Temporary,
                image,
            },
        );
        Ok(id)
    }

    fn release_temporary(&mut self, id: SurfaceId) -> UmbraResult<()> {
        match self.surfaces.get(&id).map(|s| s.kind) {
            Some(SurfaceKind::Temporary) => {}
            Some(SurfaceKind::Persistent) => {
                return Err(UmbraError::backend(format!(
                    "surface {id:?} is persistent; reclaim it instead"
                )));
            }
            None => {
                return Err(UmbraError::backend(format!(
                    "surface {id:?} is not a live temporary"
                )));
            }
        }
        if let Some(s) = self.surfaces.remove(&id) {
            self.recycler.give_back(&s.desc, s.image);
        }
        Ok(())
    }

    fn create_texture(&mut self, desc: &SurfaceDesc) -> UmbraResult<SurfaceId> {
        if desc.width == 0 || desc.height == 0 {
            return Err(UmbraError::resource(format!(
                "cannot create a {}x{} texture",
                desc.width, desc.height
            )));
        }
        let id = SurfaceId(self.next_id());
        self.surfaces.insert(
            id,
            CpuSurface {
                desc: *desc,
                kind: SurfaceKind::Persistent,
                image: FloatImage::new(desc),
            },
        );
        Ok(id)
    }

    fn surface_desc(&self, id: SurfaceId) -> Option<SurfaceDesc> {
        self.surfaces.get(&id).map(|s| s.desc)
    }

    fn upload_texels(&mut self, id: SurfaceId, texels: &[Rgba]) -> UmbraResult<()> {
        let s = self
            .surfaces
            .get_mut(&id)
            .ok_or_else(|| UmbraError::backend(format!("unknown surface {id:?}")))?;
        if texels.len() != s.image.texels().len() {
            return Err(UmbraError::backend(format!(
                "upload of {} texels into a {}x{} surface",
                texels.len(),
                s.desc.width,
                s.desc.height
            )));
        }
        s.image.texels_mut().copy_from_slice(texels);
        Ok(())
    }

    fn create_material(&mut self, shader: &ShaderRef) -> UmbraResult<MaterialId> {
        if shader.name().trim().is_empty() {
            return Err(UmbraError::config("shader name must be non-empty"));
        }
        let id = MaterialId(self.next_id());
        self.materials.insert(id, shader.clone());
        Ok(id)
    }

    #[tracing::instrument(level = "trace", skip_all, fields(target = ?camera.target))]
    fn render_occluders(&mut self, camera: &OrthoCamera) -> UmbraResult<()> {
        let target = camera
            .target
            .ok_or_else(|| UmbraError::backend("capture camera has no target surface"))?;
        let (w, h) = {
            let s = self.surface(target)?;
            (s.desc.width, s.desc.height)
        };
        let coverage = rasterize_coverage(&self.occluders, camera, w, h)?;

        let s = self
            .surfaces
            .get_mut(&target)
            .ok_or_else(|| UmbraError::backend(format!("unknown surface {target:?}")))?;
        let clear = camera.clear_color;
        for (out, &cov) in s.image.texels_mut().iter_mut().zip(&coverage) {
            *out = clear.lerp(Rgba::WHITE, cov);
        }
        self.stats.occluder_renders += 1;
        Ok(())
    }

    fn blit(
        &mut self,
        src: SurfaceId,
        dst: SurfaceId,
        material: &Material,
        pass: ShadowPass,
        state: RenderState,
    ) -> UmbraResult<()> {
        if src == dst {
            return Err(UmbraError::backend("blit source and target must differ"));
        }
        match self.materials.get(&material.id) {
            Some(shader) if shader.name() == SHADOW_SHADER => {}
            Some(shader) => {
                return Err(UmbraError::config(format!(
                    "shader '{}' has no shadow passes",
                    shader.name()
                )));
            }
            None => {
                return Err(UmbraError::backend(format!(
                    "unknown material {:?}",
                    material.id
                )));
            }
        }

        // Take the target out so the source and bound textures can be borrowed alongside it.
        let mut target = self
            .surfaces
            .remove(&dst)
            .ok_or_else(|| UmbraError::backend(format!("unknown surface {dst:?}")))?;
        let result = self.run_blit(src, &mut target.image, material, pass, state);
        self.surfaces.insert(dst, target);
        result?;
        self.stats.blits += 1;
        Ok(())
    }

    fn draw_mesh(&mut self, draw: &MeshDraw) -> UmbraResult<()> {
        if !self.meshes.contains(&draw.mesh) {
            return Err(UmbraError::config(format!("unknown mesh {:?}", draw.mesh)));
        }
        if !self.materials.contains_key(&draw.material) {
            return Err(UmbraError::config(format!(
                "unknown material {:?}",
                draw.material
            )));
        }
        self.draws.push(draw.clone());
        self.stats.mesh_draws += 1;
        Ok(())
    }

    fn reclaim(&mut self, resource: Resource, mode: ReclaimMode) -> UmbraResult<()> {
        match mode {
            ReclaimMode::Immediate => {
                self.free(resource);
            }
            ReclaimMode::Deferred => {
                if !self.deferred.contains(&resource) {
                    self.deferred.push(resource);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cpu/backend.rs"]
mod tests;
