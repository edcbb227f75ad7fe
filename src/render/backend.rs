use crate::{
    foundation::{core::Rgba, error::UmbraResult},
    render::{
        camera::OrthoCamera,
        material::{Material, MeshDraw, RenderState, ShaderRef, ShadowPass},
        surface::{MaterialId, ReclaimMode, Resource, SurfaceDesc, SurfaceId},
    },
};

/// A surface read back as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Rendering service the shadow pipeline is written against.
///
/// Calls are submitted in order and are fire-and-forget from the pipeline's point of view; a
/// backend may execute them asynchronously as long as it preserves submission order.
pub trait ShadowBackend {
    /// Allocate (or recycle) a short-lived surface. Fails with a resource error when the
    /// allocator is exhausted.
    fn acquire_temporary(&mut self, desc: &SurfaceDesc) -> UmbraResult<SurfaceId>;

    /// Return a surface obtained from [`ShadowBackend::acquire_temporary`].
    fn release_temporary(&mut self, id: SurfaceId) -> UmbraResult<()>;

    /// Create a persistent texture owned by the caller until reclaimed.
    fn create_texture(&mut self, desc: &SurfaceDesc) -> UmbraResult<SurfaceId>;

    /// Descriptor of a live surface, `None` for unknown or reclaimed handles.
    fn surface_desc(&self, id: SurfaceId) -> Option<SurfaceDesc>;

    /// Replace the texels of a persistent texture (row-major, `width * height` entries).
    fn upload_texels(&mut self, id: SurfaceId, texels: &[Rgba]) -> UmbraResult<()>;

    /// Create a program instance from a named shader.
    fn create_material(&mut self, shader: &ShaderRef) -> UmbraResult<MaterialId>;

    /// Render the occluder scene's alpha as seen by `camera` into `camera.target`.
    fn render_occluders(&mut self, camera: &OrthoCamera) -> UmbraResult<()>;

    /// Full-surface pass: sample `src`, run `pass` of `material` with `state`, write `dst`.
    fn blit(
        &mut self,
        src: SurfaceId,
        dst: SurfaceId,
        material: &Material,
        pass: ShadowPass,
        state: RenderState,
    ) -> UmbraResult<()>;

    /// Queue one mesh draw for the current frame.
    fn draw_mesh(&mut self, draw: &MeshDraw) -> UmbraResult<()>;

    /// Give a persistent resource back. Reclaiming an unknown handle is a no-op.
    fn reclaim(&mut self, resource: Resource, mode: ReclaimMode) -> UmbraResult<()>;
}
