use crate::{
    foundation::error::UmbraResult,
    render::{backend::ShadowBackend, camera::OrthoCamera, pool::PoolScope, surface::SurfaceId},
};

/// Render the occluders' alpha, as seen from the light, into a fresh `resolution`-square surface.
///
/// The camera only targets the surface while rendering; its target is restored to `None`
/// afterwards, including when the backend fails.
#[tracing::instrument(level = "debug", skip(scope, camera))]
pub fn capture_occluders<B: ShadowBackend + ?Sized>(
    scope: &mut PoolScope<'_, B>,
    camera: &mut OrthoCamera,
    resolution: u32,
) -> UmbraResult<SurfaceId> {
    let shadow_map = scope.acquire(resolution, resolution)?;

    let previous = camera.target.replace(shadow_map);
    let rendered = scope.backend().render_occluders(camera);
    camera.target = previous;

    rendered.map(|()| shadow_map)
}

#[cfg(test)]
#[path = "../../tests/unit/light/capture.rs"]
mod tests;
