use crate::{
    foundation::{
        core::{Affine, Transform2D},
        error::{UmbraError, UmbraResult},
    },
    render::{
        backend::ShadowBackend,
        camera::OrthoCamera,
        material::{MeshDraw, PropertyBlock, params},
        surface::{MaterialId, MeshId, SurfaceId},
    },
};

/// World transform of the light mesh: the light's placement with its scale replaced by the
/// capture camera's full extent.
pub fn light_mesh_transform(light: &Transform2D, camera: &OrthoCamera) -> Affine {
    light.with_scale(camera.extent()).to_affine()
}

/// Issue the single draw of the light mesh with the resolved shadow texture bound.
pub fn compose_light<B: ShadowBackend + ?Sized>(
    backend: &mut B,
    mesh: Option<MeshId>,
    material: Option<MaterialId>,
    light: &Transform2D,
    camera: &OrthoCamera,
    layer: u32,
    output: SurfaceId,
) -> UmbraResult<MeshDraw> {
    let mesh = mesh.ok_or_else(|| UmbraError::config("light mesh is not assigned"))?;
    let material = material.ok_or_else(|| UmbraError::config("light material is not assigned"))?;

    let mut overrides = PropertyBlock::default();
    overrides.set_texture(params::MAIN_TEX, output);

    let draw = MeshDraw {
        mesh,
        transform: light_mesh_transform(light, camera),
        material,
        layer,
        overrides,
    };
    backend.draw_mesh(&draw)?;
    Ok(draw)
}

#[cfg(test)]
#[path = "../../tests/unit/light/composer.rs"]
mod tests;
