//! Render one light frame with the software backend and write it as `target/demos/light_frame.png`.

use umbra::{
    CpuBackend, FalloffCurve, Gradient, LightConfig, Occluder, PointLight2D, ReclaimMode, Rgba,
    ShaderRef, ShadowBackend as _,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut backend = CpuBackend::default();
    backend.add_occluder(Occluder::rect(1.0, -0.5, 1.5, 0.5));
    backend.add_occluder(Occluder::rect(-2.5, 1.0, -1.5, 1.4).with_opacity(0.8));

    let mesh = backend.create_mesh();
    let light_material = backend.create_material(&ShaderRef::new("umbra/light"))?;

    let mut light = PointLight2D::new().with_mesh(mesh, light_material);
    light.ortho_size = 4.0;
    light.config = LightConfig {
        resolution: 256,
        blur_size: 1.5,
        blur_iterations: 2,
        high_quality_penumbras: true,
        tint: Rgba::new(1.0, 0.85, 0.6, 1.0),
        ..LightConfig::default()
    };
    light.authoring.gradient = Gradient::two_stop(Rgba::WHITE, Rgba::new(1.0, 0.5, 0.2, 1.0));
    light.authoring.curve = FalloffCurve::ease_in_out(0.0, 1.0, 1.0, 0.0);
    light.recompute_falloff(&mut backend)?;

    let frame = light.render_frame(&mut backend)?;
    let rgba = backend.read_rgba8(frame.output)?;

    let out = std::path::Path::new("target").join("demos");
    std::fs::create_dir_all(&out)?;
    let path = out.join("light_frame.png");
    image::save_buffer_with_format(
        &path,
        &rgba.data,
        rgba.width,
        rgba.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )?;

    light.teardown(&mut backend, ReclaimMode::Immediate)?;
    println!("wrote {}", path.display());
    Ok(())
}
