use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use umbra::ShadowBackend as _;

#[derive(Parser, Debug)]
#[command(name = "umbra", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one light frame and write the shadowed light texture as a PNG.
    Frame(FrameArgs),
    /// Bake the falloff lookup of a scene's light and write it as a 128x1 PNG.
    Falloff(FalloffArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Override the light's shadow-map resolution (rounded up to a power of two).
    #[arg(long)]
    resolution: Option<u32>,
}

#[derive(Parser, Debug)]
struct FalloffArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Falloff(args) => cmd_falloff(args),
    }
}

fn read_scene(path: &Path) -> anyhow::Result<umbra::SceneFile> {
    umbra::SceneFile::from_path(path).with_context(|| format!("load scene '{}'", path.display()))
}

fn write_png(path: &Path, data: &[u8], width: u32, height: u32) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        data,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.in_path)?;

    let mut backend = umbra::CpuBackend::default();
    backend.set_occluders(scene.occluders()?);
    let mesh = backend.create_mesh();
    let light_material = backend.create_material(&umbra::ShaderRef::new("umbra/light"))?;

    let mut light = umbra::PointLight2D::from_spec(&scene.light).with_mesh(mesh, light_material);
    if let Some(resolution) = args.resolution {
        light.config.resolution = resolution;
    }

    let frame = light.render_frame(&mut backend)?;
    let rgba = backend.read_rgba8(frame.output)?;
    write_png(&args.out, &rgba.data, rgba.width, rgba.height)?;
    light.teardown(&mut backend, umbra::ReclaimMode::Immediate)?;

    eprintln!(
        "wrote {} ({}x{}, {} downsample steps, {} blur passes)",
        args.out.display(),
        rgba.width,
        rgba.height,
        frame.report.downsample_steps,
        frame.report.blur_passes
    );
    Ok(())
}

fn cmd_falloff(args: FalloffArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.in_path)?;
    let lookup = scene.light.authoring.bake();
    write_png(
        &args.out,
        &lookup.to_rgba8(),
        umbra::FALLOFF_SAMPLES as u32,
        1,
    )?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
