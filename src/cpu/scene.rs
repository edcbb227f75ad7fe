use crate::{
    foundation::{
        core::{Affine, BezPath, Point},
        error::{UmbraError, UmbraResult},
    },
    render::camera::OrthoCamera,
};

/// A filled world-space shape that blocks light.
#[derive(Clone, Debug, PartialEq)]
pub struct Occluder {
    /// Outline in world units.
    pub path: BezPath,
    /// Coverage multiplier in `[0, 1]`.
    pub opacity: f32,
    /// Render layer, `0..32`.
    pub layer: u32,
}

impl Occluder {
    /// Opaque occluder on layer 0.
    pub fn new(path: BezPath) -> Self {
        Self {
            path,
            opacity: 1.0,
            layer: 0,
        }
    }

    /// Move to `layer`.
    pub fn with_layer(self, layer: u32) -> Self {
        Self { layer, ..self }
    }

    /// Set the coverage multiplier.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self { opacity, ..self }
    }

    /// Axis-aligned rectangle occluder.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let mut path = BezPath::new();
        path.move_to((x0, y0));
        path.line_to((x1, y0));
        path.line_to((x1, y1));
        path.line_to((x0, y1));
        path.close_path();
        Self::new(path)
    }
}

/// Coverage of the occluders visible to `camera`, one `f32` in `[0, 1]` per target pixel.
pub fn rasterize_coverage(
    occluders: &[Occluder],
    camera: &OrthoCamera,
    width: u32,
    height: u32,
) -> UmbraResult<Vec<f32>> {
    let width_u16: u16 = width
        .try_into()
        .map_err(|_| UmbraError::backend("occluder target width exceeds u16"))?;
    let height_u16: u16 = height
        .try_into()
        .map_err(|_| UmbraError::backend("occluder target height exceeds u16"))?;

    let px = (width as usize) * (height as usize);
    let visible: Vec<&Occluder> = occluders
        .iter()
        .filter(|o| camera.culling_mask.contains(o.layer) && o.opacity > 0.0)
        .collect();
    if visible.is_empty() {
        return Ok(vec![0.0; px]);
    }

    let world_to_pixel = camera.world_to_pixel(width, height);
    let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
    ctx.set_transform(affine_to_cpu(world_to_pixel));
    for occ in visible {
        let a = (occ.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, a));
        ctx.fill_path(&bezpath_to_cpu(&occ.path));
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap
        .data_as_u8_slice()
        .chunks_exact(4)
        .map(|px| f32::from(px[3]) / 255.0)
        .collect())
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/cpu/scene.rs"]
mod tests;
