//! Software kernels for the six passes of the shadow program.
//!
//! Every pass writes each destination texel independently, so rows are processed in parallel.

use rayon::prelude::*;

use crate::{
    cpu::image::FloatImage,
    foundation::{
        core::Rgba,
        error::{UmbraError, UmbraResult},
    },
    render::material::{RenderState, ShadowPass},
};

/// Captured alpha above this counts as an occluder.
pub const OCCLUDER_ALPHA_THRESHOLD: f32 = 0.5;

/// Strip rows averaged by the distance-based penumbra.
pub const PENUMBRA_TAPS: i32 = 7;

/// Row spread (in normalized strip height) per unit of `pixel distance - occluder distance`.
pub const PENUMBRA_SPREAD: f32 = 0.1;

/// Bound parameters a pass reads besides its source surface.
#[derive(Clone, Copy, Debug)]
pub struct PassParams<'a> {
    /// Bound falloff lookup; required by the resolve pass.
    pub falloff: Option<&'a FloatImage>,
    /// Blur radius in pixels.
    pub blur_size: f32,
    /// Shadow bias.
    pub bias: f32,
    /// Color of shadowed pixels.
    pub shadow_color: Rgba,
    /// Light tint.
    pub tint: Rgba,
}

impl Default for PassParams<'_> {
    fn default() -> Self {
        Self {
            falloff: None,
            blur_size: 0.0,
            bias: 0.0,
            shadow_color: Rgba::BLACK,
            tint: Rgba::WHITE,
        }
    }
}

/// Run one pass of the shadow program from `src` into `dst`.
#[tracing::instrument(level = "trace", skip(src, dst, params))]
pub fn run_pass(
    pass: ShadowPass,
    state: RenderState,
    src: &FloatImage,
    dst: &mut FloatImage,
    params: &PassParams<'_>,
) -> UmbraResult<()> {
    match pass {
        ShadowPass::DistanceEncode => {
            encode_distance(src, dst);
            Ok(())
        }
        ShadowPass::ParaboloidStretch => {
            stretch_paraboloid(src, dst);
            Ok(())
        }
        ShadowPass::Downsample => downsample_min(src, dst),
        ShadowPass::Resolve => {
            let falloff = params
                .falloff
                .ok_or_else(|| UmbraError::backend("resolve pass needs a bound falloff_tex"))?;
            resolve(src, dst, falloff, params, state);
            Ok(())
        }
        ShadowPass::BlurHorizontal => blur(src, dst, params.blur_size, Axis::Horizontal),
        ShadowPass::BlurVertical => blur(src, dst, params.blur_size, Axis::Vertical),
    }
}

fn pixel_uv(x: usize, y: usize, w: u32, h: u32) -> (f32, f32) {
    ((x as f32 + 0.5) / w as f32, (y as f32 + 0.5) / h as f32)
}

fn for_each_texel(dst: &mut FloatImage, f: impl Fn(usize, usize) -> Rgba + Sync) {
    let (w, h) = (dst.width() as usize, dst.height());
    if w == 0 || h == 0 {
        return;
    }
    dst.texels_mut()
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                *out = f(x, y);
            }
        });
}

fn gray(v: f32) -> Rgba {
    Rgba::new(v, v, v, 1.0)
}

/// Pass 0. Red holds the normalized distance to the center where there is an occluder, 1 elsewhere.
fn encode_distance(src: &FloatImage, dst: &mut FloatImage) {
    let (w, h) = (dst.width(), dst.height());
    for_each_texel(dst, |x, y| {
        let (u, v) = pixel_uv(x, y, w, h);
        let d = 2.0 * ((u - 0.5).powi(2) + (v - 0.5).powi(2)).sqrt();
        if src.sample(u, v).a > OCCLUDER_ALPHA_THRESHOLD {
            gray(d.min(1.0))
        } else {
            gray(1.0)
        }
    });
}

/// Unit direction for paraboloid parameter `s` in `[-1, 1]` on hemisphere `sign` (+1 or -1).
pub(crate) fn paraboloid_dir(s: f32, sign: f32) -> (f32, f32) {
    let s2 = s * s;
    (sign * (1.0 - s2) / (1.0 + s2), 2.0 * s / (1.0 + s2))
}

/// Inverse of [`paraboloid_dir`] for a non-zero offset `(px, py)`: `(column, s)`.
pub(crate) fn paraboloid_param(px: f32, py: f32) -> (usize, f32) {
    let len = (px * px + py * py).sqrt();
    let column = if px >= 0.0 { 0 } else { 1 };
    if len <= f32::EPSILON {
        return (column, 0.0);
    }
    (column, py / (px.abs() + len))
}

/// Pass 1. Left half: hemisphere `+x`; right half: `-x`. Column is radius, row is direction.
fn stretch_paraboloid(src: &FloatImage, dst: &mut FloatImage) {
    let (w, h) = (dst.width(), dst.height());
    for_each_texel(dst, |x, y| {
        let (u, v) = pixel_uv(x, y, w, h);
        let (sign, r) = if u < 0.5 {
            (1.0, u * 2.0)
        } else {
            (-1.0, (u - 0.5) * 2.0)
        };
        let (dx, dy) = paraboloid_dir(2.0 * v - 1.0, sign);
        gray(src.sample(0.5 + dx * r * 0.5, 0.5 + dy * r * 0.5).r)
    });
}

/// Pass 2. Each texel keeps the nearer of its two horizontal sources.
fn downsample_min(src: &FloatImage, dst: &mut FloatImage) -> UmbraResult<()> {
    if dst.width().saturating_mul(2) != src.width() || dst.height() != src.height() {
        return Err(UmbraError::backend(format!(
            "downsample {}x{} -> {}x{}: width must halve and height must match",
            src.width(),
            src.height(),
            dst.width(),
            dst.height()
        )));
    }
    for_each_texel(dst, |x, y| {
        let (x, y) = (x as i64, y as i64);
        gray(src.fetch(2 * x, y).r.min(src.fetch(2 * x + 1, y).r))
    });
    Ok(())
}

fn strip_distance(strip: &FloatImage, column: usize, v: f32) -> f32 {
    let row = (v * strip.height() as f32).floor() as i64;
    strip.fetch(column as i64, row).r
}

/// Pass 3. Shade the output from the occluder strip, falloff, shadow color and tint.
fn resolve(
    strip: &FloatImage,
    dst: &mut FloatImage,
    falloff: &FloatImage,
    params: &PassParams<'_>,
    state: RenderState,
) {
    let (w, h) = (dst.width(), dst.height());
    let lit = |d: f32, o: f32| if d - params.bias <= o { 1.0 } else { 0.0 };

    for_each_texel(dst, |x, y| {
        let (u, v) = pixel_uv(x, y, w, h);
        let (px, py) = (2.0 * u - 1.0, 2.0 * v - 1.0);
        let d = (px * px + py * py).sqrt();
        if d > 1.0 {
            return Rgba::TRANSPARENT;
        }

        let (column, s) = paraboloid_param(px, py);
        let row_v = (s + 1.0) * 0.5;
        let o = strip_distance(strip, column, row_v);

        let l = if state.ultra_quality {
            let spread = (d - o).max(0.0) * PENUMBRA_SPREAD;
            let half = (PENUMBRA_TAPS / 2) as f32;
            let sum: f32 = (0..PENUMBRA_TAPS)
                .map(|k| {
                    let offset = (k as f32 - half) / half * spread;
                    lit(d, strip_distance(strip, column, row_v + offset))
                })
                .sum();
            sum / PENUMBRA_TAPS as f32
        } else {
            lit(d, o)
        };

        let f = falloff.sample(d, 0.5);
        let light = Rgba::new(
            f.r * params.tint.r,
            f.g * params.tint.g,
            f.b * params.tint.b,
            params.tint.a,
        );
        let shadow = params.shadow_color;
        if state.solid_shadow {
            let lit_rgb = Rgba::new(light.r * f.a, light.g * f.a, light.b * f.a, light.a);
            shadow.lerp(lit_rgb, l)
        } else {
            let c = shadow.lerp(light, l);
            c.with_alpha(c.a * f.a)
        }
    });
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Normalized Gaussian weights for `-radius..=radius`.
pub(crate) fn gaussian_kernel(radius: u32, sigma: f32) -> Vec<f32> {
    if radius == 0 || !sigma.is_finite() || sigma <= 0.0 {
        return vec![1.0];
    }
    let r = radius as i32;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f32> = (-r..=r)
        .map(|i| {
            let x = i as f32;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Passes 4 and 5: one separable Gaussian direction, accumulated premultiplied.
fn blur(src: &FloatImage, dst: &mut FloatImage, blur_size: f32, axis: Axis) -> UmbraResult<()> {
    if src.width() != dst.width() || src.height() != dst.height() {
        return Err(UmbraError::backend("blur source and target sizes differ"));
    }
    let size = if blur_size.is_finite() { blur_size.max(0.0) } else { 0.0 };
    let kernel = gaussian_kernel(size.ceil() as u32, size * 0.5);
    let radius = (kernel.len() / 2) as i64;

    for_each_texel(dst, |x, y| {
        let (x, y) = (x as i64, y as i64);
        let mut acc = [0.0f32; 4];
        for (ki, &kw) in kernel.iter().enumerate() {
            let k = ki as i64 - radius;
            let c = match axis {
                Axis::Horizontal => src.fetch(x + k, y),
                Axis::Vertical => src.fetch(x, y + k),
            };
            acc[0] += kw * c.r * c.a;
            acc[1] += kw * c.g * c.a;
            acc[2] += kw * c.b * c.a;
            acc[3] += kw * c.a;
        }
        if acc[3] <= f32::EPSILON {
            return Rgba::TRANSPARENT;
        }
        Rgba::new(acc[0] / acc[3], acc[1] / acc[3], acc[2] / acc[3], acc[3])
    });
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/cpu/shaders.rs"]
mod tests;
