use crate::{
    foundation::{
        core::Rgba,
        error::{UmbraError, UmbraResult},
    },
    render::surface::{FilterMode, SurfaceDesc, WrapMode},
};

/// Straight-alpha `f32` RGBA image with its sampler state.
///
/// CPU surfaces keep full float precision whatever their [`crate::PixelFormat`] says.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatImage {
    width: u32,
    height: u32,
    /// Sampling filter.
    pub filter: FilterMode,
    /// Addressing outside `[0, 1)`.
    pub wrap: WrapMode,
    texels: Vec<Rgba>,
}

impl FloatImage {
    /// Transparent image sized and configured from `desc`.
    pub fn new(desc: &SurfaceDesc) -> Self {
        Self {
            width: desc.width,
            height: desc.height,
            filter: desc.filter,
            wrap: desc.wrap,
            texels: vec![Rgba::TRANSPARENT; pixel_count(desc.width, desc.height)],
        }
    }

    /// Wrap existing texels (row-major). Point filtering, clamp addressing.
    pub fn from_texels(width: u32, height: u32, texels: Vec<Rgba>) -> UmbraResult<Self> {
        if texels.len() != pixel_count(width, height) {
            return Err(UmbraError::backend(format!(
                "expected {} texels for {width}x{height}, got {}",
                pixel_count(width, height),
                texels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            filter: FilterMode::Point,
            wrap: WrapMode::Clamp,
            texels,
        })
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major texels.
    pub fn texels(&self) -> &[Rgba] {
        &self.texels
    }

    /// Mutable row-major texels.
    pub fn texels_mut(&mut self) -> &mut [Rgba] {
        &mut self.texels
    }

    /// Set every texel to `c`.
    pub fn fill(&mut self, c: Rgba) {
        self.texels.fill(c);
    }

    /// Reset sampler state for reuse under a new descriptor of the same size.
    pub(crate) fn configure(&mut self, desc: &SurfaceDesc) {
        self.filter = desc.filter;
        self.wrap = desc.wrap;
    }

    /// Texel at integer coordinates, addressed through the wrap mode.
    pub fn fetch(&self, x: i64, y: i64) -> Rgba {
        if self.texels.is_empty() {
            return Rgba::TRANSPARENT;
        }
        let x = wrap_index(x, self.width, self.wrap);
        let y = wrap_index(y, self.height, self.wrap);
        self.texels[y * self.width as usize + x]
    }

    /// Sample at normalized coordinates (`(0, 0)` is the top-left corner).
    pub fn sample(&self, u: f32, v: f32) -> Rgba {
        let px = u * self.width as f32;
        let py = v * self.height as f32;
        match self.filter {
            FilterMode::Point => self.fetch(px.floor() as i64, py.floor() as i64),
            FilterMode::Bilinear => {
                let fx = px - 0.5;
                let fy = py - 0.5;
                let x0 = fx.floor();
                let y0 = fy.floor();
                let tx = fx - x0;
                let ty = fy - y0;
                let (x0, y0) = (x0 as i64, y0 as i64);
                let top = self.fetch(x0, y0).lerp(self.fetch(x0 + 1, y0), tx);
                let bottom = self.fetch(x0, y0 + 1).lerp(self.fetch(x0 + 1, y0 + 1), tx);
                top.lerp(bottom, ty)
            }
        }
    }

    /// Straight-alpha RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.texels.iter().flat_map(|c| c.to_rgba8()).collect()
    }
}

fn pixel_count(width: u32, height: u32) -> usize {
    (width as usize).saturating_mul(height as usize)
}

fn wrap_index(i: i64, len: u32, wrap: WrapMode) -> usize {
    let len = i64::from(len.max(1));
    let i = match wrap {
        WrapMode::Clamp => i.clamp(0, len - 1),
        WrapMode::Repeat => i.rem_euclid(len),
    };
    i as usize
}

#[cfg(test)]
#[path = "../../tests/unit/cpu/image.rs"]
mod tests;
