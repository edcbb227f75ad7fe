pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Straight (non-premultiplied) linear RGBA color with `f32` channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Rgba {
    /// All channels zero.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Color from straight channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Color from 8-bit channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let f = |c: u8| f32::from(c) / 255.0;
        Self::new(f(r), f(g), f(b), f(a))
    }

    /// Same color with alpha replaced.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Per-channel linear interpolation; `t = 0` gives `self`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let l = |a: f32, b: f32| a + (b - a) * t;
        Self::new(
            l(self.r, other.r),
            l(self.g, other.g),
            l(self.b, other.b),
            l(self.a, other.a),
        )
    }

    /// Channels as `[r, g, b, a]`.
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Quantize to 8-bit channels, clamping to `[0, 1]`.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub(crate) fn is_finite(self) -> bool {
        self.to_array().iter().all(|c| c.is_finite())
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// World transform of a light: translation, rotation and uniform scale.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Transform2D {
    /// World-space translation.
    pub translate: Vec2,
    /// Rotation in radians, counter-clockwise.
    pub rotation_rad: f64,
    /// Uniform scale.
    pub scale: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            rotation_rad: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform2D {
    /// Pure translation.
    pub fn from_translation(translate: Vec2) -> Self {
        Self {
            translate,
            ..Self::default()
        }
    }

    /// Same placement with `scale` replaced.
    pub fn with_scale(self, scale: f64) -> Self {
        Self { scale, ..self }
    }

    /// Local-to-world matrix. Canonical order: T(translate) * R(rot) * S(scale).
    pub fn to_affine(self) -> Affine {
        Affine::translate(self.translate) * Affine::rotate(self.rotation_rad) * Affine::scale(self.scale)
    }

    /// Rigid part only (no scale), used to place virtual cameras.
    pub fn to_rigid_affine(self) -> Affine {
        Affine::translate(self.translate) * Affine::rotate(self.rotation_rad)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
