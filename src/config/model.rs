use std::path::Path;

use crate::{
    cpu::scene::Occluder,
    falloff::lookup::FalloffAuthoring,
    foundation::{
        core::{BezPath, Rgba, Transform2D},
        error::{UmbraError, UmbraResult},
        math::normalize_resolution,
    },
    render::material::RenderState,
};

/// Upper bound of [`LightConfig::shadow_bias`].
pub const MAX_SHADOW_BIAS: f32 = 0.1;
/// Upper bound of [`LightConfig::blur_size`], in pixels at the reference resolution.
pub const MAX_BLUR_SIZE: f32 = 10.0;
/// Upper bound of [`LightConfig::blur_iterations`].
pub const MAX_BLUR_ITERATIONS: u32 = 8;

/// Reference resolution the blur size is expressed against.
pub const BLUR_REFERENCE_RESOLUTION: f32 = 512.0;

/// User-facing shadow settings of one light.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Offset subtracted from the pixel distance before the occluder compare.
    pub shadow_bias: f32,
    /// Blur radius in pixels at [`BLUR_REFERENCE_RESOLUTION`].
    pub blur_size: f32,
    /// Horizontal plus vertical blur rounds; `0` disables the blur.
    pub blur_iterations: u32,
    /// Requested shadow-map resolution; see [`LightConfig::normalized_resolution`].
    pub resolution: u32,
    /// Distance-based penumbras (`ULTRA_QUALITY`).
    pub high_quality_penumbras: bool,
    /// Keep the falloff alpha out of the shadow alpha (`SOLID_SHADOW`).
    pub solid_shadow: bool,
    /// Multiplied into the falloff color of lit pixels.
    pub tint: Rgba,
    /// Color of fully shadowed pixels.
    pub shadow_color: Rgba,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            shadow_bias: 0.001,
            blur_size: 0.0,
            blur_iterations: 0,
            resolution: 512,
            high_quality_penumbras: false,
            solid_shadow: false,
            tint: Rgba::WHITE,
            shadow_color: Rgba::BLACK,
        }
    }
}

impl LightConfig {
    /// Clamp every control into its accepted range. Non-finite values fall back to the default.
    pub fn sanitize(&mut self) {
        let d = Self::default();
        self.shadow_bias = finite_or(self.shadow_bias, d.shadow_bias).clamp(0.0, MAX_SHADOW_BIAS);
        self.blur_size = finite_or(self.blur_size, d.blur_size).clamp(0.0, MAX_BLUR_SIZE);
        self.blur_iterations = self.blur_iterations.min(MAX_BLUR_ITERATIONS);
        if !self.tint.is_finite() {
            self.tint = d.tint;
        }
        if !self.shadow_color.is_finite() {
            self.shadow_color = d.shadow_color;
        }
    }

    /// Owned variant of [`LightConfig::sanitize`].
    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }

    /// Resolution actually used by the pipeline: next power of two, clamped to `[8, 2048]`.
    pub fn normalized_resolution(&self) -> u32 {
        normalize_resolution(self.resolution)
    }

    /// Blur size in pixels at the normalized resolution.
    pub fn scaled_blur_size(&self) -> f32 {
        self.blur_size * self.normalized_resolution() as f32 / BLUR_REFERENCE_RESOLUTION
    }

    /// Shader keywords implied by the quality flags.
    pub fn render_state(&self) -> RenderState {
        RenderState {
            ultra_quality: self.high_quality_penumbras,
            solid_shadow: self.solid_shadow,
        }
    }
}

fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}

/// Light placement and inputs inside a scene file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LightSpec {
    /// Shadow settings.
    pub config: LightConfig,
    /// World placement of the light.
    pub transform: Transform2D,
    /// Half-size of the light's capture camera in world units.
    pub ortho_size: f64,
    /// Render layer of the light mesh; culled from its own capture.
    pub layer: u32,
    /// Falloff gradient and curve.
    pub authoring: FalloffAuthoring,
}

impl Default for LightSpec {
    fn default() -> Self {
        Self {
            config: LightConfig::default(),
            transform: Transform2D::default(),
            ortho_size: 5.0,
            layer: 31,
            authoring: FalloffAuthoring::default(),
        }
    }
}

/// Occluder entry of a scene file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OccluderSpec {
    /// Shape as SVG path data, in world units.
    pub svg_path_d: String,
    /// Coverage multiplier in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Render layer, `0..32`.
    #[serde(default)]
    pub layer: u32,
}

fn default_opacity() -> f32 {
    1.0
}

/// A single light and the occluders around it.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneFile {
    /// The light to render.
    #[serde(default)]
    pub light: LightSpec,
    /// Shapes casting shadows.
    #[serde(default)]
    pub occluders: Vec<OccluderSpec>,
}

impl SceneFile {
    /// Parse and validate a scene from JSON text.
    pub fn from_json_str(s: &str) -> UmbraResult<Self> {
        let scene: Self = serde_json::from_str(s)
            .map_err(|e| UmbraError::serde(format!("scene json: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Read, parse and validate a scene file.
    pub fn from_path(path: impl AsRef<Path>) -> UmbraResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            UmbraError::config(format!("read scene '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> UmbraResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| UmbraError::serde(e.to_string()))
    }

    /// Check ranges and occluder geometry.
    pub fn validate(&self) -> UmbraResult<()> {
        let ortho = self.light.ortho_size;
        if !ortho.is_finite() || ortho <= 0.0 {
            return Err(UmbraError::validation("light ortho_size must be finite and > 0"));
        }
        if self.light.layer >= 32 {
            return Err(UmbraError::validation("light layer must be < 32"));
        }
        for (i, occ) in self.occluders.iter().enumerate() {
            if !(0.0..=1.0).contains(&occ.opacity) {
                return Err(UmbraError::validation(format!(
                    "occluder {i} opacity must be in [0, 1]"
                )));
            }
            if occ.layer >= 32 {
                return Err(UmbraError::validation(format!(
                    "occluder {i} layer must be < 32"
                )));
            }
            parse_path(&occ.svg_path_d)?;
        }
        Ok(())
    }

    /// Parsed occluder geometry, in file order.
    pub fn occluders(&self) -> UmbraResult<Vec<Occluder>> {
        self.occluders
            .iter()
            .map(|o| {
                Ok(Occluder {
                    path: parse_path(&o.svg_path_d)?,
                    opacity: o.opacity,
                    layer: o.layer,
                })
            })
            .collect()
    }
}

fn parse_path(d: &str) -> UmbraResult<BezPath> {
    BezPath::from_svg(d).map_err(|e| UmbraError::validation(format!("invalid svg_path_d: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
