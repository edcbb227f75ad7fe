use std::collections::BTreeMap;

use crate::{
    foundation::core::{Affine, Rgba},
    render::surface::{MaterialId, MeshId, SurfaceId},
};

/// Parameter names understood by the shadow shader.
pub mod params {
    /// Texture drawn on the light mesh.
    pub const MAIN_TEX: &str = "main_tex";
    /// Falloff lookup read by the resolve pass.
    pub const FALLOFF_TEX: &str = "falloff_tex";
    /// Blur radius in pixels.
    pub const BLUR_SIZE: &str = "blur_size";
    /// Shadow bias.
    pub const SHADOW_OFFSET: &str = "shadow_offset";
    /// Color of shadowed pixels.
    pub const SHADOW_COLOR: &str = "shadow_color";
    /// Light tint.
    pub const COLOR_TINT: &str = "color_tint";
}

/// Named shader program a material is created from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ShaderRef(pub String);

impl ShaderRef {
    /// Reference the shader called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Shader name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Stage of the shadow shader, selected by ordinal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShadowPass {
    /// Pass 0.
    DistanceEncode,
    /// Pass 1.
    ParaboloidStretch,
    /// Pass 2.
    Downsample,
    /// Pass 3.
    Resolve,
    /// Pass 4.
    BlurVertical,
    /// Pass 5.
    BlurHorizontal,
}

impl ShadowPass {
    /// Every pass, in ordinal order.
    pub const ALL: [Self; 6] = [
        Self::DistanceEncode,
        Self::ParaboloidStretch,
        Self::Downsample,
        Self::Resolve,
        Self::BlurVertical,
        Self::BlurHorizontal,
    ];

    /// Pass index inside the shadow program.
    pub fn ordinal(self) -> u32 {
        match self {
            Self::DistanceEncode => 0,
            Self::ParaboloidStretch => 1,
            Self::Downsample => 2,
            Self::Resolve => 3,
            Self::BlurVertical => 4,
            Self::BlurHorizontal => 5,
        }
    }

    /// Pass for a program index, if any.
    pub fn from_ordinal(ordinal: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.ordinal() == ordinal)
    }

    /// True for passes 4 and 5.
    pub fn is_blur(self) -> bool {
        matches!(self, Self::BlurVertical | Self::BlurHorizontal)
    }
}

/// Shader feature switches for one pipeline invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RenderState {
    /// Distance-based penumbras (`ULTRA_QUALITY`).
    pub ultra_quality: bool,
    /// Keep shadow alpha independent of the falloff gradient (`SOLID_SHADOW`).
    pub solid_shadow: bool,
}

impl RenderState {
    /// Keyword enabling distance-based penumbras.
    pub const ULTRA_QUALITY: &'static str = "ULTRA_QUALITY";
    /// Keyword keeping shadow alpha out of the falloff.
    pub const SOLID_SHADOW: &'static str = "SOLID_SHADOW";

    /// Enabled keyword names, in a stable order.
    pub fn keywords(self) -> Vec<&'static str> {
        let mut out = Vec::with_capacity(2);
        if self.ultra_quality {
            out.push(Self::ULTRA_QUALITY);
        }
        if self.solid_shadow {
            out.push(Self::SOLID_SHADOW);
        }
        out
    }
}

/// Value bound to a shader parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    /// Scalar.
    Float(f32),
    /// Straight-alpha color.
    Color(Rgba),
    /// Surface handle.
    Texture(SurfaceId),
}

/// Named float/color/texture bindings. Used both as material state and as per-draw overrides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyBlock {
    values: BTreeMap<&'static str, ParamValue>,
}

impl PropertyBlock {
    /// Bind a float.
    pub fn set_float(&mut self, name: &'static str, v: f32) {
        self.values.insert(name, ParamValue::Float(v));
    }

    /// Bind a color.
    pub fn set_color(&mut self, name: &'static str, c: Rgba) {
        self.values.insert(name, ParamValue::Color(c));
    }

    /// Bind a texture.
    pub fn set_texture(&mut self, name: &'static str, id: SurfaceId) {
        self.values.insert(name, ParamValue::Texture(id));
    }

    /// Unbind `name`.
    pub fn remove(&mut self, name: &str) {
        self.values.remove(name);
    }

    /// Raw binding of `name`.
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.values.get(name).copied()
    }

    /// Float bound to `name`, if any.
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            ParamValue::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Color bound to `name`, if any.
    pub fn color(&self, name: &str) -> Option<Rgba> {
        match self.get(name)? {
            ParamValue::Color(c) => Some(c),
            _ => None,
        }
    }

    /// Texture bound to `name`, if any.
    pub fn texture(&self, name: &str) -> Option<SurfaceId> {
        match self.get(name)? {
            ParamValue::Texture(id) => Some(id),
            _ => None,
        }
    }

    /// True when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A backend program instance plus its currently bound parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Backend handle.
    pub id: MaterialId,
    /// Program the material was created from.
    pub shader: ShaderRef,
    /// Currently bound parameters.
    pub params: PropertyBlock,
}

impl Material {
    /// Material with no parameters bound.
    pub fn new(id: MaterialId, shader: ShaderRef) -> Self {
        Self {
            id,
            shader,
            params: PropertyBlock::default(),
        }
    }
}

/// One mesh draw request.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshDraw {
    /// Mesh to draw.
    pub mesh: MeshId,
    /// Mesh-to-world transform.
    pub transform: Affine,
    /// Material to draw with.
    pub material: MaterialId,
    /// Render layer.
    pub layer: u32,
    /// Per-draw parameter overrides.
    pub overrides: PropertyBlock,
}

#[cfg(test)]
#[path = "../../tests/unit/render/material.rs"]
mod tests;
