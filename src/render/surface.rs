/// Handle to a backend surface (pooled temporary or persistent texture).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

/// Handle to a backend material (program instance).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub u64);

/// Handle to a host-owned mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct MeshId(pub u64);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// Supported pixel formats for render surfaces.
pub enum PixelFormat {
    /// 8-bit unsigned normalized RGBA; the backend default.
    #[default]
    Rgba8Unorm,
    /// 16-bit float RGBA.
    Rgba16Float,
    /// 32-bit float RGBA.
    Rgba32Float,
}

impl PixelFormat {
    /// Bytes per color pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8Unorm => 4,
            Self::Rgba16Float => 8,
            Self::Rgba32Float => 16,
        }
    }
}

/// Texture filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Nearest texel.
    #[default]
    Point,
    /// Bilinear interpolation of the four nearest texels.
    Bilinear,
}

/// Addressing outside `[0, 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Clamp to the edge texel.
    #[default]
    Clamp,
    /// Tile.
    Repeat,
}

/// Surface declaration: dimensions, format and sampler state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Depth buffer bits; `0` for color-only surfaces.
    pub depth_bits: u32,
    /// Color format.
    pub format: PixelFormat,
    /// Sampling filter.
    pub filter: FilterMode,
    /// Addressing mode.
    pub wrap: WrapMode,
}

impl SurfaceDesc {
    /// Color-only surface with the default format, point filtering and clamp addressing.
    pub fn color(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth_bits: 0,
            format: PixelFormat::default(),
            filter: FilterMode::Point,
            wrap: WrapMode::Clamp,
        }
    }

    /// Same surface with `format`.
    pub fn with_format(self, format: PixelFormat) -> Self {
        Self { format, ..self }
    }

    /// Same surface with `filter`.
    pub fn with_filter(self, filter: FilterMode) -> Self {
        Self { filter, ..self }
    }

    /// Bytes of color and depth storage.
    pub fn byte_len(&self) -> usize {
        let px = (self.width as usize).saturating_mul(self.height as usize);
        let color = px.saturating_mul(self.format.bytes_per_pixel());
        let depth = px.saturating_mul(self.depth_bits.div_ceil(8) as usize);
        color.saturating_add(depth)
    }
}

/// Anything a light owns on the backend and must give back on teardown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    /// A surface from [`ShadowBackend::create_texture`](crate::ShadowBackend::create_texture).
    Surface(SurfaceId),
    /// A material from [`ShadowBackend::create_material`](crate::ShadowBackend::create_material).
    Material(MaterialId),
}

/// How a resource is given back to the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReclaimMode {
    /// Free synchronously (authoring contexts).
    #[default]
    Immediate,
    /// Queue for release at a safe point chosen by the backend (running contexts).
    Deferred,
}
