//! Umbra renders 2D point-light shadows with a distance-field shadow map.
//!
//! Each frame a [`PointLight2D`] captures the occluders around it from an orthographic camera,
//! turns the capture into a radial distance field, folds it into a dual-paraboloid 1D strip and
//! resolves the strip into a shadowed light texture that is drawn on the light mesh:
//!
//! - configure a light with [`LightConfig`] and the falloff inputs in [`FalloffAuthoring`]
//! - implement [`ShadowBackend`] for your renderer, or use the software [`CpuBackend`]
//! - call [`PointLight2D::render_frame`] once per frame and [`PointLight2D::teardown`] on disable
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod config;
pub(crate) mod cpu;
pub(crate) mod falloff;
pub(crate) mod light;
pub(crate) mod render;

#[cfg(test)]
#[path = "../tests/unit/mock_backend.rs"]
pub(crate) mod mock_backend;

pub use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba, Transform2D, Vec2};
pub use crate::foundation::error::{UmbraError, UmbraResult};
pub use crate::foundation::math::{
    MAX_SHADOW_MAP_SIZE, MIN_SHADOW_MAP_SIZE, downsample_steps, next_power_of_two,
    normalize_resolution,
};

pub use crate::config::model::{
    BLUR_REFERENCE_RESOLUTION, LightConfig, LightSpec, MAX_BLUR_ITERATIONS, MAX_BLUR_SIZE,
    MAX_SHADOW_BIAS, OccluderSpec, SceneFile,
};
pub use crate::cpu::backend::{CpuBackend, CpuBackendStats};
pub use crate::cpu::image::FloatImage;
pub use crate::cpu::recycle::{RecycleOpts, RecycleStats};
pub use crate::cpu::scene::Occluder;
pub use crate::falloff::curve::{CurveKey, FalloffCurve};
pub use crate::falloff::gradient::{AlphaKey, ColorKey, Gradient, GradientMode, MAX_GRADIENT_KEYS};
pub use crate::falloff::lookup::{FALLOFF_SAMPLES, FalloffAuthoring, FalloffLookup, bake};
pub use crate::light::capture::capture_occluders;
pub use crate::light::composer::{compose_light, light_mesh_transform};
pub use crate::light::pipeline::{PipelineReport, ShadowPipeline, bind_shadow_params};
pub use crate::light::point_light::{
    LightFrame, LightResources, PointLight2D, RuntimeMode, SHADOW_SHADER,
};
pub use crate::render::backend::{FrameRGBA, ShadowBackend};
pub use crate::render::camera::{CullingMask, OrthoCamera};
pub use crate::render::material::{
    Material, MeshDraw, ParamValue, PropertyBlock, RenderState, ShaderRef, ShadowPass, params,
};
pub use crate::render::pool::{PoolScope, SurfacePool, SurfacePoolStats};
pub use crate::render::surface::{
    FilterMode, MaterialId, MeshId, PixelFormat, ReclaimMode, Resource, SurfaceDesc, SurfaceId,
    WrapMode,
};
