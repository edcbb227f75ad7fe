use crate::{
    foundation::core::{Affine, Point, Rect, Rgba, Transform2D},
    render::surface::SurfaceId,
};

/// Layers a camera renders, as a bit set over layer indices `0..32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CullingMask(pub u32);

impl CullingMask {
    /// Every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Mask with `layer` removed. Layers beyond 31 leave it unchanged.
    pub fn without(self, layer: u32) -> Self {
        match 1u32.checked_shl(layer) {
            Some(bit) => Self(self.0 & !bit),
            None => self,
        }
    }

    /// Whether `layer` is rendered.
    pub fn contains(self, layer: u32) -> bool {
        1u32.checked_shl(layer).is_some_and(|bit| self.0 & bit != 0)
    }
}

/// Orthographic virtual camera in the 2D plane.
///
/// `ortho_size` is the half-height of the view volume in world units; views are square.
#[derive(Clone, Debug, PartialEq)]
pub struct OrthoCamera {
    /// Rigid camera-to-world transform.
    pub transform: Affine,
    /// Half-size of the view in world units.
    pub ortho_size: f64,
    /// Near clip plane.
    pub near: f64,
    /// Far clip plane.
    pub far: f64,
    /// Normalized viewport rectangle inside the target.
    pub viewport: Rect,
    /// Color the target is cleared to before rendering.
    pub clear_color: Rgba,
    /// Layers the camera renders.
    pub culling_mask: CullingMask,
    /// Target surface while a capture is in flight; `None` otherwise.
    pub target: Option<SurfaceId>,
}

impl OrthoCamera {
    /// Near plane of light capture cameras.
    pub const NEAR: f64 = -100.0;
    /// Far plane of light capture cameras.
    pub const FAR: f64 = 100.0;

    /// Camera co-located with a light: full viewport, transparent clear, and the light's own
    /// layer culled.
    pub fn for_light(light: &Transform2D, ortho_size: f64, light_layer: u32) -> Self {
        Self {
            transform: light.to_rigid_affine(),
            ortho_size,
            near: Self::NEAR,
            far: Self::FAR,
            viewport: Rect::new(0.0, 0.0, 1.0, 1.0),
            clear_color: Rgba::TRANSPARENT,
            culling_mask: CullingMask::ALL.without(light_layer),
            target: None,
        }
    }

    /// Width (and height) of the view in world units.
    pub fn extent(&self) -> f64 {
        self.ortho_size * 2.0
    }

    /// World position to pixel coordinates of a `width x height` target (y down).
    pub fn world_to_pixel(&self, width: u32, height: u32) -> Affine {
        let extent = self.extent().max(f64::EPSILON);
        let vp_w = self.viewport.width() * f64::from(width);
        let vp_h = self.viewport.height() * f64::from(height);
        let vp_x = self.viewport.x0 * f64::from(width);
        let vp_y = self.viewport.y0 * f64::from(height);

        // camera-local -> normalized [-1/2, 1/2] (y up) -> pixels (y down)
        let to_pixels = Affine::new([
            vp_w / extent,
            0.0,
            0.0,
            -vp_h / extent,
            vp_x + vp_w * 0.5,
            vp_y + vp_h * 0.5,
        ]);
        to_pixels * self.transform.inverse()
    }

    /// World position to normalized target coordinates in `[0, 1]^2` (y down).
    pub fn world_to_uv(&self, p: Point) -> Point {
        let px = self.world_to_pixel(1, 1) * p;
        Point::new(px.x, px.y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/camera.rs"]
mod tests;
