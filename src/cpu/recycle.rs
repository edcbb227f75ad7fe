use std::collections::HashMap;

use crate::{
    cpu::image::FloatImage,
    foundation::{
        core::Rgba,
        error::{UmbraError, UmbraResult},
    },
    render::surface::{PixelFormat, SurfaceDesc},
};

/// Limits of the temporary-surface allocator.
#[derive(Debug, Clone, Copy)]
pub struct RecycleOpts {
    /// Maximum bytes retained across all buckets.
    pub max_retained_bytes: usize,
    /// Maximum number of retained images per `(w, h, format)` bucket.
    pub max_per_bucket: usize,
    /// Ceiling on bytes handed out and not yet returned. Exceeding it is resource exhaustion.
    pub max_live_bytes: usize,
}

impl Default for RecycleOpts {
    fn default() -> Self {
        Self {
            max_retained_bytes: 256 * 1024 * 1024,
            max_per_bucket: 8,
            max_live_bytes: 512 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct BucketKey {
    w: u32,
    h: u32,
    format: PixelFormat,
}

impl BucketKey {
    fn from_desc(desc: &SurfaceDesc) -> Self {
        Self {
            w: desc.width,
            h: desc.height,
            format: desc.format,
        }
    }
}

/// Allocation counters of an [`ImageRecycler`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecycleStats {
    /// Images waiting in buckets.
    pub retained_images: usize,
    /// Bytes held by retained images.
    pub retained_bytes: usize,
    /// Bytes of images currently handed out.
    pub live_bytes: usize,
    /// Fresh allocations.
    pub allocated_images: u64,
    /// Takes served from a bucket.
    pub reused_images: u64,
    /// Give-backs dropped because a cap was reached.
    pub dropped_on_release: u64,
}

/// Bounded recycler for temporary float images, bucketed by `(width, height, format)`.
#[derive(Debug)]
pub struct ImageRecycler {
    opts: RecycleOpts,
    stats: RecycleStats,
    buckets: HashMap<BucketKey, Vec<FloatImage>>,
}

impl ImageRecycler {
    /// Empty recycler with the given caps.
    pub fn new(opts: RecycleOpts) -> Self {
        Self {
            opts,
            stats: RecycleStats::default(),
            buckets: HashMap::new(),
        }
    }

    /// Current counters.
    pub fn stats(&self) -> RecycleStats {
        self.stats.clone()
    }

    /// Take a cleared image for `desc`, reusing a retained one when the bucket has any.
    pub fn take(&mut self, desc: &SurfaceDesc) -> UmbraResult<FloatImage> {
        if desc.width == 0 || desc.height == 0 {
            return Err(UmbraError::resource(format!(
                "cannot allocate a {}x{} surface",
                desc.width, desc.height
            )));
        }
        let bytes = desc.byte_len();
        let live = self.stats.live_bytes.saturating_add(bytes);
        if live > self.opts.max_live_bytes {
            return Err(UmbraError::resource(format!(
                "temporary surfaces would hold {live} bytes (limit {})",
                self.opts.max_live_bytes
            )));
        }

        let key = BucketKey::from_desc(desc);
        let image = match self.buckets.get_mut(&key).and_then(Vec::pop) {
            Some(mut img) => {
                self.stats.retained_images = self.stats.retained_images.saturating_sub(1);
                self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(bytes);
                self.stats.reused_images = self.stats.reused_images.saturating_add(1);
                img.configure(desc);
                img.fill(Rgba::TRANSPARENT);
                img
            }
            None => {
                self.stats.allocated_images = self.stats.allocated_images.saturating_add(1);
                FloatImage::new(desc)
            }
        };
        self.stats.live_bytes = live;
        Ok(image)
    }

    /// Return an image taken with `desc`. It is retained if the caps allow, dropped otherwise.
    pub fn give_back(&mut self, desc: &SurfaceDesc, image: FloatImage) {
        let bytes = desc.byte_len();
        self.stats.live_bytes = self.stats.live_bytes.saturating_sub(bytes);

        if self.opts.max_retained_bytes == 0 || self.opts.max_per_bucket == 0 {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        if self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_retained_bytes {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bucket = self.buckets.entry(BucketKey::from_desc(desc)).or_default();
        if bucket.len() >= self.opts.max_per_bucket {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        bucket.push(image);
        self.stats.retained_images = self.stats.retained_images.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cpu/recycle.rs"]
mod tests;
