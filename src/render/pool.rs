use crate::{
    foundation::error::UmbraResult,
    render::{
        backend::ShadowBackend,
        surface::{FilterMode, PixelFormat, SurfaceDesc, SurfaceId, WrapMode},
    },
};

/// Lifetime counters of a [`SurfacePool`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SurfacePoolStats {
    /// Surfaces acquired since the pool was created.
    pub acquired: u64,
    /// Surfaces handed back to the allocator.
    pub released: u64,
    /// Largest live set seen since the pool was created.
    pub peak_live: usize,
}

/// Frame-scoped tracker of temporary surfaces.
///
/// Every surface acquired during a frame is recorded and handed back by [`SurfacePool::release_all`].
/// The pool owns no pixels itself; allocation and recycling are the backend's job.
#[derive(Debug, Default)]
pub struct SurfacePool {
    live: Vec<SurfaceId>,
    stats: SurfacePoolStats,
}

impl SurfacePool {
    /// Empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Surfaces acquired and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Handles of the live set.
    pub fn live(&self) -> &[SurfaceId] {
        &self.live
    }

    /// Current counters.
    pub fn stats(&self) -> SurfacePoolStats {
        self.stats.clone()
    }

    /// Allocate a `width x height` surface with nearest filtering and clamp addressing and add
    /// it to the live set.
    pub fn acquire<B: ShadowBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        width: u32,
        height: u32,
        depth_bits: u32,
        format: PixelFormat,
    ) -> UmbraResult<SurfaceId> {
        let desc = SurfaceDesc {
            width,
            height,
            depth_bits,
            format,
            filter: FilterMode::Point,
            wrap: WrapMode::Clamp,
        };
        let id = backend.acquire_temporary(&desc)?;
        self.live.push(id);
        self.stats.acquired = self.stats.acquired.saturating_add(1);
        self.stats.peak_live = self.stats.peak_live.max(self.live.len());
        Ok(id)
    }

    /// Hand every live surface back to the backend. The live set is always cleared; the first
    /// release error, if any, is returned after all surfaces were attempted.
    pub fn release_all<B: ShadowBackend + ?Sized>(&mut self, backend: &mut B) -> UmbraResult<()> {
        let mut first_err = None;
        for id in self.live.drain(..) {
            match backend.release_temporary(id) {
                Ok(()) => self.stats.released = self.stats.released.saturating_add(1),
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Open a frame scope that releases the live set when dropped.
    pub fn scope<'a, B: ShadowBackend + ?Sized>(
        &'a mut self,
        backend: &'a mut B,
    ) -> PoolScope<'a, B> {
        PoolScope {
            pool: self,
            backend,
        }
    }
}

/// Borrow of a pool and its backend for one frame. Dropping it releases every surface acquired
/// through it, including on early returns.
pub struct PoolScope<'a, B: ShadowBackend + ?Sized> {
    pool: &'a mut SurfacePool,
    backend: &'a mut B,
}

impl<B: ShadowBackend + ?Sized> PoolScope<'_, B> {
    /// Acquire a color-only surface with the default format.
    pub fn acquire(&mut self, width: u32, height: u32) -> UmbraResult<SurfaceId> {
        self.pool
            .acquire(&mut *self.backend, width, height, 0, PixelFormat::default())
    }

    /// Acquire with explicit depth bits and format.
    pub fn acquire_with(
        &mut self,
        width: u32,
        height: u32,
        depth_bits: u32,
        format: PixelFormat,
    ) -> UmbraResult<SurfaceId> {
        self.pool
            .acquire(&mut *self.backend, width, height, depth_bits, format)
    }

    /// The borrowed backend.
    pub fn backend(&mut self) -> &mut B {
        &mut *self.backend
    }

    /// Surfaces acquired and not yet released.
    pub fn live_count(&self) -> usize {
        self.pool.live_count()
    }

    /// Release now and surface the error instead of logging it on drop.
    pub fn finish(self) -> UmbraResult<()> {
        // Drop then finds an empty live set.
        self.pool.release_all(&mut *self.backend)
    }
}

impl<B: ShadowBackend + ?Sized> Drop for PoolScope<'_, B> {
    fn drop(&mut self) {
        if let Err(e) = self.pool.release_all(&mut *self.backend) {
            tracing::warn!(error = %e, "failed to release pooled surfaces");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pool.rs"]
mod tests;
