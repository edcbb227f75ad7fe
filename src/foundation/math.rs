/// Smallest accepted shadow-map resolution.
pub const MIN_SHADOW_MAP_SIZE: u32 = 8;
/// Largest accepted shadow-map resolution.
pub const MAX_SHADOW_MAP_SIZE: u32 = 2048;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_f32(&mut self, v: f32) {
        self.write_bytes(&v.to_bits().to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Round up to the next power of two. `0` maps to `1`; saturates at `2^31`.
pub fn next_power_of_two(v: u32) -> u32 {
    v.checked_next_power_of_two().unwrap_or(1 << 31)
}

/// Shadow-map resolution policy: round up to a power of two, then clamp to
/// `[MIN_SHADOW_MAP_SIZE, MAX_SHADOW_MAP_SIZE]`. Idempotent.
pub fn normalize_resolution(requested: u32) -> u32 {
    next_power_of_two(requested).clamp(MIN_SHADOW_MAP_SIZE, MAX_SHADOW_MAP_SIZE)
}

/// Number of width-halving steps needed to take `width` down to `<= 2`.
pub fn downsample_steps(width: u32) -> u32 {
    let mut w = width;
    let mut steps = 0;
    while w > 2 {
        w /= 2;
        steps += 1;
    }
    steps
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
