use crate::{
    falloff::{curve::FalloffCurve, gradient::Gradient},
    foundation::{
        core::Rgba,
        error::{UmbraError, UmbraResult},
        math::Fnv1a64,
    },
};

/// Number of samples in a baked falloff lookup.
pub const FALLOFF_SAMPLES: usize = 128;

/// Authoring inputs of the falloff lookup.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FalloffAuthoring {
    /// Light color and alpha over normalized distance.
    pub gradient: Gradient,
    /// Alpha multiplier over normalized distance.
    pub curve: FalloffCurve,
}

impl Default for FalloffAuthoring {
    fn default() -> Self {
        Self {
            gradient: Gradient::default(),
            curve: FalloffCurve::ease_in_out(0.0, 1.0, 1.0, 0.0),
        }
    }
}

impl FalloffAuthoring {
    /// Stable fingerprint of gradient and curve; changes whenever a re-bake is needed.
    pub fn fingerprint(&self) -> u64 {
        fingerprint_of(&self.gradient, &self.curve)
    }

    /// Bake the current inputs.
    pub fn bake(&self) -> FalloffLookup {
        bake(&self.gradient, &self.curve)
    }
}

/// 1D light color/alpha over normalized distance, `FALLOFF_SAMPLES` long.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "LookupRepr", into = "LookupRepr")]
pub struct FalloffLookup {
    samples: Vec<Rgba>,
    fingerprint: u64,
}

#[derive(Clone, serde::Serialize, serde::Deserialize)]
struct LookupRepr {
    samples: Vec<Rgba>,
    fingerprint: u64,
}

impl TryFrom<LookupRepr> for FalloffLookup {
    type Error = UmbraError;

    fn try_from(r: LookupRepr) -> UmbraResult<Self> {
        if r.samples.len() != FALLOFF_SAMPLES {
            return Err(UmbraError::serde(format!(
                "falloff lookup needs {FALLOFF_SAMPLES} samples, got {}",
                r.samples.len()
            )));
        }
        Ok(Self {
            samples: r.samples,
            fingerprint: r.fingerprint,
        })
    }
}

impl From<FalloffLookup> for LookupRepr {
    fn from(l: FalloffLookup) -> Self {
        Self {
            samples: l.samples,
            fingerprint: l.fingerprint,
        }
    }
}

impl FalloffLookup {
    /// The 128 samples, nearest the light first.
    pub fn samples(&self) -> &[Rgba] {
        &self.samples
    }

    /// Fingerprint of the inputs the lookup was baked from.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Sample at normalized distance `t`, nearest lower index, clamped to the table.
    pub fn sample(&self, t: f32) -> Rgba {
        self.samples[index_for(t)]
    }

    /// Straight RGBA8 bytes, row-major `FALLOFF_SAMPLES x 1`.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_rgba8()).collect()
    }
}

pub(crate) fn index_for(t: f32) -> usize {
    if t.is_nan() || t <= 0.0 {
        return 0;
    }
    ((t * FALLOFF_SAMPLES as f32) as usize).min(FALLOFF_SAMPLES - 1)
}

/// Bake `gradient` and `curve` into a lookup: sample `i` is the gradient at `t = i / 128`
/// with its alpha multiplied by the curve at `t`.
pub fn bake(gradient: &Gradient, curve: &FalloffCurve) -> FalloffLookup {
    let samples = (0..FALLOFF_SAMPLES)
        .map(|i| {
            let t = i as f32 / FALLOFF_SAMPLES as f32;
            let c = gradient.evaluate(t);
            c.with_alpha(c.a * curve.evaluate(t))
        })
        .collect();

    FalloffLookup {
        samples,
        fingerprint: fingerprint_of(gradient, curve),
    }
}

fn fingerprint_of(gradient: &Gradient, curve: &FalloffCurve) -> u64 {
    let mut h = Fnv1a64::new_default();
    gradient.hash_into(&mut h);
    curve.hash_into(&mut h);
    h.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/falloff/lookup.rs"]
mod tests;
