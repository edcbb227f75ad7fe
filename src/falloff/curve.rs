use crate::foundation::{
    error::{UmbraError, UmbraResult},
    math::Fnv1a64,
};

/// One key of a [`FalloffCurve`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveKey {
    /// Key position.
    pub time: f32,
    /// Curve value at `time`.
    pub value: f32,
    /// Slope arriving at this key. An infinite tangent makes the previous segment a step.
    #[serde(default)]
    pub in_tangent: f32,
    /// Slope leaving this key. An infinite tangent makes the next segment a step.
    #[serde(default)]
    pub out_tangent: f32,
}

impl CurveKey {
    /// Key with flat tangents.
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            in_tangent: 0.0,
            out_tangent: 0.0,
        }
    }
}

/// Cubic Hermite curve over normalized distance, clamped outside its key range.
///
/// An empty curve evaluates to `0`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct FalloffCurve {
    keys: Vec<CurveKey>,
}

impl TryFrom<Vec<CurveKey>> for FalloffCurve {
    type Error = UmbraError;

    fn try_from(keys: Vec<CurveKey>) -> UmbraResult<Self> {
        Self::new(keys)
    }
}

impl From<FalloffCurve> for Vec<CurveKey> {
    fn from(c: FalloffCurve) -> Self {
        c.keys
    }
}

impl FalloffCurve {
    /// Build a curve from keys sorted by strictly increasing time.
    pub fn new(keys: Vec<CurveKey>) -> UmbraResult<Self> {
        if keys
            .iter()
            .any(|k| !k.time.is_finite() || !k.value.is_finite())
        {
            return Err(UmbraError::validation("curve key time/value must be finite"));
        }
        if !keys.windows(2).all(|w| w[0].time < w[1].time) {
            return Err(UmbraError::validation(
                "curve keys must be sorted by strictly increasing time",
            ));
        }
        Ok(Self { keys })
    }

    /// Smooth S-curve from `(t0, v0)` to `(t1, v1)` with flat tangents.
    pub fn ease_in_out(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        if t0 == t1 {
            return Self::constant(v1);
        }
        let (a, b) = if t0 < t1 {
            (CurveKey::new(t0, v0), CurveKey::new(t1, v1))
        } else {
            (CurveKey::new(t1, v1), CurveKey::new(t0, v0))
        };
        Self { keys: vec![a, b] }
    }

    /// Straight line from `(t0, v0)` to `(t1, v1)`.
    pub fn linear(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        if t0 == t1 {
            return Self::constant(v1);
        }
        let slope = (v1 - v0) / (t1 - t0);
        let mut curve = Self::ease_in_out(t0, v0, t1, v1);
        for k in &mut curve.keys {
            k.in_tangent = slope;
            k.out_tangent = slope;
        }
        curve
    }

    /// Flat curve.
    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, value)],
        }
    }

    /// Keys sorted by time.
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Value at `t`; clamped to the first and last key outside their range.
    pub fn evaluate(&self, t: f32) -> f32 {
        let Some(first) = self.keys.first() else {
            return 0.0;
        };
        let idx = self.keys.partition_point(|k| k.time <= t);
        if idx == 0 {
            return first.value;
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value;
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        if a.out_tangent.is_infinite() || b.in_tangent.is_infinite() {
            return a.value;
        }

        let dt = b.time - a.time;
        let s = (t - a.time) / dt;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        h00 * a.value + h10 * dt * a.out_tangent + h01 * b.value + h11 * dt * b.in_tangent
    }

    pub(crate) fn hash_into(&self, h: &mut Fnv1a64) {
        h.write_u64(self.keys.len() as u64);
        for k in &self.keys {
            h.write_f32(k.time);
            h.write_f32(k.value);
            h.write_f32(k.in_tangent);
            h.write_f32(k.out_tangent);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/falloff/curve.rs"]
mod tests;
