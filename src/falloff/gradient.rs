use crate::foundation::{
    core::Rgba,
    error::{UmbraError, UmbraResult},
    math::Fnv1a64,
};

/// Maximum number of keys per channel set (color or alpha).
pub const MAX_GRADIENT_KEYS: usize = 8;

/// Interpolation between adjacent gradient keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientMode {
    /// Linear blend between the surrounding keys.
    #[default]
    Blend,
    /// Hold the value of the next key (banded gradient).
    Fixed,
}

/// Color stop. Only `r`, `g`, `b` are used; alpha is authored separately.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorKey {
    /// Key position in `[0, 1]`.
    pub time: f32,
    /// Linear RGB.
    pub color: [f32; 3],
}

/// Alpha stop.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AlphaKey {
    /// Key position in `[0, 1]`.
    pub time: f32,
    /// Alpha at `time`.
    pub alpha: f32,
}

/// Color ramp over normalized distance with independent color and alpha keys.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "GradientRepr", into = "GradientRepr")]
pub struct Gradient {
    color_keys: Vec<ColorKey>,
    alpha_keys: Vec<AlphaKey>,
    mode: GradientMode,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct GradientRepr {
    color_keys: Vec<ColorKey>,
    alpha_keys: Vec<AlphaKey>,
    #[serde(default)]
    mode: GradientMode,
}

impl TryFrom<GradientRepr> for Gradient {
    type Error = UmbraError;

    fn try_from(r: GradientRepr) -> UmbraResult<Self> {
        Self::new(r.color_keys, r.alpha_keys, r.mode)
    }
}

impl From<Gradient> for GradientRepr {
    fn from(g: Gradient) -> Self {
        Self {
            color_keys: g.color_keys,
            alpha_keys: g.alpha_keys,
            mode: g.mode,
        }
    }
}

impl Default for Gradient {
    /// Opaque white across the whole range.
    fn default() -> Self {
        Self {
            color_keys: vec![
                ColorKey {
                    time: 0.0,
                    color: [1.0, 1.0, 1.0],
                },
                ColorKey {
                    time: 1.0,
                    color: [1.0, 1.0, 1.0],
                },
            ],
            alpha_keys: vec![
                AlphaKey {
                    time: 0.0,
                    alpha: 1.0,
                },
                AlphaKey {
                    time: 1.0,
                    alpha: 1.0,
                },
            ],
            mode: GradientMode::Blend,
        }
    }
}

impl Gradient {
    /// Build a gradient; keys are sorted by time. Each set needs 1..=8 finite keys in `[0, 1]`.
    pub fn new(
        mut color_keys: Vec<ColorKey>,
        mut alpha_keys: Vec<AlphaKey>,
        mode: GradientMode,
    ) -> UmbraResult<Self> {
        fn check_count(n: usize, what: &str) -> UmbraResult<()> {
            if n == 0 || n > MAX_GRADIENT_KEYS {
                return Err(UmbraError::validation(format!(
                    "gradient needs 1..={MAX_GRADIENT_KEYS} {what} keys, got {n}"
                )));
            }
            Ok(())
        }
        fn check_time(t: f32) -> UmbraResult<()> {
            if !t.is_finite() || !(0.0..=1.0).contains(&t) {
                return Err(UmbraError::validation(format!(
                    "gradient key time must be in [0, 1], got {t}"
                )));
            }
            Ok(())
        }

        check_count(color_keys.len(), "color")?;
        check_count(alpha_keys.len(), "alpha")?;
        for k in &color_keys {
            check_time(k.time)?;
            if !k.color.iter().all(|c| c.is_finite()) {
                return Err(UmbraError::validation("gradient color must be finite"));
            }
        }
        for k in &alpha_keys {
            check_time(k.time)?;
            if !k.alpha.is_finite() {
                return Err(UmbraError::validation("gradient alpha must be finite"));
            }
        }

        color_keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        alpha_keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self {
            color_keys,
            alpha_keys,
            mode,
        })
    }

    /// Two-stop gradient from `start` to `end`.
    pub fn two_stop(start: Rgba, end: Rgba) -> Self {
        Self {
            color_keys: vec![
                ColorKey {
                    time: 0.0,
                    color: [start.r, start.g, start.b],
                },
                ColorKey {
                    time: 1.0,
                    color: [end.r, end.g, end.b],
                },
            ],
            alpha_keys: vec![
                AlphaKey {
                    time: 0.0,
                    alpha: start.a,
                },
                AlphaKey {
                    time: 1.0,
                    alpha: end.a,
                },
            ],
            mode: GradientMode::Blend,
        }
    }

    /// Key interpolation.
    pub fn mode(&self) -> GradientMode {
        self.mode
    }

    /// Color keys sorted by time.
    pub fn color_keys(&self) -> &[ColorKey] {
        &self.color_keys
    }

    /// Alpha keys sorted by time.
    pub fn alpha_keys(&self) -> &[AlphaKey] {
        &self.alpha_keys
    }

    /// Color and alpha at `t`.
    pub fn evaluate(&self, t: f32) -> Rgba {
        let [r, g, b] = sample_keys(
            &self.color_keys,
            |k| k.time,
            t,
            self.mode,
            |k| k.color,
            |a, b, s| {
                [
                    a[0] + (b[0] - a[0]) * s,
                    a[1] + (b[1] - a[1]) * s,
                    a[2] + (b[2] - a[2]) * s,
                ]
            },
        );
        Rgba::new(r, g, b, self.alpha(t))
    }

    /// Alpha at `t`.
    pub fn alpha(&self, t: f32) -> f32 {
        sample_keys(
            &self.alpha_keys,
            |k| k.time,
            t,
            self.mode,
            |k| k.alpha,
            |a, b, s| a + (b - a) * s,
        )
    }

    pub(crate) fn hash_into(&self, h: &mut Fnv1a64) {
        h.write_u8(match self.mode {
            GradientMode::Blend => 0,
            GradientMode::Fixed => 1,
        });
        h.write_u64(self.color_keys.len() as u64);
        for k in &self.color_keys {
            h.write_f32(k.time);
            for c in k.color {
                h.write_f32(c);
            }
        }
        h.write_u64(self.alpha_keys.len() as u64);
        for k in &self.alpha_keys {
            h.write_f32(k.time);
            h.write_f32(k.alpha);
        }
    }
}

fn sample_keys<K, V: Copy>(
    keys: &[K],
    time_of: impl Fn(&K) -> f32,
    t: f32,
    mode: GradientMode,
    value_of: impl Fn(&K) -> V,
    lerp: impl Fn(V, V, f32) -> V,
) -> V {
    // Keys are non-empty by construction.
    let idx = keys.partition_point(|k| time_of(k) <= t);
    if idx == 0 {
        return value_of(&keys[0]);
    }
    if idx >= keys.len() {
        return value_of(&keys[keys.len() - 1]);
    }

    let a = &keys[idx - 1];
    let b = &keys[idx];
    match mode {
        GradientMode::Fixed if time_of(a) == t => value_of(a),
        GradientMode::Fixed => value_of(b),
        GradientMode::Blend => {
            let span = time_of(b) - time_of(a);
            if span <= 0.0 {
                return value_of(a);
            }
            let s = (t - time_of(a)) / span;
            lerp(value_of(a), value_of(b), s)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/falloff/gradient.rs"]
mod tests;
