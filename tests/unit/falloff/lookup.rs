use super::*;
use crate::falloff::gradient::{AlphaKey, ColorKey, GradientMode};

fn tinted_gradient() -> Gradient {
    Gradient::new(
        vec![
            ColorKey {
                time: 0.0,
                color: [1.0, 0.8, 0.2],
            },
            ColorKey {
                time: 1.0,
                color: [0.2, 0.0, 1.0],
            },
        ],
        vec![
            AlphaKey {
                time: 0.0,
                alpha: 1.0,
            },
            AlphaKey {
                time: 0.7,
                alpha: 0.3,
            },
        ],
        GradientMode::Blend,
    )
    .unwrap()
}

#[test]
fn bake_has_fixed_sample_count() {
    let lut = FalloffAuthoring::default().bake();
    assert_eq!(lut.samples().len(), FALLOFF_SAMPLES);
    assert_eq!(lut.to_rgba8().len(), FALLOFF_SAMPLES * 4);
}

#[test]
fn baked_alpha_is_gradient_alpha_times_curve() {
    let gradient = tinted_gradient();
    let curve = FalloffCurve::ease_in_out(0.0, 1.0, 1.0, 0.0);
    let lut = bake(&gradient, &curve);

    for i in 0..FALLOFF_SAMPLES {
        let t = i as f32 / FALLOFF_SAMPLES as f32;
        let s = lut.samples()[index_for(t)];
        let expected = gradient.alpha(t) * curve.evaluate(t);
        assert!((s.a - expected).abs() < 1e-6, "i={i}");

        let c = gradient.evaluate(t);
        assert_eq!((s.r, s.g, s.b), (c.r, c.g, c.b));
    }
}

#[test]
fn non_monotonic_curves_are_kept_verbatim() {
    let curve = FalloffCurve::new(vec![
        crate::falloff::curve::CurveKey::new(0.0, 0.0),
        crate::falloff::curve::CurveKey::new(0.5, 1.0),
        crate::falloff::curve::CurveKey::new(1.0, 0.0),
    ])
    .unwrap();
    let lut = bake(&Gradient::default(), &curve);
    assert!(lut.sample(0.5).a > lut.sample(0.0).a);
    assert!(lut.sample(0.5).a > lut.sample(0.99).a);
}

#[test]
fn sample_clamps_to_table() {
    let lut = FalloffAuthoring::default().bake();
    assert_eq!(lut.sample(-3.0), lut.samples()[0]);
    assert_eq!(lut.sample(f32::NAN), lut.samples()[0]);
    assert_eq!(lut.sample(1.0), lut.samples()[FALLOFF_SAMPLES - 1]);
    assert_eq!(lut.sample(7.0), lut.samples()[FALLOFF_SAMPLES - 1]);
}

#[test]
fn fingerprint_tracks_authoring_changes() {
    let a = FalloffAuthoring::default();
    let mut b = a.clone();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.bake().fingerprint(), a.fingerprint());

    b.curve = FalloffCurve::linear(0.0, 1.0, 1.0, 0.0);
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn persisted_lookup_restores_bit_for_bit() {
    let lut = bake(&tinted_gradient(), &FalloffCurve::ease_in_out(0.0, 1.0, 1.0, 0.0));
    let json = serde_json::to_string(&lut).unwrap();
    let back: FalloffLookup = serde_json::from_str(&json).unwrap();
    for (a, b) in lut.samples().iter().zip(back.samples()) {
        assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
    }
    assert_eq!(back.fingerprint(), lut.fingerprint());

    let truncated = r#"{"samples":[{"r":1.0,"g":1.0,"b":1.0,"a":1.0}],"fingerprint":0}"#;
    assert!(serde_json::from_str::<FalloffLookup>(truncated).is_err());
}
