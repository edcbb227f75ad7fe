use super::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn ease_in_out_hits_endpoints_and_midpoint() {
    let c = FalloffCurve::ease_in_out(0.0, 1.0, 1.0, 0.0);
    assert!(approx(c.evaluate(0.0), 1.0));
    assert!(approx(c.evaluate(1.0), 0.0));
    assert!(approx(c.evaluate(0.5), 0.5));
    // Flat tangents: slower change near the ends than in the middle.
    let near_start = 1.0 - c.evaluate(0.1);
    let middle = c.evaluate(0.45) - c.evaluate(0.55);
    assert!(near_start < middle);
}

#[test]
fn evaluation_clamps_outside_key_range() {
    let c = FalloffCurve::ease_in_out(0.2, 0.3, 0.8, 0.9);
    assert!(approx(c.evaluate(-1.0), 0.3));
    assert!(approx(c.evaluate(0.0), 0.3));
    assert!(approx(c.evaluate(5.0), 0.9));
}

#[test]
fn linear_curve_is_a_straight_line() {
    let c = FalloffCurve::linear(0.0, 0.0, 1.0, 2.0);
    for i in 0..=10 {
        let t = i as f32 / 10.0;
        assert!(approx(c.evaluate(t), 2.0 * t), "t={t}");
    }
}

#[test]
fn infinite_tangent_makes_a_step() {
    let c = FalloffCurve::new(vec![
        CurveKey {
            time: 0.0,
            value: 1.0,
            in_tangent: 0.0,
            out_tangent: f32::INFINITY,
        },
        CurveKey::new(1.0, 0.0),
    ])
    .unwrap();
    assert_eq!(c.evaluate(0.99), 1.0);
    assert_eq!(c.evaluate(1.0), 0.0);
}

#[test]
fn empty_curve_is_zero_and_unsorted_is_rejected() {
    assert_eq!(FalloffCurve::default().evaluate(0.5), 0.0);
    assert!(FalloffCurve::new(vec![CurveKey::new(0.5, 1.0), CurveKey::new(0.5, 0.0)]).is_err());
    assert!(FalloffCurve::new(vec![CurveKey::new(f32::NAN, 1.0)]).is_err());
}

#[test]
fn json_uses_plain_key_list() {
    let c = FalloffCurve::ease_in_out(0.0, 1.0, 1.0, 0.0);
    let v = serde_json::to_value(&c).unwrap();
    assert!(v.is_array());
    let back: FalloffCurve = serde_json::from_value(v).unwrap();
    assert_eq!(back, c);
}
