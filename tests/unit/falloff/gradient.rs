use super::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn default_is_opaque_white() {
    let g = Gradient::default();
    for t in [0.0, 0.3, 1.0] {
        assert_eq!(g.evaluate(t), Rgba::WHITE);
    }
}

#[test]
fn blend_interpolates_color_and_alpha_independently() {
    let g = Gradient::new(
        vec![
            ColorKey {
                time: 0.0,
                color: [1.0, 0.0, 0.0],
            },
            ColorKey {
                time: 1.0,
                color: [0.0, 0.0, 1.0],
            },
        ],
        vec![
            AlphaKey {
                time: 0.0,
                alpha: 1.0,
            },
            AlphaKey {
                time: 0.5,
                alpha: 0.0,
            },
        ],
        GradientMode::Blend,
    )
    .unwrap();

    let c = g.evaluate(0.25);
    assert!(approx(c.r, 0.75));
    assert!(approx(c.b, 0.25));
    assert!(approx(c.a, 0.5));
    // Past the last alpha key the alpha holds.
    assert!(approx(g.alpha(0.9), 0.0));
}

#[test]
fn fixed_mode_holds_next_key() {
    let g = Gradient::new(
        vec![
            ColorKey {
                time: 0.0,
                color: [0.0, 0.0, 0.0],
            },
            ColorKey {
                time: 0.5,
                color: [1.0, 1.0, 1.0],
            },
        ],
        vec![AlphaKey {
            time: 0.0,
            alpha: 1.0,
        }],
        GradientMode::Fixed,
    )
    .unwrap();
    assert_eq!(g.evaluate(0.0).r, 0.0);
    assert_eq!(g.evaluate(0.1).r, 1.0);
    assert_eq!(g.evaluate(0.8).r, 1.0);
}

#[test]
fn keys_are_sorted_on_construction() {
    let g = Gradient::new(
        vec![
            ColorKey {
                time: 1.0,
                color: [1.0, 1.0, 1.0],
            },
            ColorKey {
                time: 0.0,
                color: [0.0, 0.0, 0.0],
            },
        ],
        vec![AlphaKey {
            time: 0.0,
            alpha: 1.0,
        }],
        GradientMode::Blend,
    )
    .unwrap();
    assert_eq!(g.color_keys()[0].time, 0.0);
    assert!(approx(g.evaluate(0.5).g, 0.5));
}

#[test]
fn rejects_invalid_keys() {
    let alpha = vec![AlphaKey {
        time: 0.0,
        alpha: 1.0,
    }];
    assert!(Gradient::new(vec![], alpha.clone(), GradientMode::Blend).is_err());

    let too_many = (0..9)
        .map(|i| ColorKey {
            time: i as f32 / 8.0,
            color: [1.0; 3],
        })
        .collect::<Vec<_>>();
    assert!(Gradient::new(too_many, alpha.clone(), GradientMode::Blend).is_err());

    let out_of_range = vec![ColorKey {
        time: 1.5,
        color: [1.0; 3],
    }];
    assert!(Gradient::new(out_of_range, alpha, GradientMode::Blend).is_err());
}

#[test]
fn json_roundtrip_goes_through_validation() {
    let g = Gradient::two_stop(Rgba::WHITE, Rgba::new(1.0, 0.5, 0.0, 0.0));
    let s = serde_json::to_string(&g).unwrap();
    let back: Gradient = serde_json::from_str(&s).unwrap();
    assert_eq!(back, g);

    let bad = r#"{"color_keys":[],"alpha_keys":[{"time":0.0,"alpha":1.0}]}"#;
    assert!(serde_json::from_str::<Gradient>(bad).is_err());
}
