use super::*;

#[test]
fn rgba8_quantization_clamps_and_rounds() {
    let c = Rgba::new(1.5, -0.2, 0.5, 1.0);
    assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
    assert_eq!(Rgba::from_rgba8(255, 0, 0, 255), Rgba::new(1.0, 0.0, 0.0, 1.0));
}

#[test]
fn lerp_endpoints_are_exact() {
    let a = Rgba::BLACK;
    let b = Rgba::WHITE.with_alpha(0.25);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
}

#[test]
fn transform_to_affine_identity_and_translation() {
    let t = Transform2D::default();
    assert_eq!(t.to_affine(), Affine::IDENTITY);

    let t = Transform2D::from_translation(Vec2::new(10.0, -2.5));
    assert_eq!(t.to_affine(), Affine::translate(Vec2::new(10.0, -2.5)));
}

#[test]
fn rigid_affine_drops_scale() {
    let t = Transform2D::from_translation(Vec2::new(1.0, 2.0)).with_scale(8.0);
    let p = t.to_rigid_affine() * Point::new(1.0, 0.0);
    assert!((p.x - 2.0).abs() < 1e-12);
    assert!((p.y - 2.0).abs() < 1e-12);
}
