use super::*;

#[test]
fn pass_ordinals_are_stable_and_roundtrip() {
    let ordinals: Vec<u32> = ShadowPass::ALL.iter().map(|p| p.ordinal()).collect();
    assert_eq!(ordinals, vec![0, 1, 2, 3, 4, 5]);
    for p in ShadowPass::ALL {
        assert_eq!(ShadowPass::from_ordinal(p.ordinal()), Some(p));
    }
    assert_eq!(ShadowPass::from_ordinal(6), None);
    assert!(ShadowPass::BlurHorizontal.is_blur());
    assert!(!ShadowPass::Resolve.is_blur());
}

#[test]
fn keywords_follow_state() {
    assert!(RenderState::default().keywords().is_empty());
    let s = RenderState {
        ultra_quality: true,
        solid_shadow: true,
    };
    assert_eq!(s.keywords(), vec!["ULTRA_QUALITY", "SOLID_SHADOW"]);
}

#[test]
fn property_block_typed_getters() {
    let mut p = PropertyBlock::default();
    p.set_float(params::BLUR_SIZE, 2.0);
    p.set_color(params::SHADOW_COLOR, Rgba::BLACK);
    p.set_texture(params::MAIN_TEX, SurfaceId(7));

    assert_eq!(p.float(params::BLUR_SIZE), Some(2.0));
    assert_eq!(p.color(params::SHADOW_COLOR), Some(Rgba::BLACK));
    assert_eq!(p.texture(params::MAIN_TEX), Some(SurfaceId(7)));
    // Wrong type reads as absent.
    assert_eq!(p.float(params::MAIN_TEX), None);

    p.set_texture(params::MAIN_TEX, SurfaceId(9));
    assert_eq!(p.texture(params::MAIN_TEX), Some(SurfaceId(9)));
    p.remove(params::MAIN_TEX);
    assert_eq!(p.texture(params::MAIN_TEX), None);
}
