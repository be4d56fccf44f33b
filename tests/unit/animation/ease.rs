use super::*;

#[test]
fn endpoints_are_stable() {
    for ease in [Ease::Linear, Ease::InOutCubic] {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
    assert_eq!(ease_in_out_cubic(0.5), 0.5);
}

#[test]
fn in_out_cubic_matches_piecewise_formula() {
    assert_eq!(ease_in_out_cubic(0.25), 4.0 * 0.25 * 0.25 * 0.25);
    assert_eq!(ease_in_out_cubic(0.75), 1.0 - 0.5f64.powi(3) / 2.0);
    assert_eq!(ease_in_out_cubic(0.75), 0.9375);
}

#[test]
fn in_out_cubic_is_monotonic_over_unit_interval() {
    let mut prev = ease_in_out_cubic(0.0);
    for i in 1..=1000 {
        let v = ease_in_out_cubic(f64::from(i) / 1000.0);
        assert!(v >= prev, "ease decreased at step {i}");
        prev = v;
    }
}

#[test]
fn apply_clamps_input() {
    assert_eq!(Ease::InOutCubic.apply(-1.0), 0.0);
    assert_eq!(Ease::InOutCubic.apply(2.0), 1.0);
    assert_eq!(Ease::Linear.apply(0.3), 0.3);
}

#[test]
fn lerp_hits_endpoints() {
    assert_eq!(lerp(70.0, 0.0, 0.0), 70.0);
    assert_eq!(lerp(70.0, 0.0, 1.0), 0.0);
    assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
}
