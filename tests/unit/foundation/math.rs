use super::*;

#[test]
fn fnv_streaming_matches_one_shot() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"moon");
    a.write_bytes(b"rise");
    assert_eq!(a.finish(), fnv1a64(b"moonrise"));
}

#[test]
fn fnv_matches_reference_vectors() {
    assert_eq!(fnv1a64(b""), 0xcbf2_9ce4_8422_2325);
    assert_eq!(fnv1a64(b"a"), 0xaf63_dc4c_8601_ec8c);
}

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(255, 0), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(255, 128), 128);
}

#[test]
fn clamp01_handles_out_of_range_and_nan() {
    assert_eq!(clamp01(-0.5), 0.0);
    assert_eq!(clamp01(1.5), 1.0);
    assert_eq!(clamp01(0.25), 0.25);
    assert_eq!(clamp01(f64::NAN), 0.0);
}

#[test]
fn alpha_u8_maps_endpoints() {
    assert_eq!(alpha_u8(0.0), 0);
    assert_eq!(alpha_u8(1.0), 255);
    assert_eq!(alpha_u8(0.5), 128);
    assert_eq!(alpha_u8(2.0), 255);
}
