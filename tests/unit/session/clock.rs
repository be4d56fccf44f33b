use super::*;

#[test]
fn zero_duration_is_rejected() {
    assert!(AnimationClock::new(0).is_err());
}

#[test]
fn first_tick_captures_start() {
    let mut clock = AnimationClock::new(1_000).unwrap();
    assert_eq!(clock.start(), None);
    let s = clock.tick(HostTime::from_millis(250));
    assert_eq!(clock.start(), Some(HostTime::from_millis(250)));
    assert_eq!(s.elapsed_us, 0);
    assert_eq!(s.t, 0.0);
    assert!(!s.finished);
}

#[test]
fn normalized_time_is_clamped_and_finishes_at_duration() {
    let mut clock = AnimationClock::new(1_000).unwrap();
    clock.tick(HostTime(0));

    let mid = clock.tick(HostTime::from_millis(500));
    assert_eq!(mid.t, 0.5);
    assert_eq!(mid.elapsed_ms(), 500.0);
    assert!(!mid.finished);

    let end = clock.tick(HostTime::from_millis(1_000));
    assert_eq!(end.t, 1.0);
    assert!(end.finished);

    let late = clock.tick(HostTime::from_millis(4_000));
    assert_eq!(late.t, 1.0);
    assert!(late.finished);
}

#[test]
fn ticks_before_start_never_go_negative() {
    let mut clock = AnimationClock::new(100).unwrap();
    clock.tick(HostTime(5_000));
    let s = clock.tick(HostTime(1_000));
    assert_eq!(s.elapsed_us, 0);
    assert_eq!(s.t, 0.0);
}

#[test]
fn restart_begins_from_zero() {
    let mut clock = AnimationClock::new(100).unwrap();
    clock.tick(HostTime(0));
    assert!(clock.tick(HostTime::from_millis(100)).finished);

    clock.restart();
    let s = clock.tick(HostTime::from_millis(300));
    assert_eq!(s.t, 0.0);
    assert_eq!(clock.start(), Some(HostTime::from_millis(300)));
}

#[test]
fn default_length_run_reaches_one_exactly_at_8000ms() {
    let mut clock = AnimationClock::new(8_000).unwrap();
    clock.tick(HostTime(0));
    let mut last = 0.0;
    for ms in (0..8_000).step_by(16) {
        let s = clock.tick(HostTime::from_millis(ms));
        assert!(s.t < 1.0 && s.t >= last);
        last = s.t;
    }
    assert!(clock.tick(HostTime(7_999_999)).t < 1.0);
    assert_eq!(clock.tick(HostTime::from_millis(8_000)).t, 1.0);
    assert_eq!(clock.tick(HostTime::from_millis(9_000)).t, 1.0);
}
