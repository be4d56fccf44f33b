use super::*;

#[test]
fn progress_clamps_outside_window() {
    let w = PhaseWindow::new(0.2, 0.6);
    assert_eq!(w.progress(0.0), 0.0);
    assert_eq!(w.progress(0.2), 0.0);
    assert_eq!(w.progress(0.6), 1.0);
    assert_eq!(w.progress(1.0), 1.0);
    assert!((w.progress(0.4) - 0.5).abs() < 1e-12);
}

#[test]
fn eased_uses_cubic_in_out() {
    let w = PhaseWindow::new(0.0, 1.0);
    assert_eq!(w.eased(0.25), 0.0625);
    assert_eq!(w.eased(0.5), 0.5);
}

#[test]
fn windows_are_independent() {
    let appear = PhaseWindow::new(0.2, 0.6);
    let armor = PhaseWindow::new(0.5, 1.0);
    // At t=0.55 the appear window is nearly done while armor has barely started.
    assert!(appear.progress(0.55) > 0.8);
    assert!(armor.progress(0.55) < 0.2);
    assert_eq!(appear.eased(1.0), 1.0);
    assert_eq!(armor.eased(1.0), 1.0);
}

#[test]
fn degenerate_window_is_a_step() {
    let w = PhaseWindow::new(0.5, 0.5);
    assert_eq!(w.progress(0.49), 0.0);
    assert_eq!(w.progress(0.5), 1.0);
}

#[test]
fn activity_starts_strictly_after_start() {
    let w = PhaseWindow::new(0.45, 0.70);
    assert!(!w.is_active(0.45));
    assert!(w.is_active(0.46));
}
