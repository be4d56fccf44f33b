//! Pure timing primitives: easing curves, phase windows and the seeded procedural field.

/// Easing curves and interpolation.
pub mod ease;
/// Deterministic per-index random values.
pub mod field;
/// Sub-intervals of normalized time.
pub mod phase;
