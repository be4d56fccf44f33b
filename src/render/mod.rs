//! Raster surface, painter and the procedural render passes.
//!
//! Passes draw in a fixed 1280x720 logical space; the [`surface::DrawingSurface`] scales that
//! space onto whatever pixel size the studio is configured for.

/// Painter wrapper over the `vello_cpu` context plus color/gradient helpers.
pub mod paint;
/// Ordered procedural passes.
pub mod passes;
/// Fixed-resolution pixmap and frame snapshots.
pub mod surface;
