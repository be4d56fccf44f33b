use crate::animation::ease::Ease;
use crate::foundation::math::clamp01;

/// A `[start, end]` sub-interval of normalized time over which one visual element ramps in.
///
/// Windows are independent: each derives its own local progress from the global `t`, so two
/// windows on the same pass never feed into each other.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhaseWindow {
    /// Normalized time at which progress starts leaving 0.
    pub start: f64,
    /// Normalized time at which progress reaches 1.
    pub end: f64,
    /// Easing applied by [`PhaseWindow::eased`].
    #[serde(default)]
    pub ease: Ease,
}

impl PhaseWindow {
    /// Window with the default cubic ease-in/out.
    pub const fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            ease: Ease::InOutCubic,
        }
    }

    /// Raw local progress `clamp((t - start) / (end - start), 0, 1)`.
    ///
    /// A degenerate window (`end <= start`) behaves as a step at `start`.
    pub fn progress(&self, t: f64) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if t >= self.start { 1.0 } else { 0.0 };
        }
        clamp01((t - self.start) / span)
    }

    /// Progress after easing.
    pub fn eased(&self, t: f64) -> f64 {
        self.ease.apply(self.progress(t))
    }

    /// `true` once `t` is strictly past the window start.
    pub fn is_active(&self, t: f64) -> bool {
        self.progress(t) > 0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/phase.rs"]
mod tests;
