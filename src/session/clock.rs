use crate::foundation::error::{MoonriseError, MoonriseResult};
use crate::foundation::math::clamp01;
use crate::session::scheduler::HostTime;

/// Maps host time onto normalized animation time.
///
/// The start timestamp is captured lazily from the first tick after a restart, so the first frame
/// of every run is painted at `t = 0` regardless of when the tick was delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationClock {
    duration_ms: u64,
    start: Option<HostTime>,
}

/// One observation of the clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClockSample {
    /// Microseconds since the captured start.
    pub elapsed_us: u64,
    /// Normalized time in `[0, 1]`.
    pub t: f64,
    /// `true` once the elapsed time has reached the duration.
    pub finished: bool,
}

impl ClockSample {
    /// Elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_us as f64 / 1_000.0
    }
}

impl AnimationClock {
    /// Clock for an animation of `duration_ms` milliseconds.
    pub fn new(duration_ms: u64) -> MoonriseResult<Self> {
        if duration_ms == 0 {
            return Err(MoonriseError::validation("animation duration must be > 0 ms"));
        }
        Ok(Self {
            duration_ms,
            start: None,
        })
    }

    /// Configured duration.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Start timestamp, once the first tick has been observed.
    pub fn start(&self) -> Option<HostTime> {
        self.start
    }

    /// Forget the start so the next tick begins again from zero.
    pub fn restart(&mut self) {
        self.start = None;
    }

    /// Observe host time `now`.
    pub fn tick(&mut self, now: HostTime) -> ClockSample {
        let start = *self.start.get_or_insert(now);
        let elapsed_us = now.since(start);
        let duration_us = self.duration_ms.saturating_mul(1_000);
        ClockSample {
            elapsed_us,
            t: clamp01(elapsed_us as f64 / duration_us as f64),
            finished: elapsed_us >= duration_us,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/clock.rs"]
mod tests;
