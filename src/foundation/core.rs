use crate::foundation::error::{MoonriseError, MoonriseResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Absolute 0-based frame index within one capture stream.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> MoonriseResult<Self> {
        if den == 0 {
            return Err(MoonriseError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(MoonriseError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// First microsecond that belongs to frame slot `idx` (ceiling of `idx / fps`).
    ///
    /// Inverse of [`Fps::frame_at_us`]: `frame_at_us(frame_start_us(k)) == k` for any rate up to
    /// one frame per microsecond.
    pub fn frame_start_us(self, idx: FrameIndex) -> u64 {
        let scaled = u128::from(idx.0) * 1_000_000u128 * u128::from(self.den);
        let num = u128::from(self.num);
        u64::try_from(scaled.div_ceil(num)).unwrap_or(u64::MAX)
    }

    /// Index of the frame slot that contains `elapsed_us` (floor semantics).
    pub fn frame_at_us(self, elapsed_us: u64) -> FrameIndex {
        let frames = u128::from(elapsed_us) * u128::from(self.num)
            / (1_000_000u128 * u128::from(self.den));
        FrameIndex(u64::try_from(frames).unwrap_or(u64::MAX))
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Number of bytes in a tightly packed RGBA8 frame of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
