/// SplitMix64 stream; one step per draw.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    pub(crate) fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

/// Deterministic procedural field keyed by `(index, channel)`.
///
/// Nothing is stored between samples: the same `(seed, index, channel)` always yields the same
/// value, so element placement is reproducible on every frame without carrying random state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProceduralField {
    seed: u64,
}

impl ProceduralField {
    /// Field with an explicit seed.
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Sample in `[0, 1)` for element `index` and independent stream `channel`.
    pub fn sample(&self, index: u64, channel: u64) -> f64 {
        let key = self.seed
            ^ index.wrapping_mul(0xD6E8_FEB8_6659_FD93)
            ^ channel.wrapping_mul(0xA076_1D64_78BD_642F);
        Rng64::new(key).next_f64_01()
    }

    /// Sample mapped into `[lo, hi)`.
    pub fn range(&self, index: u64, channel: u64, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.sample(index, channel)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/field.rs"]
mod tests;
