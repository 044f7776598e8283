//! Injectable randomness so generators can be driven by fixed sequences in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;
}

/// Production source backed by `rand`'s standard generator.
pub struct EntropySource {
    rng: StdRng,
}

impl EntropySource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible source, used when the config pins a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for EntropySource {
    fn next_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Replays a fixed cycle of samples. Values are clamped into `[0, 1)`.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSource {
    /// # Panics
    /// Panics if `values` is empty.
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values: Vec<f32> = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, UNIT_MAX))
            .collect();
        assert!(!values.is_empty(), "SequenceSource needs at least one value");
        Self { values, cursor: 0 }
    }

    /// Number of samples handed out so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn next_f32(&mut self) -> f32 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Largest `f32` strictly below 1.0.
const UNIT_MAX: f32 = 1.0 - f32::EPSILON / 2.0;

/// Uniform sample in `[low, high)`.
///
/// Float rounding of `low + span * u` can land exactly on `high` for `u` close
/// to one; the result is pulled back below the bound.
pub fn uniform(rng: &mut impl RandomSource, low: f32, high: f32) -> f32 {
    let value = low + (high - low) * rng.next_f32();
    if value < high || high <= low {
        value
    } else {
        next_below(high).max(low)
    }
}

/// Largest `f32` strictly below a finite `value`.
fn next_below(value: f32) -> f32 {
    if value > 0.0 {
        f32::from_bits(value.to_bits() - 1)
    } else if value < 0.0 {
        f32::from_bits(value.to_bits() + 1)
    } else {
        -f32::from_bits(1)
    }
}

/// Symmetric sample in `[-half_width, half_width)`.
pub fn centered(rng: &mut impl RandomSource, half_width: f32) -> f32 {
    uniform(rng, -half_width, half_width)
}
