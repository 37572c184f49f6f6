//! Sampling decision for full comparisons.

use rand::Rng;

/// Source of the per-request sampling draw.
pub trait Sampler: Send + Sync {
    /// A uniformly distributed integer in `[0, 100)`.
    fn draw(&self) -> u8;
}

/// Thread-local RNG; no shared state across requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSampler;

impl Sampler for RandomSampler {
    fn draw(&self) -> u8 {
        rand::thread_rng().gen_range(0..100)
    }
}

/// Always returns the same draw.
#[derive(Debug, Clone, Copy)]
pub struct FixedSampler(pub u8);

impl Sampler for FixedSampler {
    fn draw(&self) -> u8 {
        self.0.min(99)
    }
}

/// Whether a draw selects the full comparison at `sample_percent`.
pub fn is_full_comparison(draw: u8, sample_percent: u8) -> bool {
    sample_percent >= 100 || draw < sample_percent
}
