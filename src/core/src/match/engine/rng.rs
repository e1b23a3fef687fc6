use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f32::consts::TAU;

/// The single source of randomness of a match. Every stochastic roll draws
/// from here in a fixed order, so a seed reproduces a match exactly.
#[derive(Debug, Clone)]
pub struct MatchRng {
    inner: ChaCha8Rng,
}

impl MatchRng {
    pub fn seed_from(seed: u64) -> Self {
        MatchRng {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform sample in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f32 {
        self.inner.gen_range(0.0f32..1.0)
    }

    /// True with probability `p`; values outside `[0, 1]` saturate.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }

        min + (max - min) * self.unit()
    }

    /// Symmetric noise in `[-amplitude, amplitude]`, peaked at zero.
    pub fn triangular(&mut self, amplitude: f32) -> f32 {
        (self.unit() + self.unit() - 1.0) * amplitude
    }

    /// Uniform point in a disc of the given radius.
    pub fn disc(&mut self, radius: f32) -> (f32, f32) {
        let r = radius * self.unit().sqrt();
        let theta = TAU * self.unit();

        (r * theta.cos(), r * theta.sin())
    }
}
