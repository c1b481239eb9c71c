/// Seeded source of target cart positions.
#[derive(Clone, Debug)]
pub struct CommandSampler {
    rng: fastrand::Rng,
}

impl CommandSampler {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: fastrand::Rng::with_seed(seed) }
    }

    /// Draws a command uniformly from `[-range, range]`.
    pub fn sample(&mut self, range: f32) -> f32 {
        debug_assert!(range >= 0.0 && range.is_finite(), "command range must be finite and non-negative");
        // f32() is in [0, 1); the top end is only reachable through rounding.
        (2.0 * self.rng.f32() - 1.0) * range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_stay_in_range() {
        let mut sampler = CommandSampler::new(42);
        for _ in 0..1000 {
            let c = sampler.sample(1.5);
            assert!((-1.5..=1.5).contains(&c), "{c} out of range");
        }
    }

    #[test]
    fn zero_range_gives_zero() {
        let mut sampler = CommandSampler::new(1);
        assert_eq!(sampler.sample(0.0).abs(), 0.0);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = CommandSampler::new(9);
        let mut b = CommandSampler::new(9);
        for _ in 0..16 {
            assert_eq!(a.sample(2.0).to_bits(), b.sample(2.0).to_bits());
        }
    }
}
