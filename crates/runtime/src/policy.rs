//! Stand-in policies for driving the task without a learner.

use clap::ValueEnum;

pub trait Policy {
    /// Writes one action per environment into `actions`.
    ///
    /// `obs` is row-major `[num_envs × NUM_OBS]`, the layout a network
    /// consumes.
    fn act(&mut self, obs: &[f32], actions: &mut [f32]);
}

/// Never pushes the cart.
pub struct ZeroPolicy;

impl Policy for ZeroPolicy {
    fn act(&mut self, _obs: &[f32], actions: &mut [f32]) {
        actions.fill(0.0);
    }
}

/// Uniform actions in `[-1, 1)`.
pub struct RandomPolicy {
    rng: fastrand::Rng,
}

impl RandomPolicy {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: fastrand::Rng::with_seed(seed) }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _obs: &[f32], actions: &mut [f32]) {
        for a in actions {
            *a = 2.0 * self.rng.f32() - 1.0;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PolicyKind {
    #[default]
    Zero,
    Random,
}

impl PolicyKind {
    #[must_use]
    pub fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Zero => Box::new(ZeroPolicy),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}
