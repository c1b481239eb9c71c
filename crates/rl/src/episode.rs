//! Per-environment episode bookkeeping.
//!
//! Each environment is either running an episode or waiting to be reset:
//!
//! ```text
//!            evaluate() raises the reset flag
//!   Running ─────────────────────────────────▶ Terminating
//!      ▲                                            │
//!      └──────────────── reset_envs() ──────────────┘
//! ```
//!
//! `Terminating` never persists: the driver resets every flagged environment
//! before it evaluates rewards again, so episodes restart forever.

use crate::command::CommandSampler;
use crate::config::EnvConfig;
use crate::observation::ObsBuffer;
use crate::reward::{compute_reward_into, RewardWeights};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    Running,
    Terminating,
}

/// Commands, progress counters and reset flags of a batch of environments.
#[derive(Clone, Debug)]
pub struct EpisodeState {
    commands: Vec<f32>,
    progress: Vec<u32>,
    reset: Vec<bool>,
    // scratch for evaluate(), kept to avoid a per-step allocation
    terminate: Vec<bool>,
    max_episode_length: u32,
    sampler: CommandSampler,
}

impl EpisodeState {
    /// Creates state for `cfg.num_envs` environments, all running with a zero
    /// command. Call [`reset_envs`](Self::reset_envs) on every id to draw the
    /// first commands.
    #[must_use]
    pub fn new(cfg: &EnvConfig, seed: u64) -> Self {
        let n = cfg.num_envs;
        Self {
            commands: vec![0.0; n],
            progress: vec![0; n],
            reset: vec![false; n],
            terminate: vec![false; n],
            max_episode_length: cfg.max_episode_length,
            sampler: CommandSampler::new(seed),
        }
    }

    #[must_use]
    pub fn num_envs(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn max_episode_length(&self) -> u32 {
        self.max_episode_length
    }

    #[must_use]
    pub fn commands(&self) -> &[f32] {
        &self.commands
    }

    #[must_use]
    pub fn progress(&self) -> &[u32] {
        &self.progress
    }

    #[must_use]
    pub fn reset_flags(&self) -> &[bool] {
        &self.reset
    }

    #[must_use]
    pub fn phase(&self, env: usize) -> EpisodePhase {
        if self.reset[env] {
            EpisodePhase::Terminating
        } else {
            EpisodePhase::Running
        }
    }

    /// Counts one more simulation step for every environment.
    pub fn advance_step(&mut self) {
        for p in &mut self.progress {
            *p += 1;
        }
    }

    /// Starts a new episode for each of `ids`: a fresh command drawn from
    /// `[-command_range, command_range]`, progress back to zero and the reset
    /// flag cleared. Physical state is the caller's business.
    pub fn reset_envs(&mut self, ids: &[usize], command_range: f32) {
        for &i in ids {
            debug_assert!(i < self.num_envs(), "env id {i} out of range");
            self.commands[i] = self.sampler.sample(command_range);
            self.progress[i] = 0;
            self.reset[i] = false;
        }
        if !ids.is_empty() {
            tracing::trace!(count = ids.len(), "reset environments");
        }
    }

    /// Raises the reset flag of `env` without evaluating it.
    pub fn request_reset(&mut self, env: usize) {
        self.reset[env] = true;
    }

    /// Evaluates the current observations into `rewards` and raises the reset
    /// flag of every environment that terminated.
    ///
    /// Flags that are already raised stay raised.
    pub fn evaluate(
        &mut self,
        obs: &ObsBuffer,
        reset_dist: f32,
        weights: &RewardWeights,
        rewards: &mut [f32],
    ) {
        debug_assert_eq!(obs.num_envs(), self.num_envs(), "observation batch size");
        compute_reward_into(
            &obs.reward_inputs(),
            &self.progress,
            self.max_episode_length,
            reset_dist,
            weights,
            rewards,
            &mut self.terminate,
        );
        for (flag, &done) in self.reset.iter_mut().zip(&self.terminate) {
            *flag |= done;
        }
    }

    /// Ids of environments waiting to be reset, ascending.
    #[must_use]
    pub fn pending_resets(&self) -> Vec<usize> {
        self.reset
            .iter()
            .enumerate()
            .filter_map(|(i, &flag)| flag.then_some(i))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(n: usize) -> EpisodeState {
        let cfg = EnvConfig { num_envs: n, ..EnvConfig::default() };
        EpisodeState::new(&cfg, 3)
    }

    #[test]
    fn reset_clears_progress_and_flags() {
        let mut ep = state(8);
        for _ in 0..10 {
            ep.advance_step();
        }
        ep.request_reset(2);
        ep.request_reset(5);
        ep.reset_envs(&[2, 5], 1.0);

        assert_eq!(ep.progress()[2], 0);
        assert_eq!(ep.progress()[5], 0);
        assert!(!ep.reset_flags()[2]);
        assert!(!ep.reset_flags()[5]);
        assert!((-1.0..=1.0).contains(&ep.commands()[2]));
        assert!((-1.0..=1.0).contains(&ep.commands()[5]));
        assert_eq!(ep.progress()[0], 10);
    }

    #[test]
    fn empty_reset_is_noop() {
        let mut ep = state(3);
        ep.advance_step();
        let before = ep.clone();
        ep.reset_envs(&[], 1.0);
        assert_eq!(ep.progress(), before.progress());
        assert_eq!(ep.commands(), before.commands());
    }

    #[test]
    fn advance_counts_every_env() {
        let mut ep = state(4);
        ep.reset_envs(&[0, 1, 2, 3], 0.7);
        let commands = ep.commands().to_vec();
        for _ in 0..7 {
            ep.advance_step();
        }
        assert_eq!(ep.progress(), &[7, 7, 7, 7]);
        assert_eq!(ep.commands(), commands.as_slice());
        assert!(ep.pending_resets().is_empty());
    }

    #[test]
    fn evaluate_raises_flags_and_phase() {
        let mut ep = state(3);
        let mut obs = ObsBuffer::new(3);
        let pos = [[0.0, 0.0], [5.0, 0.0], [0.0, 0.0]];
        let vel = [[0.0, 0.0]; 3];
        obs.assemble(None, &pos, &vel, ep.commands());
        let mut rewards = vec![0.0; 3];

        ep.evaluate(&obs, 3.0, &RewardWeights::default(), &mut rewards);

        assert_eq!(ep.pending_resets(), vec![1]);
        assert_eq!(ep.phase(1), EpisodePhase::Terminating);
        assert_eq!(ep.phase(0), EpisodePhase::Running);
        assert!((rewards[1] + 2.0).abs() < 1e-6);
    }

    #[test]
    fn evaluate_keeps_raised_flags() {
        let mut ep = state(2);
        let obs = ObsBuffer::new(2);
        let mut rewards = vec![0.0; 2];
        ep.request_reset(0);
        ep.evaluate(&obs, 3.0, &RewardWeights::default(), &mut rewards);
        assert_eq!(ep.pending_resets(), vec![0]);
    }

    #[test]
    fn horizon_flags_last_step() {
        let cfg = EnvConfig { num_envs: 1, max_episode_length: 4, ..EnvConfig::default() };
        let mut ep = EpisodeState::new(&cfg, 0);
        let obs = ObsBuffer::new(1);
        let mut rewards = vec![0.0];
        for step in 1..=3 {
            ep.advance_step();
            ep.evaluate(&obs, 3.0, &RewardWeights::default(), &mut rewards);
            assert_eq!(ep.phase(0) == EpisodePhase::Terminating, step == 3, "step {step}");
        }
        assert!((rewards[0] - 1.0).abs() < 1e-6);
    }
}
