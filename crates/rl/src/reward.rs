//! Reward and termination for the commanded cart-pole task.
//!
//! The reward favours an upright pole, slow motion and a cart sitting on its
//! commanded position:
//!
//! ```text
//! r = 1 - 0.5·θ² - 0.01·|ẋ| - 0.01·|θ̇| - 0.8·|c - x|
//! ```
//!
//! Leaving the track (`|x| > reset_dist`) or letting the pole fall past
//! horizontal (`|θ| > π/2`) replaces the reward with a flat penalty and ends
//! the episode. Reaching the last step of the horizon also ends the episode,
//! but keeps the formula reward.

use rayon::prelude::*;
use serde::Deserialize;
use std::f32::consts::FRAC_PI_2;

/// Pole angle beyond which the pole counts as fallen.
pub const ANGLE_LIMIT: f32 = FRAC_PI_2;

/// Coefficients of the reward formula.
///
/// The defaults are the tuned values of the task and carry no derivation;
/// override them only to experiment.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewardWeights {
    /// Weight of the squared pole angle.
    pub angle: f32,
    /// Weight of the absolute cart velocity.
    pub cart_vel: f32,
    /// Weight of the absolute pole angular velocity.
    pub pole_vel: f32,
    /// Weight of the absolute tracking error `|command - cart_pos|`.
    pub tracking: f32,
    /// Reward assigned when the cart leaves the track or the pole falls.
    pub failure_penalty: f32,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            angle: 0.5,
            cart_vel: 0.01,
            pole_vel: 0.01,
            tracking: 0.8,
            failure_penalty: -2.0,
        }
    }
}

/// Parallel per-environment inputs of the reward kernel.
///
/// Every slice has one entry per environment.
#[derive(Clone, Copy, Debug)]
pub struct RewardInputs<'a> {
    pub command: &'a [f32],
    pub pole_angle: &'a [f32],
    pub pole_vel: &'a [f32],
    pub cart_vel: &'a [f32],
    pub cart_pos: &'a [f32],
}

impl RewardInputs<'_> {
    /// Number of environments described by the inputs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.command.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.command.is_empty()
    }

    fn debug_check(&self, progress: &[u32]) {
        let n = self.len();
        debug_assert_eq!(self.pole_angle.len(), n, "pole_angle length");
        debug_assert_eq!(self.pole_vel.len(), n, "pole_vel length");
        debug_assert_eq!(self.cart_vel.len(), n, "cart_vel length");
        debug_assert_eq!(self.cart_pos.len(), n, "cart_pos length");
        debug_assert_eq!(progress.len(), n, "progress length");
    }
}

/// Reward and termination of a single environment.
///
/// `at_horizon` is true when the environment's progress counter has reached
/// the last step of the episode.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn step_reward(
    command: f32,
    pole_angle: f32,
    pole_vel: f32,
    cart_vel: f32,
    cart_pos: f32,
    reset_dist: f32,
    at_horizon: bool,
    weights: &RewardWeights,
) -> (f32, bool) {
    let reward = 1.0
        - weights.angle * pole_angle * pole_angle
        - weights.cart_vel * cart_vel.abs()
        - weights.pole_vel * pole_vel.abs()
        - weights.tracking * (command - cart_pos).abs();

    let failed = cart_pos.abs() > reset_dist || pole_angle.abs() > ANGLE_LIMIT;
    if failed {
        (weights.failure_penalty, true)
    } else {
        (reward, at_horizon)
    }
}

/// Computes rewards and termination flags for every environment.
///
/// Pure: the same inputs always produce the same outputs.
#[must_use]
pub fn compute_reward(
    inputs: &RewardInputs<'_>,
    progress: &[u32],
    max_episode_length: u32,
    reset_dist: f32,
    weights: &RewardWeights,
) -> (Vec<f32>, Vec<bool>) {
    let mut rewards = vec![0.0; inputs.len()];
    let mut terminate = vec![false; inputs.len()];
    compute_reward_into(
        inputs,
        progress,
        max_episode_length,
        reset_dist,
        weights,
        &mut rewards,
        &mut terminate,
    );
    (rewards, terminate)
}

/// Same as [`compute_reward`], writing into caller-owned buffers.
pub fn compute_reward_into(
    inputs: &RewardInputs<'_>,
    progress: &[u32],
    max_episode_length: u32,
    reset_dist: f32,
    weights: &RewardWeights,
    rewards: &mut [f32],
    terminate: &mut [bool],
) {
    inputs.debug_check(progress);
    debug_assert_eq!(rewards.len(), inputs.len(), "reward buffer length");
    debug_assert_eq!(terminate.len(), inputs.len(), "terminate buffer length");

    let last_step = max_episode_length.saturating_sub(1);
    rewards
        .par_iter_mut()
        .zip(terminate.par_iter_mut())
        .enumerate()
        .for_each(|(i, (reward, done))| {
            (*reward, *done) = step_reward(
                inputs.command[i],
                inputs.pole_angle[i],
                inputs.pole_vel[i],
                inputs.cart_vel[i],
                inputs.cart_pos[i],
                reset_dist,
                progress[i] >= last_step,
                weights,
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    struct Batch {
        command: Vec<f32>,
        pole_angle: Vec<f32>,
        pole_vel: Vec<f32>,
        cart_vel: Vec<f32>,
        cart_pos: Vec<f32>,
        progress: Vec<u32>,
    }

    impl Batch {
        fn zeros(n: usize) -> Self {
            Self {
                command: vec![0.0; n],
                pole_angle: vec![0.0; n],
                pole_vel: vec![0.0; n],
                cart_vel: vec![0.0; n],
                cart_pos: vec![0.0; n],
                progress: vec![0; n],
            }
        }

        fn inputs(&self) -> RewardInputs<'_> {
            RewardInputs {
                command: &self.command,
                pole_angle: &self.pole_angle,
                pole_vel: &self.pole_vel,
                cart_vel: &self.cart_vel,
                cart_pos: &self.cart_pos,
            }
        }

        fn run(&self, reset_dist: f32) -> (Vec<f32>, Vec<bool>) {
            compute_reward(
                &self.inputs(),
                &self.progress,
                300,
                reset_dist,
                &RewardWeights::default(),
            )
        }
    }

    #[test]
    fn resting_on_target_scores_one() {
        let (r, t) = Batch::zeros(1).run(3.0);
        assert!((r[0] - 1.0).abs() < EPS);
        assert!(!t[0]);
    }

    #[test]
    fn tracking_error_costs_point_eight_per_unit() {
        let mut b = Batch::zeros(1);
        b.command[0] = 1.0;
        let (r, t) = b.run(3.0);
        assert!((r[0] - 0.2).abs() < EPS, "got {}", r[0]);
        assert!(!t[0]);
    }

    #[test]
    fn full_formula_matches() {
        let mut b = Batch::zeros(1);
        b.command[0] = -0.5;
        b.cart_pos[0] = 0.25;
        b.pole_angle[0] = 0.3;
        b.pole_vel[0] = -2.0;
        b.cart_vel[0] = 1.5;
        let expected = 1.0 - 0.5 * 0.09 - 0.01 * 1.5 - 0.01 * 2.0 - 0.8 * 0.75;
        let (r, t) = b.run(3.0);
        assert!((r[0] - expected).abs() < EPS);
        assert!(!t[0]);
    }

    #[test]
    fn leaving_track_is_penalised() {
        let mut b = Batch::zeros(2);
        b.cart_pos = vec![3.01, -3.5];
        b.command = vec![3.01, -3.5];
        let (r, t) = b.run(3.0);
        assert_eq!(r, vec![-2.0, -2.0]);
        assert_eq!(t, vec![true, true]);
    }

    #[test]
    fn reset_distance_is_exclusive() {
        let mut b = Batch::zeros(1);
        b.cart_pos[0] = 3.0;
        b.command[0] = 3.0;
        let (r, t) = b.run(3.0);
        assert!((r[0] - 1.0).abs() < EPS);
        assert!(!t[0]);
    }

    #[test]
    fn fallen_pole_is_penalised() {
        let mut b = Batch::zeros(2);
        b.pole_angle = vec![FRAC_PI_2 + 0.01, -2.0];
        let (r, t) = b.run(3.0);
        assert_eq!(r, vec![-2.0, -2.0]);
        assert_eq!(t, vec![true, true]);
    }

    #[test]
    fn angle_limit_is_exclusive() {
        let mut b = Batch::zeros(2);
        b.pole_angle = vec![FRAC_PI_2, -FRAC_PI_2];
        let (r, t) = b.run(3.0);
        let expected = 1.0 - 0.5 * FRAC_PI_2 * FRAC_PI_2;
        assert!((r[0] - expected).abs() < EPS, "{}", r[0]);
        assert!((r[1] - expected).abs() < EPS, "{}", r[1]);
        assert_eq!(t, vec![false, false]);
    }

    #[test]
    fn horizon_terminates_without_penalty() {
        let mut b = Batch::zeros(3);
        b.command[0] = 1.0;
        b.progress = vec![299, 298, 300];
        let (r, t) = b.run(3.0);
        assert!((r[0] - 0.2).abs() < EPS);
        assert_eq!(t, vec![true, false, true]);
        assert!((r[1] - 1.0).abs() < EPS);
    }

    #[test]
    fn environments_do_not_interact() {
        let mut b = Batch::zeros(3);
        b.cart_pos[1] = 10.0;
        let (r, t) = b.run(3.0);
        assert!((r[0] - 1.0).abs() < EPS);
        assert!((r[2] - 1.0).abs() < EPS);
        assert_eq!(t, vec![false, true, false]);
    }

    #[test]
    fn repeated_evaluation_is_identical() {
        let mut b = Batch::zeros(64);
        for i in 0..64 {
            let x = i as f32 * 0.1 - 3.2;
            b.cart_pos[i] = x;
            b.pole_angle[i] = x * 0.6;
            b.cart_vel[i] = -x;
            b.command[i] = 0.5;
            b.progress[i] = i as u32 * 5;
        }
        assert_eq!(b.run(3.0), b.run(3.0));
    }

    #[test]
    fn custom_weights_apply() {
        let weights = RewardWeights { tracking: 1.0, failure_penalty: -5.0, ..RewardWeights::default() };
        let (r, done) = step_reward(1.0, 0.0, 0.0, 0.0, 0.0, 3.0, false, &weights);
        assert!(r.abs() < EPS);
        assert!(!done);
        let (r, done) = step_reward(0.0, 0.0, 0.0, 0.0, 4.0, 3.0, false, &weights);
        assert!((r + 5.0).abs() < EPS);
        assert!(done);
    }
}
