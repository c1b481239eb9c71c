//! # Commanded Cart-Pole Task
//!
//! Ties the [`physics`] batch to the [`rl`] evaluator. One call to
//! [`CartpoleCmdTask::step`] is one environment step for the whole batch:
//!
//! 1.  **Pre-physics:** actions are clipped, scaled by `maxEffort` and written
//!     to the cart DOF of the effort buffer.
//! 2.  **Physics:** the batch is simulated for one `dt`.
//! 3.  **Post-physics:** progress advances; every environment flagged on the
//!     previous step is reset (physical state first, then command, progress
//!     and flag); observations are refreshed; rewards are evaluated, raising
//!     new reset flags; command markers go to the attached observer.
//!
//! A flagged environment is therefore always reset before its next reward is
//! computed, and the transition that ended its episode is still visible in
//! the outputs of the step that flagged it.

use crate::config::{TaskConfig, TaskConfigError};
use physics::{env_origins, CartPoleBatch, PhysicsError, Vec3, CART_DOF, NUM_DOF};
use rl::{CommandMarker, EpisodeState, ObsBuffer, StepObserver};

/// Positions of both DOFs are drawn from `[-POS_RESET_SPREAD / 2, POS_RESET_SPREAD / 2)`.
const POS_RESET_SPREAD: f32 = 1.0;
/// Velocities of both DOFs are drawn from `[-VEL_RESET_SPREAD / 2, VEL_RESET_SPREAD / 2)`.
const VEL_RESET_SPREAD: f32 = 0.5;

/// Borrowed results of one step.
pub struct StepOutput<'a> {
    pub obs: &'a ObsBuffer,
    pub rewards: &'a [f32],
    pub resets: &'a [bool],
}

pub struct CartpoleCmdTask {
    cfg: TaskConfig,
    physics: CartPoleBatch,
    episodes: EpisodeState,
    obs: ObsBuffer,
    rewards: Vec<f32>,
    efforts: Vec<f32>,
    origins: Vec<Vec3>,
    rng: fastrand::Rng,
    observer: Option<Box<dyn StepObserver>>,
}

impl CartpoleCmdTask {
    /// Builds the task and resets every environment.
    ///
    /// `seed` drives both command sampling and physical resets.
    ///
    /// # Errors
    ///
    /// Fails if `cfg` does not validate.
    pub fn new(cfg: TaskConfig, seed: u64) -> Result<Self, TaskConfigError> {
        cfg.validate()?;
        let n = cfg.env.num_envs;
        let physics = CartPoleBatch::new(n, cfg.sim.clone())?;
        let mut task = Self {
            episodes: EpisodeState::new(&cfg.env, seed),
            obs: ObsBuffer::new(n),
            rewards: vec![0.0; n],
            efforts: vec![0.0; n * NUM_DOF],
            origins: env_origins(n, cfg.env.env_spacing, cfg.sim.up_axis),
            rng: fastrand::Rng::with_seed(seed ^ 0x9e37_79b9_7f4a_7c15),
            observer: None,
            physics,
            cfg,
        };

        let all: Vec<usize> = (0..n).collect();
        task.reset_idx(&all)?;
        task.compute_observations(None);
        tracing::info!(num_envs = n, seed, "task ready");
        Ok(task)
    }

    /// Attaches an observer that receives one command marker per
    /// environment after every step.
    pub fn set_observer(&mut self, observer: Option<Box<dyn StepObserver>>) {
        self.observer = observer;
    }

    #[must_use]
    pub fn config(&self) -> &TaskConfig {
        &self.cfg
    }

    #[must_use]
    pub fn num_envs(&self) -> usize {
        self.cfg.env.num_envs
    }

    #[must_use]
    pub fn obs(&self) -> &ObsBuffer {
        &self.obs
    }

    #[must_use]
    pub fn rewards(&self) -> &[f32] {
        &self.rewards
    }

    #[must_use]
    pub fn episodes(&self) -> &EpisodeState {
        &self.episodes
    }

    #[must_use]
    pub fn physics(&self) -> &CartPoleBatch {
        &self.physics
    }

    /// Flat `[num_envs × NUM_DOF]` efforts written by the last pre-physics step.
    #[must_use]
    pub fn efforts(&self) -> &[f32] {
        &self.efforts
    }

    #[must_use]
    pub fn origins(&self) -> &[Vec3] {
        &self.origins
    }

    /// Runs one full step and returns its results.
    ///
    /// # Errors
    ///
    /// Fails if `actions` does not hold one value per environment.
    pub fn step(&mut self, actions: &[f32]) -> Result<StepOutput<'_>, PhysicsError> {
        self.pre_physics_step(actions)?;
        self.physics.simulate();
        self.post_physics_step()?;
        Ok(StepOutput {
            obs: &self.obs,
            rewards: &self.rewards,
            resets: self.episodes.reset_flags(),
        })
    }

    /// Converts actions into cart efforts for the next simulation.
    ///
    /// # Errors
    ///
    /// Fails if `actions` does not hold one value per environment.
    pub fn pre_physics_step(&mut self, actions: &[f32]) -> Result<(), PhysicsError> {
        let n = self.num_envs();
        if actions.len() != n {
            return Err(PhysicsError::ShapeMismatch {
                what: "actions",
                expected: n,
                actual: actions.len(),
            });
        }
        let clip = self.cfg.env.clip_actions;
        let max_effort = self.cfg.env.max_effort;
        for (dofs, &action) in self.efforts.chunks_exact_mut(NUM_DOF).zip(actions) {
            dofs.fill(0.0);
            dofs[CART_DOF] = action.clamp(-clip, clip) * max_effort;
        }
        self.physics.set_actuation_forces(&self.efforts)
    }

    /// Bookkeeping after the physics step; see the module docs for the order.
    ///
    /// # Errors
    ///
    /// Propagates failures of the physical reset.
    pub fn post_physics_step(&mut self) -> Result<(), PhysicsError> {
        self.episodes.advance_step();

        let pending = self.episodes.pending_resets();
        if !pending.is_empty() {
            self.reset_idx(&pending)?;
        }

        self.compute_observations(None);
        self.compute_reward();
        self.emit_markers();
        Ok(())
    }

    /// Starts new episodes for `ids`: random DOF state, then a fresh command,
    /// zero progress and a cleared reset flag.
    ///
    /// # Errors
    ///
    /// Fails if an id is outside the batch.
    pub fn reset_idx(&mut self, ids: &[usize]) -> Result<(), PhysicsError> {
        let len = ids.len() * NUM_DOF;
        let positions: Vec<f32> = (0..len)
            .map(|_| POS_RESET_SPREAD * (self.rng.f32() - 0.5))
            .collect();
        let velocities: Vec<f32> = (0..len)
            .map(|_| VEL_RESET_SPREAD * (self.rng.f32() - 0.5))
            .collect();
        self.physics.set_dof_state_indexed(ids, &positions, &velocities)?;

        self.episodes
            .reset_envs(ids, self.cfg.env.random_command_pos_ranges);
        tracing::debug!(count = ids.len(), "reset environments");
        Ok(())
    }

    /// Refreshes observations for `ids`, or for every environment.
    pub fn compute_observations(&mut self, ids: Option<&[usize]>) {
        self.obs.assemble(
            ids,
            self.physics.dof_pos(),
            self.physics.dof_vel(),
            self.episodes.commands(),
        );
    }

    fn compute_reward(&mut self) {
        self.episodes.evaluate(
            &self.obs,
            self.cfg.env.reset_dist,
            &self.cfg.env.reward_weights,
            &mut self.rewards,
        );
    }

    fn emit_markers(&mut self) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        observer.begin_step();
        for (env, (origin, &command)) in self
            .origins
            .iter()
            .zip(self.episodes.commands())
            .enumerate()
        {
            observer.on_marker(env, CommandMarker::at((*origin).into(), command));
        }
    }
}
