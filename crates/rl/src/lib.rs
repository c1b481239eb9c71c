#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Commanded Cart-Pole Episode Evaluator
//!
//! Reward, termination and reset bookkeeping for a batch of cart-pole
//! environments whose cart is asked to track a commanded position.
//!
//! The crate has no knowledge of the simulator driving it. A caller steps its
//! physics, feeds the resulting cart and pole state into an [`ObsBuffer`], and
//! asks the [`EpisodeState`] to evaluate rewards and raise reset flags. Every
//! environment is independent, so the reward kernel runs as a parallel map
//! over the batch.
//!
//! ## Key Components
//!
//! -   [`reward`]: the closed-form reward and its termination overrides, as a
//!     pure function over parallel arrays.
//! -   [`episode`]: per-environment commands, progress counters and reset
//!     flags, plus the reset policy that resamples commands.
//! -   [`observation`]: the five-component observation buffer.
//! -   [`config`]: the `env` section of a task file.
//! -   [`viz`]: the observer contract for per-environment command markers.
//!
//! ## Usage
//!
//! ```rust
//! use rl::{EnvConfig, EpisodeState, ObsBuffer};
//!
//! let cfg = EnvConfig { num_envs: 4, ..EnvConfig::default() };
//! let mut episodes = EpisodeState::new(&cfg, 7);
//! let mut obs = ObsBuffer::new(cfg.num_envs);
//! let mut rewards = vec![0.0; cfg.num_envs];
//!
//! let all: Vec<usize> = (0..cfg.num_envs).collect();
//! episodes.reset_envs(&all, cfg.random_command_pos_ranges);
//!
//! episodes.advance_step();
//! let dof_pos = vec![[0.0, 0.0]; cfg.num_envs];
//! let dof_vel = vec![[0.0, 0.0]; cfg.num_envs];
//! obs.assemble(None, &dof_pos, &dof_vel, episodes.commands());
//! episodes.evaluate(&obs, cfg.reset_dist, &cfg.reward_weights, &mut rewards);
//! assert!(episodes.pending_resets().is_empty());
//! ```

pub mod config;
pub mod episode;
pub mod observation;
pub mod reward;
pub mod viz;

mod command;

pub use command::CommandSampler;
pub use config::{ConfigError, EnvConfig};
pub use episode::{EpisodePhase, EpisodeState};
pub use observation::{ObsBuffer, NUM_OBS};
pub use reward::{compute_reward, compute_reward_into, step_reward, RewardInputs, RewardWeights};
pub use viz::{CommandMarker, StepObserver};
