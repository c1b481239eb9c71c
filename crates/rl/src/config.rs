//! The `env` section of a task file.

use crate::reward::RewardWeights;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for `{param}`: {message}")]
    InvalidConfig { param: &'static str, message: String },
}

/// Environment options of the commanded cart-pole task.
///
/// Keys are camelCase in task files; every key is optional.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvConfig {
    /// Number of environments in the batch.
    pub num_envs: usize,
    /// Distance between neighbouring environment origins.
    pub env_spacing: f32,
    /// Cart position magnitude beyond which an episode fails.
    pub reset_dist: f32,
    /// Force applied to the cart for an action of 1.0.
    pub max_effort: f32,
    /// Episode horizon in steps.
    pub max_episode_length: u32,
    /// Commands are drawn from `[-range, range]`.
    pub random_command_pos_ranges: f32,
    /// Actions are clamped to `[-clip, clip]` before scaling.
    pub clip_actions: f32,
    /// Emit a command marker per environment every step.
    pub enable_debug_vis: bool,
    pub reward_weights: RewardWeights,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            num_envs: 512,
            env_spacing: 4.0,
            reset_dist: 3.0,
            max_effort: 400.0,
            max_episode_length: 300,
            random_command_pos_ranges: 1.0,
            clip_actions: 1.0,
            enable_debug_vis: false,
            reward_weights: RewardWeights::default(),
        }
    }
}

impl EnvConfig {
    /// Rejects values the task cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfig`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_envs == 0 {
            return Err(invalid("numEnvs", "must be at least 1"));
        }
        if self.max_episode_length == 0 {
            return Err(invalid("maxEpisodeLength", "must be at least 1"));
        }
        positive("resetDist", self.reset_dist)?;
        positive("clipActions", self.clip_actions)?;
        finite("maxEffort", self.max_effort)?;
        finite("envSpacing", self.env_spacing)?;
        finite("randomCommandPosRanges", self.random_command_pos_ranges)?;
        if self.random_command_pos_ranges < 0.0 {
            return Err(invalid("randomCommandPosRanges", "must not be negative"));
        }
        let w = &self.reward_weights;
        for (param, value) in [
            ("rewardWeights.angle", w.angle),
            ("rewardWeights.cartVel", w.cart_vel),
            ("rewardWeights.poleVel", w.pole_vel),
            ("rewardWeights.tracking", w.tracking),
            ("rewardWeights.failurePenalty", w.failure_penalty),
        ] {
            finite(param, value)?;
        }
        Ok(())
    }
}

fn invalid(param: &'static str, message: &str) -> ConfigError {
    ConfigError::InvalidConfig { param, message: message.to_string() }
}

fn finite(param: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(param, "must be finite"))
    }
}

fn positive(param: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(param, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(param, "must be greater than zero"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = EnvConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_episode_length, 300);
    }

    #[test]
    fn parses_camel_case_keys() {
        let cfg: EnvConfig = serde_json::from_str(
            r#"{
                "numEnvs": 16,
                "resetDist": 2.5,
                "maxEffort": 100.0,
                "randomCommandPosRanges": 0.5,
                "rewardWeights": { "tracking": 1.2 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.num_envs, 16);
        assert!((cfg.reset_dist - 2.5).abs() < f32::EPSILON);
        assert!((cfg.random_command_pos_ranges - 0.5).abs() < f32::EPSILON);
        assert_eq!(cfg.max_episode_length, 300);
        assert!((cfg.reward_weights.tracking - 1.2).abs() < f32::EPSILON);
        assert!((cfg.reward_weights.angle - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_empty_batch() {
        let cfg = EnvConfig { num_envs: 0, ..EnvConfig::default() };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("numEnvs"), "{err}");
    }

    #[test]
    fn rejects_bad_ranges() {
        let cfg = EnvConfig { random_command_pos_ranges: -1.0, ..EnvConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = EnvConfig { reset_dist: 0.0, ..EnvConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = EnvConfig { max_effort: f32::NAN, ..EnvConfig::default() };
        assert!(cfg.validate().is_err());
    }
}
