//! Task files.
//!
//! A task file is JSON with an `env` and a `sim` section, both optional:
//!
//! ```json
//! {
//!   "env": { "numEnvs": 256, "resetDist": 3.0, "randomCommandPosRanges": 1.0 },
//!   "sim": { "dt": 0.0166, "upAxis": "z" }
//! }
//! ```

use physics::{PhysicsError, SimConfig};
use rl::{ConfigError, EnvConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskConfigError {
    #[error("failed to read task file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed task file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Env(#[from] ConfigError),
    #[error(transparent)]
    Sim(#[from] PhysicsError),
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub env: EnvConfig,
    pub sim: SimConfig,
}

impl TaskConfig {
    /// Parses and validates a task file's contents.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or on any value rejected by validation.
    pub fn from_json(json: &str) -> Result<Self, TaskConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates the task file at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, plus everything [`from_json`](Self::from_json) rejects.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TaskConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TaskConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), num_envs = cfg.env.num_envs, "loaded task file");
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns the first validation failure of either section.
    pub fn validate(&self) -> Result<(), TaskConfigError> {
        self.env.validate()?;
        self.sim.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let cfg = TaskConfig::from_json("{}").unwrap();
        assert_eq!(cfg, TaskConfig::default());
    }

    #[test]
    fn invalid_env_value_surfaces() {
        let err = TaskConfig::from_json(r#"{ "env": { "numEnvs": 0 } }"#).unwrap_err();
        assert!(matches!(err, TaskConfigError::Env(_)), "{err}");
    }

    #[test]
    fn invalid_sim_value_surfaces() {
        let err = TaskConfig::from_json(r#"{ "sim": { "dt": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, TaskConfigError::Sim(_)), "{err}");
    }

    #[test]
    fn syntax_error_is_parse_error() {
        let err = TaskConfig::from_json("{ env: }").unwrap_err();
        assert!(matches!(err, TaskConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TaskConfig::from_path("does/not/exist.json").unwrap_err();
        assert!(matches!(err, TaskConfigError::Io { .. }));
    }
}
