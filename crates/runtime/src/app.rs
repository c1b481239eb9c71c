//! # Headless Runner
//!
//! Drives a [`CartpoleCmdTask`] with a stand-in policy and reports episode
//! statistics through `tracing`. This is what `runtime_main run` executes.

use anyhow::{Context, Result};
use rl::{CommandMarker, StepObserver, NUM_OBS};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::TaskConfig;
use crate::policy::PolicyKind;
use crate::stats::EpisodeStats;
use crate::task::CartpoleCmdTask;

/// Settings for one headless run. `None` fields keep the task file's values.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub num_envs: Option<usize>,
    pub steps: usize,
    pub seed: u64,
    pub policy: PolicyKind,
    /// Log statistics every `log_every` steps; `0` logs only at the end.
    pub log_every: usize,
    /// Emit command markers at debug level.
    pub markers: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config: None,
            num_envs: None,
            steps: 1000,
            seed: 0,
            policy: PolicyKind::Zero,
            log_every: 100,
            markers: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub num_envs: usize,
    pub episodes: u32,
    pub mean_return: Option<f32>,
    pub mean_length: Option<f32>,
}

/// Logs every marker at debug level.
#[derive(Default)]
struct TraceMarkers {
    step: u64,
}

impl StepObserver for TraceMarkers {
    fn begin_step(&mut self) {
        self.step += 1;
    }

    fn on_marker(&mut self, env: usize, marker: CommandMarker) {
        tracing::debug!(
            step = self.step,
            env,
            x = marker.location[0],
            y = marker.location[1],
            z = marker.location[2],
            "command marker"
        );
    }
}

/// Loads the task, runs `opts.steps` steps and returns the episode statistics.
///
/// # Errors
///
/// Fails if the task file cannot be loaded or the overridden config does not
/// validate.
pub fn run(opts: &RunOptions) -> Result<RunSummary> {
    let mut cfg = match &opts.config {
        Some(path) => TaskConfig::from_path(path)
            .with_context(|| format!("loading task file {}", path.display()))?,
        None => TaskConfig::default(),
    };
    if let Some(n) = opts.num_envs {
        cfg.env.num_envs = n;
    }
    let markers = opts.markers || cfg.env.enable_debug_vis;

    let mut task = CartpoleCmdTask::new(cfg, opts.seed).context("building task")?;
    if markers {
        task.set_observer(Some(Box::new(TraceMarkers::default())));
    }
    let num_envs = task.num_envs();
    let mut policy = opts.policy.build(opts.seed.wrapping_add(1));
    let mut actions = vec![0.0; num_envs];
    let mut obs_rows = vec![0.0; num_envs * NUM_OBS];
    let mut stats = EpisodeStats::new(num_envs);
    // episodes completed since the last progress report
    let mut window = EpisodeStats::new(num_envs);

    tracing::info!(
        num_envs,
        steps = opts.steps,
        policy = ?opts.policy,
        "starting headless run"
    );
    let start = Instant::now();
    for i in 0..opts.steps {
        task.obs().write_row_major(&mut obs_rows);
        policy.act(&obs_rows, &mut actions);
        let out = task.step(&actions)?;
        stats.record(out.rewards, out.resets);
        window.record(out.rewards, out.resets);

        if opts.log_every > 0 && (i + 1) % opts.log_every == 0 {
            tracing::info!(
                step = i + 1,
                episodes = stats.episode_count,
                window_episodes = window.episode_count,
                mean_return = window.mean_return(),
                mean_length = window.mean_length(),
                "progress"
            );
            window.clear();
        }
    }

    let summary = RunSummary {
        steps: opts.steps,
        num_envs,
        episodes: stats.episode_count,
        mean_return: stats.mean_return(),
        mean_length: stats.mean_length(),
    };
    tracing::info!(
        episodes = summary.episodes,
        mean_return = summary.mean_return,
        mean_length = summary.mean_length,
        elapsed_s = start.elapsed().as_secs_f64(),
        "run finished"
    );
    Ok(summary)
}
