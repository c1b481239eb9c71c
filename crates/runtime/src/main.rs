#![deny(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use runtime::app::{self, RunOptions};
use runtime::plot::{FunctionPlot, PlotLabels};
use runtime::policy::PolicyKind;

#[derive(Parser, Debug)]
#[command(author, version, about = "Commanded cart-pole runtime")]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Step the task headless with a stand-in policy.
    Run {
        /// JSON task file; defaults are used when absent.
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        num_envs: Option<usize>,
        #[arg(long, default_value_t = 1000)]
        steps: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = PolicyKind::Zero)]
        policy: PolicyKind,
        /// Steps between statistics reports; 0 reports only at the end.
        #[arg(long, default_value_t = 100)]
        log_every: usize,
        /// Log the command marker of every environment (needs --verbose).
        #[arg(long)]
        markers: bool,
    },
    /// Plot f(x) = x^2 to a PNG.
    Plot {
        #[arg(short, long, default_value = "function_plot.png")]
        output: PathBuf,
        /// Chart caption.
        #[arg(long, default_value = "f(x) = x^2")]
        title: String,
        #[arg(long, default_value_t = 400)]
        samples: usize,
        #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
        x_min: f32,
        #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
        x_max: f32,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 600)]
        height: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Command::Run {
            config,
            num_envs,
            steps,
            seed,
            policy,
            log_every,
            markers,
        } => {
            let summary = app::run(&RunOptions {
                config,
                num_envs,
                steps,
                seed,
                policy,
                log_every,
                markers,
            })?;
            println!(
                "completed {} episodes over {} steps x {} envs",
                summary.episodes, summary.steps, summary.num_envs
            );
        }
        Command::Plot {
            output,
            title,
            samples,
            x_min,
            x_max,
            width,
            height,
        } => {
            anyhow::ensure!(x_max > x_min, "--x-max must exceed --x-min");
            let labels = PlotLabels { title, ..PlotLabels::default() };
            FunctionPlot::sample(|x| x * x, x_min, x_max, samples)
                .with_labels(labels)
                .save(&output, width, height)?;
            println!("wrote {}", output.display());
        }
    }
    Ok(())
}
