use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter};

use arcade_dqn::config::ExperimentConfig;
use arcade_dqn::training::run_experiment;

/// Train a DQN agent on the built-in paddle game.
#[derive(Parser)]
#[command(name = "train", about = "Train a DQN agent on the paddle game")]
struct Cli {
    /// Path to JSON experiment configuration
    #[arg(long, default_value = "experiment.json")]
    config: PathBuf,

    /// Root directory for run results
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,

    /// Override number of training episodes
    #[arg(long)]
    episodes: Option<usize>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Log every learning update
    #[arg(long)]
    verbose: bool,
}

fn log_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // the config can raise the level too, so the filter stays reloadable
    let (filter, filter_handle) = reload::Layer::new(log_filter(cli.verbose));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let mut config = ExperimentConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(episodes) = cli.episodes {
        config.training.max_episodes = episodes;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if cli.verbose {
        config.training.verbose = true;
    } else if config.training.verbose {
        filter_handle
            .reload(log_filter(true))
            .context("enabling debug logging")?;
    }
    config.validate().context("invalid configuration")?;

    let summary = run_experiment(&config, &cli.results_dir).with_context(|| {
        format!(
            "training {}/{}_{}",
            config.experiment_id, config.run_id, config.variant_id
        )
    })?;

    info!(
        episodes = summary.episodes,
        total_steps = summary.total_steps,
        mean_reward = summary.mean_reward.unwrap_or(0.0),
        final_epsilon = summary.final_epsilon,
        "training complete"
    );
    Ok(())
}
