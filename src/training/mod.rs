//! # Training Loop
//!
//! [`Trainer`] drives an [`Environment`](crate::env::Environment) with a
//! [`DqnAgent`](crate::agent::DqnAgent): act, step, remember, replay, decay
//! exploration and checkpoint, episode after episode.
//!
//! [`run_experiment`] assembles everything from an
//! [`ExperimentConfig`](crate::config::ExperimentConfig) around the built-in
//! [`PaddleGame`](crate::env::PaddleGame) and writes the results directory:
//!
//! ```text
//! <results>/<experiment_id>/<run_id>_<variant_id>/
//!     variant.json        configuration of the run
//!     metrics.json        training metrics
//!     policy_<step>.bin   periodic checkpoints
//!     policy_final.bin    checkpoint after the last episode
//!     memory.bin          replay memory, when `save_memory` is set
//! ```

mod trainer;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::agent::DqnAgentBuilder;
use crate::builders::ReplayMemoryBuilder;
use crate::config::ExperimentConfig;
use crate::env::{Environment, FrameProcessor, PaddleGame};
use crate::error::Result;

pub use trainer::{EpisodeSummary, Trainer, TrainingConfig, TrainingSummary};

/// Train one configured variant on the built-in paddle game.
pub fn run_experiment(config: &ExperimentConfig, results_root: &Path) -> Result<TrainingSummary> {
    config.validate()?;
    let result_dir = config.result_dir(results_root);
    fs::create_dir_all(&result_dir)?;
    config.save(&result_dir.join("variant.json"))?;
    info!(dir = %result_dir.display(), "starting experiment");

    let game = match config.seed {
        Some(seed) => PaddleGame::with_seed(config.env.points_to_win, seed),
        None => PaddleGame::new(config.env.points_to_win),
    }
    .with_max_frames(config.env.max_frames);
    let env = FrameProcessor::new(game, config.env.clone())?;

    let mut network = config
        .network
        .builder(env.observation_shape(), env.num_actions())
        .max_grad_norm(config.agent.max_grad_norm);
    let mut memory = ReplayMemoryBuilder::new().capacity(config.agent.capacity);
    if let Some(seed) = config.seed {
        network = network.seed(seed);
        memory = memory.seed(seed.wrapping_add(1));
    }
    if let Some(path) = &config.training.preload_memory {
        memory = memory.preload(path);
    }

    let mut agent = DqnAgentBuilder::new()
        .config(config.agent.clone())
        .network(network.build()?)
        .memory(memory.build()?);
    if let Some(seed) = config.seed {
        agent = agent.seed(seed.wrapping_add(2));
    }
    let mut agent = agent.build()?;
    if let Some(path) = &config.training.load_agent {
        agent.load_checkpoint(path)?;
    }

    let mut trainer = Trainer::new(env, agent, config.training.clone(), result_dir)?;
    trainer.run()
}
