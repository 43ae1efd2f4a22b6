use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::activations::Activation;
use crate::agent::AgentConfig;
use crate::builders::MlpQNetworkBuilder;
use crate::env::EnvConfig;
use crate::error::{DqnError, Result};
use crate::training::TrainingConfig;

/// Optimizer selection as it appears in a configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizerConfig {
    Sgd,
    Adam { beta1: f32, beta2: f32, epsilon: f32 },
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig::Adam {
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

/// Q-network architecture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub hidden_layers: Vec<usize>,
    pub activation: Activation,
    pub optimizer: OptimizerConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            hidden_layers: vec![128, 128],
            activation: Activation::Relu,
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl NetworkConfig {
    /// Builder for a network of this architecture over the given
    /// observation shape and action count.
    pub fn builder(&self, input_shape: [usize; 3], num_actions: usize) -> MlpQNetworkBuilder {
        let builder = MlpQNetworkBuilder::new()
            .input_shape(input_shape)
            .num_actions(num_actions)
            .hidden_layers(&self.hidden_layers)
            .activation(self.activation);
        match self.optimizer {
            OptimizerConfig::Sgd => builder.with_sgd(),
            OptimizerConfig::Adam { beta1, beta2, epsilon } => builder.with_adam(beta1, beta2, epsilon),
        }
    }
}

/// Top-level configuration of one training run, loadable from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub experiment_id: String,
    pub run_id: String,
    pub variant_id: String,
    /// Seeds the game, network initialization, sampling and exploration
    pub seed: Option<u64>,
    pub agent: AgentConfig,
    pub network: NetworkConfig,
    pub env: EnvConfig,
    pub training: TrainingConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            experiment_id: "default".to_string(),
            run_id: "0".to_string(),
            variant_id: "0".to_string(),
            seed: None,
            agent: AgentConfig::default(),
            network: NetworkConfig::default(),
            env: EnvConfig::default(),
            training: TrainingConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DqnError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: ExperimentConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for (name, id) in [
            ("experiment_id", &self.experiment_id),
            ("run_id", &self.run_id),
            ("variant_id", &self.variant_id),
        ] {
            if id.is_empty() || id.contains(['/', '\\']) {
                return Err(DqnError::invalid_parameter(
                    name.to_string(),
                    format!("'{}' is not a usable directory name", id),
                ));
            }
        }

        self.agent.validate()?;
        self.training.validate()?;

        if self.network.hidden_layers.iter().any(|&h| h == 0) {
            return Err(DqnError::invalid_parameter("network.hidden_layers", "layer sizes must be positive"));
        }

        let env = &self.env;
        if env.frame_skip == 0 || env.input_dim == 0 || env.stacked_frames == 0 {
            return Err(DqnError::invalid_parameter(
                "env",
                "frame_skip, input_dim and stacked_frames must be greater than 0",
            ));
        }
        if env.crop_top >= env.crop_bottom {
            return Err(DqnError::invalid_parameter(
                "env.crop_top".to_string(),
                format!("must be below crop_bottom ({} >= {})", env.crop_top, env.crop_bottom),
            ));
        }
        if !env.allowed_actions.contains(&env.default_action) {
            return Err(DqnError::invalid_parameter(
                "env.default_action".to_string(),
                format!("{} is not in allowed_actions {:?}", env.default_action, env.allowed_actions),
            ));
        }
        if env.points_to_win == 0 {
            return Err(DqnError::invalid_parameter("env.points_to_win", "must be greater than 0"));
        }
        Ok(())
    }

    /// `<root>/<experiment_id>/<run_id>_<variant_id>`
    pub fn result_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.experiment_id)
            .join(format!("{}_{}", self.run_id, self.variant_id))
    }
}
