use std::path::PathBuf;

/// Result type for arcade-dqn operations
pub type Result<T> = std::result::Result<T, DqnError>;

/// Main error type for the learning core
#[derive(Debug, thiserror::Error)]
pub enum DqnError {
    /// Sampling was attempted on a replay memory holding no transitions
    #[error("attempt to sample empty replay memory")]
    EmptyMemory,

    /// An observation or batch does not match the network's expected shape
    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        expected: String,
        actual: String,
    },

    /// NaN or infinite value in a loss or TD target
    #[error("numeric instability: {0}")]
    NumericInstability(String),

    /// Invalid parameter value
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Action index outside the discrete action set
    #[error("invalid action {action}: must be less than {num_actions}")]
    InvalidAction {
        action: usize,
        num_actions: usize,
    },

    /// A checkpoint or transition log could not be read
    #[error("failed to load {path}: {reason}")]
    Load {
        path: PathBuf,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// Helper functions for common error patterns
impl DqnError {
    pub fn shape_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DqnError::ShapeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        DqnError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether the caller may skip the failed update and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DqnError::EmptyMemory)
    }
}
