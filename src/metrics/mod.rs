//! Training metrics: bounded histories and running averages.

pub mod tracker;

pub use tracker::{MetricsTracker, TrainingMetrics};
