use std::collections::VecDeque;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::Result;

/// Stores training metrics over time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Loss of every learning update
    pub losses: VecDeque<f32>,

    /// Mean sampled action value of every learning update
    pub q_values: VecDeque<f32>,

    /// Total shaped reward per episode
    pub episode_rewards: VecDeque<f32>,

    /// Agent steps per episode
    pub episode_lengths: VecDeque<usize>,

    /// Exploration rate at the end of each episode
    pub epsilons: VecDeque<f32>,
}

fn push_bounded<T>(history: &mut VecDeque<T>, value: T, limit: usize) {
    if history.len() >= limit {
        history.pop_front();
    }
    history.push_back(value);
}

fn recent_mean<'a, I>(values: I, window: usize) -> Option<f32>
where
    I: DoubleEndedIterator<Item = &'a f32> + ExactSizeIterator,
{
    let n = window.min(values.len());
    if n == 0 {
        return None;
    }
    let sum: f32 = values.rev().take(n).sum();
    Some(sum / n as f32)
}

/// Tracks metrics during training
pub struct MetricsTracker {
    metrics: TrainingMetrics,
    history_size: usize,

    // Episode tracking
    current_episode_reward: f32,
    current_episode_length: usize,
    episode_count: usize,

    // Step tracking
    total_steps: u64,
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        MetricsTracker {
            metrics: TrainingMetrics::default(),
            history_size: history_size.max(1),
            current_episode_reward: 0.0,
            current_episode_length: 0,
            episode_count: 0,
            total_steps: 0,
        }
    }

    /// Record the loss and mean action value of a learning update
    pub fn record_update(&mut self, loss: f32, mean_q: f32) {
        push_bounded(&mut self.metrics.losses, loss, self.history_size);
        push_bounded(&mut self.metrics.q_values, mean_q, self.history_size);
    }

    /// Start a new episode
    pub fn start_episode(&mut self) {
        self.current_episode_reward = 0.0;
        self.current_episode_length = 0;
    }

    /// Record a step within an episode
    pub fn step(&mut self, reward: f32) {
        self.current_episode_reward += reward;
        self.current_episode_length += 1;
        self.total_steps += 1;
    }

    /// End the current episode
    pub fn end_episode(&mut self, epsilon: f32) {
        push_bounded(&mut self.metrics.episode_rewards, self.current_episode_reward, self.history_size);
        push_bounded(&mut self.metrics.episode_lengths, self.current_episode_length, self.history_size);
        push_bounded(&mut self.metrics.epsilons, epsilon, self.history_size);
        self.episode_count += 1;
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn current_episode_reward(&self) -> f32 {
        self.current_episode_reward
    }

    pub fn current_episode_length(&self) -> usize {
        self.current_episode_length
    }

    /// Get recent average loss
    pub fn avg_loss(&self, window: usize) -> Option<f32> {
        recent_mean(self.metrics.losses.iter(), window)
    }

    pub fn avg_q_value(&self, window: usize) -> Option<f32> {
        recent_mean(self.metrics.q_values.iter(), window)
    }

    /// Get recent average episode reward
    pub fn avg_episode_reward(&self, window: usize) -> Option<f32> {
        recent_mean(self.metrics.episode_rewards.iter(), window)
    }

    pub fn avg_episode_length(&self, window: usize) -> Option<f32> {
        let n = window.min(self.metrics.episode_lengths.len());
        if n == 0 {
            return None;
        }
        let sum: usize = self.metrics.episode_lengths.iter().rev().take(n).sum();
        Some(sum as f32 / n as f32)
    }

    /// Save metrics to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.metrics)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load metrics from a JSON file
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let data = std::fs::read_to_string(path)?;
        self.metrics = serde_json::from_str(&data)?;
        Ok(())
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_accounting() {
        let mut tracker = MetricsTracker::new(10);
        tracker.start_episode();
        tracker.step(1.0);
        tracker.step(-0.5);
        tracker.end_episode(0.9);

        assert_eq!(tracker.episode_count(), 1);
        assert_eq!(tracker.total_steps(), 2);
        assert_eq!(tracker.avg_episode_reward(10), Some(0.5));
        assert_eq!(tracker.avg_episode_length(10), Some(2.0));
        assert_eq!(tracker.metrics().epsilons, VecDeque::from(vec![0.9]));
    }

    #[test]
    fn test_histories_are_bounded() {
        let mut tracker = MetricsTracker::new(3);
        for i in 0..5 {
            tracker.record_update(i as f32, 0.0);
        }
        assert_eq!(tracker.metrics().losses, VecDeque::from(vec![2.0, 3.0, 4.0]));
        assert_eq!(tracker.avg_loss(2), Some(3.5));
    }

    #[test]
    fn test_averages_empty() {
        let tracker = MetricsTracker::default();
        assert_eq!(tracker.avg_loss(10), None);
        assert_eq!(tracker.avg_episode_reward(10), None);
        assert_eq!(tracker.avg_episode_length(10), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        let mut tracker = MetricsTracker::new(5);
        tracker.record_update(0.25, 1.5);
        tracker.save(&path).unwrap();

        let mut restored = MetricsTracker::new(5);
        restored.load(&path).unwrap();
        assert_eq!(restored.metrics(), tracker.metrics());
    }
}
