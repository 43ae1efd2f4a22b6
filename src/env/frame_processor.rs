use std::collections::VecDeque;

use ndarray::{concatenate, Array2, ArrayView2, Axis};

use super::preprocess::preprocess;
use super::{EnvConfig, Environment, Frame, RawEnvironment, Step};
use crate::error::{DqnError, Result};
use crate::transition::Observation;

/// Adapts a [`RawEnvironment`] into an [`Environment`] of stacked,
/// preprocessed grayscale frames.
pub struct FrameProcessor<E: RawEnvironment> {
    env: E,
    config: EnvConfig,
    frames: VecDeque<Array2<f32>>,
}

impl<E: RawEnvironment> FrameProcessor<E> {
    pub fn new(env: E, config: EnvConfig) -> Result<Self> {
        if config.frame_skip == 0 {
            return Err(DqnError::invalid_parameter("frame_skip", "must be greater than 0"));
        }
        if config.input_dim == 0 {
            return Err(DqnError::invalid_parameter("input_dim", "must be greater than 0"));
        }
        if config.stacked_frames == 0 {
            return Err(DqnError::invalid_parameter("stacked_frames", "must be greater than 0"));
        }
        if !config.step_penalty.is_finite() {
            return Err(DqnError::invalid_parameter("step_penalty", "must be finite"));
        }
        let (height, _) = env.frame_size();
        if config.crop_top >= config.crop_bottom || config.crop_bottom > height {
            return Err(DqnError::invalid_parameter(
                "crop".to_string(),
                format!(
                    "rows {}..{} do not fit a frame of height {}",
                    config.crop_top, config.crop_bottom, height
                ),
            ));
        }
        if config.allowed_actions.is_empty() {
            return Err(DqnError::invalid_parameter("allowed_actions", "must not be empty"));
        }
        if let Some(&action) = config.allowed_actions.iter().find(|&&a| a >= env.num_actions()) {
            return Err(DqnError::InvalidAction {
                action,
                num_actions: env.num_actions(),
            });
        }
        if !config.allowed_actions.contains(&config.default_action) {
            return Err(DqnError::invalid_parameter(
                "default_action".to_string(),
                format!("{} is not an allowed action", config.default_action),
            ));
        }

        Ok(FrameProcessor {
            frames: VecDeque::with_capacity(config.stacked_frames),
            env,
            config,
        })
    }

    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Action actually sent to the emulator for `action`.
    pub fn resolve_action(&self, action: usize) -> usize {
        if self.config.allowed_actions.contains(&action) {
            action
        } else {
            self.config.default_action
        }
    }

    fn process(&self, frame: &Frame) -> Result<Array2<f32>> {
        preprocess(
            frame.view(),
            self.config.crop_top,
            self.config.crop_bottom,
            self.config.input_dim,
        )
    }

    fn stacked(&self) -> Result<Observation> {
        let views: Vec<ArrayView2<f32>> = self.frames.iter().map(|f| f.view()).collect();
        let stacked = concatenate(Axis(0), &views)
            .map_err(|e| DqnError::shape_mismatch(format!("{:?}", self.observation_shape()), e.to_string()))?;
        Ok(stacked.insert_axis(Axis(0)))
    }
}

impl<E: RawEnvironment> Environment for FrameProcessor<E> {
    fn reset(&mut self) -> Result<Observation> {
        let frame = self.env.reset()?;
        let processed = self.process(&frame)?;
        self.frames.clear();
        for _ in 0..self.config.stacked_frames {
            self.frames.push_back(processed.clone());
        }
        self.stacked()
    }

    /// Repeat `action` for `frame_skip` emulator frames, stopping early when
    /// the episode ends. Frames without reward cost `step_penalty`.
    fn step(&mut self, action: usize) -> Result<Step> {
        if self.frames.is_empty() {
            return Err(DqnError::invalid_parameter("step", "reset must be called before the first step"));
        }
        let action = self.resolve_action(action);

        let mut total_reward = 0.0;
        let mut last = None;
        let mut done = false;
        for _ in 0..self.config.frame_skip {
            let raw = self.env.step(action)?;
            if raw.reward == 0.0 {
                total_reward -= self.config.step_penalty;
            } else {
                total_reward += raw.reward;
            }
            done = raw.done;
            last = Some(raw.frame);
            if done {
                break;
            }
        }

        if let Some(frame) = last {
            let processed = self.process(&frame)?;
            if self.frames.len() == self.config.stacked_frames {
                self.frames.pop_front();
            }
            self.frames.push_back(processed);
        }

        Ok(Step {
            state: self.stacked()?,
            reward: total_reward,
            done,
        })
    }

    fn num_actions(&self) -> usize {
        self.config.allowed_actions.len()
    }

    fn observation_shape(&self) -> [usize; 3] {
        [1, self.config.input_dim * self.config.stacked_frames, self.config.input_dim]
    }
}
