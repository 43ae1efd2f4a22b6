//! # Environments
//!
//! [`Environment`] is what the training loop drives: it yields
//! preprocessed [`Observation`]s and shaped rewards. Emulators that render
//! raw RGB screens implement [`RawEnvironment`] instead and are adapted by
//! [`FrameProcessor`], which handles action restriction, frame skipping,
//! reward shaping, cropping, grayscale conversion, resizing and frame
//! stacking.
//!
//! [`PaddleGame`] is a small built-in two-paddle ball game with the screen
//! geometry and action meanings of Atari Pong.

mod frame_processor;
pub mod paddle;
pub mod preprocess;

use ndarray::Array3;
use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::transition::Observation;

pub use frame_processor::FrameProcessor;
pub use paddle::PaddleGame;

/// Outcome of one environment step.
#[derive(Clone, Debug)]
pub struct Step {
    pub state: Observation,
    pub reward: f32,
    pub done: bool,
}

pub trait Environment {
    /// Start a new episode and return its first observation.
    fn reset(&mut self) -> Result<Observation>;

    fn step(&mut self, action: usize) -> Result<Step>;

    fn num_actions(&self) -> usize;

    /// Shape `(channels, height, width)` of every observation.
    fn observation_shape(&self) -> [usize; 3];
}

/// An RGB screen laid out as `(height, width, 3)`.
pub type Frame = Array3<u8>;

#[derive(Clone, Debug)]
pub struct RawStep {
    pub frame: Frame,
    pub reward: f32,
    pub done: bool,
}

/// An emulator that renders raw screens.
pub trait RawEnvironment {
    fn reset(&mut self) -> Result<Frame>;

    fn step(&mut self, action: usize) -> Result<RawStep>;

    /// Size of the emulator's full action set.
    fn num_actions(&self) -> usize;

    /// `(height, width)` of every frame.
    fn frame_size(&self) -> (usize, usize);
}

/// Environment and preprocessing settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Emulator frames per agent step
    pub frame_skip: usize,
    /// Side length of a resized frame
    pub input_dim: usize,
    /// Frames stacked along the height axis of an observation
    pub stacked_frames: usize,
    /// Subtracted for every emulator frame without reward
    pub step_penalty: f32,
    /// First screen row kept by the crop
    pub crop_top: usize,
    /// Screen row where the crop ends (exclusive)
    pub crop_bottom: usize,
    pub allowed_actions: Vec<usize>,
    /// Sent instead of any action outside `allowed_actions`
    pub default_action: usize,
    /// Points that end a [`PaddleGame`] episode
    pub points_to_win: u32,
    /// Emulator frames after which a [`PaddleGame`] episode is cut off
    pub max_frames: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        EnvConfig {
            frame_skip: 4,
            input_dim: 64,
            stacked_frames: 2,
            step_penalty: 0.01,
            crop_top: 35,
            crop_bottom: 195,
            allowed_actions: vec![0, 1, 2, 3],
            default_action: 0,
            points_to_win: 21,
            max_frames: 100_000,
        }
    }
}
