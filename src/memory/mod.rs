//! # Experience Replay Memory
//!
//! Bounded storage of past [`Transition`](crate::transition::Transition)s
//! and uniform minibatch sampling.
//!
//! - [`ReplayMemory`] keeps transitions encoded by a [`Codec`] in a ring
//!   buffer with FIFO eviction. Every sampled batch contains the most recent
//!   transition; short memories pad the batch with copies of it.
//! - [`Minibatch`] stacks a sampled batch into the parallel arrays consumed
//!   by the learning update.
//! - [`TransitionLog`] is the file format used to persist a memory and to
//!   preload a new one.

mod batch;
mod codec;
mod replay_memory;

pub use batch::Minibatch;
pub use codec::Codec;
pub use replay_memory::{ReplayMemory, TransitionLog};
