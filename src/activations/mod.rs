//! Element-wise activations for the dense layers of the Q-network.
//!
//! Hidden layers default to ReLU, with LeakyReLU and ELU as alternatives.
//! The output layer of a Q-network is always [`Activation::Linear`] because
//! action values are unbounded.

pub mod functions;

pub use functions::Activation;
