//! Fluent constructors for the components an agent is assembled from.

pub mod network;
pub mod replay_memory;

pub use network::MlpQNetworkBuilder;
pub use replay_memory::ReplayMemoryBuilder;
