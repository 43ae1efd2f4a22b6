// Cross-module tests for the learning core
pub mod test_agent;
