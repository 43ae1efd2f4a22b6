pub mod functions;

pub use functions::{gather, mse, mse_gradient};
