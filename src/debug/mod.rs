//! Numerical health checks run on the learning path.

pub mod numerical_check;

pub use numerical_check::{check_parameters, ensure_all_finite, ensure_finite, NumericalIssue};
