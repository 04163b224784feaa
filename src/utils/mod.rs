//! # Utilities
//!
//! Error metrics used to score transfer results.

mod metrics;

pub use metrics::{mae, mse, rmse};
