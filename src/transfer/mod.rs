//! # Transfer evaluation
//!
//! Scores a source tower's persisted model on a target tower, either
//! zero-shot or after fine-tuning on the leading share of the target data.
//!
//! ```rust,no_run
//! use tower_transfer::config::EvaluationConfig;
//! use tower_transfer::data::{Season, TowerId};
//! use tower_transfer::transfer::{TransferEvaluator, TransferRequest};
//!
//! let evaluator = TransferEvaluator::new(EvaluationConfig::default());
//! let request = TransferRequest::new(
//!     TowerId::new("ESB", 1),
//!     TowerId::new("Kissam", 2),
//!     vec!["flow".to_string(), "outdoor_temp".to_string()],
//!     "supply_temp",
//! )
//! .with_season(Season::Summer)
//! .with_finetuning(0.5);
//!
//! let (rmse, chart, mae) = evaluator.evaluate(&request).unwrap().into_tuple();
//! println!("RMSE {:.3}, MAE {:.3}, chart: {}", rmse, mae, chart.is_some());
//! ```

mod evaluator;
mod request;

pub use evaluator::{EvaluationPath, TransferEvaluator, TransferOutcome};
pub use request::{resolve_seasons, TransferRequest};
