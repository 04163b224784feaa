//! # Tower Transfer
//!
//! Evaluates how well an LSTM temperature model trained on one cooling tower
//! predicts another tower, either as-is (zero-shot) or after briefly
//! fine-tuning its output layer on the leading share of the target data.
//!
//! ## Modules
//!
//! - `config` - Evaluation settings loaded from TOML
//! - `data` - Tower identifiers, seasons, CSV loading and lag expansion
//! - `preprocessing` - Scaling, chronological split and windowing
//! - `model` - LSTM sequence model, model store and fine-tuning
//! - `report` - Results tables and comparison charts
//! - `transfer` - The transfer evaluation itself
//! - `utils` - Error metrics
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tower_transfer::{EvaluationConfig, Season, TowerId, TransferEvaluator, TransferRequest};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = EvaluationConfig::load_or_default("config.toml");
//!     let evaluator = TransferEvaluator::new(config);
//!
//!     let request = TransferRequest::new(
//!         TowerId::new("ESB", 1),
//!         TowerId::new("Kissam", 2),
//!         vec!["flow".to_string(), "outdoor_temp".to_string()],
//!         "supply_temp",
//!     )
//!     .with_season(Season::Summer)
//!     .with_finetuning(0.7);
//!
//!     let outcome = evaluator.evaluate(&request)?;
//!     println!("RMSE {:.3} / MAE {:.3}", outcome.rmse, outcome.mae);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod preprocessing;
pub mod report;
pub mod transfer;
pub mod utils;

pub use config::EvaluationConfig;
pub use data::{Season, TowerId};
pub use error::{Result, TransferError};
pub use model::{ModelStore, SequenceModel};
pub use report::{ResultsTable, TransferChart};
pub use transfer::{TransferEvaluator, TransferOutcome, TransferRequest};
