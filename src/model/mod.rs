//! # Sequence models
//!
//! LSTM encoder with a dense head, persisted by identifier and optionally
//! fine-tuned with some components frozen.
//!
//! ```rust,no_run
//! use tower_transfer::model::{fine_tune, Component, ModelStore};
//! use ndarray::{Array1, Array3};
//!
//! let store = ModelStore::new("models_saved");
//! let mut model = store.load("esb1_summer_lstm").unwrap();
//!
//! let x = Array3::<f64>::zeros((64, 6, 3));
//! let y = Array1::<f64>::zeros(64);
//! fine_tune(&mut model, &[Component::Encoder, Component::Head], 1e-5, 32, &x, &y, 10).unwrap();
//! let predictions = model.predict(&x).unwrap();
//! ```

mod config;
mod finetune;
mod layers;
mod lstm;
mod network;
mod optimizer;
mod store;

pub use config::LSTMConfig;
pub use finetune::{fine_tune, FineTuner};
pub use layers::{Activation, Dense};
pub use lstm::{LSTMCell, LSTMEncoder};
pub use network::{Component, ForwardTrace, SequenceModel};
pub use optimizer::Adam;
pub use store::ModelStore;
