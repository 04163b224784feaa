//! # Tower data
//!
//! Sensor tables, seasons and the lag-expanded frames fed to the model.
//!
//! ```rust,no_run
//! use tower_transfer::config::DataConfig;
//! use tower_transfer::data::{CsvTowerSource, Season, TowerId, TowerSource};
//!
//! let source = CsvTowerSource::new(DataConfig::default());
//! let features = vec!["flow".to_string(), "outdoor_temp".to_string()];
//! let (frame, first_temp) = source
//!     .load_frame(&TowerId::new("ESB", 2), &features, "supply_temp", Season::Summer, true)
//!     .unwrap();
//! println!("{} rows, baseline {}", frame.len(), first_temp);
//! ```

mod loader;
mod prep;
mod source;
mod types;

pub use loader::{load_sensor_csv, save_sensor_csv, tower_data_path};
pub use prep::{lag_column, prepare_lstm_frame, target_column};
pub use source::{CsvTowerSource, TowerSource};
pub use types::{FeatureTable, Season, SensorTable, TowerId};
