//! Access to target-tower frames
//!
//! The orchestrator only needs a lag-expanded frame and its baseline; the
//! `TowerSource` trait keeps it independent of where the readings live.

use super::loader::{load_sensor_csv, tower_data_path};
use super::prep::prepare_lstm_frame;
use super::types::{FeatureTable, Season, TowerId};
use crate::config::DataConfig;
use crate::error::Result;

/// Supplier of lag-expanded frames for a tower
pub trait TowerSource {
    /// Frame for `tower` restricted to `season`, plus the delta baseline
    fn load_frame(
        &self,
        tower: &TowerId,
        features: &[String],
        target: &str,
        season: Season,
        use_delta: bool,
    ) -> Result<(FeatureTable, f64)>;
}

/// Reads `{data_dir}/{building_lower}{tower}.csv`
#[derive(Debug, Clone)]
pub struct CsvTowerSource {
    config: DataConfig,
}

impl CsvTowerSource {
    pub fn new(config: DataConfig) -> Self {
        Self { config }
    }
}

impl TowerSource for CsvTowerSource {
    fn load_frame(
        &self,
        tower: &TowerId,
        features: &[String],
        target: &str,
        season: Season,
        use_delta: bool,
    ) -> Result<(FeatureTable, f64)> {
        let path = tower_data_path(&self.config, tower);
        let table = load_sensor_csv(&path, &self.config)?;
        prepare_lstm_frame(&table, features, target, season, use_delta)
    }
}
