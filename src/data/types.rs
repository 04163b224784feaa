//! Data types for tower sensor streams

use crate::error::{Result, TransferError};
use chrono::{Datelike, NaiveDateTime};
use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A physical cooling/heating unit, addressed by building and tower number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TowerId {
    pub building: String,
    pub tower: u32,
}

impl TowerId {
    pub fn new(building: impl Into<String>, tower: u32) -> Self {
        Self {
            building: building.into(),
            tower,
        }
    }

    /// Persisted model name: `{building_lower}{tower}_{season}_lstm`
    pub fn model_identifier(&self, season: Season) -> String {
        format!("{}{}_{}_lstm", self.building.to_lowercase(), self.tower, season)
    }

    /// Sensor table file name: `{building_lower}{tower}.csv`
    pub fn data_file_name(&self) -> String {
        format!("{}{}.csv", self.building.to_lowercase(), self.tower)
    }
}

impl fmt::Display for TowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Tower {}", self.building, self.tower)
    }
}

/// Calendar season used to filter sensor rows and to name models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    /// No filtering
    #[default]
    AllYear,
}

impl Season {
    /// Calendar months (1-12) belonging to the season
    pub fn months(&self) -> &'static [u32] {
        match self {
            Season::Spring => &[3, 4, 5],
            Season::Summer => &[6, 7, 8],
            Season::Fall => &[9, 10, 11],
            Season::Winter => &[12, 1, 2],
            Season::AllYear => &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
        }
    }

    pub fn contains(&self, month: u32) -> bool {
        self.months().contains(&month)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
            Season::AllYear => "allyear",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            "allyear" | "all" => Ok(Season::AllYear),
            _ => Err(TransferError::InvalidSeason(s.to_string())),
        }
    }
}

/// Raw sensor readings for one tower, sorted chronologically
#[derive(Debug, Clone)]
pub struct SensorTable {
    pub timestamps: Vec<NaiveDateTime>,
    pub columns: Vec<String>,
    /// [rows, columns]
    pub values: Array2<f64>,
}

impl SensorTable {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TransferError::MissingColumn(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        let idx = self.column_index(name)?;
        Ok(self.values.column(idx))
    }

    /// Rows whose month belongs to `season`
    pub fn filter_season(&self, season: Season) -> SensorTable {
        if season == Season::AllYear {
            return self.clone();
        }

        let keep: Vec<usize> = self
            .timestamps
            .iter()
            .enumerate()
            .filter(|(_, ts)| season.contains(ts.month()))
            .map(|(i, _)| i)
            .collect();

        SensorTable {
            timestamps: keep.iter().map(|&i| self.timestamps[i]).collect(),
            columns: self.columns.clone(),
            values: self.values.select(Axis(0), &keep),
        }
    }
}

/// Lag-expanded model input: one row per time step, `features + 1` channels
/// plus the aligned target column
#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub timestamps: Vec<NaiveDateTime>,
    /// Channel names, target lag last
    pub columns: Vec<String>,
    /// [rows, channels]
    pub values: Array2<f64>,
    pub target_name: String,
    pub target: Array1<f64>,
}

impl FeatureTable {
    pub fn new(
        timestamps: Vec<NaiveDateTime>,
        columns: Vec<String>,
        values: Array2<f64>,
        target_name: impl Into<String>,
        target: Array1<f64>,
    ) -> Result<Self> {
        let rows = timestamps.len();
        if values.nrows() != rows || target.len() != rows {
            return Err(TransferError::shape(
                format!("{} rows", rows),
                format!("{} feature rows, {} targets", values.nrows(), target.len()),
            ));
        }
        if values.ncols() != columns.len() {
            return Err(TransferError::shape(
                format!("{} channels", columns.len()),
                format!("{} value columns", values.ncols()),
            ));
        }

        Ok(Self {
            timestamps,
            columns,
            values,
            target_name: target_name.into(),
            target,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn num_channels(&self) -> usize {
        self.values.ncols()
    }

    /// Chronological split: rows `[0, row)` and `[row, len)`, no shuffling
    pub fn split_at(&self, row: usize) -> (FeatureTable, FeatureTable) {
        let row = row.min(self.len());
        let head = FeatureTable {
            timestamps: self.timestamps[..row].to_vec(),
            columns: self.columns.clone(),
            values: self.values.slice(s![..row, ..]).to_owned(),
            target_name: self.target_name.clone(),
            target: self.target.slice(s![..row]).to_owned(),
        };
        let tail = FeatureTable {
            timestamps: self.timestamps[row..].to_vec(),
            columns: self.columns.clone(),
            values: self.values.slice(s![row.., ..]).to_owned(),
            target_name: self.target_name.clone(),
            target: self.target.slice(s![row..]).to_owned(),
        };
        (head, tail)
    }

    /// Same table with the feature matrix replaced (e.g. after scaling)
    pub fn with_values(&self, values: Array2<f64>) -> Result<FeatureTable> {
        if values.dim() != self.values.dim() {
            return Err(TransferError::shape(
                format!("{:?}", self.values.dim()),
                format!("{:?}", values.dim()),
            ));
        }
        Ok(FeatureTable {
            values,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_model_identifier() {
        let tower = TowerId::new("ESB", 1);
        assert_eq!(tower.model_identifier(Season::Summer), "esb1_summer_lstm");
        assert_eq!(tower.model_identifier(Season::AllYear), "esb1_allyear_lstm");
        assert_eq!(tower.data_file_name(), "esb1.csv");
    }

    #[test]
    fn test_season_from_str() {
        assert_eq!("Summer".parse::<Season>().unwrap(), Season::Summer);
        assert_eq!("allyear".parse::<Season>().unwrap(), Season::AllYear);
        assert!(matches!(
            "monsoon".parse::<Season>(),
            Err(TransferError::InvalidSeason(_))
        ));
    }

    #[test]
    fn test_default_season_is_all_year() {
        assert_eq!(Season::default(), Season::AllYear);
        assert_eq!(Season::default().months().len(), 12);
    }

    #[test]
    fn test_winter_wraps_year_end() {
        assert!(Season::Winter.contains(12));
        assert!(Season::Winter.contains(1));
        assert!(!Season::Winter.contains(3));
    }

    #[test]
    fn test_filter_season() {
        let table = SensorTable {
            timestamps: vec![ts(1, 1), ts(6, 1), ts(7, 1), ts(12, 1)],
            columns: vec!["a".to_string()],
            values: Array2::from_shape_vec((4, 1), vec![1.0, 2.0, 3.0, 4.0]).unwrap(),
        };

        let summer = table.filter_season(Season::Summer);
        assert_eq!(summer.len(), 2);
        assert_eq!(summer.values[[0, 0]], 2.0);

        let winter = table.filter_season(Season::Winter);
        assert_eq!(winter.values.column(0).to_vec(), vec![1.0, 4.0]);
    }

    #[test]
    fn test_split_at_keeps_order() {
        let n = 10;
        let table = FeatureTable::new(
            (1..=n as u32).map(|d| ts(1, d)).collect(),
            vec!["x".to_string()],
            Array2::from_shape_fn((n, 1), |(i, _)| i as f64),
            "y(t)",
            Array1::from_shape_fn(n, |i| i as f64 * 10.0),
        )
        .unwrap();

        let (head, tail) = table.split_at(7);
        assert_eq!(head.len(), 7);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail.values[[0, 0]], 7.0);
        assert_eq!(tail.target[0], 70.0);
        assert_eq!(tail.timestamps[0], ts(1, 8));
    }

    #[test]
    fn test_feature_table_rejects_ragged_input() {
        let result = FeatureTable::new(
            vec![ts(1, 1)],
            vec!["x".to_string()],
            Array2::zeros((2, 1)),
            "y(t)",
            Array1::zeros(1),
        );
        assert!(matches!(result, Err(TransferError::ShapeMismatch { .. })));
    }
}
