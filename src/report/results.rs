//! Actual vs predicted series and their regular-grid view

use crate::error::{Result, TransferError};
use crate::utils::{mae, rmse};
use chrono::{Duration, NaiveDateTime};
use csv::Writer;
use ndarray::Array1;
use std::collections::HashMap;
use std::path::Path;

/// Time-indexed (actual, predicted) pairs
#[derive(Debug, Clone)]
pub struct ResultsTable {
    pub timestamps: Vec<NaiveDateTime>,
    pub actual: Array1<f64>,
    pub predicted: Array1<f64>,
    baseline: Option<f64>,
}

impl ResultsTable {
    pub fn from_predictions(
        timestamps: Vec<NaiveDateTime>,
        actual: Array1<f64>,
        predicted: Array1<f64>,
    ) -> Result<Self> {
        if timestamps.len() != actual.len() || actual.len() != predicted.len() {
            return Err(TransferError::shape(
                format!("{} timestamps", timestamps.len()),
                format!("{} actual, {} predicted", actual.len(), predicted.len()),
            ));
        }
        Ok(Self {
            timestamps,
            actual,
            predicted,
            baseline: None,
        })
    }

    /// Undo delta encoding by adding `baseline` to both series
    ///
    /// Applying a second baseline stacks on top of the first; call once.
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.actual.mapv_inplace(|v| v + baseline);
        self.predicted.mapv_inplace(|v| v + baseline);
        self.baseline = Some(self.baseline.unwrap_or(0.0) + baseline);
        self
    }

    /// Total baseline added so far
    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    /// Predictions on the model's own (delta) scale
    pub fn raw_predictions(&self) -> Array1<f64> {
        let baseline = self.baseline.unwrap_or(0.0);
        self.predicted.mapv(|v| v - baseline)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn rmse(&self) -> Result<f64> {
        rmse(self.actual.view(), self.predicted.view())
    }

    pub fn mae(&self) -> Result<f64> {
        mae(self.actual.view(), self.predicted.view())
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(["time", "actual", "predicted"])?;
        for (i, ts) in self.timestamps.iter().enumerate() {
            writer.write_record(&[
                ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                self.actual[i].to_string(),
                self.predicted[i].to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// One slot on the regular time grid; `None` marks a gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub time: NaiveDateTime,
    pub actual: Option<f64>,
    pub predicted: Option<f64>,
}

/// Reindex results onto a regular grid from first to last timestamp
///
/// Timestamps missing from the results become gaps, never interpolated
/// values. Returns `None` for an empty table or a non-positive interval.
pub fn regrid(results: &ResultsTable, interval: Duration) -> Option<Vec<GridPoint>> {
    if interval <= Duration::zero() {
        return None;
    }
    let start = *results.timestamps.iter().min()?;
    let end = *results.timestamps.iter().max()?;
    if end < start {
        return None;
    }

    let lookup: HashMap<NaiveDateTime, usize> = results
        .timestamps
        .iter()
        .enumerate()
        .map(|(i, ts)| (*ts, i))
        .collect();

    let mut grid = Vec::new();
    let mut time = start;
    while time <= end {
        let (actual, predicted) = match lookup.get(&time) {
            Some(&i) => (Some(results.actual[i]), Some(results.predicted[i])),
            None => (None, None),
        };
        grid.push(GridPoint {
            time,
            actual,
            predicted,
        });
        time += interval;
    }

    Some(grid)
}
