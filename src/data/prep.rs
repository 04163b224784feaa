//! Lag expansion of sensor tables into model input frames
//!
//! Each output row `t` carries the feature readings at `t` and the target
//! reading at `t-1`; the target column holds the reading at `t`. In delta
//! mode the target series is first shifted so that its first value is zero,
//! and that first value is returned as the baseline for de-differencing.

use super::types::{FeatureTable, Season, SensorTable};
use crate::error::{Result, TransferError};
use ndarray::{Array1, Array2};

/// Name of the lagged target channel
pub fn lag_column(target: &str) -> String {
    format!("{}(t-1)", target)
}

/// Name of the predicted target column
pub fn target_column(target: &str) -> String {
    format!("{}(t)", target)
}

/// Build the lag-expanded frame and the delta baseline
///
/// Returns the frame with `features.len() + 1` channels and the baseline
/// (first target value when `use_delta`, otherwise `0.0`).
pub fn prepare_lstm_frame(
    table: &SensorTable,
    features: &[String],
    target: &str,
    season: Season,
    use_delta: bool,
) -> Result<(FeatureTable, f64)> {
    let table = table.filter_season(season);
    if table.is_empty() {
        return Err(TransferError::EmptyInput(format!("no {} readings", season)));
    }

    let feature_idx = features
        .iter()
        .map(|f| table.column_index(f))
        .collect::<Result<Vec<_>>>()?;

    let mut target_series: Array1<f64> = table.column(target)?.to_owned();
    let baseline = if use_delta { target_series[0] } else { 0.0 };
    if use_delta {
        target_series.mapv_inplace(|v| v - baseline);
    }

    let n_rows = table.len() - 1;
    let n_channels = features.len() + 1;
    let mut values = Array2::zeros((n_rows, n_channels));
    let mut targets = Array1::zeros(n_rows);

    for r in 0..n_rows {
        let src = r + 1;
        for (c, &idx) in feature_idx.iter().enumerate() {
            values[[r, c]] = table.values[[src, idx]];
        }
        values[[r, n_channels - 1]] = target_series[src - 1];
        targets[r] = target_series[src];
    }

    let mut columns: Vec<String> = features.to_vec();
    columns.push(lag_column(target));

    let frame = FeatureTable::new(
        table.timestamps[1..].to_vec(),
        columns,
        values,
        target_column(target),
        targets,
    )?;

    Ok((frame, baseline))
}
