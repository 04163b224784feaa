//! Sliding-window tensors for sequence-model inference

use crate::data::FeatureTable;
use crate::error::{Result, TransferError};
use chrono::NaiveDateTime;
use ndarray::{s, Array1, Array2, Array3};

/// Windowed model input with aligned targets
#[derive(Debug, Clone)]
pub struct WindowSet {
    /// [samples, step_back, channels]
    pub x: Array3<f64>,
    /// [samples]
    pub y: Array1<f64>,
    /// Timestamp of the row each target belongs to
    pub timestamps: Vec<NaiveDateTime>,
}

impl WindowSet {
    pub fn len(&self) -> usize {
        self.x.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.x.dim()
    }
}

/// Reshapes a pre-scaled, lag-expanded table into 3D windows
///
/// Sample `i` holds rows `[i, i + step_back)` and is paired with the target
/// of row `i + step_back`. Tables with `step_back` rows or fewer produce zero
/// samples.
#[derive(Debug, Clone, Copy)]
pub struct WindowTransform {
    pub step_back: usize,
    pub num_channels: usize,
}

impl WindowTransform {
    pub fn new(step_back: usize, num_channels: usize) -> Self {
        Self {
            step_back,
            num_channels,
        }
    }

    pub fn apply(&self, table: &FeatureTable) -> Result<WindowSet> {
        if table.num_channels() != self.num_channels {
            return Err(TransferError::shape(
                format!("{} channels", self.num_channels),
                format!("{} channels", table.num_channels()),
            ));
        }

        let (x, y) = to_windows(&table.values, &table.target, self.step_back);
        let timestamps = if table.len() > self.step_back {
            table.timestamps[self.step_back..].to_vec()
        } else {
            Vec::new()
        };

        Ok(WindowSet { x, y, timestamps })
    }
}

/// Sliding windows over rows of `values`, targets taken `step_back` rows ahead
pub fn to_windows(
    values: &Array2<f64>,
    target: &Array1<f64>,
    step_back: usize,
) -> (Array3<f64>, Array1<f64>) {
    let n_rows = values.nrows();
    let n_channels = values.ncols();
    let n_samples = n_rows.saturating_sub(step_back);

    let mut x = Array3::zeros((n_samples, step_back, n_channels));
    let mut y = Array1::zeros(n_samples);

    for i in 0..n_samples {
        x.slice_mut(s![i, .., ..])
            .assign(&values.slice(s![i..i + step_back, ..]));
        y[i] = target[i + step_back];
    }

    (x, y)
}

/// Split windows into consecutive batches, keeping temporal order
pub fn create_batches(
    x: &Array3<f64>,
    y: &Array1<f64>,
    batch_size: usize,
) -> Vec<(Array3<f64>, Array1<f64>)> {
    let n_samples = x.shape()[0];
    let batch_size = batch_size.max(1);

    (0..n_samples)
        .step_by(batch_size)
        .map(|start| {
            let end = (start + batch_size).min(n_samples);
            (
                x.slice(s![start..end, .., ..]).to_owned(),
                y.slice(s![start..end]).to_owned(),
            )
        })
        .collect()
}
