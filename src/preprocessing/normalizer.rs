//! Min-max scaling of feature channels
//!
//! The scaler is fit once on a designated subset and then applied unchanged
//! to any other subset; `transform` borrows the scaler immutably so fitted
//! parameters cannot drift when test data passes through it.

use crate::error::{Result, TransferError};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Normalizer trait
pub trait Normalizer {
    /// Fit the normalizer to training data
    fn fit(&mut self, data: &Array2<f64>) -> Result<()>;

    /// Transform data using fitted parameters
    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>>;

    /// Fit and transform in one step
    fn fit_transform(&mut self, data: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(data)?;
        self.transform(data)
    }
}

/// Per-column min-max normalization to [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMaxNormalizer {
    min: Option<Array1<f64>>,
    range: Option<Array1<f64>>,
}

impl MinMaxNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.min.is_some()
    }

    fn fitted(&self) -> Result<(&Array1<f64>, &Array1<f64>)> {
        match (&self.min, &self.range) {
            (Some(min), Some(range)) => Ok((min, range)),
            _ => Err(TransferError::ScalerNotFitted),
        }
    }

    fn check_width(&self, data: &Array2<f64>, min: &Array1<f64>) -> Result<()> {
        if data.ncols() != min.len() {
            return Err(TransferError::shape(
                format!("{} columns", min.len()),
                format!("{} columns", data.ncols()),
            ));
        }
        Ok(())
    }
}

impl Normalizer for MinMaxNormalizer {
    fn fit(&mut self, data: &Array2<f64>) -> Result<()> {
        if data.nrows() == 0 {
            return Err(TransferError::EmptyInput("scaler fit on zero rows".to_string()));
        }

        let min = data.fold_axis(Axis(0), f64::INFINITY, |&a, &b| a.min(b));
        let max = data.fold_axis(Axis(0), f64::NEG_INFINITY, |&a, &b| a.max(b));
        let range = &max - &min;

        // Constant columns map to 0
        let range = range.mapv(|v| if v.abs() < 1e-10 { 1.0 } else { v });

        self.min = Some(min);
        self.range = Some(range);
        Ok(())
    }

    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        let (min, range) = self.fitted()?;
        self.check_width(data, min)?;

        let mut result = Array2::zeros(data.dim());
        for (i, row) in data.rows().into_iter().enumerate() {
            let normalized = (&row - min) / range;
            result.row_mut(i).assign(&normalized);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_fit_transform_unit_range() {
        let data = array![[0.0, 10.0], [5.0, 20.0], [10.0, 30.0]];
        let mut scaler = MinMaxNormalizer::new();
        let scaled = scaler.fit_transform(&data).unwrap();

        assert_abs_diff_eq!(scaled[[0, 0]], 0.0);
        assert_abs_diff_eq!(scaled[[1, 0]], 0.5);
        assert_abs_diff_eq!(scaled[[2, 1]], 1.0);
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let data = array![[3.0], [3.0], [3.0]];
        let mut scaler = MinMaxNormalizer::new();
        let scaled = scaler.fit_transform(&data).unwrap();
        assert!(scaled.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_transform_does_not_refit() {
        let train = array![[0.0, 1.0], [10.0, 3.0]];
        let test = array![[100.0, -5.0], [50.0, 2.0]];

        let mut scaler = MinMaxNormalizer::new();
        scaler.fit(&train).unwrap();
        let before = scaler.clone();

        let scaled = scaler.transform(&test).unwrap();
        assert_eq!(scaler, before);
        // test values outside the training range fall outside [0, 1]
        assert_abs_diff_eq!(scaled[[0, 0]], 10.0);
        assert_abs_diff_eq!(scaled[[0, 1]], -3.0);
    }

    #[test]
    fn test_unfitted_and_mismatched() {
        let scaler = MinMaxNormalizer::new();
        assert!(matches!(
            scaler.transform(&array![[1.0]]),
            Err(TransferError::ScalerNotFitted)
        ));

        let mut scaler = MinMaxNormalizer::new();
        scaler.fit(&array![[1.0, 2.0]]).unwrap();
        assert!(matches!(
            scaler.transform(&array![[1.0]]),
            Err(TransferError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_fit_on_empty() {
        let mut scaler = MinMaxNormalizer::new();
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(matches!(scaler.fit(&empty), Err(TransferError::EmptyInput(_))));
        assert!(!scaler.is_fitted());
    }
}
