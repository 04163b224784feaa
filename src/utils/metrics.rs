//! Error metrics for actual/predicted series

use crate::error::{Result, TransferError};
use ndarray::ArrayView1;

fn check_pair(y_true: &ArrayView1<f64>, y_pred: &ArrayView1<f64>) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(TransferError::shape(
            format!("{} actual values", y_true.len()),
            format!("{} predicted values", y_pred.len()),
        ));
    }
    if y_true.is_empty() {
        return Err(TransferError::EmptyInput(
            "no actual/predicted pairs to score".to_string(),
        ));
    }
    Ok(())
}

/// Mean Squared Error
pub fn mse(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<f64> {
    check_pair(&y_true, &y_pred)?;
    let diff = &y_true - &y_pred;
    Ok(diff.mapv(|x| x * x).sum() / diff.len() as f64)
}

/// Root Mean Squared Error
pub fn rmse(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<f64> {
    Ok(mse(y_true, y_pred)?.sqrt())
}

/// Mean Absolute Error
pub fn mae(y_true: ArrayView1<f64>, y_pred: ArrayView1<f64>) -> Result<f64> {
    check_pair(&y_true, &y_pred)?;
    let diff = &y_true - &y_pred;
    Ok(diff.mapv(f64::abs).sum() / diff.len() as f64)
}
