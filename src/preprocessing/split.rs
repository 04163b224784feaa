//! Chronological fine-tune / test split

use crate::data::FeatureTable;
use crate::error::{Result, TransferError};

/// Row counts `(finetune, test)` for a leading fine-tune fraction
///
/// The test share is rounded up, so the fine-tune split never takes more
/// than `fraction` of the rows. Products within 1e-9 of an integer are
/// treated as exact (100 rows at 0.7 give 70/30, not 69/31).
pub fn finetune_split(n_rows: usize, fraction: f64) -> Result<(usize, usize)> {
    if !(0.0..1.0).contains(&fraction) || fraction.is_nan() {
        return Err(TransferError::InvalidFraction(fraction));
    }

    let test = ((n_rows as f64) * (1.0 - fraction) - 1e-9).ceil().max(0.0) as usize;
    let test = test.min(n_rows);
    Ok((n_rows - test, test))
}

/// Split a frame into leading fine-tune rows and trailing test rows
pub fn split_frame(table: &FeatureTable, fraction: f64) -> Result<(FeatureTable, FeatureTable)> {
    let (finetune, _) = finetune_split(table.len(), fraction)?;
    Ok(table.split_at(finetune))
}
