//! Loading tower sensor tables from CSV

use super::types::{SensorTable, TowerId};
use crate::config::DataConfig;
use crate::error::{Result, TransferError};
use chrono::NaiveDateTime;
use csv::{Reader, Writer};
use ndarray::Array2;
use std::path::{Path, PathBuf};

/// Path of a tower's sensor table inside the data directory
pub fn tower_data_path(config: &DataConfig, tower: &TowerId) -> PathBuf {
    config.data_dir.join(tower.data_file_name())
}

/// Load a sensor table: one timestamp column plus numeric columns
///
/// Rows come back sorted by timestamp regardless of file order.
pub fn load_sensor_csv<P: AsRef<Path>>(path: P, config: &DataConfig) -> Result<SensorTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(TransferError::MissingData {
            path: path.to_path_buf(),
        });
    }

    let mut reader = Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let time_idx = headers
        .iter()
        .position(|h| h == config.time_column)
        .ok_or_else(|| TransferError::MissingColumn(config.time_column.clone()))?;

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != time_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut rows: Vec<(NaiveDateTime, Vec<f64>)> = Vec::new();

    for result in reader.records() {
        let record = result?;
        let timestamp =
            NaiveDateTime::parse_from_str(record[time_idx].trim(), &config.timestamp_format)?;

        let mut values = Vec::with_capacity(columns.len());
        for (i, field) in record.iter().enumerate() {
            if i == time_idx {
                continue;
            }
            let value = field.trim().parse::<f64>().map_err(|_| TransferError::InvalidValue {
                column: headers[i].to_string(),
                value: field.to_string(),
            })?;
            values.push(value);
        }

        if values.len() != columns.len() {
            return Err(TransferError::shape(
                format!("{} columns", columns.len()),
                format!("{} values at {}", values.len(), timestamp),
            ));
        }
        rows.push((timestamp, values));
    }

    rows.sort_by_key(|(ts, _)| *ts);

    let n_rows = rows.len();
    let n_cols = columns.len();
    let mut values = Array2::zeros((n_rows, n_cols));
    let mut timestamps = Vec::with_capacity(n_rows);

    for (i, (ts, row)) in rows.into_iter().enumerate() {
        timestamps.push(ts);
        for (j, v) in row.into_iter().enumerate() {
            values[[i, j]] = v;
        }
    }

    tracing::debug!(
        "Loaded {} rows x {} columns from {}",
        n_rows,
        n_cols,
        path.display()
    );

    Ok(SensorTable {
        timestamps,
        columns,
        values,
    })
}

/// Write a sensor table in the layout `load_sensor_csv` reads
pub fn save_sensor_csv<P: AsRef<Path>>(
    table: &SensorTable,
    path: P,
    config: &DataConfig,
) -> Result<()> {
    let mut writer = Writer::from_path(path)?;

    let mut header = vec![config.time_column.clone()];
    header.extend(table.columns.iter().cloned());
    writer.write_record(&header)?;

    for (i, ts) in table.timestamps.iter().enumerate() {
        let mut record = vec![ts.format(&config.timestamp_format).to_string()];
        record.extend(table.values.row(i).iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
