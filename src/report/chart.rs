//! Actual vs predicted line chart

use super::results::{regrid, GridPoint, ResultsTable};
use crate::error::{Result, TransferError};
use chrono::{Duration, NaiveDateTime};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// A ready-to-draw comparison chart on a regular time grid
#[derive(Debug, Clone)]
pub struct TransferChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<GridPoint>,
}

/// Build the chart, or `None` when the results cannot span a time grid
pub fn render_chart(
    results: &ResultsTable,
    interval: Duration,
    title: impl Into<String>,
    y_label: impl Into<String>,
) -> Option<TransferChart> {
    let points = regrid(results, interval)?;
    Some(TransferChart {
        title: title.into(),
        x_label: "time".to_string(),
        y_label: y_label.into(),
        points,
    })
}

fn render_err<E: std::fmt::Display>(e: E) -> TransferError {
    TransferError::Render(e.to_string())
}

/// Contiguous runs of present values, as (minutes since start, value)
fn segments(
    points: &[GridPoint],
    start: NaiveDateTime,
    value: impl Fn(&GridPoint) -> Option<f64>,
) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for point in points {
        match value(point) {
            Some(v) => {
                let minutes = (point.time - start).num_seconds() as f64 / 60.0;
                current.push((minutes, v));
            }
            None => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

impl TransferChart {
    pub fn start(&self) -> Option<NaiveDateTime> {
        self.points.first().map(|p| p.time)
    }

    /// Number of grid slots with no observation
    pub fn gap_count(&self) -> usize {
        self.points.iter().filter(|p| p.actual.is_none()).count()
    }

    fn value_range(&self) -> (f64, f64) {
        let values = self
            .points
            .iter()
            .flat_map(|p| [p.actual, p.predicted])
            .flatten();
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 1.0);
        }
        let pad = if hi - lo < 1e-9 { 1.0 } else { (hi - lo) * 0.05 };
        (lo - pad, hi + pad)
    }

    pub fn save_svg<P: AsRef<Path>>(&self, path: P, size: (u32, u32)) -> Result<()> {
        let root = SVGBackend::new(path.as_ref(), size).into_drawing_area();
        self.draw(root)
    }

    fn draw<DB: DrawingBackend>(&self, root: DrawingArea<DB, Shift>) -> Result<()> {
        let start = self
            .start()
            .ok_or_else(|| TransferError::Render("chart has no points".to_string()))?;
        let span = self
            .points
            .last()
            .map(|p| (p.time - start).num_seconds() as f64 / 60.0)
            .unwrap_or(0.0)
            .max(1.0);
        let (y_min, y_max) = self.value_range();

        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 20).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..span, y_min..y_max)
            .map_err(render_err)?;

        let x_formatter = |x: &f64| {
            (start + Duration::seconds((*x * 60.0) as i64))
                .format("%m-%d %H:%M")
                .to_string()
        };
        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .x_label_formatter(&x_formatter)
            .draw()
            .map_err(render_err)?;

        let series: [(&str, RGBColor, fn(&GridPoint) -> Option<f64>); 2] = [
            ("actual", BLUE, |p| p.actual),
            ("predicted", RED, |p| p.predicted),
        ];

        for (name, color, value) in series {
            for (i, run) in segments(&self.points, start, value).into_iter().enumerate() {
                let anno = chart
                    .draw_series(LineSeries::new(run, &color))
                    .map_err(render_err)?;
                if i == 0 {
                    anno.label(name).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], &color)
                    });
                }
            }
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()
            .map_err(render_err)?;

        root.present().map_err(render_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ndarray::array;
    use tempfile::tempdir;

    fn at(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 7, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(minutes)
    }

    fn results() -> ResultsTable {
        ResultsTable::from_predictions(
            vec![at(0), at(5), at(10), at(25), at(30)],
            array![20.0, 20.5, 21.0, 22.0, 22.5],
            array![20.1, 20.4, 21.2, 21.8, 22.4],
        )
        .unwrap()
    }

    #[test]
    fn test_segments_split_on_gaps() {
        let chart = render_chart(&results(), Duration::minutes(5), "t", "temp").unwrap();
        assert_eq!(chart.points.len(), 7);
        assert_eq!(chart.gap_count(), 2);

        let runs = segments(&chart.points, at(0), |p| p.actual);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 3);
        assert_eq!(runs[1][0], (25.0, 22.0));
    }

    #[test]
    fn test_save_svg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        let chart = render_chart(&results(), Duration::minutes(5), "ESB Tower 1", "temp").unwrap();

        chart.save_svg(&path, (640, 480)).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_no_chart_for_empty_results() {
        let empty = ResultsTable::from_predictions(
            Vec::new(),
            ndarray::Array1::zeros(0),
            ndarray::Array1::zeros(0),
        )
        .unwrap();
        assert!(render_chart(&empty, Duration::minutes(5), "t", "temp").is_none());
    }
}
