//! Integration tests for tower transfer evaluation

use approx::assert_abs_diff_eq;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use ndarray::Array2;
use tempfile::{tempdir, TempDir};

use tower_transfer::data::{save_sensor_csv, tower_data_path, SensorTable};
use tower_transfer::model::LSTMConfig;
use tower_transfer::preprocessing::{split_frame, MinMaxNormalizer, Normalizer, WindowTransform};
use tower_transfer::transfer::EvaluationPath;
use tower_transfer::{
    EvaluationConfig, ModelStore, Season, SequenceModel, TowerId, TransferError,
    TransferEvaluator, TransferRequest,
};

fn at(year: i32, month: u32, minutes: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::minutes(minutes)
}

/// Supply temperature for sensor row `i`
fn supply(i: usize) -> f64 {
    25.0 + (i as f64 * 0.15).sin() * 2.0
}

/// `summer_rows` July readings preceded by `winter_rows` January readings
fn sensor_table(summer_rows: usize, winter_rows: usize) -> SensorTable {
    let mut timestamps: Vec<NaiveDateTime> = (0..winter_rows)
        .map(|i| at(2023, 1, 5 * i as i64))
        .collect();
    timestamps.extend((0..summer_rows).map(|i| at(2023, 7, 5 * i as i64)));

    let values = Array2::from_shape_fn((timestamps.len(), 3), |(i, c)| {
        let summer = i >= winter_rows;
        let j = i.saturating_sub(winter_rows);
        match (c, summer) {
            (0, _) => 100.0 + (i as f64 * 0.3).cos() * 10.0,
            (1, true) => 30.0 + j as f64 * 0.01,
            (1, false) => -5.0,
            (_, true) => supply(j),
            (_, false) => 5.0,
        }
    });

    SensorTable {
        timestamps,
        columns: vec![
            "flow".to_string(),
            "outdoor_temp".to_string(),
            "supply_temp".to_string(),
        ],
        values,
    }
}

struct Site {
    _dir: TempDir,
    config: EvaluationConfig,
}

/// Temp directory with Kissam tower 2 data and an ESB tower 1 summer model
fn site(summer_rows: usize) -> Site {
    let dir = tempdir().unwrap();
    let config = EvaluationConfig::default().with_root(dir.path());
    std::fs::create_dir_all(&config.data.data_dir).unwrap();

    let path = tower_data_path(&config.data, &TowerId::new("Kissam", 2));
    save_sensor_csv(&sensor_table(summer_rows, 20), path, &config.data).unwrap();

    ModelStore::new(&config.model.model_dir)
        .save("esb1_summer_lstm", &SequenceModel::new(LSTMConfig::small(3)))
        .unwrap();

    Site { _dir: dir, config }
}

fn request() -> TransferRequest {
    TransferRequest::new(
        TowerId::new("ESB", 1),
        TowerId::new("Kissam", 2),
        vec!["flow".to_string(), "outdoor_temp".to_string()],
        "supply_temp",
    )
    .with_season(Season::Summer)
}

#[test]
fn test_zero_shot_end_to_end() {
    // 101 summer readings -> 100 lag-expanded rows -> 94 windows
    let site = site(101);
    let outcome = TransferEvaluator::new(site.config.clone())
        .evaluate(&request())
        .unwrap();

    assert_eq!(outcome.path, EvaluationPath::ZeroShot { test_rows: 100 });
    assert_eq!(outcome.results.len(), 94);
    assert!(outcome.rmse.is_finite());
    assert!(outcome.mae <= outcome.rmse + 1e-12);

    let chart = outcome.chart.expect("chart requested");
    assert_eq!(chart.points.len(), 94);
    assert_eq!(chart.gap_count(), 0);
    assert!(chart.title.contains("(0% fine-tuning)"));
}

#[test]
fn test_actuals_are_original_readings() {
    let site = site(60);
    let outcome = TransferEvaluator::new(site.config.clone())
        .evaluate(&request().with_display(false))
        .unwrap();

    assert_eq!(outcome.results.baseline(), Some(supply(0)));
    // first window target is summer sensor row 7
    assert_eq!(outcome.results.timestamps[0], at(2023, 7, 35));
    assert_abs_diff_eq!(outcome.results.actual[0], supply(7), epsilon = 1e-9);
    let last = outcome.results.len() - 1;
    assert_abs_diff_eq!(outcome.results.actual[last], supply(59), epsilon = 1e-9);
}

#[test]
fn test_absolute_targets_end_to_end() {
    let site = site(60);
    let outcome = TransferEvaluator::new(site.config.clone())
        .evaluate(&request().with_delta(false).with_display(false))
        .unwrap();

    assert_eq!(outcome.results.baseline(), None);
    assert_eq!(outcome.results.len(), 53);
    for (i, actual) in outcome.results.actual.iter().enumerate() {
        // window target i is summer sensor row i + 7
        assert_abs_diff_eq!(*actual, supply(i + 7), epsilon = 1e-12);
    }
}

#[test]
fn test_finetune_end_to_end() {
    let site = site(101);
    let outcome = TransferEvaluator::new(site.config.clone())
        .evaluate(&request().with_finetuning(0.7).with_epochs(3))
        .unwrap();

    match &outcome.path {
        EvaluationPath::FineTune {
            finetune_rows,
            test_rows,
            epochs,
            loss_history,
        } => {
            assert_eq!((*finetune_rows, *test_rows), (70, 30));
            assert_eq!(*epochs, 3);
            assert_eq!(loss_history.len(), 3);
        }
        other => panic!("expected fine-tune path, got {:?}", other),
    }
    assert_eq!(outcome.results.len(), 24);

    // test windows start after the fine-tune rows
    assert_eq!(outcome.results.timestamps[0], at(2023, 7, 5 * (1 + 70 + 6)));
}

#[test]
fn test_missing_model() {
    let site = site(40);
    let request = request().with_season(Season::Winter);

    let err = TransferEvaluator::new(site.config.clone())
        .evaluate(&request)
        .unwrap_err();
    match err {
        TransferError::MissingModel { identifier, path } => {
            assert_eq!(identifier, "esb1_winter_lstm");
            assert!(path.ends_with("esb1_winter_lstm.bin"));
        }
        other => panic!("expected MissingModel, got {}", other),
    }
}

#[test]
fn test_source_season_override() {
    // winter target data scored with the summer model
    let site = site(40);
    let request = request()
        .with_season(Season::Winter)
        .with_source_season(Season::Summer)
        .with_display(false);

    let outcome = TransferEvaluator::new(site.config.clone())
        .evaluate(&request)
        .unwrap();
    assert_eq!(outcome.model_identifier, "esb1_summer_lstm");
    // 20 January readings -> 19 rows -> 13 windows
    assert_eq!(outcome.results.len(), 13);
}

#[test]
fn test_missing_target_data() {
    let site = site(40);
    let mut request = request();
    request.target = TowerId::new("Kissam", 9);

    let err = TransferEvaluator::new(site.config.clone())
        .evaluate(&request)
        .unwrap_err();
    assert!(matches!(err, TransferError::MissingData { .. }));
}

#[test]
fn test_short_season_is_insufficient() {
    // 7 readings -> 6 rows -> no full window
    let site = site(7);
    let err = TransferEvaluator::new(site.config.clone())
        .evaluate(&request())
        .unwrap_err();
    assert!(matches!(
        err,
        TransferError::InsufficientData { rows: 6, window: 6 }
    ));
}

#[test]
fn test_unknown_feature_column() {
    let site = site(40);
    let mut request = request();
    request.features = vec!["flow".to_string(), "humidity".to_string()];

    let err = TransferEvaluator::new(site.config.clone())
        .evaluate(&request)
        .unwrap_err();
    assert!(matches!(err, TransferError::MissingColumn(ref c) if c == "humidity"));
}

#[test]
fn test_scaler_fit_on_finetune_rows_only() {
    let site = site(101);
    let table = tower_transfer::data::load_sensor_csv(
        tower_data_path(&site.config.data, &TowerId::new("Kissam", 2)),
        &site.config.data,
    )
    .unwrap();
    let features = vec!["flow".to_string(), "outdoor_temp".to_string()];
    let (frame, _) = tower_transfer::data::prepare_lstm_frame(
        &table,
        &features,
        "supply_temp",
        Season::Summer,
        true,
    )
    .unwrap();

    let (finetune, test) = split_frame(&frame, 0.7).unwrap();
    let mut scaler = MinMaxNormalizer::new();
    scaler.fit(&finetune.values).unwrap();
    let scaled_test = scaler.transform(&test.values).unwrap();

    // outdoor_temp rises steadily, so later rows exceed the fitted range
    let max_outdoor = scaled_test.column(1).fold(f64::MIN, |a, &b| a.max(b));
    assert!(max_outdoor > 1.0);

    let windows = WindowTransform::new(6, 3)
        .apply(&test.with_values(scaled_test).unwrap())
        .unwrap();
    assert_eq!(windows.shape(), (24, 6, 3));
}

#[test]
fn test_chart_written_to_disk() {
    let site = site(50);
    let outcome = TransferEvaluator::new(site.config.clone())
        .evaluate(&request().with_finetuning(0.5).with_epochs(1))
        .unwrap();

    let chart = outcome.chart.expect("chart requested");
    assert!(chart.title.contains("(50% fine-tuning)"));

    std::fs::create_dir_all(&site.config.report.output_dir).unwrap();
    let path = site.config.report.output_dir.join("esb1_on_kissam2.svg");
    chart.save_svg(&path, (800, 600)).unwrap();
    assert!(path.exists());
}

#[test]
fn test_config_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = EvaluationConfig::default();
    config.model.step_back = 12;
    config.save(&path).unwrap();

    let loaded = EvaluationConfig::load(&path).unwrap();
    assert_eq!(loaded.model.step_back, 12);
    assert_eq!(loaded.model.frozen_components, config.model.frozen_components);
}
