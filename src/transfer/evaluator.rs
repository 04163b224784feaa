//! Transfer evaluation: scale, window, (fine-tune), predict, score, chart

use super::request::TransferRequest;
use crate::config::EvaluationConfig;
use crate::data::{CsvTowerSource, FeatureTable, TowerSource};
use crate::error::{Result, TransferError};
use crate::model::{fine_tune, ModelStore, SequenceModel};
use crate::preprocessing::{split_frame, MinMaxNormalizer, Normalizer, WindowSet, WindowTransform};
use crate::report::{render_chart, ResultsTable, TransferChart};
use chrono::Duration;

/// Which branch produced the predictions
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationPath {
    /// Whole target frame scored with the unmodified source model
    ZeroShot { test_rows: usize },
    /// Leading rows used to retrain the unfrozen components first
    FineTune {
        finetune_rows: usize,
        test_rows: usize,
        epochs: usize,
        loss_history: Vec<f64>,
    },
}

/// Scores, chart and the underlying results of one evaluation
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub rmse: f64,
    pub chart: Option<TransferChart>,
    pub mae: f64,
    pub results: ResultsTable,
    pub path: EvaluationPath,
    pub model_identifier: String,
}

impl TransferOutcome {
    /// `(rmse, chart, mae)`
    pub fn into_tuple(self) -> (f64, Option<TransferChart>, f64) {
        (self.rmse, self.chart, self.mae)
    }
}

/// Runs transfer evaluations against a model store and a tower data source
#[derive(Debug, Clone)]
pub struct TransferEvaluator<S = CsvTowerSource> {
    config: EvaluationConfig,
    store: ModelStore,
    source: S,
}

impl TransferEvaluator<CsvTowerSource> {
    pub fn new(config: EvaluationConfig) -> Self {
        let source = CsvTowerSource::new(config.data.clone());
        Self::with_source(config, source)
    }
}

impl<S: TowerSource> TransferEvaluator<S> {
    pub fn with_source(config: EvaluationConfig, source: S) -> Self {
        let store = ModelStore::new(&config.model.model_dir);
        Self {
            config,
            store,
            source,
        }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Load the target tower's frame and evaluate the source model on it
    pub fn evaluate(&self, request: &TransferRequest) -> Result<TransferOutcome> {
        request.validate()?;
        let (_, target_season) = request.seasons();

        let (frame, baseline) = self.source.load_frame(
            &request.target,
            &request.features,
            &request.target_column,
            target_season,
            request.use_delta,
        )?;
        tracing::info!("{} first value: {}", request.target, baseline);

        self.evaluate_frame(request, &frame, baseline)
    }

    /// Evaluate on an already lag-expanded target frame
    pub fn evaluate_frame(
        &self,
        request: &TransferRequest,
        frame: &FeatureTable,
        baseline: f64,
    ) -> Result<TransferOutcome> {
        request.validate()?;
        let step_back = self.config.model.step_back;
        let windows = WindowTransform::new(step_back, request.num_channels());
        let identifier = request.model_identifier();

        let (test, model, path) = if request.is_zero_shot() {
            // No training downstream, so the scaler may see the whole frame
            let mut scaler = MinMaxNormalizer::new();
            let scaled = frame.with_values(scaler.fit_transform(&frame.values)?)?;
            let test = windows.apply(&scaled)?;
            tracing::info!("Zero-shot: test tensor {:?}", test.shape());

            let model = self.store.load(&identifier)?;
            let path = EvaluationPath::ZeroShot {
                test_rows: frame.len(),
            };
            (test, model, path)
        } else {
            let (finetune_frame, test_frame) = split_frame(frame, request.finetuning_fraction)?;

            // Fit on the fine-tune rows only; test rows reuse those parameters
            let mut scaler = MinMaxNormalizer::new();
            scaler.fit(&finetune_frame.values)?;
            let finetune_frame = finetune_frame.with_values(scaler.transform(&finetune_frame.values)?)?;
            let test_frame = test_frame.with_values(scaler.transform(&test_frame.values)?)?;

            let train = windows.apply(&finetune_frame)?;
            let test = windows.apply(&test_frame)?;
            tracing::info!(
                "finetuning fraction {}: train {:?}, test {:?}",
                request.finetuning_fraction,
                train.shape(),
                test.shape()
            );

            let mut model = self.store.load(&identifier)?;
            let loss_history = self.fine_tune(&mut model, &train, request.finetune_epochs)?;
            let path = EvaluationPath::FineTune {
                finetune_rows: finetune_frame.len(),
                test_rows: test_frame.len(),
                epochs: request.finetune_epochs,
                loss_history,
            };
            (test, model, path)
        };

        let predictions = model.predict(&test.x)?;
        let rows = match &path {
            EvaluationPath::ZeroShot { test_rows } => *test_rows,
            EvaluationPath::FineTune { test_rows, .. } => *test_rows,
        };
        if predictions.is_empty() {
            return Err(TransferError::InsufficientData {
                rows,
                window: step_back,
            });
        }

        let mut results = ResultsTable::from_predictions(test.timestamps, test.y, predictions)?;
        if request.use_delta {
            results = results.with_baseline(baseline);
        }

        let rmse = results.rmse()?;
        let mae = results.mae()?;
        tracing::info!("RMSE: {:.3}, MAE: {:.3}", rmse, mae);

        let chart = if request.display_results {
            self.chart(request, &results)
        } else {
            None
        };

        Ok(TransferOutcome {
            rmse,
            chart,
            mae,
            results,
            path,
            model_identifier: identifier,
        })
    }

    fn fine_tune(
        &self,
        model: &mut SequenceModel,
        train: &WindowSet,
        epochs: usize,
    ) -> Result<Vec<f64>> {
        let settings = &self.config.model;
        fine_tune(
            model,
            &settings.frozen_components,
            settings.finetune_learning_rate,
            settings.batch_size,
            &train.x,
            &train.y,
            epochs,
        )
    }

    fn chart(&self, request: &TransferRequest, results: &ResultsTable) -> Option<TransferChart> {
        let interval = Duration::minutes(self.config.report.sample_interval_minutes);
        let chart = render_chart(
            results,
            interval,
            request.chart_title(),
            &request.target_column,
        );
        if chart.is_none() {
            tracing::warn!("Results span no time grid, skipping chart");
        }
        chart
    }
}
