//! Brief low-learning-rate retraining of a loaded model
//!
//! Only trainable components are updated. Dense components get analytic
//! gradients of the MSE loss; a trainable encoder is updated through central
//! finite differences, which is slow and meant for small encoders only.

use super::network::{Component, SequenceModel};
use super::optimizer::Adam;
use crate::error::{Result, TransferError};
use crate::preprocessing::create_batches;
use ndarray::{Array1, Array3, Axis};

const OUTPUT_WEIGHTS: usize = 0;
const OUTPUT_BIASES: usize = 1;
const HEAD_WEIGHTS: usize = 2;
const HEAD_BIASES: usize = 3;
const ENCODER_PARAMS: usize = 4;

/// Adam + MSE trainer that never shuffles and logs only at debug level
#[derive(Debug, Clone)]
pub struct FineTuner {
    optimizer: Adam,
    pub batch_size: usize,
    pub fd_epsilon: f64,
}

impl FineTuner {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            optimizer: Adam::new(learning_rate),
            batch_size: 32,
            fd_epsilon: 1e-5,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Train for `epochs` passes in temporal order; returns per-epoch loss
    pub fn fit(
        &mut self,
        model: &mut SequenceModel,
        x: &Array3<f64>,
        y: &Array1<f64>,
        epochs: usize,
    ) -> Result<Vec<f64>> {
        model.check_input(x)?;
        if x.len_of(Axis(0)) != y.len() {
            return Err(TransferError::shape(
                format!("{} targets", x.len_of(Axis(0))),
                format!("{} targets", y.len()),
            ));
        }
        if y.is_empty() {
            tracing::warn!("Fine-tuning split produced no windows, model left unchanged");
            return Ok(Vec::new());
        }

        let batches = create_batches(x, y, self.batch_size);
        let mut history = Vec::with_capacity(epochs);

        for epoch in 0..epochs {
            let mut epoch_loss = 0.0;
            for (x_batch, y_batch) in &batches {
                epoch_loss += self.train_batch(model, x_batch, y_batch);
            }
            let avg_loss = epoch_loss / batches.len() as f64;
            history.push(avg_loss);
            tracing::debug!("Fine-tune epoch {}: loss = {:.6}", epoch + 1, avg_loss);
        }

        Ok(history)
    }

    fn train_batch(
        &mut self,
        model: &mut SequenceModel,
        x_batch: &Array3<f64>,
        y_batch: &Array1<f64>,
    ) -> f64 {
        self.optimizer.begin_step();

        let trace = model.trace(x_batch);
        let predictions = trace.predictions();
        let loss = SequenceModel::compute_loss(&predictions, y_batch);

        // dL/dpred for mean squared error
        let n = predictions.len() as f64;
        let d_output = ((&predictions - y_batch) * (2.0 / n)).insert_axis(Axis(1));

        let (d_head, dw_output, db_output) =
            model
                .output
                .backward_batch(&trace.head_a, &trace.output_z, &d_output);

        let head_grads = model.is_trainable(Component::Head).then(|| {
            let (_, dw, db) = model
                .head
                .backward_batch(&trace.encoded, &trace.head_z, &d_head);
            (dw, db)
        });

        let encoder_grads = model
            .is_trainable(Component::Encoder)
            .then(|| self.encoder_gradient(model, x_batch, y_batch));

        if model.is_trainable(Component::Output) {
            self.optimizer
                .update(OUTPUT_WEIGHTS, &mut model.output.weights, &dw_output);
            self.optimizer
                .update(OUTPUT_BIASES, &mut model.output.biases, &db_output);
        }
        if let Some((dw, db)) = head_grads {
            self.optimizer.update(HEAD_WEIGHTS, &mut model.head.weights, &dw);
            self.optimizer.update(HEAD_BIASES, &mut model.head.biases, &db);
        }
        if let Some(grad) = encoder_grads {
            let mut params = model.encoder.flat_params();
            self.optimizer.update(ENCODER_PARAMS, &mut params, &grad);
            model.encoder.set_flat_params(&params);
        }

        loss
    }

    /// Central finite differences over every encoder parameter
    fn encoder_gradient(
        &self,
        model: &mut SequenceModel,
        x_batch: &Array3<f64>,
        y_batch: &Array1<f64>,
    ) -> Array1<f64> {
        let eps = self.fd_epsilon;
        let mut params = model.encoder.flat_params();
        let mut grad = Array1::zeros(params.len());

        for k in 0..params.len() {
            let original = params[k];

            params[k] = original + eps;
            model.encoder.set_flat_params(&params);
            let loss_plus = SequenceModel::compute_loss(&model.forward(x_batch), y_batch);

            params[k] = original - eps;
            model.encoder.set_flat_params(&params);
            let loss_minus = SequenceModel::compute_loss(&model.forward(x_batch), y_batch);

            grad[k] = (loss_plus - loss_minus) / (2.0 * eps);
            params[k] = original;
        }

        model.encoder.set_flat_params(&params);
        grad
    }
}

/// Freeze `frozen`, compile with Adam(`learning_rate`) + MSE and fit
pub fn fine_tune(
    model: &mut SequenceModel,
    frozen: &[Component],
    learning_rate: f64,
    batch_size: usize,
    x: &Array3<f64>,
    y: &Array1<f64>,
    epochs: usize,
) -> Result<Vec<f64>> {
    model.freeze(frozen);
    tracing::info!(
        "Fine-tuning {:?} ({} trainable parameters) for {} epochs at lr {}",
        model.trainable_components(),
        model.num_trainable_parameters(),
        epochs,
        learning_rate
    );
    FineTuner::new(learning_rate)
        .with_batch_size(batch_size)
        .fit(model, x, y, epochs)
}
