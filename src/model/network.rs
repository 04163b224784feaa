//! Sequence model: LSTM encoder -> dense head -> linear output
//!
//! Components are tagged rather than addressed by position, so fine-tuning
//! can say "freeze the encoder and the head" without relying on layer order.

use super::config::LSTMConfig;
use super::layers::{Activation, Dense};
use super::lstm::LSTMEncoder;
use crate::error::{Result, TransferError};
use ndarray::{Array1, Array2, Array3, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Named part of a `SequenceModel`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// Recurrent encoder (layer 0)
    Encoder,
    /// First dense layer (layer 1)
    Head,
    /// Linear output layer (layer 2)
    Output,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Encoder, Component::Head, Component::Output];
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Component::Encoder => "encoder",
            Component::Head => "head",
            Component::Output => "output",
        };
        f.write_str(name)
    }
}

/// Intermediate activations of one forward pass, kept for backprop
#[derive(Debug, Clone)]
pub struct ForwardTrace {
    pub encoded: Array2<f64>,
    pub head_z: Array2<f64>,
    pub head_a: Array2<f64>,
    pub output_z: Array2<f64>,
}

impl ForwardTrace {
    pub fn predictions(&self) -> Array1<f64> {
        self.output_z.column(0).to_owned()
    }
}

/// Persistable single-output sequence regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceModel {
    pub config: LSTMConfig,
    pub(crate) encoder: LSTMEncoder,
    pub(crate) head: Dense,
    pub(crate) output: Dense,
    frozen: BTreeSet<Component>,
}

impl SequenceModel {
    pub fn new(config: LSTMConfig) -> Self {
        let encoder = LSTMEncoder::new(config.input_size, config.hidden_size, config.num_layers);
        let head = Dense::new(config.hidden_size, config.head_size, Activation::ReLU);
        let output = Dense::new(config.head_size, 1, Activation::Linear);

        Self {
            config,
            encoder,
            head,
            output,
            frozen: BTreeSet::new(),
        }
    }

    /// Channels expected per time step
    pub fn input_size(&self) -> usize {
        self.encoder.input_size()
    }

    pub fn num_parameters(&self) -> usize {
        self.encoder.num_parameters() + self.head.num_parameters() + self.output.num_parameters()
    }

    /// Mark components non-trainable
    pub fn freeze(&mut self, components: &[Component]) {
        self.frozen.extend(components.iter().copied());
    }

    pub fn unfreeze_all(&mut self) {
        self.frozen.clear();
    }

    pub fn is_trainable(&self, component: Component) -> bool {
        !self.frozen.contains(&component)
    }

    pub fn trainable_components(&self) -> Vec<Component> {
        Component::ALL
            .into_iter()
            .filter(|c| self.is_trainable(*c))
            .collect()
    }

    /// Parameters that fine-tuning may change
    pub fn num_trainable_parameters(&self) -> usize {
        self.trainable_components()
            .into_iter()
            .map(|c| match c {
                Component::Encoder => self.encoder.num_parameters(),
                Component::Head => self.head.num_parameters(),
                Component::Output => self.output.num_parameters(),
            })
            .sum()
    }

    /// Forward pass keeping intermediate activations
    pub fn trace(&self, x: &Array3<f64>) -> ForwardTrace {
        let encoded = self.encoder.encode(x);
        self.trace_from_encoded(encoded)
    }

    pub(crate) fn trace_from_encoded(&self, encoded: Array2<f64>) -> ForwardTrace {
        let head_z = self.head.linear_batch(&encoded);
        let head_a = head_z.mapv(|v| self.head.activation.apply(v));
        let output_z = self.output.linear_batch(&head_a);
        ForwardTrace {
            encoded,
            head_z,
            head_a,
            output_z,
        }
    }

    /// [batch, seq_len, channels] -> [batch]
    pub fn forward(&self, x: &Array3<f64>) -> Array1<f64> {
        self.trace(x).predictions()
    }

    /// Validated forward pass; zero samples give an empty prediction vector
    pub fn predict(&self, x: &Array3<f64>) -> Result<Array1<f64>> {
        self.check_input(x)?;
        if x.len_of(Axis(0)) == 0 {
            return Ok(Array1::zeros(0));
        }
        Ok(self.forward(x))
    }

    pub fn check_input(&self, x: &Array3<f64>) -> Result<()> {
        let channels = x.len_of(Axis(2));
        if channels != self.input_size() {
            return Err(TransferError::shape(
                format!("{} input channels", self.input_size()),
                format!("{} channels in window tensor {:?}", channels, x.dim()),
            ));
        }
        Ok(())
    }

    /// Mean squared error of predictions against targets
    pub fn compute_loss(predictions: &Array1<f64>, targets: &Array1<f64>) -> f64 {
        let diff = predictions - targets;
        diff.mapv(|v| v * v).mean().unwrap_or(0.0)
    }
}
