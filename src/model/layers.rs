//! Dense layers and activations

use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Deserialize, Serialize};

/// Activation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Linear,
    ReLU,
}

impl Activation {
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Linear => x,
            Activation::ReLU => x.max(0.0),
        }
    }

    /// Derivative with respect to the pre-activation value
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::Linear => 1.0,
            Activation::ReLU => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Fully connected layer: `activation(W x + b)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    /// [output_size, input_size]
    pub weights: Array2<f64>,
    /// [output_size]
    pub biases: Array1<f64>,
    pub activation: Activation,
}

impl Dense {
    /// Xavier/Glorot uniform initialization
    pub fn new(input_size: usize, output_size: usize, activation: Activation) -> Self {
        let limit = (6.0 / (input_size + output_size) as f64).sqrt();
        Self {
            weights: Array2::random((output_size, input_size), Uniform::new(-limit, limit)),
            biases: Array1::zeros(output_size),
            activation,
        }
    }

    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    /// Pre-activation values for a batch [batch, input] -> [batch, output]
    pub fn linear_batch(&self, x: &Array2<f64>) -> Array2<f64> {
        x.dot(&self.weights.t()) + &self.biases
    }

    /// Gradients for a batch given the upstream gradient of the output
    ///
    /// Returns `(d_input, d_weights, d_biases)`.
    pub fn backward_batch(
        &self,
        input: &Array2<f64>,
        pre_activation: &Array2<f64>,
        output_grad: &Array2<f64>,
    ) -> (Array2<f64>, Array2<f64>, Array1<f64>) {
        let delta = output_grad * &pre_activation.mapv(|v| self.activation.derivative(v));
        let d_weights = delta.t().dot(input);
        let d_biases = delta.sum_axis(Axis(0));
        let d_input = delta.dot(&self.weights);
        (d_input, d_weights, d_biases)
    }
}
