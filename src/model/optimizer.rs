//! Adam optimizer (Adaptive Moment Estimation)
//!
//! Moment estimates are kept per parameter block ("slot"), so one optimizer
//! instance can drive every trainable component of a model.

use ndarray::{Array, ArrayD, Dimension, IxDyn};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    t: i32,
    moments: HashMap<usize, (ArrayD<f64>, ArrayD<f64>)>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            t: 0,
            moments: HashMap::new(),
        }
    }

    /// Advance the time step; call once per batch before any `update`
    pub fn begin_step(&mut self) {
        self.t += 1;
    }

    /// Apply one Adam update to the parameter block stored under `slot`
    pub fn update<D: Dimension>(
        &mut self,
        slot: usize,
        params: &mut Array<f64, D>,
        gradients: &Array<f64, D>,
    ) {
        let t = self.t.max(1);
        let shape = IxDyn(params.shape());
        let (m, v) = self
            .moments
            .entry(slot)
            .or_insert_with(|| (ArrayD::zeros(shape.clone()), ArrayD::zeros(shape)));

        let grads = gradients.view().into_dyn();

        // Biased first and second moment estimates
        *m = &*m * self.beta1 + &(&grads * (1.0 - self.beta1));
        *v = &*v * self.beta2 + &(&grads * &grads * (1.0 - self.beta2));

        // Bias correction
        let m_hat = &*m / (1.0 - self.beta1.powi(t));
        let v_hat = &*v / (1.0 - self.beta2.powi(t));

        let step = &m_hat * self.learning_rate / &(v_hat.mapv(f64::sqrt) + self.epsilon);
        let mut params_dyn = params.view_mut().into_dyn();
        params_dyn -= &step;
    }
}
