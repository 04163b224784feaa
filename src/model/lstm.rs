//! LSTM encoder (Long Short-Term Memory)

use ndarray::{s, Array1, Array2, Array3};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Deserialize, Serialize};

/// LSTM cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LSTMCell {
    pub input_size: usize,
    pub hidden_size: usize,

    // Input gate
    w_ii: Array2<f64>,
    w_hi: Array2<f64>,
    b_i: Array1<f64>,

    // Forget gate
    w_if: Array2<f64>,
    w_hf: Array2<f64>,
    b_f: Array1<f64>,

    // Cell candidate
    w_ig: Array2<f64>,
    w_hg: Array2<f64>,
    b_g: Array1<f64>,

    // Output gate
    w_io: Array2<f64>,
    w_ho: Array2<f64>,
    b_o: Array1<f64>,
}

impl LSTMCell {
    pub fn new(input_size: usize, hidden_size: usize) -> Self {
        let limit = (1.0 / hidden_size as f64).sqrt();

        Self {
            input_size,
            hidden_size,
            w_ii: Array2::random((hidden_size, input_size), Uniform::new(-limit, limit)),
            w_hi: Array2::random((hidden_size, hidden_size), Uniform::new(-limit, limit)),
            b_i: Array1::zeros(hidden_size),
            w_if: Array2::random((hidden_size, input_size), Uniform::new(-limit, limit)),
            w_hf: Array2::random((hidden_size, hidden_size), Uniform::new(-limit, limit)),
            b_f: Array1::from_elem(hidden_size, 1.0), // forget bias starts at 1
            w_ig: Array2::random((hidden_size, input_size), Uniform::new(-limit, limit)),
            w_hg: Array2::random((hidden_size, hidden_size), Uniform::new(-limit, limit)),
            b_g: Array1::zeros(hidden_size),
            w_io: Array2::random((hidden_size, input_size), Uniform::new(-limit, limit)),
            w_ho: Array2::random((hidden_size, hidden_size), Uniform::new(-limit, limit)),
            b_o: Array1::zeros(hidden_size),
        }
    }

    /// One time step: returns `(h_next, c_next)`
    pub fn forward(
        &self,
        x: &Array1<f64>,
        h_prev: &Array1<f64>,
        c_prev: &Array1<f64>,
    ) -> (Array1<f64>, Array1<f64>) {
        // i = σ(W_ii x + W_hi h + b_i)
        let i_gate = sigmoid(&(self.w_ii.dot(x) + self.w_hi.dot(h_prev) + &self.b_i));
        // f = σ(W_if x + W_hf h + b_f)
        let f_gate = sigmoid(&(self.w_if.dot(x) + self.w_hf.dot(h_prev) + &self.b_f));
        // g = tanh(W_ig x + W_hg h + b_g)
        let g = tanh(&(self.w_ig.dot(x) + self.w_hg.dot(h_prev) + &self.b_g));
        // o = σ(W_io x + W_ho h + b_o)
        let o_gate = sigmoid(&(self.w_io.dot(x) + self.w_ho.dot(h_prev) + &self.b_o));

        let c_next = &f_gate * c_prev + &i_gate * &g;
        let h_next = &o_gate * &tanh(&c_next);

        (h_next, c_next)
    }

    pub fn init_hidden(&self) -> (Array1<f64>, Array1<f64>) {
        (
            Array1::zeros(self.hidden_size),
            Array1::zeros(self.hidden_size),
        )
    }

    pub fn num_parameters(&self) -> usize {
        4 * (self.hidden_size * self.input_size + self.hidden_size * self.hidden_size + self.hidden_size)
    }

    fn weights(&self) -> [&Array2<f64>; 8] {
        [
            &self.w_ii, &self.w_hi, &self.w_if, &self.w_hf, &self.w_ig, &self.w_hg, &self.w_io,
            &self.w_ho,
        ]
    }

    fn weights_mut(&mut self) -> [&mut Array2<f64>; 8] {
        [
            &mut self.w_ii,
            &mut self.w_hi,
            &mut self.w_if,
            &mut self.w_hf,
            &mut self.w_ig,
            &mut self.w_hg,
            &mut self.w_io,
            &mut self.w_ho,
        ]
    }

    fn biases(&self) -> [&Array1<f64>; 4] {
        [&self.b_i, &self.b_f, &self.b_g, &self.b_o]
    }

    fn biases_mut(&mut self) -> [&mut Array1<f64>; 4] {
        [&mut self.b_i, &mut self.b_f, &mut self.b_g, &mut self.b_o]
    }
}

/// Stack of LSTM cells; encodes a sequence into the last hidden state of the
/// top cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LSTMEncoder {
    cells: Vec<LSTMCell>,
}

impl LSTMEncoder {
    pub fn new(input_size: usize, hidden_size: usize, num_layers: usize) -> Self {
        let mut cells = Vec::with_capacity(num_layers.max(1));
        cells.push(LSTMCell::new(input_size, hidden_size));
        for _ in 1..num_layers {
            cells.push(LSTMCell::new(hidden_size, hidden_size));
        }
        Self { cells }
    }

    pub fn input_size(&self) -> usize {
        self.cells[0].input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.cells[self.cells.len() - 1].hidden_size
    }

    pub fn num_parameters(&self) -> usize {
        self.cells.iter().map(LSTMCell::num_parameters).sum()
    }

    /// [batch, seq_len, input_size] -> [batch, hidden_size]
    pub fn encode(&self, x: &Array3<f64>) -> Array2<f64> {
        let (batch_size, seq_len, _) = x.dim();
        let mut encoded = Array2::zeros((batch_size, self.hidden_size()));

        for b in 0..batch_size {
            let mut states: Vec<(Array1<f64>, Array1<f64>)> =
                self.cells.iter().map(|cell| cell.init_hidden()).collect();

            for t in 0..seq_len {
                let mut layer_input: Array1<f64> = x.slice(s![b, t, ..]).to_owned();

                for (layer_idx, cell) in self.cells.iter().enumerate() {
                    let (h_prev, c_prev) = &states[layer_idx];
                    let (h_next, c_next) = cell.forward(&layer_input, h_prev, c_prev);
                    layer_input = h_next.clone();
                    states[layer_idx] = (h_next, c_next);
                }
            }

            encoded
                .row_mut(b)
                .assign(&states[self.cells.len() - 1].0);
        }

        encoded
    }

    /// All parameters flattened in a fixed order
    pub fn flat_params(&self) -> Array1<f64> {
        let mut flat = Vec::with_capacity(self.num_parameters());
        for cell in &self.cells {
            for w in cell.weights() {
                flat.extend(w.iter().copied());
            }
            for b in cell.biases() {
                flat.extend(b.iter().copied());
            }
        }
        Array1::from(flat)
    }

    /// Inverse of `flat_params`
    pub fn set_flat_params(&mut self, flat: &Array1<f64>) {
        let mut values = flat.iter().copied();
        for cell in &mut self.cells {
            for w in cell.weights_mut() {
                w.iter_mut().for_each(|v| *v = values.next().unwrap_or(*v));
            }
            for b in cell.biases_mut() {
                b.iter_mut().for_each(|v| *v = values.next().unwrap_or(*v));
            }
        }
    }
}

fn sigmoid(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}

fn tanh(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| v.tanh())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lstm_cell() {
        let cell = LSTMCell::new(5, 10);
        let x = Array1::zeros(5);
        let (h, c) = cell.init_hidden();

        let (h_next, c_next) = cell.forward(&x, &h, &c);

        assert_eq!(h_next.len(), 10);
        assert_eq!(c_next.len(), 10);
    }

    #[test]
    fn test_encoder_shape() {
        let encoder = LSTMEncoder::new(3, 8, 2);
        let x = Array3::zeros((4, 6, 3));
        assert_eq!(encoder.encode(&x).dim(), (4, 8));
        assert_eq!(
            encoder.num_parameters(),
            LSTMCell::new(3, 8).num_parameters() + LSTMCell::new(8, 8).num_parameters()
        );
    }

    #[test]
    fn test_flat_params_round_trip() {
        let mut encoder = LSTMEncoder::new(2, 3, 1);
        let flat = encoder.flat_params();
        assert_eq!(flat.len(), encoder.num_parameters());

        let shifted = flat.mapv(|v| v + 1.0);
        encoder.set_flat_params(&shifted);
        assert_eq!(encoder.flat_params(), shifted);
    }

    #[test]
    fn test_hidden_state_is_bounded() {
        let encoder = LSTMEncoder::new(2, 4, 1);
        let x = Array3::from_elem((1, 20, 2), 50.0);
        assert!(encoder.encode(&x).iter().all(|v| v.abs() <= 1.0));
    }
}
