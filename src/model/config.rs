//! Architecture of the sequence model

use serde::{Deserialize, Serialize};

/// Shape of the LSTM encoder and dense head
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LSTMConfig {
    /// Channels per time step (features + target lag)
    pub input_size: usize,
    /// LSTM hidden state size
    pub hidden_size: usize,
    /// Width of the dense head
    pub head_size: usize,
    /// Stacked LSTM cells
    pub num_layers: usize,
}

impl LSTMConfig {
    pub fn new(input_size: usize, hidden_size: usize) -> Self {
        Self {
            input_size,
            hidden_size,
            head_size: hidden_size,
            num_layers: 1,
        }
    }

    pub fn with_head_size(mut self, head_size: usize) -> Self {
        self.head_size = head_size;
        self
    }

    pub fn with_layers(mut self, num_layers: usize) -> Self {
        self.num_layers = num_layers.max(1);
        self
    }

    pub fn small(input_size: usize) -> Self {
        Self::new(input_size, 16).with_head_size(8)
    }
}

impl Default for LSTMConfig {
    fn default() -> Self {
        Self::new(1, 64)
    }
}
