//! # Preprocessing
//!
//! Scaling, chronological splitting and windowing of lag-expanded frames.
//!
//! ```rust,no_run
//! use tower_transfer::data::FeatureTable;
//! use tower_transfer::preprocessing::{split_frame, MinMaxNormalizer, Normalizer, WindowTransform};
//!
//! # fn frame() -> FeatureTable { unimplemented!() }
//! let frame = frame();
//! let (finetune, test) = split_frame(&frame, 0.7).unwrap();
//!
//! // Fit on the fine-tune rows only, reuse for the test rows
//! let mut scaler = MinMaxNormalizer::new();
//! let finetune = finetune.with_values(scaler.fit_transform(&finetune.values).unwrap()).unwrap();
//! let test = test.with_values(scaler.transform(&test.values).unwrap()).unwrap();
//!
//! let windows = WindowTransform::new(6, frame.num_channels()).apply(&test).unwrap();
//! println!("{:?}", windows.shape());
//! ```

mod normalizer;
mod split;
mod window;

pub use normalizer::{MinMaxNormalizer, Normalizer};
pub use split::{finetune_split, split_frame};
pub use window::{create_batches, to_windows, WindowSet, WindowTransform};
