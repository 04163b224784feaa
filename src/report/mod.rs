//! # Results
//!
//! Scored actual/predicted tables and the comparison chart. Rendering is
//! presentation only and never feeds back into the metrics.

mod chart;
mod results;

pub use chart::{render_chart, TransferChart};
pub use results::{regrid, GridPoint, ResultsTable};
