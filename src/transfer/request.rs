//! What to evaluate: source model, target tower and evaluation options

use crate::data::{Season, TowerId};
use crate::error::{Result, TransferError};
use serde::{Deserialize, Serialize};

/// Season precedence for a source/target pair
///
/// Source season: explicit source season, else the target season, else
/// `AllYear`. Target season: explicit target season, else the resolved
/// source season.
pub fn resolve_seasons(source: Option<Season>, target: Option<Season>) -> (Season, Season) {
    let source = source.or(target).unwrap_or(Season::AllYear);
    let target = target.unwrap_or(source);
    (source, target)
}

/// One transfer evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Tower whose persisted model is used
    pub source: TowerId,
    /// Tower whose data is predicted
    pub target: TowerId,
    pub features: Vec<String>,
    pub target_column: String,
    /// Target season; also selects the source model unless `source_season` is set
    pub season: Option<Season>,
    pub source_season: Option<Season>,
    /// Leading share of target rows used for fine-tuning; 0 means zero-shot
    pub finetuning_fraction: f64,
    pub finetune_epochs: usize,
    pub display_results: bool,
    /// Target values are deltas from the first reading
    pub use_delta: bool,
}

impl TransferRequest {
    pub fn new(
        source: TowerId,
        target: TowerId,
        features: Vec<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            source,
            target,
            features,
            target_column: target_column.into(),
            season: None,
            source_season: None,
            finetuning_fraction: 0.0,
            finetune_epochs: 10,
            display_results: true,
            use_delta: true,
        }
    }

    pub fn with_season(mut self, season: Season) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_source_season(mut self, season: Season) -> Self {
        self.source_season = Some(season);
        self
    }

    pub fn with_finetuning(mut self, fraction: f64) -> Self {
        self.finetuning_fraction = fraction;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.finetune_epochs = epochs;
        self
    }

    pub fn with_display(mut self, display: bool) -> Self {
        self.display_results = display;
        self
    }

    pub fn with_delta(mut self, use_delta: bool) -> Self {
        self.use_delta = use_delta;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.finetuning_fraction) {
            return Err(TransferError::InvalidFraction(self.finetuning_fraction));
        }
        Ok(())
    }

    pub fn is_zero_shot(&self) -> bool {
        self.finetuning_fraction == 0.0
    }

    /// `(source_season, target_season)`
    pub fn seasons(&self) -> (Season, Season) {
        resolve_seasons(self.source_season, self.season)
    }

    /// Persisted model identifier of the source tower
    pub fn model_identifier(&self) -> String {
        self.source.model_identifier(self.seasons().0)
    }

    /// Channels per time step: features plus the target lag
    pub fn num_channels(&self) -> usize {
        self.features.len() + 1
    }

    pub fn chart_title(&self) -> String {
        let (source_season, target_season) = self.seasons();
        format!(
            "{} {} model used on {} {} ({}% fine-tuning) LSTM Model Results",
            self.source,
            source_season,
            self.target,
            target_season,
            self.finetuning_fraction * 100.0
        )
    }
}
