//! Configuration management
//!
//! Everything the evaluation needs from its environment (data and model
//! locations, window size, fine-tuning optimizer settings, chart output) is
//! carried here and passed explicitly into the core functions.

use crate::error::Result;
use crate::model::Component;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where tower data lives and how it is laid out
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub time_column: String,
    pub timestamp_format: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            time_column: "time".to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

/// Persisted model store and fine-tuning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model_dir: PathBuf,
    /// Window size in samples (6 * 5 min = 30 min)
    pub step_back: usize,
    pub finetune_learning_rate: f64,
    pub batch_size: usize,
    pub frozen_components: Vec<Component>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models_saved"),
            step_back: 6,
            finetune_learning_rate: 1e-5,
            batch_size: 32,
            frozen_components: vec![Component::Encoder, Component::Head],
        }
    }
}

/// Chart output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub sample_interval_minutes: i64,
    pub width: u32,
    pub height: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("plots"),
            sample_interval_minutes: 5,
            width: 1280,
            height: 720,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EvaluationConfig {
    pub data: DataConfig,
    pub model: ModelConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

impl EvaluationConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EvaluationConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from file or use default
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Point data and model lookups at a common root directory
    pub fn with_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        let root = root.as_ref();
        self.data.data_dir = root.join("data");
        self.model.model_dir = root.join("models_saved");
        self.report.output_dir = root.join("plots");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = EvaluationConfig::default();
        assert_eq!(config.model.step_back, 6);
        assert_eq!(config.model.finetune_learning_rate, 1e-5);
        assert_eq!(config.report.sample_interval_minutes, 5);
        assert_eq!(
            config.model.frozen_components,
            vec![Component::Encoder, Component::Head]
        );
    }

    #[test]
    fn test_config_serialization() {
        let config = EvaluationConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: EvaluationConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model.model_dir, config.model.model_dir);
        assert_eq!(parsed.model.frozen_components, config.model.frozen_components);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: EvaluationConfig = toml::from_str("[model]\nstep_back = 12\n").unwrap();
        assert_eq!(parsed.model.step_back, 12);
        assert_eq!(parsed.model.batch_size, 32);
        assert_eq!(parsed.data.time_column, "time");
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = EvaluationConfig::load_or_default("/nonexistent/transfer.toml");
        assert_eq!(config.logging.level, "info");
    }
}
