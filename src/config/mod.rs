//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::{StdDevKind, TieWinner};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Match preprocessing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Side credited with the win when runs are level
    #[serde(default)]
    pub tie_winner: TieWinner,
}

/// Team series analytics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Number of matches in the rolling average window
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,

    /// Absolute z-score above which a match is an outlier
    #[serde(default = "default_outlier_threshold")]
    pub outlier_threshold: f64,

    /// Standard deviation denominator for z-scores
    #[serde(default)]
    pub std_dev: StdDevKind,

    /// Matches needed before a trend prediction is made
    #[serde(default = "default_min_trend_observations")]
    pub min_trend_observations: usize,
}

fn default_rolling_window() -> usize {
    5
}

fn default_outlier_threshold() -> f64 {
    2.0
}

fn default_min_trend_observations() -> usize {
    5
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            rolling_window: default_rolling_window(),
            outlier_threshold: default_outlier_threshold(),
            std_dev: StdDevKind::default(),
            min_trend_observations: default_min_trend_observations(),
        }
    }
}

/// Weights of the player performance index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_runs_weight")]
    pub runs: f64,

    #[serde(default = "default_strike_rate_weight")]
    pub strike_rate: f64,

    #[serde(default = "default_wickets_weight")]
    pub wickets: f64,

    #[serde(default = "default_economy_weight")]
    pub economy: f64,
}

fn default_runs_weight() -> f64 {
    0.6
}

fn default_strike_rate_weight() -> f64 {
    0.4
}

fn default_wickets_weight() -> f64 {
    0.7
}

fn default_economy_weight() -> f64 {
    0.3
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            runs: default_runs_weight(),
            strike_rate: default_strike_rate_weight(),
            wickets: default_wickets_weight(),
            economy: default_economy_weight(),
        }
    }
}

/// Player scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Size of the top performers table
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default)]
    pub weights: ScoringWeights,
}

fn default_top_n() -> usize {
    5
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            weights: ScoringWeights::default(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub matches: MatchConfig,

    #[serde(default)]
    pub series: SeriesConfig,

    #[serde(default)]
    pub scoring: ScoringConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            matches: MatchConfig::default(),
            series: SeriesConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let series = &self.series;

        if series.rolling_window == 0 {
            return Err(ConfigError::ValidationError(
                "series.rolling_window must be greater than 0".to_string(),
            ));
        }

        if !series.outlier_threshold.is_finite() || series.outlier_threshold <= 0.0 {
            return Err(ConfigError::ValidationError(
                "series.outlier_threshold must be a positive number".to_string(),
            ));
        }

        // A line needs at least two points.
        if series.min_trend_observations < 2 {
            return Err(ConfigError::ValidationError(
                "series.min_trend_observations must be at least 2".to_string(),
            ));
        }

        if self.scoring.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "scoring.top_n must be greater than 0".to_string(),
            ));
        }

        let w = &self.scoring.weights;
        for (name, value) in [
            ("runs", w.runs),
            ("strike_rate", w.strike_rate),
            ("wickets", w.wickets),
            ("economy", w.economy),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "scoring.weights.{} must be a non-negative number",
                    name
                )));
            }
        }

        if (w.runs + w.strike_rate - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::ValidationError(
                "scoring.weights.runs + strike_rate must sum to 1.0".to_string(),
            ));
        }

        if (w.wickets + w.economy - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::ValidationError(
                "scoring.weights.wickets + economy must sum to 1.0".to_string(),
            ));
        }

        Ok(())
    }
}
