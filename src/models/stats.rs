//! Derived statistics models.

use serde::{Deserialize, Serialize};

use super::SeriesPoint;

/// Denominator used when computing a standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StdDevKind {
    /// Divide by N
    #[default]
    Population,
    /// Divide by N - 1
    Sample,
}

impl std::fmt::Display for StdDevKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StdDevKind::Population => write!(f, "population"),
            StdDevKind::Sample => write!(f, "sample"),
        }
    }
}

/// Average runs a team scored at one venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueAverage {
    pub venue: String,
    pub matches: u32,
    pub average_runs: f64,
}

/// A match whose score sits unusually far from the team's mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlier {
    #[serde(flatten)]
    pub point: SeriesPoint,
    pub z_score: f64,
}

/// Next-match runs estimate from a linear fit over match index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendPrediction {
    Available {
        value: f64,
        slope: f64,
        intercept: f64,
    },
    InsufficientData {
        observed: usize,
        required: usize,
    },
}

impl TrendPrediction {
    /// The predicted value, if enough history existed.
    pub fn value(&self) -> Option<f64> {
        match self {
            TrendPrediction::Available { value, .. } => Some(*value),
            TrendPrediction::InsufficientData { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, TrendPrediction::Available { .. })
    }
}

/// Headline numbers for a team's series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub matches_played: u32,
    pub total_runs: u64,
    pub highest_score: Option<u32>,
    pub average_runs: f64,
}

/// A degenerate input that forced a fallback value instead of a division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degeneracy {
    /// Every observation had the same value
    ZeroVariance,
    /// The column maximum was zero, so the term contributes 0 for everyone
    ZeroMaximum { column: String },
    /// These players have zero economy; their economy term is 0
    ZeroEconomy { players: Vec<String> },
    /// No player has a positive economy; every economy term is 0
    NoPositiveEconomy,
}

impl std::fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degeneracy::ZeroVariance => write!(f, "zero variance"),
            Degeneracy::ZeroMaximum { column } => write!(f, "maximum of '{}' is zero", column),
            Degeneracy::ZeroEconomy { players } => {
                write!(f, "zero economy for: {}", players.join(", "))
            }
            Degeneracy::NoPositiveEconomy => write!(f, "no player has a positive economy"),
        }
    }
}
