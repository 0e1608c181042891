//! Per-team match series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MatchId;

/// One match as seen from the selected team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub match_id: MatchId,
    pub date: NaiveDate,
    pub venue: String,
    pub opponent: String,
    /// Runs scored by the selected team in this match
    pub team_runs: u32,
}

/// A team's matches in ascending date order.
///
/// Matches on the same date keep the order they had in the match table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeries {
    pub team: String,
    pub points: Vec<SeriesPoint>,
}

impl TeamSeries {
    pub fn new(team: impl Into<String>, points: Vec<SeriesPoint>) -> Self {
        Self {
            team: team.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The `team_runs` column as floats, in series order.
    pub fn runs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.team_runs as f64).collect()
    }
}

/// A series point with its rolling average, `None` until the window fills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    #[serde(flatten)]
    pub point: SeriesPoint,
    pub rolling_avg: Option<f64>,
}
