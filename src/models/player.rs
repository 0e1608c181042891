//! Player statistics model.

use serde::{Deserialize, Serialize};

use super::Degeneracy;

/// One row of the player table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_name: String,
    pub team: String,
    pub runs: u32,
    pub wickets: u32,
    pub strike_rate: f64,
    pub economy: f64,
}

impl PlayerRecord {
    pub fn new(
        player_name: impl Into<String>,
        team: impl Into<String>,
        runs: u32,
        wickets: u32,
        strike_rate: f64,
        economy: f64,
    ) -> Self {
        Self {
            player_name: player_name.into(),
            team: team.into(),
            runs,
            wickets,
            strike_rate,
            economy,
        }
    }
}

/// A player row with its derived scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPlayer {
    #[serde(flatten)]
    pub record: PlayerRecord,

    /// Batting sub-score (0.0 to 1.0)
    pub bat_score: f64,

    /// Bowling sub-score (0.0 to 1.0)
    pub bowl_score: f64,

    /// Mean of the batting and bowling sub-scores
    pub performance_index: f64,
}

/// The full player table with scores, plus any normalization guards that
/// had to be applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub players: Vec<ScoredPlayer>,

    #[serde(default)]
    pub degeneracies: Vec<Degeneracy>,
}

impl ScoreTable {
    /// Get a scored player by exact name.
    pub fn get_player(&self, name: &str) -> Option<&ScoredPlayer> {
        self.players.iter().find(|p| p.record.player_name == name)
    }
}

/// Raw metric shown in a side-by-side comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Runs,
    Wickets,
    StrikeRate,
    Economy,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Runs,
        Metric::Wickets,
        Metric::StrikeRate,
        Metric::Economy,
    ];

    /// Read this metric from a player row.
    pub fn value(&self, player: &PlayerRecord) -> f64 {
        match self {
            Metric::Runs => player.runs as f64,
            Metric::Wickets => player.wickets as f64,
            Metric::StrikeRate => player.strike_rate,
            Metric::Economy => player.economy,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Runs => write!(f, "Runs"),
            Metric::Wickets => write!(f, "Wickets"),
            Metric::StrikeRate => write!(f, "Strike Rate"),
            Metric::Economy => write!(f, "Economy"),
        }
    }
}

/// One metric row of a comparison: `(metric, first player, second player)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub metric: Metric,
    pub first: f64,
    pub second: f64,
}

/// Two players' raw metrics side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerComparison {
    pub first: String,
    pub second: String,
    pub rows: Vec<ComparisonRow>,
}

impl PlayerComparison {
    pub fn row(&self, metric: Metric) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.metric == metric)
    }
}
