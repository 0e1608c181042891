//! Match result model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MatchId;

/// Which side is credited with the win when both teams score the same runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TieWinner {
    Team1,
    #[default]
    Team2,
}

/// One row of the match table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,

    pub date: NaiveDate,

    pub team1: String,

    pub team2: String,

    pub venue: String,

    /// Runs scored by `team1`
    pub runs_team1: u32,

    /// Runs scored by `team2`
    pub runs_team2: u32,
}

impl MatchRecord {
    pub fn new(
        match_id: impl Into<MatchId>,
        date: NaiveDate,
        team1: impl Into<String>,
        team2: impl Into<String>,
        venue: impl Into<String>,
        runs_team1: u32,
        runs_team2: u32,
    ) -> Self {
        Self {
            match_id: match_id.into(),
            date,
            team1: team1.into(),
            team2: team2.into(),
            venue: venue.into(),
            runs_team1,
            runs_team2,
        }
    }

    /// Absolute run difference between the two sides.
    pub fn margin(&self) -> u32 {
        self.runs_team1.abs_diff(self.runs_team2)
    }

    pub fn is_tie(&self) -> bool {
        self.runs_team1 == self.runs_team2
    }

    /// The side with strictly more runs, or the side named by `tie` when
    /// the runs are level.
    pub fn winner(&self, tie: TieWinner) -> &str {
        if self.runs_team1 > self.runs_team2 {
            &self.team1
        } else if self.runs_team2 > self.runs_team1 {
            &self.team2
        } else {
            match tie {
                TieWinner::Team1 => &self.team1,
                TieWinner::Team2 => &self.team2,
            }
        }
    }

    pub fn involves(&self, team: &str) -> bool {
        self.team1 == team || self.team2 == team
    }
}

/// A match row augmented with its derived outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub record: MatchRecord,

    pub winner: String,

    pub margin: u32,

    /// True when both sides scored the same runs; `winner` then follows
    /// the tie rule.
    pub tied: bool,
}

impl MatchResult {
    pub fn from_record(record: &MatchRecord, tie: TieWinner) -> Self {
        Self {
            winner: record.winner(tie).to_string(),
            margin: record.margin(),
            tied: record.is_tie(),
            record: record.clone(),
        }
    }
}
