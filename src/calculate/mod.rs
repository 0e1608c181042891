//! Statistics calculation engine.
//!
//! Computes derived metrics from validated match and player tables:
//! - Match winners and margins, per-team series
//! - Rolling averages, venue splits, outliers and trend prediction
//! - Player batting/bowling scores and rankings
//! - Two-player comparisons
//!
//! Every function here is pure: it reads its inputs and returns new values.

pub mod compare;
pub mod matches;
pub mod players;
pub mod series;

use thiserror::Error;

pub use compare::{compare_players, player_names};
pub use matches::{augment_matches, team_series, teams};
pub use players::{rank_players, score_players};
pub use series::{
    detect_outliers, predict_next, rolling_average, summarize, venue_averages,
    with_rolling_average,
};

/// Errors from analytics requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Player not found: {}", .names.join(", "))]
    PlayerNotFound { names: Vec<String> },
}
