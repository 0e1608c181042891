//! Match outcomes and per-team series extraction.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::models::{MatchRecord, MatchResult, SeriesPoint, TeamSeries, TieWinner};

/// Derive `winner` and `margin` for every match, in table order.
pub fn augment_matches(matches: &[MatchRecord], tie: TieWinner) -> Vec<MatchResult> {
    matches
        .iter()
        .map(|m| MatchResult::from_record(m, tie))
        .collect()
}

/// Every team that appears on either side, sorted by name.
pub fn teams(matches: &[MatchRecord]) -> Vec<String> {
    matches
        .iter()
        .flat_map(|m| [m.team1.as_str(), m.team2.as_str()])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Project a match onto `team`'s side, if the team played in it.
///
/// A row naming the team on both sides is read from the `team1` side.
pub fn series_point(record: &MatchRecord, team: &str) -> Option<SeriesPoint> {
    if !record.involves(team) {
        return None;
    }
    if record.team1 == record.team2 {
        warn!(
            match_id = %record.match_id,
            "Team {} listed on both sides; using team1 runs", team
        );
    }

    let (team_runs, opponent) = if record.team1 == team {
        (record.runs_team1, &record.team2)
    } else {
        (record.runs_team2, &record.team1)
    };

    Some(SeriesPoint {
        match_id: record.match_id.clone(),
        date: record.date,
        venue: record.venue.clone(),
        opponent: opponent.clone(),
        team_runs,
    })
}

/// Extract one team's matches, stably sorted by date ascending.
pub fn team_series(matches: &[MatchRecord], team: &str) -> TeamSeries {
    let mut points: Vec<SeriesPoint> = matches
        .iter()
        .filter_map(|m| series_point(m, team))
        .collect();

    // sort_by_key is stable: same-day matches keep table order
    points.sort_by_key(|p| p.date);

    debug!("Extracted {} matches for {}", points.len(), team);
    TeamSeries::new(team, points)
}
