//! Side-by-side player comparison.

use std::collections::BTreeSet;

use crate::models::{ComparisonRow, Metric, PlayerComparison, PlayerRecord};

use super::AnalyticsError;

/// Every player name in the table, sorted.
pub fn player_names(players: &[PlayerRecord]) -> Vec<String> {
    players
        .iter()
        .map(|p| p.player_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn find<'a>(players: &'a [PlayerRecord], name: &str) -> Option<&'a PlayerRecord> {
    players.iter().find(|p| p.player_name == name)
}

/// Raw runs, wickets, strike rate and economy of two players.
pub fn compare_players(
    players: &[PlayerRecord],
    first: &str,
    second: &str,
) -> Result<PlayerComparison, AnalyticsError> {
    let a = find(players, first);
    let b = find(players, second);

    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            let mut names = Vec::new();
            if a.is_none() {
                names.push(first.to_string());
            }
            if b.is_none() && first != second {
                names.push(second.to_string());
            }
            return Err(AnalyticsError::PlayerNotFound { names });
        }
    };

    let rows = Metric::ALL
        .iter()
        .map(|&metric| ComparisonRow {
            metric,
            first: metric.value(a),
            second: metric.value(b),
        })
        .collect();

    Ok(PlayerComparison {
        first: a.player_name.clone(),
        second: b.player_name.clone(),
        rows,
    })
}
