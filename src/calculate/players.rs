//! Player batting/bowling scores, performance index and ranking.

use tracing::{debug, warn};

use crate::config::ScoringWeights;
use crate::models::{Degeneracy, PlayerRecord, ScoreTable, ScoredPlayer};

/// Column extremes used to normalize every player's metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Normalizers {
    max_runs: f64,
    max_strike_rate: f64,
    max_wickets: f64,
    /// Smallest strictly positive economy, if any
    min_economy: Option<f64>,
}

impl Normalizers {
    fn from_players(players: &[PlayerRecord]) -> Self {
        let max_of = |f: fn(&PlayerRecord) -> f64| players.iter().map(f).fold(0.0, f64::max);

        let min_economy = players
            .iter()
            .map(|p| p.economy)
            .filter(|&e| e > 0.0)
            .reduce(f64::min);

        Self {
            max_runs: max_of(|p| p.runs as f64),
            max_strike_rate: max_of(|p| p.strike_rate),
            max_wickets: max_of(|p| p.wickets as f64),
            min_economy,
        }
    }

    fn degeneracies(&self, players: &[PlayerRecord]) -> Vec<Degeneracy> {
        let mut found = Vec::new();

        for (column, max) in [
            ("runs", self.max_runs),
            ("strike_rate", self.max_strike_rate),
            ("wickets", self.max_wickets),
        ] {
            if max == 0.0 {
                found.push(Degeneracy::ZeroMaximum {
                    column: column.to_string(),
                });
            }
        }

        if self.min_economy.is_none() {
            found.push(Degeneracy::NoPositiveEconomy);
        } else {
            let zero: Vec<String> = players
                .iter()
                .filter(|p| p.economy == 0.0)
                .map(|p| p.player_name.clone())
                .collect();
            if !zero.is_empty() {
                found.push(Degeneracy::ZeroEconomy { players: zero });
            }
        }

        found
    }
}

/// `value / max`, or 0 when the maximum is 0.
fn ratio_to_max(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

/// `min / economy`, or 0 for a zero economy or when no positive economy
/// exists.
fn economy_ratio(economy: f64, min_economy: Option<f64>) -> f64 {
    match min_economy {
        Some(min) if economy > 0.0 => min / economy,
        _ => 0.0,
    }
}

fn score_player(
    player: &PlayerRecord,
    norm: &Normalizers,
    weights: &ScoringWeights,
) -> ScoredPlayer {
    let bat_score = weights.runs * ratio_to_max(player.runs as f64, norm.max_runs)
        + weights.strike_rate * ratio_to_max(player.strike_rate, norm.max_strike_rate);

    let bowl_score = weights.wickets * ratio_to_max(player.wickets as f64, norm.max_wickets)
        + weights.economy * economy_ratio(player.economy, norm.min_economy);

    ScoredPlayer {
        record: player.clone(),
        bat_score,
        bowl_score,
        performance_index: (bat_score + bowl_score) / 2.0,
    }
}

/// Score every player against the table's column extremes.
///
/// Zero maxima and zero economies contribute 0 to the affected term; each
/// such case is recorded on the returned table.
pub fn score_players(players: &[PlayerRecord], weights: &ScoringWeights) -> ScoreTable {
    let norm = Normalizers::from_players(players);
    let degeneracies = if players.is_empty() {
        Vec::new()
    } else {
        norm.degeneracies(players)
    };

    for d in &degeneracies {
        warn!("Player scoring fallback applied: {}", d);
    }

    let scored = players
        .iter()
        .map(|p| score_player(p, &norm, weights))
        .collect();

    debug!("Scored {} players", players.len());
    ScoreTable {
        players: scored,
        degeneracies,
    }
}

/// The `top_n` players by performance index, highest first.
///
/// Equal indices are ordered by player name, then by table order.
pub fn rank_players(table: &ScoreTable, top_n: usize) -> Vec<ScoredPlayer> {
    let mut ranked: Vec<&ScoredPlayer> = table.players.iter().collect();

    ranked.sort_by(|a, b| {
        b.performance_index
            .total_cmp(&a.performance_index)
            .then_with(|| a.record.player_name.cmp(&b.record.player_name))
    });

    ranked.into_iter().take(top_n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn weights() -> ScoringWeights {
        ScoringWeights::default()
    }

    fn sample_players() -> Vec<PlayerRecord> {
        vec![
            PlayerRecord::new("Virat Kohli", "RCB", 741, 0, 154.7, 0.0),
            PlayerRecord::new("Jasprit Bumrah", "MI", 8, 20, 80.0, 6.48),
            PlayerRecord::new("Sunil Narine", "KKR", 488, 17, 180.7, 6.69),
            PlayerRecord::new("Ruturaj Gaikwad", "CSK", 583, 0, 141.2, 0.0),
            PlayerRecord::new("Harshal Patel", "PBKS", 20, 24, 110.0, 9.73),
            PlayerRecord::new("Travis Head", "SRH", 567, 0, 191.6, 0.0),
            PlayerRecord::new("Axar Patel", "DC", 235, 11, 149.7, 7.65),
        ]
    }

    #[test]
    fn test_dominant_player_scores_one() {
        let players = vec![
            PlayerRecord::new("A", "X", 500, 20, 180.0, 6.0),
            PlayerRecord::new("B", "Y", 250, 10, 120.0, 8.0),
        ];
        let table = score_players(&players, &weights());
        let a = table.get_player("A").unwrap();

        assert!(approx(a.bat_score, 1.0));
        assert!(approx(a.bowl_score, 1.0));
        assert!(approx(a.performance_index, 1.0));
        assert!(table.degeneracies.is_empty());
    }

    #[test]
    fn test_score_formula() {
        let players = vec![
            PlayerRecord::new("A", "X", 500, 20, 180.0, 6.0),
            PlayerRecord::new("B", "Y", 250, 10, 120.0, 8.0),
        ];
        let b = score_players(&players, &weights()).players[1].clone();

        let bat = 0.6 * 0.5 + 0.4 * (120.0 / 180.0);
        let bowl = 0.7 * 0.5 + 0.3 * (6.0 / 8.0);
        assert!(approx(b.bat_score, bat));
        assert!(approx(b.bowl_score, bowl));
        assert!(approx(b.performance_index, (bat + bowl) / 2.0));
    }

    #[test]
    fn test_max_runs_and_strike_rate_bat_score_one() {
        let table = score_players(&sample_players(), &weights());
        let kohli = table.get_player("Virat Kohli").unwrap();
        let head = table.get_player("Travis Head").unwrap();

        // Kohli has max runs, Head max strike rate; neither has both
        assert!(kohli.bat_score < 1.0);
        assert!(approx(head.bat_score, 0.6 * 567.0 / 741.0 + 0.4));

        let players = vec![
            PlayerRecord::new("Top", "X", 700, 0, 200.0, 0.0),
            PlayerRecord::new("Other", "Y", 100, 5, 100.0, 7.0),
        ];
        let table = score_players(&players, &weights());
        assert!(approx(table.players[0].bat_score, 1.0));
    }

    #[test]
    fn test_zero_wickets_contributes_nothing() {
        let players = vec![
            PlayerRecord::new("Batter", "X", 500, 0, 150.0, 9.0),
            PlayerRecord::new("Bowler", "Y", 10, 20, 90.0, 6.0),
        ];
        let batter = score_players(&players, &weights()).players[0].clone();

        assert!(approx(batter.bowl_score, 0.3 * 6.0 / 9.0));
    }

    #[test]
    fn test_zero_maxima_fall_back_to_zero() {
        let players = vec![
            PlayerRecord::new("A", "X", 0, 0, 0.0, 7.0),
            PlayerRecord::new("B", "Y", 0, 0, 0.0, 8.0),
        ];
        let table = score_players(&players, &weights());

        for p in &table.players {
            assert!(p.bat_score.is_finite());
            assert_eq!(p.bat_score, 0.0);
            assert!(p.bowl_score.is_finite());
        }
        assert!(approx(table.players[0].bowl_score, 0.3));
        assert_eq!(
            table.degeneracies,
            vec![
                Degeneracy::ZeroMaximum {
                    column: "runs".to_string()
                },
                Degeneracy::ZeroMaximum {
                    column: "strike_rate".to_string()
                },
                Degeneracy::ZeroMaximum {
                    column: "wickets".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_zero_economy_term_is_zero() {
        let table = score_players(&sample_players(), &weights());
        let kohli = table.get_player("Virat Kohli").unwrap();
        let bumrah = table.get_player("Jasprit Bumrah").unwrap();

        assert_eq!(kohli.bowl_score, 0.0);
        // min positive economy is Bumrah's own
        assert!(approx(bumrah.bowl_score, 0.7 * 20.0 / 24.0 + 0.3));
        assert!(table.degeneracies.contains(&Degeneracy::ZeroEconomy {
            players: vec![
                "Virat Kohli".to_string(),
                "Ruturaj Gaikwad".to_string(),
                "Travis Head".to_string(),
            ],
        }));
    }

    #[test]
    fn test_all_zero_economy() {
        let players = vec![
            PlayerRecord::new("A", "X", 100, 2, 130.0, 0.0),
            PlayerRecord::new("B", "Y", 50, 4, 110.0, 0.0),
        ];
        let table = score_players(&players, &weights());

        assert!(approx(table.players[1].bowl_score, 0.7));
        assert_eq!(table.degeneracies, vec![Degeneracy::NoPositiveEconomy]);
    }

    #[test]
    fn test_scores_stay_in_unit_range() {
        let table = score_players(&sample_players(), &weights());

        for p in &table.players {
            assert!((0.0..=1.0).contains(&p.bat_score), "{:?}", p);
            assert!((0.0..=1.0).contains(&p.bowl_score), "{:?}", p);
            assert!((0.0..=1.0).contains(&p.performance_index), "{:?}", p);
        }
    }

    #[test]
    fn test_scoring_preserves_table_order() {
        let players = sample_players();
        let table = score_players(&players, &weights());
        let names: Vec<&str> = table
            .players
            .iter()
            .map(|p| p.record.player_name.as_str())
            .collect();
        let expected: Vec<&str> = players.iter().map(|p| p.player_name.as_str()).collect();

        assert_eq!(names, expected);
    }

    #[test]
    fn test_empty_table() {
        let table = score_players(&[], &weights());
        assert!(table.players.is_empty());
        assert!(table.degeneracies.is_empty());
        assert!(rank_players(&table, 5).is_empty());
    }

    #[test]
    fn test_rank_top_five_sorted_subset() {
        let players = sample_players();
        let table = score_players(&players, &weights());
        let top = rank_players(&table, 5);

        assert_eq!(top.len(), 5);
        for pair in top.windows(2) {
            assert!(pair[0].performance_index >= pair[1].performance_index);
        }
        for p in &top {
            assert!(players.contains(&p.record));
        }

        // Narine leads on both sub-scores' blend
        assert_eq!(top[0].record.player_name, "Sunil Narine");
    }

    #[test]
    fn test_rank_fewer_rows_than_top_n() {
        let players = sample_players()[..3].to_vec();
        let top = rank_players(&score_players(&players, &weights()), 5);
        assert_eq!(top.len(), 3);
    }

    #[test]
    fn test_rank_ties_broken_by_name() {
        let players = vec![
            PlayerRecord::new("Zaheer", "X", 100, 10, 120.0, 7.0),
            PlayerRecord::new("Bhuvneshwar", "Y", 100, 10, 120.0, 7.0),
            PlayerRecord::new("Mohit", "Z", 100, 10, 120.0, 7.0),
            PlayerRecord::new("Low", "Z", 10, 1, 60.0, 10.0),
        ];
        let top = rank_players(&score_players(&players, &weights()), 5);
        let names: Vec<&str> = top.iter().map(|p| p.record.player_name.as_str()).collect();

        assert_eq!(names, vec!["Bhuvneshwar", "Mohit", "Zaheer", "Low"]);
    }

    #[test]
    fn test_rank_top_n_configurable() {
        let top = rank_players(&score_players(&sample_players(), &weights()), 2);
        assert_eq!(top.len(), 2);
    }
}
