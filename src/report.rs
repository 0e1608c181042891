//! End-to-end report assembly.
//!
//! Runs the full chain for one selection: validate both tables, derive match
//! outcomes, analyze the selected team, score and rank players, and compare
//! the chosen pair. Validation failures stop the whole run; a missing
//! comparison player only affects the comparison.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculate::{self, series::run_stats, AnalyticsError};
use crate::config::AppConfig;
use crate::ingest::{self, IngestError, RawTable};
use crate::models::{
    Degeneracy, Fingerprint, MatchRecord, MatchResult, Outlier, PlayerComparison, PlayerRecord,
    RollingPoint, ScoreTable, ScoredPlayer, TeamSummary, TrendPrediction, VenueAverage,
};

/// Analytics for one team's series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub team: String,
    pub summary: TeamSummary,
    /// The series with its rolling average column
    pub rolling: Vec<RollingPoint>,
    pub venues: Vec<VenueAverage>,
    pub outliers: Vec<Outlier>,
    pub trend: TrendPrediction,
    #[serde(default)]
    pub degeneracies: Vec<Degeneracy>,
}

/// Scored player table and its top performers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerReport {
    /// Names offered for comparison, sorted
    pub players: Vec<String>,
    pub scores: ScoreTable,
    pub top_performers: Vec<ScoredPlayer>,
}

/// Outcome of a comparison request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    Found(PlayerComparison),
    NotFound { names: Vec<String> },
}

impl From<Result<PlayerComparison, AnalyticsError>> for ComparisonOutcome {
    fn from(result: Result<PlayerComparison, AnalyticsError>) -> Self {
        match result {
            Ok(cmp) => ComparisonOutcome::Found(cmp),
            Err(AnalyticsError::PlayerNotFound { names }) => ComparisonOutcome::NotFound { names },
        }
    }
}

/// What the user has selected for this render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub team: String,
    pub compare: Option<(String, String)>,
}

/// Everything derived for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub matches: Vec<MatchResult>,
    pub teams: Vec<String>,
    pub team: TeamReport,
    pub players: Option<PlayerReport>,
    pub comparison: Option<ComparisonOutcome>,
}

impl DashboardReport {
    /// Digest of the report's canonical JSON.
    pub fn fingerprint(&self) -> Result<Fingerprint, serde_json::Error> {
        let json = serde_json::to_vec(self)?;
        Ok(Fingerprint::generate(&[&json]))
    }
}

/// Analyze one team's matches.
pub fn analyze_team(matches: &[MatchRecord], team: &str, config: &AppConfig) -> TeamReport {
    let series_config = &config.series;
    let series = calculate::team_series(matches, team);

    if series.is_empty() {
        warn!("No matches found for team {}", team);
    }

    let mut degeneracies = Vec::new();
    if let Some(stats) = run_stats(&series.runs(), series_config.std_dev) {
        if stats.std_dev == 0.0 {
            info!(
                "Zero {} standard deviation for {}; no outliers flagged",
                series_config.std_dev, team
            );
            degeneracies.push(Degeneracy::ZeroVariance);
        }
    }

    let trend = calculate::predict_next(&series, series_config.min_trend_observations);
    if let TrendPrediction::InsufficientData { observed, required } = trend {
        info!(
            "Trend prediction for {} unavailable: {} of {} matches",
            team, observed, required
        );
    }

    TeamReport {
        team: series.team.clone(),
        summary: calculate::summarize(&series),
        rolling: calculate::with_rolling_average(&series, series_config.rolling_window),
        venues: calculate::venue_averages(&series),
        outliers: calculate::detect_outliers(
            &series,
            series_config.outlier_threshold,
            series_config.std_dev,
        ),
        trend,
        degeneracies,
    }
}

/// Score and rank the player table.
pub fn analyze_players(players: &[PlayerRecord], config: &AppConfig) -> PlayerReport {
    let scores = calculate::score_players(players, &config.scoring.weights);
    let top_performers = calculate::rank_players(&scores, config.scoring.top_n);

    PlayerReport {
        players: calculate::player_names(players),
        scores,
        top_performers,
    }
}

/// Validate the tables and build the full report for `selection`.
pub fn build_dashboard(
    match_table: &RawTable,
    player_table: Option<&RawTable>,
    selection: &Selection,
    config: &AppConfig,
) -> Result<DashboardReport, IngestError> {
    // Validate everything before computing anything.
    let matches = ingest::parse_matches(match_table)?;
    let players = player_table.map(ingest::parse_players).transpose()?;

    let augmented = calculate::augment_matches(&matches, config.matches.tie_winner);
    let team = analyze_team(&matches, &selection.team, config);

    let player_report = players.as_deref().map(|p| analyze_players(p, config));

    let comparison = match (&players, &selection.compare) {
        (Some(players), Some((first, second))) => {
            let outcome = ComparisonOutcome::from(calculate::compare_players(
                players, first, second,
            ));
            if let ComparisonOutcome::NotFound { names } = &outcome {
                warn!("Comparison skipped, unknown players: {}", names.join(", "));
            }
            Some(outcome)
        }
        (None, Some(_)) => {
            warn!("Comparison requested without a player table");
            None
        }
        _ => None,
    };

    Ok(DashboardReport {
        matches: augmented,
        teams: calculate::teams(&matches),
        team,
        players: player_report,
        comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{MATCH_COLUMNS, PLAYER_COLUMNS};
    use pretty_assertions::assert_eq;

    fn match_table() -> RawTable {
        RawTable::new(
            MATCH_COLUMNS,
            vec![
                vec!["1", "2024-03-22", "CSK", "RCB", "Chepauk", "176", "173"],
                vec!["2", "2024-03-24", "MI", "GT", "Ahmedabad", "162", "168"],
                vec!["3", "2024-03-26", "CSK", "GT", "Chepauk", "206", "143"],
                vec!["4", "2024-03-31", "DC", "CSK", "Vizag", "191", "171"],
                vec!["5", "2024-04-05", "SRH", "CSK", "Hyderabad", "166", "165"],
                vec!["6", "08/04/2024", "CSK", "KKR", "Chepauk", "141", "137"],
                vec!["7", "2024-04-14", "MI", "CSK", "Wankhede", "186", "206"],
                vec!["8", "2024-04-19", "LSG", "CSK", "Lucknow", "180", "176"],
            ],
        )
    }

    fn player_table() -> RawTable {
        RawTable::new(
            PLAYER_COLUMNS,
            vec![
                vec!["Ruturaj Gaikwad", "CSK", "583", "0", "141.16", "0"],
                vec!["Ravindra Jadeja", "CSK", "267", "8", "129.6", "7.85"],
                vec!["Jasprit Bumrah", "MI", "8", "20", "80", "6.48"],
                vec!["Sunil Narine", "KKR", "488", "17", "180.74", "6.69"],
                vec!["Virat Kohli", "RCB", "741", "0", "154.69", "0"],
                vec!["Harshal Patel", "PBKS", "20", "24", "110", "9.73"],
            ],
        )
    }

    fn selection() -> Selection {
        Selection {
            team: "CSK".to_string(),
            compare: Some(("Virat Kohli".to_string(), "Jasprit Bumrah".to_string())),
        }
    }

    #[test]
    fn test_build_dashboard_full_chain() {
        let config = AppConfig::default();
        let report =
            build_dashboard(&match_table(), Some(&player_table()), &selection(), &config).unwrap();

        assert_eq!(report.matches.len(), 8);
        assert_eq!(report.teams, vec!["CSK", "DC", "GT", "KKR", "LSG", "MI", "RCB", "SRH"]);

        let team = &report.team;
        assert_eq!(team.summary.matches_played, 7);
        assert_eq!(team.summary.highest_score, Some(206));
        assert_eq!(team.rolling.len(), 7);
        assert!(team.rolling[..4].iter().all(|p| p.rolling_avg.is_none()));
        assert!(team.rolling[4].rolling_avg.is_some());
        assert!(team.trend.is_available());
        assert_eq!(team.venues[0].venue, "Wankhede");

        let players = report.players.as_ref().unwrap();
        assert_eq!(players.scores.players.len(), 6);
        assert_eq!(players.top_performers.len(), 5);
        assert_eq!(
            players.players,
            vec![
                "Harshal Patel",
                "Jasprit Bumrah",
                "Ravindra Jadeja",
                "Ruturaj Gaikwad",
                "Sunil Narine",
                "Virat Kohli",
            ]
        );

        match report.comparison.as_ref().unwrap() {
            ComparisonOutcome::Found(cmp) => assert_eq!(cmp.first, "Virat Kohli"),
            other => panic!("unexpected comparison: {other:?}"),
        }
    }

    #[test]
    fn test_series_runs_taken_from_correct_side() {
        let matches = ingest::parse_matches(&match_table()).unwrap();
        let report = analyze_team(&matches, "CSK", &AppConfig::default());
        let runs: Vec<u32> = report.rolling.iter().map(|p| p.point.team_runs).collect();

        assert_eq!(runs, vec![176, 206, 171, 165, 141, 206, 176]);
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let config = AppConfig::default();
        let first =
            build_dashboard(&match_table(), Some(&player_table()), &selection(), &config).unwrap();
        let second =
            build_dashboard(&match_table(), Some(&player_table()), &selection(), &config).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
    }

    #[test]
    fn test_fingerprint_changes_with_selection() {
        let config = AppConfig::default();
        let csk = build_dashboard(&match_table(), None, &selection(), &config).unwrap();
        let mi = build_dashboard(
            &match_table(),
            None,
            &Selection {
                team: "MI".to_string(),
                compare: None,
            },
            &config,
        )
        .unwrap();

        assert_ne!(csk.fingerprint().unwrap(), mi.fingerprint().unwrap());
    }

    #[test]
    fn test_validation_error_stops_pipeline() {
        let bad_players = RawTable::new(
            ["player_name", "team", "runs"],
            vec![vec!["A", "B", "1"]],
        );
        let err = build_dashboard(
            &match_table(),
            Some(&bad_players),
            &selection(),
            &AppConfig::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            IngestError::MissingColumns {
                table: ingest::PLAYER_TABLE,
                columns: vec![
                    "wickets".to_string(),
                    "strike_rate".to_string(),
                    "economy".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_missing_comparison_player_is_contained() {
        let sel = Selection {
            team: "CSK".to_string(),
            compare: Some(("Virat Kohli".to_string(), "MS Dhoni".to_string())),
        };
        let report =
            build_dashboard(&match_table(), Some(&player_table()), &sel, &AppConfig::default())
                .unwrap();

        assert_eq!(
            report.comparison,
            Some(ComparisonOutcome::NotFound {
                names: vec!["MS Dhoni".to_string()]
            })
        );
        assert_eq!(report.players.unwrap().top_performers.len(), 5);
        assert!(report.team.trend.is_available());
    }

    #[test]
    fn test_no_player_table() {
        let report =
            build_dashboard(&match_table(), None, &selection(), &AppConfig::default()).unwrap();
        assert!(report.players.is_none());
        assert!(report.comparison.is_none());
    }

    #[test]
    fn test_short_series_reports_insufficient_data() {
        let matches = ingest::parse_matches(&match_table()).unwrap();
        let report = analyze_team(&matches, "MI", &AppConfig::default());

        assert_eq!(
            report.trend,
            TrendPrediction::InsufficientData {
                observed: 2,
                required: 5,
            }
        );
        assert_eq!(report.summary.matches_played, 2);
    }

    #[test]
    fn test_zero_variance_recorded() {
        let matches = vec![
            MatchRecord::new(
                "1",
                chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                "A",
                "B",
                "X",
                150,
                140,
            ),
            MatchRecord::new(
                "2",
                chrono::NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
                "B",
                "A",
                "Y",
                160,
                150,
            ),
        ];
        let report = analyze_team(&matches, "A", &AppConfig::default());

        assert!(report.outliers.is_empty());
        assert_eq!(report.degeneracies, vec![Degeneracy::ZeroVariance]);
    }

    #[test]
    fn test_config_changes_flow_through() {
        let mut config = AppConfig::default();
        config.series.rolling_window = 2;
        config.scoring.top_n = 2;

        let report =
            build_dashboard(&match_table(), Some(&player_table()), &selection(), &config).unwrap();

        assert!(report.team.rolling[0].rolling_avg.is_none());
        assert_eq!(report.team.rolling[1].rolling_avg, Some((176.0 + 206.0) / 2.0));
        assert_eq!(report.players.unwrap().top_performers.len(), 2);
    }

    fn read_demo(name: &str) -> RawTable {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("demos")
            .join(name);
        let raw = std::fs::read_to_string(path).expect("demo table should be readable");
        serde_json::from_str(&raw).expect("demo table should parse")
    }

    #[test]
    fn test_demo_tables_build_dashboard() {
        let report = build_dashboard(
            &read_demo("matches.json"),
            Some(&read_demo("players.json")),
            &selection(),
            &AppConfig::default(),
        )
        .unwrap();

        assert_eq!(report.team.summary.matches_played, 9);
        assert_eq!(report.team.summary.highest_score, Some(212));
        // match 9: CSK 210 vs LSG 213
        assert_eq!(report.matches[8].winner, "LSG");
        assert_eq!(report.players.unwrap().top_performers.len(), 5);
    }

    #[test]
    fn test_report_serializes_trend_status() {
        let report =
            build_dashboard(&match_table(), None, &selection(), &AppConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["team"]["trend"]["status"], "available");
        assert_eq!(json["matches"][0]["winner"], "CSK");
    }
}
