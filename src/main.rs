use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ipl_analytics::calculate;
use ipl_analytics::config::AppConfig;
use ipl_analytics::ingest::{self, RawTable};
use ipl_analytics::models::Fingerprint;
use ipl_analytics::report::{self, DashboardReport, Selection};

#[derive(Parser)]
#[command(name = "ipl-analytics")]
#[command(about = "Team form, outliers, trend and player rankings from IPL tables")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every team in the match table
    Teams {
        /// Match table (JSON with `columns` and `rows`)
        #[arg(long)]
        matches: PathBuf,
    },

    /// Series analytics for one team
    Team {
        #[arg(long)]
        matches: PathBuf,

        /// Team to analyze
        #[arg(long)]
        team: String,
    },

    /// Player scores and top performers
    Players {
        /// Player table (JSON with `columns` and `rows`)
        #[arg(long)]
        players: PathBuf,
    },

    /// Compare two players side by side
    Compare {
        #[arg(long)]
        players: PathBuf,

        first: String,

        second: String,
    },

    /// Full report for a selection
    Report {
        #[arg(long)]
        matches: PathBuf,

        #[arg(long)]
        players: Option<PathBuf>,

        #[arg(long)]
        team: String,

        /// Two player names to compare
        #[arg(long, num_args = 2, value_names = ["FIRST", "SECOND"])]
        compare: Option<Vec<String>>,
    },
}

#[derive(Serialize)]
struct FingerprintedReport<'a> {
    fingerprint: Fingerprint,
    #[serde(flatten)]
    report: &'a DashboardReport,
}

fn load_table(path: &Path) -> Result<RawTable> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read table {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse table {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing(level: &str, json: bool) {
    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_tracing(level, cli.json_logs);

    tracing::info!("Starting ipl-analytics v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Teams { matches } => {
            let matches = ingest::parse_matches(&load_table(&matches)?)?;
            print_json(&calculate::teams(&matches))?;
        }

        Commands::Team { matches, team } => {
            let matches = ingest::parse_matches(&load_table(&matches)?)?;
            print_json(&report::analyze_team(&matches, &team, &config))?;
        }

        Commands::Players { players } => {
            let players = ingest::parse_players(&load_table(&players)?)?;
            print_json(&report::analyze_players(&players, &config))?;
        }

        Commands::Compare {
            players,
            first,
            second,
        } => {
            let players = ingest::parse_players(&load_table(&players)?)?;
            let comparison = calculate::compare_players(&players, &first, &second)?;
            print_json(&comparison)?;
        }

        Commands::Report {
            matches,
            players,
            team,
            compare,
        } => {
            let match_table = load_table(&matches)?;
            let player_table = players.as_deref().map(load_table).transpose()?;

            let selection = Selection {
                team,
                compare: compare.and_then(|names| match names.as_slice() {
                    [first, second] => Some((first.clone(), second.clone())),
                    _ => None,
                }),
            };

            let dashboard =
                report::build_dashboard(&match_table, player_table.as_ref(), &selection, &config)?;
            let fingerprint = dashboard.fingerprint()?;
            tracing::info!("Report fingerprint {}", fingerprint);

            print_json(&FingerprintedReport {
                fingerprint,
                report: &dashboard,
            })?;
        }
    }

    Ok(())
}
