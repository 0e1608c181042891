//! Table validation into typed records.
//!
//! The caller hands over tables that are already split into a header and
//! string cells. This module checks that the required columns exist and that
//! every cell has the right type, and fails before any analytics run.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{MatchRecord, PlayerRecord};

pub const MATCH_TABLE: &str = "matches";
pub const PLAYER_TABLE: &str = "players";

pub const MATCH_COLUMNS: [&str; 7] = [
    "match_id",
    "date",
    "team1",
    "team2",
    "venue",
    "runs_team1",
    "runs_team2",
];

pub const PLAYER_COLUMNS: [&str; 6] = [
    "player_name",
    "team",
    "runs",
    "wickets",
    "strike_rate",
    "economy",
];

/// Accepted date layouts, tried in order. Slash and dash dates are day-first.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%d-%m-%y"];

/// Timestamps whose time of day is dropped.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// `%Y` takes any digit count, so `05/04/17` would otherwise land in year 17.
const MIN_YEAR: i32 = 1000;

/// Errors raised while validating an input table.
#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error("Missing columns in {table} table: {}", .columns.join(", "))]
    MissingColumns {
        table: &'static str,
        columns: Vec<String>,
    },

    #[error("Invalid value in {table} table, row {row}, column '{column}': '{value}' (expected {expected})")]
    InvalidValue {
        table: &'static str,
        row: usize,
        column: String,
        value: String,
        expected: &'static str,
    },

    #[error("Duplicate {column} '{value}' in {table} table")]
    DuplicateKey {
        table: &'static str,
        column: String,
        value: String,
    },

    #[error("Row {row} of {table} table has {found} cells, expected {expected}")]
    RowLength {
        table: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("The {table} table has no rows")]
    EmptyTable { table: &'static str },
}

/// A header-plus-cells table as produced by the file reader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<C, R>(columns: C, rows: Vec<R>) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Position of a column, matched case-insensitively after trimming.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = normalize_column(name);
        self.columns
            .iter()
            .position(|c| normalize_column(c) == wanted)
    }

    /// Resolve every required column, reporting all missing ones at once.
    fn resolve(&self, table: &'static str, required: &[&str]) -> Result<Vec<usize>, IngestError> {
        let mut indices = Vec::with_capacity(required.len());
        let mut missing = Vec::new();

        for name in required {
            match self.column_index(name) {
                Some(idx) => indices.push(idx),
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(IngestError::MissingColumns {
                table,
                columns: missing,
            });
        }

        Ok(indices)
    }

    fn check_row_lengths(&self, table: &'static str) -> Result<(), IngestError> {
        for (i, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(IngestError::RowLength {
                    table,
                    row: i + 1,
                    expected: self.columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(())
    }
}

fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A single cell being validated, carrying enough context for errors.
struct Cell<'a> {
    table: &'static str,
    row: usize,
    column: &'static str,
    raw: &'a str,
}

impl<'a> Cell<'a> {
    fn invalid(&self, expected: &'static str) -> IngestError {
        IngestError::InvalidValue {
            table: self.table,
            row: self.row,
            column: self.column.to_string(),
            value: self.raw.to_string(),
            expected,
        }
    }

    fn text(&self) -> Result<String, IngestError> {
        let value = self.raw.trim();
        if value.is_empty() {
            return Err(self.invalid("non-empty text"));
        }
        Ok(value.to_string())
    }

    /// Non-negative whole number; `"45.0"` is accepted.
    fn count(&self) -> Result<u32, IngestError> {
        let value = self.raw.trim();
        if let Ok(n) = value.parse::<u32>() {
            return Ok(n);
        }
        match value.parse::<f64>() {
            Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => {
                Ok(f as u32)
            }
            _ => Err(self.invalid("a non-negative whole number")),
        }
    }

    fn real(&self) -> Result<f64, IngestError> {
        match self.raw.trim().parse::<f64>() {
            Ok(f) if f.is_finite() && f >= 0.0 => Ok(f),
            _ => Err(self.invalid("a non-negative number")),
        }
    }

    fn date(&self) -> Result<NaiveDate, IngestError> {
        let value = self.raw.trim();
        DATE_FORMATS
            .iter()
            .filter_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
            .chain(
                DATETIME_FORMATS
                    .iter()
                    .filter_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                    .map(|dt| dt.date()),
            )
            .find(|d| d.year() >= MIN_YEAR)
            .ok_or_else(|| self.invalid("a date (YYYY-MM-DD or DD/MM/YYYY)"))
    }
}

/// Validate a match table into records, in table order.
///
/// An empty match table is valid and yields no records.
pub fn parse_matches(raw: &RawTable) -> Result<Vec<MatchRecord>, IngestError> {
    let idx = raw.resolve(MATCH_TABLE, &MATCH_COLUMNS)?;
    raw.check_row_lengths(MATCH_TABLE)?;

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(raw.rows.len());

    for (i, row) in raw.rows.iter().enumerate() {
        let cell = |n: usize| Cell {
            table: MATCH_TABLE,
            row: i + 1,
            column: MATCH_COLUMNS[n],
            raw: &row[idx[n]],
        };

        let match_id = cell(0).text()?;
        if !seen.insert(match_id.clone()) {
            return Err(IngestError::DuplicateKey {
                table: MATCH_TABLE,
                column: "match_id".to_string(),
                value: match_id,
            });
        }

        records.push(MatchRecord::new(
            match_id,
            cell(1).date()?,
            cell(2).text()?,
            cell(3).text()?,
            cell(4).text()?,
            cell(5).count()?,
            cell(6).count()?,
        ));
    }

    info!("Validated {} match rows", records.len());
    Ok(records)
}

/// Validate a player table into records, in table order.
pub fn parse_players(raw: &RawTable) -> Result<Vec<PlayerRecord>, IngestError> {
    let idx = raw.resolve(PLAYER_TABLE, &PLAYER_COLUMNS)?;
    raw.check_row_lengths(PLAYER_TABLE)?;

    if raw.rows.is_empty() {
        return Err(IngestError::EmptyTable {
            table: PLAYER_TABLE,
        });
    }

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(raw.rows.len());

    for (i, row) in raw.rows.iter().enumerate() {
        let cell = |n: usize| Cell {
            table: PLAYER_TABLE,
            row: i + 1,
            column: PLAYER_COLUMNS[n],
            raw: &row[idx[n]],
        };

        let name = cell(0).text()?;
        if !seen.insert(name.clone()) {
            return Err(IngestError::DuplicateKey {
                table: PLAYER_TABLE,
                column: "player_name".to_string(),
                value: name,
            });
        }

        records.push(PlayerRecord::new(
            name,
            cell(1).text()?,
            cell(2).count()?,
            cell(3).count()?,
            cell(4).real()?,
            cell(5).real()?,
        ));
    }

    debug!("Validated {} player rows", records.len());
    Ok(records)
}
