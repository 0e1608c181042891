//! # IPL Analytics
//!
//! Derived analytics over cricket match results and player statistics.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, team series, players, stats)
//! - **ingest**: Table schema and type validation into typed records
//! - **calculate**: Match outcomes, series analytics, player scoring, comparison
//! - **report**: Full pipeline for one selection, with a reproducibility fingerprint
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod ingest;
pub mod models;
pub mod report;

pub use models::*;
