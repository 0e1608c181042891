//! Team series analytics: rolling form, venue splits, outliers and trend.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{
    Outlier, RollingPoint, StdDevKind, TeamSeries, TeamSummary, TrendPrediction, VenueAverage,
};

/// Mean and standard deviation of a series' runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Mean and standard deviation of `values`.
///
/// Returns `None` when there are fewer than two values.
pub fn run_stats(values: &[f64], kind: StdDevKind) -> Option<RunStats> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    let denominator = match kind {
        StdDevKind::Population => n,
        StdDevKind::Sample => n - 1,
    };

    Some(RunStats {
        mean,
        std_dev: (sum_sq / denominator as f64).sqrt(),
    })
}

/// Causal rolling mean of `team_runs`.
///
/// Entry `i` is the mean of the `window` matches ending at `i`, or `None`
/// while fewer than `window` matches have been played.
pub fn rolling_average(series: &TeamSeries, window: usize) -> Vec<Option<f64>> {
    let runs = series.runs();

    (0..runs.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                None
            } else {
                let slice = &runs[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

/// The series with its `rolling_avg` column attached.
pub fn with_rolling_average(series: &TeamSeries, window: usize) -> Vec<RollingPoint> {
    series
        .points
        .iter()
        .cloned()
        .zip(rolling_average(series, window))
        .map(|(point, rolling_avg)| RollingPoint { point, rolling_avg })
        .collect()
}

/// Average runs per venue, highest first; equal averages are ordered by
/// venue name.
pub fn venue_averages(series: &TeamSeries) -> Vec<VenueAverage> {
    let mut totals: BTreeMap<&str, (u64, u32)> = BTreeMap::new();
    for point in &series.points {
        let entry = totals.entry(point.venue.as_str()).or_default();
        entry.0 += point.team_runs as u64;
        entry.1 += 1;
    }

    let mut averages: Vec<VenueAverage> = totals
        .into_iter()
        .map(|(venue, (runs, matches))| VenueAverage {
            venue: venue.to_string(),
            matches,
            average_runs: runs as f64 / matches as f64,
        })
        .collect();

    averages.sort_by(|a, b| {
        b.average_runs
            .total_cmp(&a.average_runs)
            .then_with(|| a.venue.cmp(&b.venue))
    });
    averages
}

/// Matches whose absolute z-score exceeds `threshold`, in series order.
///
/// Series shorter than two matches, or with zero spread, have no outliers.
pub fn detect_outliers(series: &TeamSeries, threshold: f64, kind: StdDevKind) -> Vec<Outlier> {
    let runs = series.runs();
    let Some(stats) = run_stats(&runs, kind) else {
        return Vec::new();
    };

    if stats.std_dev == 0.0 {
        debug!("Zero variance in {} runs; no outliers", series.team);
        return Vec::new();
    }

    series
        .points
        .iter()
        .zip(&runs)
        .filter_map(|(point, &x)| {
            let z_score = (x - stats.mean) / stats.std_dev;
            (z_score.abs() > threshold).then(|| Outlier {
                point: point.clone(),
                z_score,
            })
        })
        .collect()
}

/// Least-squares line through `(index, team_runs)`, evaluated at the next
/// index.
pub fn predict_next(series: &TeamSeries, min_observations: usize) -> TrendPrediction {
    let runs = series.runs();
    let n = runs.len();

    // At least two points are needed for the fit to be defined.
    let required = min_observations.max(2);
    if n < required {
        return TrendPrediction::InsufficientData {
            observed: n,
            required,
        };
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = runs.iter().sum::<f64>() / n as f64;

    let (sxy, sxx) = runs
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sxy, sxx), (i, &y)| {
            let dx = i as f64 - x_mean;
            (sxy + dx * (y - y_mean), sxx + dx * dx)
        });

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    TrendPrediction::Available {
        value: intercept + slope * n as f64,
        slope,
        intercept,
    }
}

/// Matches played, total and highest score, and average runs.
pub fn summarize(series: &TeamSeries) -> TeamSummary {
    let matches_played = series.len() as u32;
    let total_runs: u64 = series.points.iter().map(|p| p.team_runs as u64).sum();
    let highest_score = series.points.iter().map(|p| p.team_runs).max();
    let average_runs = if matches_played == 0 {
        0.0
    } else {
        total_runs as f64 / matches_played as f64
    };

    TeamSummary {
        matches_played,
        total_runs,
        highest_score,
        average_runs,
    }
}
