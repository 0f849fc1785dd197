//! Player performance analysis over a game log
//!
//! Logs are ordered oldest first; "last N" always means the N most recent
//! games at the end of the slice.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One game in a player's log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLog {
    pub date: NaiveDate,
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub opponent: String,
    pub minutes: f64,
}

/// Stat tracked by the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Points,
    Rebounds,
    Assists,
    Minutes,
}

impl Metric {
    pub fn value(&self, log: &GameLog) -> f64 {
        match self {
            Metric::Points => log.points,
            Metric::Rebounds => log.rebounds,
            Metric::Assists => log.assists,
            Metric::Minutes => log.minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub trend: Trend,
    pub last_5_avg: f64,
    pub last_10_avg: f64,
    /// Sample standard deviation of the last 5 games
    pub consistency: f64,
    /// Best of the last 10 games
    pub peak: f64,
    /// Date of `peak`, taken from the same 10-game window; an older career
    /// high does not move it
    pub peak_date: NaiveDate,
    pub momentum: f64,
}

/// Short scoring profile over the last 5 games
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInsights {
    pub avg_points: f64,
    pub trend: Trend,
    pub consistency: f64,
    pub ceiling: f64,
    pub floor: f64,
}

/// Side of a player prop line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropSide {
    Over,
    Under,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropForm {
    /// Hit in at least 80% of the last 5
    Hot,
    Rising,
    Cooling,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropOutlook {
    pub line: f64,
    pub side: PropSide,
    pub hit_rate_5: f64,
    pub hit_rate_10: f64,
    pub form: PropForm,
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation; 0 for fewer than two values
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

fn trend_of(values: &[f64]) -> Trend {
    if values.len() < 2 {
        Trend::Neutral
    } else if values.windows(2).all(|w| w[0] <= w[1]) {
        Trend::Up
    } else {
        Trend::Down
    }
}

/// Recent form of one metric; `None` for an empty log
pub fn analyze(logs: &[GameLog], metric: Metric) -> Option<PerformanceSummary> {
    let last_10 = tail(logs, 10);
    let values_10: Vec<f64> = last_10.iter().map(|log| metric.value(log)).collect();
    let values_5 = tail(&values_10, 5);

    // First occurrence of the maximum
    let (peak_idx, peak) = values_10
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })?;

    let last_5_avg = mean(values_5);
    let last_10_avg = mean(&values_10);
    let momentum = if last_10_avg == 0.0 {
        0.0
    } else {
        (last_5_avg - last_10_avg) / last_10_avg
    };

    Some(PerformanceSummary {
        trend: trend_of(values_5),
        last_5_avg,
        last_10_avg,
        consistency: sample_std(values_5),
        peak,
        peak_date: last_10[peak_idx].date,
        momentum,
    })
}

/// Scoring profile over the last 5 games; `None` for an empty log
pub fn insights(logs: &[GameLog]) -> Option<PlayerInsights> {
    let recent: Vec<f64> = tail(logs, 5).iter().map(|log| log.points).collect();
    if recent.is_empty() {
        return None;
    }

    Some(PlayerInsights {
        avg_points: mean(&recent),
        trend: trend_of(&recent),
        consistency: sample_std(&recent),
        ceiling: recent.iter().copied().fold(f64::MIN, f64::max),
        floor: recent.iter().copied().fold(f64::MAX, f64::min),
    })
}

/// Percentage of the last `window` games strictly over (or under) `line`
///
/// `None` when there are no games to look at.
pub fn hit_rate(
    logs: &[GameLog],
    metric: Metric,
    line: f64,
    side: PropSide,
    window: usize,
) -> Option<f64> {
    let recent = tail(logs, window);
    if recent.is_empty() {
        return None;
    }

    let hits = recent
        .iter()
        .map(|log| metric.value(log))
        .filter(|&v| match side {
            PropSide::Over => v > line,
            PropSide::Under => v < line,
        })
        .count();
    Some(hits as f64 * 100.0 / recent.len() as f64)
}

/// Last-5 and last-10 hit rates on a prop line, with a form label
pub fn prop_outlook(
    logs: &[GameLog],
    metric: Metric,
    line: f64,
    side: PropSide,
) -> Option<PropOutlook> {
    let hit_rate_5 = hit_rate(logs, metric, line, side, 5)?;
    let hit_rate_10 = hit_rate(logs, metric, line, side, 10)?;

    let form = if hit_rate_5 >= 80.0 {
        PropForm::Hot
    } else if hit_rate_5 > hit_rate_10 {
        PropForm::Rising
    } else {
        PropForm::Cooling
    };

    Some(PropOutlook {
        line,
        side,
        hit_rate_5,
        hit_rate_10,
        form,
    })
}

/// Least-squares line through `values` (x = 0, 1, ...) projected `days`
/// steps past the last point
///
/// Fewer than 3 points gives an empty projection.
pub fn project_trend(values: &[f64], days: usize) -> Vec<f64> {
    if values.len() < 3 {
        return Vec::new();
    }

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = mean(values);

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    (0..days)
        .map(|step| intercept + slope * (n + step as f64))
        .collect()
}
