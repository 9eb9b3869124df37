//! Report assembly: timeline points, trend versus the previous analysis,
//! and the dashboard quick-stat tiles.

use chrono::{DateTime, Utc};

use driftwatch_core::types::analysis::{Analysis, Severity};
use driftwatch_core::types::report::{QuickStat, RollingStats, TimelinePoint, Trend, TrendDirection};

use crate::detector::deviation::round2;

/// Tile-change threshold on the rolling average delta.
const AVERAGE_DELTA_THRESHOLD: f64 = 5.0;

/// Build timeline points, sorted chronologically ascending.
pub fn timeline(analyses: &[Analysis]) -> Vec<TimelinePoint> {
    let mut points: Vec<TimelinePoint> = analyses
        .iter()
        .map(|a| TimelinePoint {
            date: a.timestamp,
            score: a.drift_score,
            event: timeline_event(a),
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

fn timeline_event(analysis: &Analysis) -> Option<String> {
    if analysis.drift_score >= 70.0 {
        return Some("Critical drift".to_string());
    }
    if analysis.drift_score >= 50.0 {
        return Some("High drift".to_string());
    }
    if analysis.issues.iter().any(|i| i.severity >= Severity::High) {
        return Some("Security issue".to_string());
    }
    None
}

/// Score movement against the most recent earlier analysis of the same
/// pipeline. `None` when there is no predecessor.
pub fn trend(current: &Analysis, history: &[Analysis]) -> Option<Trend> {
    let previous = history
        .iter()
        .filter(|a| {
            a.pipeline_name == current.pipeline_name
                && a.id != current.id
                && a.timestamp < current.timestamp
        })
        .max_by_key(|a| a.timestamp)?;

    let change = round2(current.drift_score - previous.drift_score);
    let change_percent = if previous.drift_score != 0.0 {
        round2(change / previous.drift_score * 100.0)
    } else if change != 0.0 {
        100.0
    } else {
        0.0
    };
    let direction = if change > 0.0 {
        TrendDirection::Up
    } else if change < 0.0 {
        TrendDirection::Down
    } else {
        TrendDirection::Neutral
    };

    Some(Trend {
        change,
        change_percent,
        direction,
        previous_score: previous.drift_score,
    })
}

/// The four dashboard tiles. `recent` is newest-first; the average-score
/// tile compares the latest 10 against the preceding 10.
pub fn quick_stats(stats: &RollingStats, recent: &[Analysis], now: DateTime<Utc>) -> Vec<QuickStat> {
    vec![
        QuickStat {
            label: "Total Analyses".to_string(),
            value: stats.total_analyses.to_string(),
            change: None,
        },
        QuickStat {
            label: "Average Score".to_string(),
            value: format!("{:.2}", stats.average_score),
            change: average_score_change(recent),
        },
        QuickStat {
            label: "Critical Issues".to_string(),
            value: stats.critical_issues.to_string(),
            change: None,
        },
        QuickStat {
            label: "Last Analysis".to_string(),
            value: stats
                .last_analysis
                .map(|ts| humanize_relative(ts, now))
                .unwrap_or_else(|| "never".to_string()),
            change: None,
        },
    ]
}

/// Rolling delta between the newest 10 scores and the 10 before them.
fn average_score_change(recent: &[Analysis]) -> Option<String> {
    let latest: Vec<f64> = recent.iter().take(10).map(|a| a.drift_score).collect();
    let preceding: Vec<f64> = recent.iter().skip(10).take(10).map(|a| a.drift_score).collect();
    if latest.is_empty() || preceding.is_empty() {
        return None;
    }
    let delta = mean(&latest) - mean(&preceding);
    if delta > AVERAGE_DELTA_THRESHOLD {
        Some("up".to_string())
    } else if delta < -AVERAGE_DELTA_THRESHOLD {
        Some("down".to_string())
    } else {
        None
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Coarse human phrasing for the Last Analysis tile.
pub fn humanize_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds().max(0);
    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    plural(hours / 24, "day")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn humanizes_relative_times() {
        let now = Utc::now();
        assert_eq!(humanize_relative(now - Duration::seconds(10), now), "just now");
        assert_eq!(humanize_relative(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(humanize_relative(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(humanize_relative(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(humanize_relative(now - Duration::days(2), now), "2 days ago");
    }
}
