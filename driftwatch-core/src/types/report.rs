//! Report assembly types: timeline, trend, quick-stats tiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point on the drift timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub date: DateTime<Utc>,
    pub score: f64,
    /// Short marker string for notable analyses; null otherwise.
    pub event: Option<String>,
}

/// Direction of a score trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

/// Score movement versus the previous analysis of the same pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub change: f64,
    pub change_percent: f64,
    pub direction: TrendDirection,
    pub previous_score: f64,
}

/// One dashboard tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStat {
    pub label: String,
    pub value: String,
    /// Change indicator ("up"/"down"), where the tile carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
}

/// Rolling statistics over stored analyses, computed store-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingStats {
    pub total_analyses: u64,
    /// Mean drift score, 2 decimals. 0 when no analyses match.
    pub average_score: f64,
    /// Issues at high or critical severity, summed across analyses.
    pub critical_issues: u64,
    pub last_analysis: Option<DateTime<Utc>>,
}
