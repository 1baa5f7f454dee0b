//! Core types for the Insights & Analytics Engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::models::Period;

/// Tracked event categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Sleep,
    Feeding,
    Diaper,
    Growth,
    Activity,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sleep => "sleep",
            Category::Feeding => "feeding",
            Category::Diaper => "diaper",
            Category::Growth => "growth",
            Category::Activity => "activity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sleep" => Ok(Category::Sleep),
            "feeding" => Ok(Category::Feeding),
            "diaper" => Ok(Category::Diaper),
            "growth" => Ok(Category::Growth),
            "activity" => Ok(Category::Activity),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Wake window statistics over accepted windows
///
/// When no wake window survives the acceptance filter, the stats carry the
/// age-derived recommended window and `from_age_default` is set, so
/// downstream consumers always see a principled value instead of "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeWindowStats {
    pub average_minutes: f64,
    pub min_minutes: i64,
    pub max_minutes: i64,
    pub count: usize,
    pub from_age_default: bool,
}

/// Signed current-vs-previous deltas for sleep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepComparison {
    pub total_minutes_change: i64,
    pub nap_count_change: i64,
    pub consistency_change: f64,
}

/// Aggregated sleep statistics for a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSummary {
    pub total_minutes: i64,
    pub nap_minutes: i64,
    pub night_minutes: i64,
    pub session_count: usize,
    pub nap_count: usize,
    pub average_session_minutes: f64,
    pub daily_average_minutes: f64,
    pub longest_session_minutes: i64,
    /// 0-100; exactly 50 with fewer than 3 sessions
    pub consistency_score: f64,
    pub wake_windows: WakeWindowStats,
    /// Minutes since the most recent sleep ended; absent without prior sleep
    pub current_wake_window_minutes: Option<i64>,
    pub comparison_to_previous: Option<SleepComparison>,
}

/// Signed current-vs-previous deltas for feeding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingComparison {
    pub per_day_change: f64,
    pub bottle_ml_change: f64,
    pub consistency_change: f64,
}

/// Aggregated feeding statistics for a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedingSummary {
    pub total_count: usize,
    pub breast_count: usize,
    pub bottle_count: usize,
    pub solid_count: usize,
    pub total_bottle_ml: f64,
    pub average_bottle_ml: f64,
    /// Averaged only over breast feedings with a nonzero logged duration
    pub average_breast_duration_minutes: f64,
    pub feedings_per_day: f64,
    pub longest_gap_minutes: Option<i64>,
    /// 0-100; exactly 50 with fewer than 3 feedings
    pub consistency_score: f64,
    pub comparison_to_previous: Option<FeedingComparison>,
}

/// Signed current-vs-previous deltas for diapers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaperComparison {
    pub total_change: i64,
    pub wet_per_day_change: f64,
}

/// Aggregated diaper statistics for a window
///
/// Mixed diapers count toward both the wet and dirty per-day rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaperSummary {
    pub total_count: usize,
    pub wet_count: usize,
    pub dirty_count: usize,
    pub mixed_count: usize,
    pub wet_per_day: f64,
    pub dirty_per_day: f64,
    pub changes_per_day: f64,
    pub comparison_to_previous: Option<DiaperComparison>,
}

/// Aggregated growth statistics for a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthSummary {
    pub measurement_count: usize,
    pub latest_weight_grams: Option<i64>,
    pub latest_height_mm: Option<i64>,
    pub latest_head_circumference_mm: Option<i64>,
    /// Last minus first measurement in the window, where both exist
    pub weight_change_grams: Option<i64>,
    pub height_change_mm: Option<i64>,
}

/// Signed current-vs-previous deltas for activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityComparison {
    pub total_minutes_change: i64,
}

/// Aggregated activity statistics for a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub total_minutes: i64,
    pub session_count: usize,
    /// Keyed by normalized activity type (case and separators collapsed)
    pub minutes_by_type: BTreeMap<String, i64>,
    pub sessions_per_day: f64,
    pub comparison_to_previous: Option<ActivityComparison>,
}

/// How urgent a detected anomaly is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
}

impl AnomalySeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalySeverity::Low => "low",
            AnomalySeverity::Medium => "medium",
            AnomalySeverity::High => "high",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            AnomalySeverity::Low => 1,
            AnomalySeverity::Medium => 2,
            AnomalySeverity::High => 3,
        }
    }
}

impl fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnomalySeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(AnomalySeverity::Low),
            "medium" => Ok(AnomalySeverity::Medium),
            "high" => Ok(AnomalySeverity::High),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// A rule-based deviation between observed and age-expected values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedAnomaly {
    pub category: Category,
    pub severity: AnomalySeverity,
    pub title: String,
    pub description: String,
    pub observed_value: String,
    pub expected_value: String,
    /// Fixed per-rule guidance, never generated dynamically
    pub recommendation: String,
}

/// Direction of a trend insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
    New,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Declining => "declining",
            TrendDirection::Stable => "stable",
            TrendDirection::New => "new",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A synthesized trend insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendInsightItem {
    pub category: Category,
    pub title: String,
    pub description: String,
    pub trend: TrendDirection,
    pub change_percent: Option<f64>,
    pub recommendation: Option<String>,
}

/// Predicted next sleep from wake window patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepPrediction {
    pub predicted_time: DateTime<Utc>,
    /// 0-1
    pub confidence: f64,
    pub basis_window_minutes: f64,
    /// Accepted wake windows the prediction is based on; 0 when the
    /// age-recommended default was used
    pub sample_count: usize,
}

/// The full assembled insight response for one request
///
/// This is exactly what gets cached: `from_cache` is skipped during
/// serialization so a rehydrated hit is field-for-field identical to the
/// freshly computed response it was written from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub baby_id: i64,
    pub baby_name: String,
    pub age_months: u32,
    pub period: Period,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub sleep: SleepSummary,
    pub feeding: FeedingSummary,
    pub diaper: DiaperSummary,
    pub growth: GrowthSummary,
    pub activity: ActivitySummary,
    pub anomalies: Vec<DetectedAnomaly>,
    pub insights: Vec<TrendInsightItem>,
    pub highlights: Vec<TrendInsightItem>,
    pub concerns: Vec<TrendInsightItem>,
    pub narrative: String,
    pub ai_generated: bool,
    pub ai_error: Option<String>,
    pub ai_duration_ms: Option<u64>,
    pub generated_at: DateTime<Utc>,
    #[serde(skip)]
    pub from_cache: bool,
}
