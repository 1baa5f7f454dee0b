//! Types shared across AI backends

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Period;

/// Identifies the narrative template a generation request is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeKind {
    /// Weekly caregiver summary
    WeeklySummary,
    /// Sleep pattern analysis for the prediction surface
    SleepPattern,
    /// Explanation of detected anomalies
    AnomalyAnalysis,
    /// Trend narrative for a period report
    TrendDaily,
    TrendWeekly,
    TrendMonthly,
    TrendYearly,
}

impl NarrativeKind {
    /// The narrative kind used for a period report
    pub fn for_period(period: Period) -> Self {
        match period {
            Period::Daily => NarrativeKind::TrendDaily,
            Period::Weekly => NarrativeKind::WeeklySummary,
            Period::Monthly => NarrativeKind::TrendMonthly,
            Period::Yearly => NarrativeKind::TrendYearly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NarrativeKind::WeeklySummary => "weekly_summary",
            NarrativeKind::SleepPattern => "sleep_pattern",
            NarrativeKind::AnomalyAnalysis => "anomaly_analysis",
            NarrativeKind::TrendDaily => "trend_daily",
            NarrativeKind::TrendWeekly => "trend_weekly",
            NarrativeKind::TrendMonthly => "trend_monthly",
            NarrativeKind::TrendYearly => "trend_yearly",
        }
    }
}

impl fmt::Display for NarrativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NarrativeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly_summary" => Ok(NarrativeKind::WeeklySummary),
            "sleep_pattern" => Ok(NarrativeKind::SleepPattern),
            "anomaly_analysis" => Ok(NarrativeKind::AnomalyAnalysis),
            "trend_daily" => Ok(NarrativeKind::TrendDaily),
            "trend_weekly" => Ok(NarrativeKind::TrendWeekly),
            "trend_monthly" => Ok(NarrativeKind::TrendMonthly),
            "trend_yearly" => Ok(NarrativeKind::TrendYearly),
            _ => Err(format!("Unknown narrative kind: {}", s)),
        }
    }
}

/// Successful provider generation
#[derive(Debug, Clone)]
pub struct GeneratedText {
    pub text: String,
    pub duration_ms: u64,
}

/// Outcome of a narrative request, fallback included
///
/// `generated == false` means the deterministic fallback path was used and
/// `error` carries the reason; the text itself is always present and
/// non-empty. This call never surfaces a hard failure to its consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeResult {
    pub text: String,
    pub generated: bool,
    pub error: Option<String>,
    pub duration_ms: Option<u64>,
}
