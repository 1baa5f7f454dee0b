//! Pattern and consistency analysis
//!
//! Wake window extraction, variance-based consistency scoring, and the
//! wake-window-driven next-sleep prediction.

use chrono::{DateTime, Timelike, Utc};

use crate::models::SleepSession;
use crate::tables::ReferenceTables;

use super::types::{SleepPrediction, WakeWindowStats};

/// Shortest wake window accepted into statistics
pub const MIN_WAKE_WINDOW_MINUTES: i64 = 15;

/// Longest wake window accepted into statistics (12 hours)
pub const MAX_WAKE_WINDOW_MINUTES: i64 = 720;

/// Neutral consistency score returned when fewer than 3 sessions qualify
pub const INSUFFICIENT_DATA_SCORE: f64 = 50.0;

/// Tuning for the next-sleep prediction
#[derive(Debug, Clone)]
pub struct PredictionConfig {
    /// Confidence added when AI narration succeeded for the same request.
    /// A heuristic tuning constant; configurable, not a fixed law.
    pub ai_confidence_boost: f64,
    /// Hard ceiling on reported confidence
    pub max_confidence: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            ai_confidence_boost: 0.1,
            max_confidence: 0.95,
        }
    }
}

/// Extract accepted wake windows from sessions ordered by start time
///
/// Each window pairs a session's start with the immediately preceding
/// session's end. Values outside `[15, 720]` minutes are treated as data
/// gaps (missed logging) and excluded, not clamped.
pub fn wake_windows(sessions: &[SleepSession]) -> Vec<i64> {
    sessions
        .windows(2)
        .filter_map(|pair| {
            let gap = (pair[1].start_time - pair[0].end_time).num_minutes();
            (MIN_WAKE_WINDOW_MINUTES..=MAX_WAKE_WINDOW_MINUTES)
                .contains(&gap)
                .then_some(gap)
        })
        .collect()
}

/// Average/min/max/count over accepted wake windows
///
/// An empty list substitutes the age-recommended window so downstream
/// consumers get a principled default instead of "no data".
pub fn wake_window_stats(
    windows: &[i64],
    age_months: u32,
    tables: &ReferenceTables,
) -> WakeWindowStats {
    if windows.is_empty() {
        let recommended = tables.recommended_wake_window_minutes(age_months);
        return WakeWindowStats {
            average_minutes: recommended as f64,
            min_minutes: recommended,
            max_minutes: recommended,
            count: 0,
            from_age_default: true,
        };
    }

    let sum: i64 = windows.iter().sum();
    WakeWindowStats {
        average_minutes: sum as f64 / windows.len() as f64,
        min_minutes: *windows.iter().min().unwrap_or(&0),
        max_minutes: *windows.iter().max().unwrap_or(&0),
        count: windows.len(),
        from_age_default: false,
    }
}

/// Sleep schedule consistency score, 0-100
///
/// Variance of start-time-of-day (hours) and of duration (minutes) each map
/// to a 0-50 penalty via linear scaling. Fewer than 3 sessions returns the
/// neutral insufficient-data score.
pub fn sleep_consistency(sessions: &[SleepSession]) -> f64 {
    if sessions.len() < 3 {
        return INSUFFICIENT_DATA_SCORE;
    }

    let start_hours: Vec<f64> = sessions
        .iter()
        .map(|s| {
            s.start_time.hour() as f64
                + s.start_time.minute() as f64 / 60.0
                + s.start_time.second() as f64 / 3600.0
        })
        .collect();
    let durations: Vec<f64> = sessions
        .iter()
        .map(|s| s.duration_minutes() as f64)
        .collect();

    let start_penalty = (variance(&start_hours) / 16.0 * 50.0).min(50.0);
    let duration_penalty = (variance(&durations) / 900.0 * 50.0).min(50.0);

    (100.0 - start_penalty - duration_penalty).max(0.0)
}

/// Feeding rhythm consistency score, 0-100
///
/// Variance over inter-feeding intervals in minutes; fewer than 3 feedings
/// returns the neutral insufficient-data score.
pub fn feeding_consistency(timestamps: &[DateTime<Utc>]) -> f64 {
    if timestamps.len() < 3 {
        return INSUFFICIENT_DATA_SCORE;
    }

    let intervals: Vec<f64> = timestamps
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_minutes() as f64)
        .collect();

    let penalty = (variance(&intervals) / 3600.0 * 100.0).min(100.0);
    (100.0 - penalty).max(0.0)
}

/// Minutes elapsed since the most recent sleep ended, clamped to >= 0
///
/// `None` when no prior sleep session exists.
pub fn current_wake_window(sessions: &[SleepSession], as_of: DateTime<Utc>) -> Option<i64> {
    sessions
        .iter()
        .map(|s| s.end_time)
        .max()
        .map(|last_end| (as_of - last_end).num_minutes().max(0))
}

/// Predict the next sleep from recent wake window patterns
///
/// `None` when there is no prior sleep session to anchor the prediction.
/// With no accepted wake windows the age-recommended window is used at low
/// confidence; otherwise confidence grows with sample count. The AI boost
/// applies only when narration actually used the AI path.
pub fn predict_next_sleep(
    sessions: &[SleepSession],
    as_of: DateTime<Utc>,
    age_months: u32,
    tables: &ReferenceTables,
    config: &PredictionConfig,
    ai_assisted: bool,
) -> Option<SleepPrediction> {
    let last_end = sessions.iter().map(|s| s.end_time).max()?;

    let windows = wake_windows(sessions);
    let (basis_minutes, sample_count, mut confidence) = if windows.is_empty() {
        (
            tables.recommended_wake_window_minutes(age_months) as f64,
            0,
            0.3,
        )
    } else {
        let avg = windows.iter().sum::<i64>() as f64 / windows.len() as f64;
        let confidence = (0.4 + 0.05 * windows.len().min(8) as f64).min(0.8);
        (avg, windows.len(), confidence)
    };

    if ai_assisted {
        confidence = (confidence + config.ai_confidence_boost).min(config.max_confidence);
    }

    let mut predicted = last_end + chrono::Duration::minutes(basis_minutes.round() as i64);
    // A prediction in the past is stale; the baby is due now
    if predicted < as_of {
        predicted = as_of;
    }

    Some(SleepPrediction {
        predicted_time: predicted,
        confidence,
        basis_window_minutes: basis_minutes,
        sample_count,
    })
}

/// Population variance
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}
