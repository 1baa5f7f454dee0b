//! Activity aggregator

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::error::Result;
use crate::store::EventStore;

use super::types::ActivitySummary;
use super::{check_window, window_days};

/// Normalize an activity type label for grouping
///
/// Matching is case-insensitive and tolerant of separator variants:
/// "Tummy Time", "tummy_time", and "tummy-time" all group together.
pub fn normalize_activity_type(raw: &str) -> Result<String> {
    let separators = Regex::new(r"[\s_\-]+")?;
    Ok(separators
        .replace_all(raw.trim(), " ")
        .to_lowercase())
}

/// Aggregate activities in `[start, end]` into a summary
pub async fn aggregate(
    store: &dyn EventStore,
    baby_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<ActivitySummary> {
    check_window(start, end)?;
    let activities = store.activities(baby_id, start, end).await?;
    let days = window_days(start, end);

    let mut minutes_by_type: BTreeMap<String, i64> = BTreeMap::new();
    let mut total_minutes = 0;
    for activity in &activities {
        let key = normalize_activity_type(&activity.activity_type)?;
        *minutes_by_type.entry(key).or_insert(0) += activity.duration_minutes;
        total_minutes += activity.duration_minutes;
    }

    Ok(ActivitySummary {
        total_minutes,
        session_count: activities.len(),
        minutes_by_type,
        sessions_per_day: activities.len() as f64 / days as f64,
        comparison_to_previous: None,
    })
}
