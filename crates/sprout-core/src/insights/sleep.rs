//! Sleep aggregator

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::SleepKind;
use crate::store::EventStore;
use crate::tables::ReferenceTables;

use super::patterns;
use super::types::{SleepSummary, WakeWindowStats};
use super::{check_window, window_days};

/// Aggregate sleep sessions in `[start, end]` into a summary
///
/// `as_of` anchors the current-wake-window computation (normally the request
/// time). Read-only; either fully succeeds or raises.
pub async fn aggregate(
    store: &dyn EventStore,
    baby_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    as_of: DateTime<Utc>,
    age_months: u32,
    tables: &ReferenceTables,
) -> Result<SleepSummary> {
    check_window(start, end)?;
    let sessions = store.sleep_sessions(baby_id, start, end).await?;
    let days = window_days(start, end);

    let total_minutes: i64 = sessions.iter().map(|s| s.duration_minutes()).sum();
    let nap_minutes: i64 = sessions
        .iter()
        .filter(|s| s.kind == SleepKind::Nap)
        .map(|s| s.duration_minutes())
        .sum();
    let nap_count = sessions.iter().filter(|s| s.kind == SleepKind::Nap).count();
    let longest_session_minutes = sessions
        .iter()
        .map(|s| s.duration_minutes())
        .max()
        .unwrap_or(0);

    let average_session_minutes = if sessions.is_empty() {
        0.0
    } else {
        total_minutes as f64 / sessions.len() as f64
    };

    let windows = patterns::wake_windows(&sessions);
    let wake_windows: WakeWindowStats = patterns::wake_window_stats(&windows, age_months, tables);

    Ok(SleepSummary {
        total_minutes,
        nap_minutes,
        night_minutes: total_minutes - nap_minutes,
        session_count: sessions.len(),
        nap_count,
        average_session_minutes,
        daily_average_minutes: total_minutes as f64 / days as f64,
        longest_session_minutes,
        consistency_score: patterns::sleep_consistency(&sessions),
        wake_windows,
        current_wake_window_minutes: patterns::current_wake_window(&sessions, as_of),
        comparison_to_previous: None,
    })
}
