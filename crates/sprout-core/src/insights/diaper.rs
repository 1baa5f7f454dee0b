//! Diaper aggregator

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::DiaperKind;
use crate::store::EventStore;

use super::types::DiaperSummary;
use super::{check_window, window_days};

/// Aggregate diaper changes in `[start, end]` into a summary
///
/// Mixed diapers count toward both the wet and dirty per-day rates, since
/// they indicate both output types.
pub async fn aggregate(
    store: &dyn EventStore,
    baby_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<DiaperSummary> {
    check_window(start, end)?;
    let changes = store.diaper_changes(baby_id, start, end).await?;
    let days = window_days(start, end) as f64;

    let wet_count = changes.iter().filter(|c| c.kind == DiaperKind::Wet).count();
    let dirty_count = changes.iter().filter(|c| c.kind == DiaperKind::Dirty).count();
    let mixed_count = changes.iter().filter(|c| c.kind == DiaperKind::Mixed).count();

    Ok(DiaperSummary {
        total_count: changes.len(),
        wet_count,
        dirty_count,
        mixed_count,
        wet_per_day: (wet_count + mixed_count) as f64 / days,
        dirty_per_day: (dirty_count + mixed_count) as f64 / days,
        changes_per_day: changes.len() as f64 / days,
        comparison_to_previous: None,
    })
}
