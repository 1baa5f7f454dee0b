//! Growth aggregator

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::store::EventStore;

use super::check_window;
use super::types::GrowthSummary;

/// Aggregate growth measurements in `[start, end]` into a summary
///
/// Values stay in base metric subunits (grams, millimeters); presentation
/// layers convert. Changes are computed between the first and last
/// measurement in the window that carry the field.
pub async fn aggregate(
    store: &dyn EventStore,
    baby_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<GrowthSummary> {
    check_window(start, end)?;
    let measurements = store.growth_measurements(baby_id, start, end).await?;

    let weights: Vec<i64> = measurements.iter().filter_map(|m| m.weight_grams).collect();
    let heights: Vec<i64> = measurements.iter().filter_map(|m| m.height_mm).collect();
    let heads: Vec<i64> = measurements
        .iter()
        .filter_map(|m| m.head_circumference_mm)
        .collect();

    let span = |values: &[i64]| -> Option<i64> {
        match (values.first(), values.last()) {
            (Some(first), Some(last)) if values.len() >= 2 => Some(last - first),
            _ => None,
        }
    };

    Ok(GrowthSummary {
        measurement_count: measurements.len(),
        latest_weight_grams: weights.last().copied(),
        latest_height_mm: heights.last().copied(),
        latest_head_circumference_mm: heads.last().copied(),
        weight_change_grams: span(&weights),
        height_change_mm: span(&heights),
    })
}
