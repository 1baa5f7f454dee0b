//! Insights & Analytics Engine
//!
//! Turns raw tracked events into period-bounded statistics, anomaly flags,
//! trend comparisons, and a narrative. Organized by stage:
//! - Aggregators, one per category: `sleep`, `feeding`, `diaper`, `growth`,
//!   `activity`
//! - `patterns` - wake windows, consistency scoring, sleep prediction
//! - `anomaly` - rule-based observed-vs-expected detection
//! - `trends` - period windows, previous-period deltas, insight synthesis
//! - `engine` - request orchestration (access, cache, fan-out, narrative)

pub mod activity;
pub mod anomaly;
pub mod diaper;
pub mod engine;
pub mod feeding;
pub mod growth;
pub mod patterns;
pub mod sleep;
pub mod trends;
pub mod types;

pub use engine::InsightEngine;
pub use types::*;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Number of days a window spans: `ceil((end - start) / 1 day)`, floored to
/// a minimum of 1 to avoid division by zero on degenerate windows
pub(crate) fn window_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let seconds = (end - start).num_seconds();
    ((seconds + 86_399) / 86_400).max(1)
}

/// Validate that a window is well-formed (`end` must not precede `start`)
pub(crate) fn check_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end < start {
        return Err(Error::InvalidData(format!(
            "window end {} precedes start {}",
            end, start
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_days() {
        let start = Utc.with_ymd_and_hms(2026, 5, 4, 0, 0, 0).unwrap();
        assert_eq!(window_days(start, start), 1);
        assert_eq!(window_days(start, start + chrono::Duration::hours(6)), 1);
        assert_eq!(window_days(start, start + chrono::Duration::days(1)), 1);
        assert_eq!(
            window_days(start, start + chrono::Duration::days(1) + chrono::Duration::seconds(1)),
            2
        );
        assert_eq!(window_days(start, start + chrono::Duration::days(7)), 7);
    }

    #[test]
    fn test_check_window() {
        let start = Utc.with_ymd_and_hms(2026, 5, 4, 0, 0, 0).unwrap();
        assert!(check_window(start, start).is_ok());
        assert!(check_window(start, start - chrono::Duration::seconds(1)).is_err());
    }
}
