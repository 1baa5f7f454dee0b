//! Feeding aggregator

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::FeedingKind;
use crate::store::EventStore;

use super::patterns;
use super::types::FeedingSummary;
use super::{check_window, window_days};

/// Aggregate feedings in `[start, end]` into a summary
pub async fn aggregate(
    store: &dyn EventStore,
    baby_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<FeedingSummary> {
    check_window(start, end)?;
    let feedings = store.feedings(baby_id, start, end).await?;
    let days = window_days(start, end);

    let breast_count = feedings.iter().filter(|f| f.kind == FeedingKind::Breast).count();
    let bottle_count = feedings.iter().filter(|f| f.kind == FeedingKind::Bottle).count();
    let solid_count = feedings.iter().filter(|f| f.kind == FeedingKind::Solid).count();

    let bottle_volumes: Vec<f64> = feedings
        .iter()
        .filter(|f| f.kind == FeedingKind::Bottle)
        .filter_map(|f| f.amount_ml)
        .filter(|ml| *ml > 0.0)
        .collect();
    let total_bottle_ml: f64 = bottle_volumes.iter().sum();
    let average_bottle_ml = if bottle_volumes.is_empty() {
        0.0
    } else {
        total_bottle_ml / bottle_volumes.len() as f64
    };

    // Only sessions with a nonzero logged duration count toward the average;
    // a zero usually means the timer was never started
    let breast_durations: Vec<i64> = feedings
        .iter()
        .filter(|f| f.kind == FeedingKind::Breast)
        .filter_map(|f| f.duration_minutes)
        .filter(|minutes| *minutes > 0)
        .collect();
    let average_breast_duration_minutes = if breast_durations.is_empty() {
        0.0
    } else {
        breast_durations.iter().sum::<i64>() as f64 / breast_durations.len() as f64
    };

    let longest_gap_minutes = feedings
        .windows(2)
        .map(|pair| (pair[1].timestamp - pair[0].timestamp).num_minutes())
        .max();

    let timestamps: Vec<DateTime<Utc>> = feedings.iter().map(|f| f.timestamp).collect();

    Ok(FeedingSummary {
        total_count: feedings.len(),
        breast_count,
        bottle_count,
        solid_count,
        total_bottle_ml,
        average_bottle_ml,
        average_breast_duration_minutes,
        feedings_per_day: feedings.len() as f64 / days as f64,
        longest_gap_minutes,
        consistency_score: patterns::feeding_consistency(&timestamps),
        comparison_to_previous: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Gender, NewBaby, NewFeeding};
    use chrono::{NaiveDate, TimeZone};

    fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, day, h, m, 0).unwrap()
    }

    fn setup() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let baby_id = db
            .insert_baby(&NewBaby {
                name: "Nora".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                gender: Gender::Female,
            })
            .unwrap();
        (db, baby_id)
    }

    fn log_feeding(
        db: &Database,
        baby_id: i64,
        timestamp: DateTime<Utc>,
        kind: FeedingKind,
        amount_ml: Option<f64>,
        duration_minutes: Option<i64>,
    ) {
        db.insert_feeding(
            baby_id,
            &NewFeeding {
                timestamp,
                kind,
                amount_ml,
                duration_minutes,
            },
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_aggregate_counts_and_volumes() {
        let (db, baby_id) = setup();
        log_feeding(&db, baby_id, at(10, 6, 0), FeedingKind::Breast, None, Some(20));
        log_feeding(&db, baby_id, at(10, 9, 0), FeedingKind::Breast, None, Some(0));
        log_feeding(&db, baby_id, at(10, 12, 0), FeedingKind::Bottle, Some(120.0), None);
        log_feeding(&db, baby_id, at(10, 15, 0), FeedingKind::Bottle, Some(90.0), None);
        log_feeding(&db, baby_id, at(10, 18, 0), FeedingKind::Solid, None, None);

        let summary = aggregate(&db, baby_id, at(10, 0, 0), at(10, 23, 59))
            .await
            .unwrap();

        assert_eq!(summary.total_count, 5);
        assert_eq!(summary.breast_count, 2);
        assert_eq!(summary.bottle_count, 2);
        assert_eq!(summary.solid_count, 1);
        assert_eq!(summary.total_bottle_ml, 210.0);
        assert_eq!(summary.average_bottle_ml, 105.0);
        // The zero-duration session is excluded from the average
        assert_eq!(summary.average_breast_duration_minutes, 20.0);
        assert_eq!(summary.feedings_per_day, 5.0);
        assert_eq!(summary.longest_gap_minutes, Some(180));
        // Perfectly even 3-hour rhythm
        assert_eq!(summary.consistency_score, 100.0);
    }

    #[tokio::test]
    async fn test_aggregate_empty_window() {
        let (db, baby_id) = setup();
        let summary = aggregate(&db, baby_id, at(10, 0, 0), at(10, 23, 59))
            .await
            .unwrap();

        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.total_bottle_ml, 0.0);
        assert_eq!(summary.average_breast_duration_minutes, 0.0);
        assert_eq!(summary.longest_gap_minutes, None);
        assert_eq!(summary.consistency_score, 50.0);
    }

    #[tokio::test]
    async fn test_additivity_of_counts() {
        let (db, baby_id) = setup();
        for day in 10..=12 {
            log_feeding(&db, baby_id, at(day, 8, 0), FeedingKind::Bottle, Some(100.0), None);
            log_feeding(&db, baby_id, at(day, 14, 0), FeedingKind::Bottle, Some(100.0), None);
        }

        let first = aggregate(&db, baby_id, at(10, 0, 0), at(10, 23, 59)).await.unwrap();
        let rest = aggregate(&db, baby_id, at(11, 0, 0), at(12, 23, 59)).await.unwrap();
        let whole = aggregate(&db, baby_id, at(10, 0, 0), at(12, 23, 59)).await.unwrap();

        assert_eq!(first.total_count + rest.total_count, whole.total_count);
        assert_eq!(
            first.total_bottle_ml + rest.total_bottle_ml,
            whole.total_bottle_ml
        );
    }
}
