//! Integration tests for the insights pipeline
//!
//! Exercises the engine end-to-end against the real SQLite store, with a
//! counting wrapper to verify cache behavior at the aggregation boundary.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use sprout_core::db::Database;
use sprout_core::insights::InsightEngine;
use sprout_core::models::{
    Activity, Baby, DiaperChange, DiaperKind, Feeding, FeedingKind, Gender, GrowthMeasurement,
    NewBaby, NewDiaperChange, NewFeeding, NewSleepSession, Period, SleepKind, SleepSession,
};
use sprout_core::store::EventStore;
use sprout_core::{AIClient, MemoryCache, Result};

const CALLER: &str = "alex";

/// Event store wrapper that counts every aggregation query
struct CountingStore {
    inner: Database,
    calls: AtomicUsize,
}

impl CountingStore {
    fn new(inner: Database) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventStore for CountingStore {
    async fn sleep_sessions(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SleepSession>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.sleep_sessions(baby_id, start, end).await
    }

    async fn feedings(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Feeding>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.feedings(baby_id, start, end).await
    }

    async fn diaper_changes(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DiaperChange>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.diaper_changes(baby_id, start, end).await
    }

    async fn growth_measurements(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<GrowthMeasurement>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.growth_measurements(baby_id, start, end).await
    }

    async fn activities(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Activity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.activities(baby_id, start, end).await
    }
}

fn setup() -> (Database, i64) {
    let db = Database::in_memory().unwrap();
    let dob = (Utc::now() - Duration::days(75)).date_naive();
    let baby_id = db
        .insert_baby(&NewBaby {
            name: "Nora".to_string(),
            date_of_birth: dob,
            gender: Gender::Female,
        })
        .unwrap();
    db.grant_access(baby_id, CALLER).unwrap();
    (db, baby_id)
}

fn seed_day(db: &Database, baby_id: i64, day_offset: i64) {
    let base = (Utc::now() - Duration::days(day_offset))
        .date_naive()
        .and_hms_opt(6, 0, 0)
        .unwrap()
        .and_utc();

    for i in 0..4 {
        let start = base + Duration::hours(3 * i);
        db.insert_sleep_session(
            baby_id,
            &NewSleepSession {
                start_time: start,
                end_time: start + Duration::minutes(80),
                kind: SleepKind::Nap,
                notes: None,
            },
        )
        .unwrap();
        db.insert_feeding(
            baby_id,
            &NewFeeding {
                timestamp: start + Duration::minutes(85),
                kind: FeedingKind::Bottle,
                amount_ml: Some(110.0),
                duration_minutes: None,
            },
        )
        .unwrap();
        db.insert_diaper_change(
            baby_id,
            &NewDiaperChange {
                timestamp: start + Duration::minutes(95),
                kind: if i % 2 == 0 {
                    DiaperKind::Wet
                } else {
                    DiaperKind::Mixed
                },
            },
        )
        .unwrap();
    }
}

#[tokio::test]
async fn cache_hit_skips_aggregation_branches() {
    let (db, baby_id) = setup();
    for day in 0..7 {
        seed_day(&db, baby_id, day);
    }

    let store = Arc::new(CountingStore::new(db.clone()));
    let engine = InsightEngine::new(store.clone(), Arc::new(db.clone()), Arc::new(db))
        .with_cache(Arc::new(MemoryCache::new()));

    let end = Some(Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap());
    let first = engine
        .report(baby_id, CALLER, Period::Weekly, end)
        .await
        .unwrap();
    // Five categories, doubled for the previous-window comparison
    let calls_after_first = store.calls();
    assert_eq!(calls_after_first, 10);
    assert!(!first.from_cache);

    let second = engine
        .report(baby_id, CALLER, Period::Weekly, end)
        .await
        .unwrap();
    assert!(second.from_cache);
    // No aggregation branch re-executed
    assert_eq!(store.calls(), calls_after_first);

    // Rehydrated report matches the fresh one field for field
    let mut rehydrated = second.clone();
    rehydrated.from_cache = false;
    assert_eq!(first, rehydrated);
}

#[tokio::test]
async fn yearly_report_runs_single_window_fan_out() {
    let (db, baby_id) = setup();
    seed_day(&db, baby_id, 0);

    let store = Arc::new(CountingStore::new(db.clone()));
    let engine = InsightEngine::new(store.clone(), Arc::new(db.clone()), Arc::new(db));

    engine
        .report(baby_id, CALLER, Period::Yearly, None)
        .await
        .unwrap();
    // Yearly skips the previous-window comparison
    assert_eq!(store.calls(), 5);
}

#[tokio::test]
async fn aggregation_totals_are_additive_across_windows() {
    let (db, baby_id) = setup();
    for day in 0..6 {
        seed_day(&db, baby_id, day);
    }
    let engine = InsightEngine::from_database(db);

    // Two adjacent daily reports vs. manual sums: daily totals for separate
    // days must add up, period by period
    let today = engine
        .report(baby_id, CALLER, Period::Daily, None)
        .await
        .unwrap();
    let yesterday = engine
        .report(
            baby_id,
            CALLER,
            Period::Daily,
            Some(Utc::now() - Duration::days(1)),
        )
        .await
        .unwrap();

    let weekly = engine
        .report(baby_id, CALLER, Period::Weekly, None)
        .await
        .unwrap();

    // Each seeded day contributes the same sleep minutes and counts
    assert_eq!(today.sleep.total_minutes, yesterday.sleep.total_minutes);
    assert_eq!(weekly.sleep.total_minutes, today.sleep.total_minutes * 6);
    assert_eq!(weekly.feeding.total_count, today.feeding.total_count * 6);
    assert_eq!(weekly.diaper.total_count, today.diaper.total_count * 6);
}

#[tokio::test]
async fn provider_failure_never_fails_the_request() {
    let (db, baby_id) = setup();
    seed_day(&db, baby_id, 0);
    let engine = InsightEngine::from_database(db).with_ai(AIClient::failing_mock());

    let report = engine
        .report(baby_id, CALLER, Period::Daily, None)
        .await
        .unwrap();

    assert!(!report.ai_generated);
    assert!(report.ai_error.is_some());
    assert!(!report.narrative.is_empty());
    // The degraded narrative still reflects real aggregates
    assert!(report.sleep.total_minutes > 0);
}

#[tokio::test]
async fn zero_event_window_is_a_valid_result() {
    let (db, baby_id) = setup();
    let engine = InsightEngine::from_database(db);

    let report = engine
        .report(baby_id, CALLER, Period::Monthly, None)
        .await
        .unwrap();

    assert_eq!(report.sleep.total_minutes, 0);
    assert_eq!(report.feeding.total_count, 0);
    assert_eq!(report.diaper.total_count, 0);
    assert_eq!(report.sleep.consistency_score, 50.0);
    assert!(report.narrative.contains("Not enough data"));
    assert!(report.anomalies.is_empty());
}

#[tokio::test]
async fn consistency_scores_stay_in_bounds() {
    let (db, baby_id) = setup();
    // Deliberately chaotic schedule
    let base = Utc::now().date_naive().and_hms_opt(0, 30, 0).unwrap().and_utc();
    for (offset_minutes, duration) in [(0, 20), (300, 240), (700, 35), (1100, 95)] {
        let start = base + Duration::minutes(offset_minutes);
        db.insert_sleep_session(
            baby_id,
            &NewSleepSession {
                start_time: start,
                end_time: start + Duration::minutes(duration),
                kind: SleepKind::Nap,
                notes: None,
            },
        )
        .unwrap();
    }
    let engine = InsightEngine::from_database(db);

    let report = engine
        .report(baby_id, CALLER, Period::Daily, None)
        .await
        .unwrap();
    assert!((0.0..=100.0).contains(&report.sleep.consistency_score));
    assert!((0.0..=100.0).contains(&report.feeding.consistency_score));
}

#[test]
fn baby_profile_round_trips_through_directory() {
    use sprout_core::store::BabyDirectory;

    let (db, baby_id) = setup();
    let baby: Baby = BabyDirectory::get_baby(&db, baby_id).unwrap();
    assert_eq!(baby.id, baby_id);
    assert_eq!(baby.name, "Nora");

    assert!(BabyDirectory::get_baby(&db, baby_id + 50).is_err());
}
