//! Insight Engine - orchestrates a single insight request
//!
//! Request flow: authorization, profile lookup, cache probe, concurrent
//! per-category aggregation fan-out (doubled when the period compares to the
//! previous window), pattern/anomaly/trend analysis, narrative with
//! fallback, best-effort cache write.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ai::{narrate, AIClient, NarrativeKind, NarrativeResult, PromptContext};
use crate::cache::{cache_key, InsightCache, NoopCache};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Baby, Period};
use crate::store::{AccessControl, BabyDirectory, EventStore};
use crate::tables::ReferenceTables;

use super::patterns::{self, PredictionConfig};
use super::types::{
    ActivitySummary, DetectedAnomaly, DiaperSummary, FeedingSummary, GrowthSummary, InsightReport,
    SleepPrediction, SleepSummary,
};
use super::{activity, anomaly, diaper, feeding, growth, sleep, trends};

/// Anomaly detection run over the last day, with explanatory narrative
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub baby_id: i64,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub anomalies: Vec<DetectedAnomaly>,
    pub narrative: NarrativeResult,
}

/// Next-sleep prediction with pattern narrative
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepPatternReport {
    pub baby_id: i64,
    pub prediction: Option<SleepPrediction>,
    pub narrative: NarrativeResult,
}

/// The main insight engine
///
/// Holds the collaborator seams; everything except the cache is read-only,
/// and the cache is get-then-compute-then-set without a lock: a race between
/// identical requests costs at most a duplicate computation and an
/// idempotent overwrite.
pub struct InsightEngine {
    store: Arc<dyn EventStore>,
    directory: Arc<dyn BabyDirectory>,
    access: Arc<dyn AccessControl>,
    cache: Arc<dyn InsightCache>,
    ai: Option<AIClient>,
    tables: ReferenceTables,
    prediction: PredictionConfig,
}

impl InsightEngine {
    /// Create an engine over explicit collaborators, with caching disabled
    pub fn new(
        store: Arc<dyn EventStore>,
        directory: Arc<dyn BabyDirectory>,
        access: Arc<dyn AccessControl>,
    ) -> Self {
        Self {
            store,
            directory,
            access,
            cache: Arc::new(NoopCache),
            ai: None,
            tables: ReferenceTables::default(),
            prediction: PredictionConfig::default(),
        }
    }

    /// Create an engine where the database serves as event store, baby
    /// directory, and access control
    pub fn from_database(db: Database) -> Self {
        let store = Arc::new(db.clone());
        let directory = Arc::new(db.clone());
        let access = Arc::new(db);
        Self::new(store, directory, access)
    }

    /// Use the given cache implementation
    pub fn with_cache(mut self, cache: Arc<dyn InsightCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Use the given AI client for narratives
    pub fn with_ai(mut self, ai: AIClient) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Override the age-banded reference tables
    pub fn with_tables(mut self, tables: ReferenceTables) -> Self {
        self.tables = tables;
        self
    }

    /// Override the prediction tuning
    pub fn with_prediction_config(mut self, config: PredictionConfig) -> Self {
        self.prediction = config;
        self
    }

    /// Whether an AI backend is configured
    pub fn has_ai(&self) -> bool {
        self.ai.is_some()
    }

    /// Authorize the caller and fetch the baby profile
    fn authorize(&self, baby_id: i64, caller_id: &str) -> Result<Baby> {
        if !self.access.has_access(baby_id, caller_id)? {
            return Err(Error::AccessDenied(format!(
                "caller {} may not read baby {}",
                caller_id, baby_id
            )));
        }
        self.directory.get_baby(baby_id)
    }

    /// Run all five category aggregations concurrently for one window
    async fn aggregate_window(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        as_of: DateTime<Utc>,
        age_months: u32,
    ) -> Result<(
        SleepSummary,
        FeedingSummary,
        DiaperSummary,
        GrowthSummary,
        ActivitySummary,
    )> {
        let store = self.store.as_ref();
        tokio::try_join!(
            sleep::aggregate(store, baby_id, start, end, as_of, age_months, &self.tables),
            feeding::aggregate(store, baby_id, start, end),
            diaper::aggregate(store, baby_id, start, end),
            growth::aggregate(store, baby_id, start, end),
            activity::aggregate(store, baby_id, start, end),
        )
    }

    /// Produce the full insight report for a period
    ///
    /// `end_override` pins the window end (tests, backfills); requests
    /// default to now. A cached report is returned as-is with `from_cache`
    /// set; authorization always runs before the cache is consulted.
    pub async fn report(
        &self,
        baby_id: i64,
        caller_id: &str,
        period: Period,
        end_override: Option<DateTime<Utc>>,
    ) -> Result<InsightReport> {
        let baby = self.authorize(baby_id, caller_id)?;
        let (start, end) = trends::period_window(period, end_override);

        let key = cache_key(baby_id, period, start, end);
        if let Some(hit) = self.cache.get(&key) {
            match serde_json::from_str::<InsightReport>(&hit) {
                Ok(mut report) => {
                    debug!(baby_id, period = %period, "Serving insight report from cache");
                    report.from_cache = true;
                    return Ok(report);
                }
                Err(e) => {
                    warn!(
                        baby_id,
                        error = %e,
                        "Discarding unparseable cached report, recomputing"
                    );
                }
            }
        }

        let now = Utc::now();
        let age_months = baby.age_in_months(end.date_naive());

        let previous_window = trends::previous_window(period, start);
        let (mut current, previous) = match previous_window {
            Some((prev_start, prev_end)) => {
                let (current, previous) = tokio::try_join!(
                    self.aggregate_window(baby_id, start, end, now, age_months),
                    self.aggregate_window(baby_id, prev_start, prev_end, now, age_months),
                )?;
                (current, Some(previous))
            }
            None => (
                self.aggregate_window(baby_id, start, end, now, age_months)
                    .await?,
                None,
            ),
        };

        if let Some(ref previous) = previous {
            current.0.comparison_to_previous =
                Some(trends::sleep_comparison(&current.0, &previous.0));
            current.1.comparison_to_previous =
                Some(trends::feeding_comparison(&current.1, &previous.1));
            current.2.comparison_to_previous =
                Some(trends::diaper_comparison(&current.2, &previous.2));
            current.4.comparison_to_previous =
                Some(trends::activity_comparison(&current.4, &previous.4));
        }
        let (sleep_summary, feeding_summary, diaper_summary, growth_summary, activity_summary) =
            current;

        let window_hours = (end - start).num_seconds() as f64 / 3600.0;
        let anomalies = anomaly::detect(
            &sleep_summary,
            &feeding_summary,
            &diaper_summary,
            age_months,
            window_hours,
            &self.tables,
        );

        let inputs = trends::TrendInputs {
            sleep: &sleep_summary,
            feeding: &feeding_summary,
            diaper: &diaper_summary,
            activity: &activity_summary,
            previous_sleep: previous.as_ref().map(|p| &p.0),
            previous_feeding: previous.as_ref().map(|p| &p.1),
            previous_activity: previous.as_ref().map(|p| &p.4),
        };
        let insights = trends::synthesize(&inputs, age_months, &self.tables);
        let highlights = trends::highlights(&insights);
        let concerns = trends::concerns(&insights);

        let context = PromptContext::from_summaries(
            &baby,
            age_months,
            period,
            start,
            end,
            &sleep_summary,
            &feeding_summary,
            &diaper_summary,
            &activity_summary,
            &anomalies,
            &insights,
        );
        let narrative = narrate(self.ai.as_ref(), NarrativeKind::for_period(period), &context).await;

        let report = InsightReport {
            baby_id,
            baby_name: baby.name,
            age_months,
            period,
            period_start: start,
            period_end: end,
            sleep: sleep_summary,
            feeding: feeding_summary,
            diaper: diaper_summary,
            growth: growth_summary,
            activity: activity_summary,
            anomalies,
            insights,
            highlights,
            concerns,
            narrative: narrative.text,
            ai_generated: narrative.generated,
            ai_error: narrative.error,
            ai_duration_ms: narrative.duration_ms,
            generated_at: now,
            from_cache: false,
        };

        match serde_json::to_string(&report) {
            Ok(serialized) => {
                let ttl = Duration::from_secs(period.cache_ttl_seconds());
                if !self.cache.set(&key, &serialized, ttl) {
                    debug!(baby_id, period = %period, "Cache write declined");
                }
            }
            Err(e) => warn!(baby_id, error = %e, "Failed to serialize report for cache"),
        }

        info!(
            baby_id,
            period = %period,
            anomalies = report.anomalies.len(),
            insights = report.insights.len(),
            ai_generated = report.ai_generated,
            "Insight report assembled"
        );
        Ok(report)
    }

    /// Run anomaly detection over the last day and explain the result
    pub async fn anomaly_report(&self, baby_id: i64, caller_id: &str) -> Result<AnomalyReport> {
        let baby = self.authorize(baby_id, caller_id)?;
        let (start, end) = trends::period_window(Period::Daily, None);
        let now = Utc::now();
        let age_months = baby.age_in_months(end.date_naive());

        let (sleep_summary, feeding_summary, diaper_summary, _growth, activity_summary) = self
            .aggregate_window(baby_id, start, end, now, age_months)
            .await?;

        let window_hours = (end - start).num_seconds() as f64 / 3600.0;
        let anomalies = anomaly::detect(
            &sleep_summary,
            &feeding_summary,
            &diaper_summary,
            age_months,
            window_hours,
            &self.tables,
        );

        let context = PromptContext::from_summaries(
            &baby,
            age_months,
            Period::Daily,
            start,
            end,
            &sleep_summary,
            &feeding_summary,
            &diaper_summary,
            &activity_summary,
            &anomalies,
            &[],
        );
        let narrative = narrate(self.ai.as_ref(), NarrativeKind::AnomalyAnalysis, &context).await;

        Ok(AnomalyReport {
            baby_id,
            window_start: start,
            window_end: end,
            anomalies,
            narrative,
        })
    }

    /// Predict the next sleep from the last day of wake window patterns
    ///
    /// When AI narration of the sleep pattern succeeds, prediction
    /// confidence gets the configured boost.
    pub async fn sleep_pattern(&self, baby_id: i64, caller_id: &str) -> Result<SleepPatternReport> {
        let baby = self.authorize(baby_id, caller_id)?;
        let (start, end) = trends::period_window(Period::Daily, None);
        let now = Utc::now();
        let age_months = baby.age_in_months(end.date_naive());

        let sessions = self.store.sleep_sessions(baby_id, start, end).await?;
        let (sleep_summary, feeding_summary, diaper_summary, _growth, activity_summary) = self
            .aggregate_window(baby_id, start, end, now, age_months)
            .await?;

        let context = PromptContext::from_summaries(
            &baby,
            age_months,
            Period::Daily,
            start,
            end,
            &sleep_summary,
            &feeding_summary,
            &diaper_summary,
            &activity_summary,
            &[],
            &[],
        );
        let narrative = narrate(self.ai.as_ref(), NarrativeKind::SleepPattern, &context).await;

        let prediction = patterns::predict_next_sleep(
            &sessions,
            now,
            age_months,
            &self.tables,
            &self.prediction,
            narrative.generated,
        );

        Ok(SleepPatternReport {
            baby_id,
            prediction,
            narrative,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::models::{
        FeedingKind, Gender, NewBaby, NewDiaperChange, NewFeeding, NewSleepSession, SleepKind,
    };
    use chrono::{Duration as ChronoDuration, TimeZone};

    const CALLER: &str = "alex";

    /// 75 days back is always exactly 2 whole calendar months of age
    /// (2 months span at most 62 days, 3 months at least 89)
    const TWO_MONTHS_DAYS: i64 = 75;

    fn setup(dob_days_ago: i64) -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        let dob = (Utc::now() - ChronoDuration::days(dob_days_ago)).date_naive();
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
        let base = Utc::now() - ChronoDuration::days(day_offset);
        let base = base
            .date_naive()
            .and_hms_opt(6, 0, 0)
            .unwrap()
            .and_utc();

        for i in 0..3 {
            let start = base + ChronoDuration::hours(3 * i);
            db.insert_sleep_session(
                baby_id,
                &NewSleepSession {
                    start_time: start,
                    end_time: start + ChronoDuration::minutes(90),
                    kind: SleepKind::Nap,
                    notes: None,
                },
            )
            .unwrap();
            db.insert_feeding(
                baby_id,
                &NewFeeding {
                    timestamp: start + ChronoDuration::minutes(95),
                    kind: FeedingKind::Bottle,
                    amount_ml: Some(120.0),
                    duration_minutes: None,
                },
            )
            .unwrap();
            db.insert_diaper_change(
                baby_id,
                &NewDiaperChange {
                    timestamp: start + ChronoDuration::minutes(100),
                    kind: crate::models::DiaperKind::Wet,
                },
            )
            .unwrap();
        }
    }

    #[tokio::test]
    async fn test_access_denied() {
        let (db, baby_id) = setup(TWO_MONTHS_DAYS);
        let engine = InsightEngine::from_database(db);

        let err = engine
            .report(baby_id, "stranger", Period::Weekly, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AccessDenied(_)));
    }

    #[tokio::test]
    async fn test_baby_not_found() {
        let (db, baby_id) = setup(TWO_MONTHS_DAYS);
        db.grant_access(baby_id + 99, CALLER).unwrap();
        let engine = InsightEngine::from_database(db);

        let err = engine
            .report(baby_id + 99, CALLER, Period::Weekly, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_window_is_a_complete_response() {
        let (db, baby_id) = setup(TWO_MONTHS_DAYS);
        let engine = InsightEngine::from_database(db);

        let report = engine
            .report(baby_id, CALLER, Period::Weekly, None)
            .await
            .unwrap();

        assert_eq!(report.sleep.total_minutes, 0);
        assert_eq!(report.feeding.total_count, 0);
        assert_eq!(report.sleep.consistency_score, 50.0);
        assert_eq!(report.feeding.consistency_score, 50.0);
        assert!(report.anomalies.is_empty());
        assert!(!report.ai_generated);
        assert!(report.narrative.contains("Not enough data"));
        assert!(!report.from_cache);
    }

    #[tokio::test]
    async fn test_report_with_data_and_mock_ai() {
        let (db, baby_id) = setup(TWO_MONTHS_DAYS);
        for day in 0..7 {
            seed_day(&db, baby_id, day);
        }
        let engine = InsightEngine::from_database(db).with_ai(AIClient::mock());

        let report = engine
            .report(baby_id, CALLER, Period::Weekly, None)
            .await
            .unwrap();

        assert!(report.sleep.total_minutes > 0);
        assert!(report.feeding.total_count > 0);
        assert!(report.ai_generated);
        assert!(report.ai_duration_ms.is_some());
        assert!(report.ai_error.is_none());
        assert!(report.narrative.contains("Nora"));
        // Previous-window comparison is present for weekly periods
        assert!(report.sleep.comparison_to_previous.is_some());
    }

    #[tokio::test]
    async fn test_ai_failure_degrades_to_fallback() {
        let (db, baby_id) = setup(TWO_MONTHS_DAYS);
        seed_day(&db, baby_id, 0);
        let engine = InsightEngine::from_database(db).with_ai(AIClient::failing_mock());

        let report = engine
            .report(baby_id, CALLER, Period::Daily, None)
            .await
            .unwrap();

        assert!(!report.ai_generated);
        assert!(report.ai_error.is_some());
        assert!(!report.narrative.is_empty());
    }

    #[tokio::test]
    async fn test_yearly_report_skips_comparison() {
        let (db, baby_id) = setup(TWO_MONTHS_DAYS);
        seed_day(&db, baby_id, 0);
        let engine = InsightEngine::from_database(db);

        let report = engine
            .report(baby_id, CALLER, Period::Yearly, None)
            .await
            .unwrap();
        assert!(report.sleep.comparison_to_previous.is_none());
        assert!(report.feeding.comparison_to_previous.is_none());
    }

    #[tokio::test]
    async fn test_cache_round_trip_is_field_for_field_equal() {
        let (db, baby_id) = setup(TWO_MONTHS_DAYS);
        for day in 0..3 {
            seed_day(&db, baby_id, day);
        }
        let cache = Arc::new(MemoryCache::new());
        let engine = InsightEngine::from_database(db).with_cache(cache);

        let end = Some(Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap());
        let fresh = engine
            .report(baby_id, CALLER, Period::Weekly, end)
            .await
            .unwrap();
        let cached = engine
            .report(baby_id, CALLER, Period::Weekly, end)
            .await
            .unwrap();

        assert!(!fresh.from_cache);
        assert!(cached.from_cache);

        let mut rehydrated = cached.clone();
        rehydrated.from_cache = false;
        assert_eq!(fresh, rehydrated);
    }

    #[tokio::test]
    async fn test_anomaly_report_scenario() {
        // A 2-month-old with ~600 minutes of sleep in 24h against 900
        // expected: one high-severity sleep deficit
        let (db, baby_id) = setup(TWO_MONTHS_DAYS);
        let base = Utc::now()
            .date_naive()
            .and_hms_opt(2, 0, 0)
            .unwrap()
            .and_utc();
        for i in 0..6 {
            let start = base + ChronoDuration::hours(3 * i);
            db.insert_sleep_session(
                baby_id,
                &NewSleepSession {
                    start_time: start,
                    end_time: start + ChronoDuration::minutes(100),
                    kind: SleepKind::Nap,
                    notes: None,
                },
            )
            .unwrap();
        }
        let engine = InsightEngine::from_database(db);

        let report = engine.anomaly_report(baby_id, CALLER).await.unwrap();
        let deficit = report
            .anomalies
            .iter()
            .find(|a| a.title == "Sleep deficit")
            .expect("sleep deficit detected");
        assert_eq!(deficit.severity, crate::insights::AnomalySeverity::High);
        assert_eq!(deficit.observed_value, "10 hours/day");
        assert_eq!(deficit.expected_value, "15 hours/day");
        assert!(!report.narrative.text.is_empty());
    }

    #[tokio::test]
    async fn test_sleep_pattern_prediction_boosted_by_ai() {
        let (db, baby_id) = setup(100);
        // Anchor to the start of today so the sessions always land inside
        // the daily window regardless of when the test runs
        let midnight = Utc::now().date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc();
        for i in 0..3 {
            let start = midnight + ChronoDuration::hours(2 * i);
            db.insert_sleep_session(
                baby_id,
                &NewSleepSession {
                    start_time: start,
                    end_time: start + ChronoDuration::minutes(60),
                    kind: SleepKind::Nap,
                    notes: None,
                },
            )
            .unwrap();
        }

        let without_ai = InsightEngine::from_database(db.clone());
        let plain = without_ai.sleep_pattern(baby_id, CALLER).await.unwrap();
        let plain_prediction = plain.prediction.expect("prediction");
        assert!(!plain.narrative.generated);
        assert_eq!(plain_prediction.sample_count, 2);
        assert_eq!(plain_prediction.basis_window_minutes, 60.0);

        let with_ai = InsightEngine::from_database(db).with_ai(AIClient::mock());
        let boosted = with_ai.sleep_pattern(baby_id, CALLER).await.unwrap();
        let boosted_prediction = boosted.prediction.expect("prediction");
        assert!(boosted.narrative.generated);
        assert!(boosted_prediction.confidence > plain_prediction.confidence);
    }
}
