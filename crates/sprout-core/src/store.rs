//! External-collaborator seams for the insights engine
//!
//! The engine consumes these traits rather than the concrete database so
//! tests can substitute counting or canned stores, and so the record store,
//! profile directory, and authorization check remain swappable collaborators.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Activity, Baby, DiaperChange, Feeding, GrowthMeasurement, SleepSession};

/// Read-only event queries over an inclusive `[start, end]` window
///
/// Implementations must skip soft-deleted events and return rows ordered by
/// the category's natural timestamp.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn sleep_sessions(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SleepSession>>;

    async fn feedings(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Feeding>>;

    async fn diaper_changes(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DiaperChange>>;

    async fn growth_measurements(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<GrowthMeasurement>>;

    async fn activities(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Activity>>;
}

/// Baby profile lookup
pub trait BabyDirectory: Send + Sync {
    /// Fetch a baby profile; `Error::NotFound` if absent
    fn get_baby(&self, baby_id: i64) -> Result<Baby>;
}

/// Caregiver authorization check
pub trait AccessControl: Send + Sync {
    fn has_access(&self, baby_id: i64, caller_id: &str) -> Result<bool>;
}

#[async_trait]
impl EventStore for Database {
    async fn sleep_sessions(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SleepSession>> {
        self.sleep_sessions_between(baby_id, start, end)
    }

    async fn feedings(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Feeding>> {
        self.feedings_between(baby_id, start, end)
    }

    async fn diaper_changes(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DiaperChange>> {
        self.diaper_changes_between(baby_id, start, end)
    }

    async fn growth_measurements(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<GrowthMeasurement>> {
        self.growth_measurements_between(baby_id, start, end)
    }

    async fn activities(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Activity>> {
        self.activities_between(baby_id, start, end)
    }
}

impl BabyDirectory for Database {
    fn get_baby(&self, baby_id: i64) -> Result<Baby> {
        Database::get_baby(self, baby_id)?
            .ok_or_else(|| Error::NotFound(format!("baby {}", baby_id)))
    }
}

impl AccessControl for Database {
    fn has_access(&self, baby_id: i64, caller_id: &str) -> Result<bool> {
        self.caller_has_access(baby_id, caller_id)
    }
}
