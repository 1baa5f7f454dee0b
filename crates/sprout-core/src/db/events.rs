//! Event table operations
//!
//! All range queries are inclusive on both ends, skip soft-deleted rows, and
//! return rows ordered by the category's natural timestamp so order-sensitive
//! statistics (wake windows, feeding gaps) can be computed directly.

use chrono::{DateTime, Utc};
use rusqlite::params;
use std::str::FromStr;

use super::{parse_utc, Database};
use crate::error::{Error, Result};
use crate::models::{
    Activity, DiaperChange, DiaperKind, Feeding, FeedingKind, GrowthMeasurement, NewActivity,
    NewDiaperChange, NewFeeding, NewGrowthMeasurement, NewSleepSession, SleepKind, SleepSession,
};

/// Per-category event counts for a baby (status display)
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct EventCounts {
    pub sleep: i64,
    pub feeding: i64,
    pub diaper: i64,
    pub growth: i64,
    pub activity: i64,
}

impl Database {
    /// Insert a sleep session and return its id
    pub fn insert_sleep_session(&self, baby_id: i64, session: &NewSleepSession) -> Result<i64> {
        if session.end_time < session.start_time {
            return Err(Error::InvalidData(
                "sleep session end precedes start".to_string(),
            ));
        }
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sleep_sessions (baby_id, start_time, end_time, kind, notes)
             VALUES (?, ?, ?, ?, ?)",
            params![
                baby_id,
                session.start_time.to_rfc3339(),
                session.end_time.to_rfc3339(),
                session.kind.as_str(),
                session.notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a feeding event and return its id
    pub fn insert_feeding(&self, baby_id: i64, feeding: &NewFeeding) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO feedings (baby_id, timestamp, kind, amount_ml, duration_minutes)
             VALUES (?, ?, ?, ?, ?)",
            params![
                baby_id,
                feeding.timestamp.to_rfc3339(),
                feeding.kind.as_str(),
                feeding.amount_ml,
                feeding.duration_minutes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a diaper change and return its id
    pub fn insert_diaper_change(&self, baby_id: i64, change: &NewDiaperChange) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO diaper_changes (baby_id, timestamp, kind) VALUES (?, ?, ?)",
            params![baby_id, change.timestamp.to_rfc3339(), change.kind.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a growth measurement and return its id
    pub fn insert_growth_measurement(
        &self,
        baby_id: i64,
        measurement: &NewGrowthMeasurement,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO growth_measurements
                 (baby_id, timestamp, weight_grams, height_mm, head_circumference_mm)
             VALUES (?, ?, ?, ?, ?)",
            params![
                baby_id,
                measurement.timestamp.to_rfc3339(),
                measurement.weight_grams,
                measurement.height_mm,
                measurement.head_circumference_mm,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert an activity event and return its id
    pub fn insert_activity(&self, baby_id: i64, activity: &NewActivity) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO activities (baby_id, timestamp, activity_type, duration_minutes)
             VALUES (?, ?, ?, ?)",
            params![
                baby_id,
                activity.timestamp.to_rfc3339(),
                activity.activity_type,
                activity.duration_minutes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Soft-delete an event row in the given table
    ///
    /// Returns true if a row was marked deleted.
    pub fn soft_delete_event(&self, table: &str, event_id: i64) -> Result<bool> {
        let table = match table {
            "sleep" => "sleep_sessions",
            "feeding" => "feedings",
            "diaper" => "diaper_changes",
            "growth" => "growth_measurements",
            "activity" => "activities",
            other => {
                return Err(Error::InvalidData(format!(
                    "unknown event category: {}",
                    other
                )))
            }
        };
        let conn = self.conn()?;
        let changed = conn.execute(
            &format!("UPDATE {} SET deleted = 1 WHERE id = ? AND deleted = 0", table),
            params![event_id],
        )?;
        Ok(changed > 0)
    }

    /// Sleep sessions starting within `[start, end]`, ordered by start time
    pub fn sleep_sessions_between(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SleepSession>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, baby_id, start_time, end_time, kind, notes
             FROM sleep_sessions
             WHERE baby_id = ? AND deleted = 0 AND start_time >= ? AND start_time <= ?
             ORDER BY start_time",
        )?;
        let rows = stmt.query_map(
            params![baby_id, start.to_rfc3339(), end.to_rfc3339()],
            |row| {
                let start_time: String = row.get(2)?;
                let end_time: String = row.get(3)?;
                let kind: String = row.get(4)?;
                Ok(SleepSession {
                    id: row.get(0)?,
                    baby_id: row.get(1)?,
                    start_time: parse_utc(2, start_time)?,
                    end_time: parse_utc(3, end_time)?,
                    kind: SleepKind::from_str(&kind).unwrap_or(SleepKind::Nap),
                    notes: row.get(5)?,
                })
            },
        )?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Feedings within `[start, end]`, ordered by timestamp
    pub fn feedings_between(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Feeding>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, baby_id, timestamp, kind, amount_ml, duration_minutes
             FROM feedings
             WHERE baby_id = ? AND deleted = 0 AND timestamp >= ? AND timestamp <= ?
             ORDER BY timestamp",
        )?;
        let rows = stmt.query_map(
            params![baby_id, start.to_rfc3339(), end.to_rfc3339()],
            |row| {
                let timestamp: String = row.get(2)?;
                let kind: String = row.get(3)?;
                Ok(Feeding {
                    id: row.get(0)?,
                    baby_id: row.get(1)?,
                    timestamp: parse_utc(2, timestamp)?,
                    kind: FeedingKind::from_str(&kind).unwrap_or(FeedingKind::Bottle),
                    amount_ml: row.get(4)?,
                    duration_minutes: row.get(5)?,
                })
            },
        )?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Diaper changes within `[start, end]`, ordered by timestamp
    pub fn diaper_changes_between(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DiaperChange>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, baby_id, timestamp, kind
             FROM diaper_changes
             WHERE baby_id = ? AND deleted = 0 AND timestamp >= ? AND timestamp <= ?
             ORDER BY timestamp",
        )?;
        let rows = stmt.query_map(
            params![baby_id, start.to_rfc3339(), end.to_rfc3339()],
            |row| {
                let timestamp: String = row.get(2)?;
                let kind: String = row.get(3)?;
                Ok(DiaperChange {
                    id: row.get(0)?,
                    baby_id: row.get(1)?,
                    timestamp: parse_utc(2, timestamp)?,
                    kind: DiaperKind::from_str(&kind).unwrap_or(DiaperKind::Wet),
                })
            },
        )?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Growth measurements within `[start, end]`, ordered by timestamp
    pub fn growth_measurements_between(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<GrowthMeasurement>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, baby_id, timestamp, weight_grams, height_mm, head_circumference_mm
             FROM growth_measurements
             WHERE baby_id = ? AND deleted = 0 AND timestamp >= ? AND timestamp <= ?
             ORDER BY timestamp",
        )?;
        let rows = stmt.query_map(
            params![baby_id, start.to_rfc3339(), end.to_rfc3339()],
            |row| {
                let timestamp: String = row.get(2)?;
                Ok(GrowthMeasurement {
                    id: row.get(0)?,
                    baby_id: row.get(1)?,
                    timestamp: parse_utc(2, timestamp)?,
                    weight_grams: row.get(3)?,
                    height_mm: row.get(4)?,
                    head_circumference_mm: row.get(5)?,
                })
            },
        )?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Activities within `[start, end]`, ordered by timestamp
    pub fn activities_between(
        &self,
        baby_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Activity>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, baby_id, timestamp, activity_type, duration_minutes
             FROM activities
             WHERE baby_id = ? AND deleted = 0 AND timestamp >= ? AND timestamp <= ?
             ORDER BY timestamp",
        )?;
        let rows = stmt.query_map(
            params![baby_id, start.to_rfc3339(), end.to_rfc3339()],
            |row| {
                let timestamp: String = row.get(2)?;
                Ok(Activity {
                    id: row.get(0)?,
                    baby_id: row.get(1)?,
                    timestamp: parse_utc(2, timestamp)?,
                    activity_type: row.get(3)?,
                    duration_minutes: row.get(4)?,
                })
            },
        )?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Total non-deleted event counts per category for a baby
    pub fn event_counts(&self, baby_id: i64) -> Result<EventCounts> {
        let conn = self.conn()?;
        let count = |table: &str| -> Result<i64> {
            conn.query_row(
                &format!(
                    "SELECT COUNT(*) FROM {} WHERE baby_id = ? AND deleted = 0",
                    table
                ),
                params![baby_id],
                |row| row.get(0),
            )
            .map_err(Error::from)
        };
        Ok(EventCounts {
            sleep: count("sleep_sessions")?,
            feeding: count("feedings")?,
            diaper: count("diaper_changes")?,
            growth: count("growth_measurements")?,
            activity: count("activities")?,
        })
    }
}
