//! Domain models shared across the workspace
//!
//! Events are immutable once created; edits are modeled as soft delete plus
//! re-insert. The insights engine only ever reads non-deleted events.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Baby gender as recorded in the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    Unspecified,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "female" => Ok(Gender::Female),
            "male" => Ok(Gender::Male),
            "unspecified" => Ok(Gender::Unspecified),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// A tracked baby profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baby {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
}

impl Baby {
    /// Whole months elapsed since birth as of the given date
    ///
    /// Clamped to 0 for dates before the birth date (pre-due-date logging).
    pub fn age_in_months(&self, as_of: NaiveDate) -> u32 {
        if as_of <= self.date_of_birth {
            return 0;
        }
        let years = as_of.year() - self.date_of_birth.year();
        let months = as_of.month() as i32 - self.date_of_birth.month() as i32;
        let mut total = years * 12 + months;
        if as_of.day() < self.date_of_birth.day() {
            total -= 1;
        }
        total.max(0) as u32
    }
}

/// New baby profile for insertion
#[derive(Debug, Clone, Deserialize)]
pub struct NewBaby {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
}

/// Sleep session kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepKind {
    Nap,
    Night,
}

impl SleepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SleepKind::Nap => "nap",
            SleepKind::Night => "night",
        }
    }
}

impl fmt::Display for SleepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SleepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nap" => Ok(SleepKind::Nap),
            "night" => Ok(SleepKind::Night),
            _ => Err(format!("Unknown sleep kind: {}", s)),
        }
    }
}

/// A completed sleep session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSession {
    pub id: i64,
    pub baby_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub kind: SleepKind,
    pub notes: Option<String>,
}

impl SleepSession {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes().max(0)
    }
}

/// New sleep session for insertion
#[derive(Debug, Clone, Deserialize)]
pub struct NewSleepSession {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub kind: SleepKind,
    pub notes: Option<String>,
}

/// Feeding kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingKind {
    Breast,
    Bottle,
    Solid,
}

impl FeedingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedingKind::Breast => "breast",
            FeedingKind::Bottle => "bottle",
            FeedingKind::Solid => "solid",
        }
    }
}

impl fmt::Display for FeedingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeedingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breast" => Ok(FeedingKind::Breast),
            "bottle" => Ok(FeedingKind::Bottle),
            "solid" => Ok(FeedingKind::Solid),
            _ => Err(format!("Unknown feeding kind: {}", s)),
        }
    }
}

/// A feeding event
///
/// `amount_ml` applies to bottle feedings, `duration_minutes` to breast
/// feedings; both are optional because trackers frequently log partial data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feeding {
    pub id: i64,
    pub baby_id: i64,
    pub timestamp: DateTime<Utc>,
    pub kind: FeedingKind,
    pub amount_ml: Option<f64>,
    pub duration_minutes: Option<i64>,
}

/// New feeding event for insertion
#[derive(Debug, Clone, Deserialize)]
pub struct NewFeeding {
    pub timestamp: DateTime<Utc>,
    pub kind: FeedingKind,
    pub amount_ml: Option<f64>,
    pub duration_minutes: Option<i64>,
}

/// Diaper change kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiaperKind {
    Wet,
    Dirty,
    Mixed,
}

impl DiaperKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiaperKind::Wet => "wet",
            DiaperKind::Dirty => "dirty",
            DiaperKind::Mixed => "mixed",
        }
    }
}

impl fmt::Display for DiaperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DiaperKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wet" => Ok(DiaperKind::Wet),
            "dirty" => Ok(DiaperKind::Dirty),
            "mixed" => Ok(DiaperKind::Mixed),
            _ => Err(format!("Unknown diaper kind: {}", s)),
        }
    }
}

/// A diaper change event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaperChange {
    pub id: i64,
    pub baby_id: i64,
    pub timestamp: DateTime<Utc>,
    pub kind: DiaperKind,
}

/// New diaper change for insertion
#[derive(Debug, Clone, Deserialize)]
pub struct NewDiaperChange {
    pub timestamp: DateTime<Utc>,
    pub kind: DiaperKind,
}

/// A growth measurement
///
/// Stored in base metric subunits (grams, millimeters); converted only at
/// presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthMeasurement {
    pub id: i64,
    pub baby_id: i64,
    pub timestamp: DateTime<Utc>,
    pub weight_grams: Option<i64>,
    pub height_mm: Option<i64>,
    pub head_circumference_mm: Option<i64>,
}

/// New growth measurement for insertion
#[derive(Debug, Clone, Deserialize)]
pub struct NewGrowthMeasurement {
    pub timestamp: DateTime<Utc>,
    pub weight_grams: Option<i64>,
    pub height_mm: Option<i64>,
    pub head_circumference_mm: Option<i64>,
}

/// An activity event (tummy time, bath, outdoor walk, ...)
///
/// `activity_type` is free text at ingestion; the activity aggregator
/// normalizes case and separator variants when grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub baby_id: i64,
    pub timestamp: DateTime<Utc>,
    pub activity_type: String,
    pub duration_minutes: i64,
}

/// New activity event for insertion
#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    pub timestamp: DateTime<Utc>,
    pub activity_type: String,
    pub duration_minutes: i64,
}

/// Granularity at which trend insights are requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }

    /// Length of the period window in days
    pub fn days(&self) -> i64 {
        match self {
            Period::Daily => 1,
            Period::Weekly => 7,
            Period::Monthly => 30,
            Period::Yearly => 365,
        }
    }

    /// Whether a previous-period comparison is computed for this period
    ///
    /// Yearly windows skip comparison: a year-over-year delta is too coarse
    /// to be informative for an infant.
    pub fn compares_previous(&self) -> bool {
        !matches!(self, Period::Yearly)
    }

    /// Cache TTL, reflecting how quickly the underlying data is expected
    /// to change materially
    pub fn cache_ttl_seconds(&self) -> u64 {
        match self {
            Period::Daily => 15 * 60,
            Period::Weekly => 60 * 60,
            Period::Monthly => 120 * 60,
            Period::Yearly => 240 * 60,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "yearly" => Ok(Period::Yearly),
            _ => Err(format!("Unknown period: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baby(dob: &str) -> Baby {
        Baby {
            id: 1,
            name: "Nora".to_string(),
            date_of_birth: NaiveDate::parse_from_str(dob, "%Y-%m-%d").unwrap(),
            gender: Gender::Female,
        }
    }

    #[test]
    fn test_age_in_months() {
        let b = baby("2026-01-15");
        let d = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();

        assert_eq!(b.age_in_months(d("2026-01-20")), 0);
        assert_eq!(b.age_in_months(d("2026-02-14")), 0);
        assert_eq!(b.age_in_months(d("2026-02-15")), 1);
        assert_eq!(b.age_in_months(d("2026-07-20")), 6);
        assert_eq!(b.age_in_months(d("2028-01-15")), 24);
        // Before birth clamps to zero
        assert_eq!(b.age_in_months(d("2025-12-01")), 0);
    }

    #[test]
    fn test_period_round_trip() {
        for period in [Period::Daily, Period::Weekly, Period::Monthly, Period::Yearly] {
            assert_eq!(period.as_str().parse::<Period>().unwrap(), period);
        }
        assert!("hourly".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_ttl_ordering() {
        assert!(Period::Daily.cache_ttl_seconds() < Period::Weekly.cache_ttl_seconds());
        assert!(Period::Weekly.cache_ttl_seconds() < Period::Monthly.cache_ttl_seconds());
        assert!(Period::Monthly.cache_ttl_seconds() < Period::Yearly.cache_ttl_seconds());
    }

    #[test]
    fn test_sleep_duration_never_negative() {
        let start = Utc::now();
        let session = SleepSession {
            id: 1,
            baby_id: 1,
            start_time: start,
            end_time: start - chrono::Duration::minutes(10),
            kind: SleepKind::Nap,
            notes: None,
        };
        assert_eq!(session.duration_minutes(), 0);
    }
}
