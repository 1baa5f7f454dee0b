//! Age-banded reference tables
//!
//! Expected values for sleep, wake windows, feedings, and diapers, keyed by
//! age in months. Kept as immutable ordered step tables on an injectable
//! struct so tests and locale overrides can swap them without touching the
//! detector or analyzer code.

/// Ordered `(min_age_months, value)` step table. Lookup returns the value of
/// the last band whose minimum age is not greater than the requested age.
type StepTable<T> = Vec<(u32, T)>;

fn lookup<T: Copy>(table: &[(u32, T)], age_months: u32) -> T {
    let mut value = table[0].1;
    for &(min_age, v) in table {
        if age_months >= min_age {
            value = v;
        } else {
            break;
        }
    }
    value
}

/// Age-banded expected values used by the pattern analyzer, the anomaly
/// detector, and trend synthesis
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    /// Recommended wake window in minutes
    wake_window_minutes: StepTable<i64>,
    /// Expected total daily sleep in minutes
    daily_sleep_minutes: StepTable<i64>,
    /// Expected feedings per day
    feedings_per_day: StepTable<f64>,
    /// Expected minimum wet diapers per day
    wet_diapers_per_day: StepTable<f64>,
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self {
            wake_window_minutes: vec![
                (0, 45),
                (1, 60),
                (2, 75),
                (3, 90),
                (4, 105),
                (6, 135),
                (9, 180),
                (12, 240),
                (18, 300),
                (24, 360),
            ],
            // 16 hours under 1 month tapering to 12 hours at 24+ months
            daily_sleep_minutes: vec![
                (0, 960),
                (1, 930),
                (2, 900),
                (4, 870),
                (6, 840),
                (9, 810),
                (12, 780),
                (18, 750),
                (24, 720),
            ],
            feedings_per_day: vec![
                (0, 10.0),
                (1, 9.0),
                (2, 8.0),
                (4, 7.0),
                (6, 6.0),
                (9, 5.0),
                (12, 4.0),
                (24, 3.0),
            ],
            wet_diapers_per_day: vec![(0, 6.0), (4, 5.0), (12, 4.0)],
        }
    }
}

impl ReferenceTables {
    /// Recommended wake window for the age, in minutes
    pub fn recommended_wake_window_minutes(&self, age_months: u32) -> i64 {
        lookup(&self.wake_window_minutes, age_months)
    }

    /// Expected total daily sleep for the age, in minutes
    pub fn expected_daily_sleep_minutes(&self, age_months: u32) -> i64 {
        lookup(&self.daily_sleep_minutes, age_months)
    }

    /// Expected feedings per day for the age
    pub fn expected_feedings_per_day(&self, age_months: u32) -> f64 {
        lookup(&self.feedings_per_day, age_months)
    }

    /// Expected minimum wet diapers per day for the age
    pub fn expected_wet_diapers_per_day(&self, age_months: u32) -> f64 {
        lookup(&self.wet_diapers_per_day, age_months)
    }

    /// Replace the wake window table (tests, locale overrides)
    pub fn with_wake_windows(mut self, table: Vec<(u32, i64)>) -> Self {
        assert!(!table.is_empty(), "step table must not be empty");
        self.wake_window_minutes = table;
        self
    }

    /// Replace the daily sleep table
    pub fn with_daily_sleep(mut self, table: Vec<(u32, i64)>) -> Self {
        assert!(!table.is_empty(), "step table must not be empty");
        self.daily_sleep_minutes = table;
        self
    }
}
