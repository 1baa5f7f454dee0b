//! Rule-based anomaly detection
//!
//! Pure function over aggregated inputs; no I/O. Each rule is evaluated
//! independently, so a single run can surface zero to many anomalies, and
//! the detector is deterministic and idempotent for identical inputs.
//! Recommendations are fixed per rule, never generated dynamically.
//!
//! Rules only fire for categories that have at least some logged data in
//! the window; an unlogged category is insufficient data, not a deficit.

use crate::tables::ReferenceTables;

use super::types::{
    AnomalySeverity, Category, DetectedAnomaly, DiaperSummary, FeedingSummary, SleepSummary,
};

/// Sleep deficit percentage that escalates to high severity
const SLEEP_DEFICIT_HIGH_PCT: f64 = 30.0;
/// Sleep deficit percentage that reaches medium severity
const SLEEP_DEFICIT_MEDIUM_PCT: f64 = 15.0;

/// Longest observed wake window vs. recommended, medium severity
const WAKE_WINDOW_MEDIUM_FACTOR: f64 = 1.5;
/// Longest observed wake window vs. recommended, high severity
const WAKE_WINDOW_HIGH_FACTOR: f64 = 2.25;

/// Feeding deficit percentage that escalates to high severity
const FEEDING_DEFICIT_HIGH_PCT: f64 = 40.0;
/// Feeding deficit percentage that reaches medium severity
const FEEDING_DEFICIT_MEDIUM_PCT: f64 = 25.0;

/// Wet-diaper rate below this fraction of expected is high severity
const HYDRATION_HIGH_FRACTION: f64 = 0.5;
/// Wet-diaper rate below this fraction of expected is medium severity
const HYDRATION_MEDIUM_FRACTION: f64 = 0.7;

/// Detect anomalies across the aggregated sleep, feeding, and diaper
/// summaries for a window of `window_hours` hours
pub fn detect(
    sleep: &SleepSummary,
    feeding: &FeedingSummary,
    diaper: &DiaperSummary,
    age_months: u32,
    window_hours: f64,
    tables: &ReferenceTables,
) -> Vec<DetectedAnomaly> {
    let mut anomalies = Vec::new();

    if let Some(anomaly) = sleep_deficit(sleep, age_months, tables) {
        anomalies.push(anomaly);
    }
    if let Some(anomaly) = extended_wake_window(sleep, age_months, tables) {
        anomalies.push(anomaly);
    }
    if let Some(anomaly) = feeding_deficit(feeding, age_months, tables) {
        anomalies.push(anomaly);
    }
    if let Some(anomaly) = long_feeding_gap(feeding, age_months) {
        anomalies.push(anomaly);
    }
    if let Some(anomaly) = low_hydration(diaper, age_months, tables) {
        anomalies.push(anomaly);
    }
    if let Some(anomaly) = absent_stooling(diaper, age_months, window_hours) {
        anomalies.push(anomaly);
    }

    anomalies
}

fn hours_per_day(minutes: f64) -> String {
    format!("{:.0} hours/day", minutes / 60.0)
}

fn sleep_deficit(
    sleep: &SleepSummary,
    age_months: u32,
    tables: &ReferenceTables,
) -> Option<DetectedAnomaly> {
    if sleep.session_count == 0 {
        return None;
    }
    let expected = tables.expected_daily_sleep_minutes(age_months) as f64;
    let actual = sleep.daily_average_minutes;
    let deficit_pct = (expected - actual) / expected * 100.0;

    let severity = if deficit_pct > SLEEP_DEFICIT_HIGH_PCT {
        AnomalySeverity::High
    } else if deficit_pct > SLEEP_DEFICIT_MEDIUM_PCT {
        AnomalySeverity::Medium
    } else {
        return None;
    };

    Some(DetectedAnomaly {
        category: Category::Sleep,
        severity,
        title: "Sleep deficit".to_string(),
        description: format!(
            "Daily sleep is {:.0}% below the typical range for {} months",
            deficit_pct, age_months
        ),
        observed_value: hours_per_day(actual),
        expected_value: hours_per_day(expected),
        recommendation:
            "Try moving bedtime earlier and protecting nap times; talk to your pediatrician if \
             low sleep persists for several days."
                .to_string(),
    })
}

fn extended_wake_window(
    sleep: &SleepSummary,
    age_months: u32,
    tables: &ReferenceTables,
) -> Option<DetectedAnomaly> {
    // A defaulted stat means no wake window was actually observed
    if sleep.wake_windows.from_age_default {
        return None;
    }
    let recommended = tables.recommended_wake_window_minutes(age_months) as f64;
    let observed = sleep.wake_windows.max_minutes as f64;

    let severity = if observed >= recommended * WAKE_WINDOW_HIGH_FACTOR {
        AnomalySeverity::High
    } else if observed >= recommended * WAKE_WINDOW_MEDIUM_FACTOR {
        AnomalySeverity::Medium
    } else {
        return None;
    };

    Some(DetectedAnomaly {
        category: Category::Sleep,
        severity,
        title: "Extended wake window".to_string(),
        description: format!(
            "Longest wake window of {:.0} minutes is well beyond the {:.0} minutes typical at \
             {} months",
            observed, recommended, age_months
        ),
        observed_value: format!("{:.0} minutes", observed),
        expected_value: format!("up to {:.0} minutes", recommended),
        recommendation:
            "Watch for sleepy cues and offer a nap sooner; overtired babies often fight sleep \
             harder."
                .to_string(),
    })
}

fn feeding_deficit(
    feeding: &FeedingSummary,
    age_months: u32,
    tables: &ReferenceTables,
) -> Option<DetectedAnomaly> {
    if feeding.total_count == 0 {
        return None;
    }
    let expected = tables.expected_feedings_per_day(age_months);
    let actual = feeding.feedings_per_day;
    let deficit_pct = (expected - actual) / expected * 100.0;

    let severity = if deficit_pct > FEEDING_DEFICIT_HIGH_PCT {
        AnomalySeverity::High
    } else if deficit_pct > FEEDING_DEFICIT_MEDIUM_PCT {
        AnomalySeverity::Medium
    } else {
        return None;
    };

    Some(DetectedAnomaly {
        category: Category::Feeding,
        severity,
        title: "Fewer feedings than expected".to_string(),
        description: format!(
            "{:.1} feedings/day is {:.0}% below the typical {:.0}/day at {} months",
            actual, deficit_pct, expected, age_months
        ),
        observed_value: format!("{:.1} feedings/day", actual),
        expected_value: format!("{:.0} feedings/day", expected),
        recommendation:
            "Offer feeds more frequently and check that all feedings are being logged; contact \
             your pediatrician if intake seems genuinely low."
                .to_string(),
    })
}

fn long_feeding_gap(feeding: &FeedingSummary, age_months: u32) -> Option<DetectedAnomaly> {
    let gap_minutes = feeding.longest_gap_minutes?;
    // Newborns should not go more than 6 hours between feeds; older babies 8
    let threshold_hours: i64 = if age_months < 6 { 6 } else { 8 };
    if gap_minutes <= threshold_hours * 60 {
        return None;
    }

    let severity = if age_months < 3 {
        AnomalySeverity::High
    } else {
        AnomalySeverity::Medium
    };

    Some(DetectedAnomaly {
        category: Category::Feeding,
        severity,
        title: "Long gap between feedings".to_string(),
        description: format!(
            "Longest gap between feedings was {:.1} hours",
            gap_minutes as f64 / 60.0
        ),
        observed_value: format!("{:.1} hours", gap_minutes as f64 / 60.0),
        expected_value: format!("under {} hours", threshold_hours),
        recommendation:
            "Young babies may need to be woken for feeds; discuss long stretches with your \
             pediatrician."
                .to_string(),
    })
}

fn low_hydration(
    diaper: &DiaperSummary,
    age_months: u32,
    tables: &ReferenceTables,
) -> Option<DetectedAnomaly> {
    if diaper.total_count == 0 {
        return None;
    }
    let expected = tables.expected_wet_diapers_per_day(age_months);
    let actual = diaper.wet_per_day;

    let severity = if actual < expected * HYDRATION_HIGH_FRACTION {
        AnomalySeverity::High
    } else if actual < expected * HYDRATION_MEDIUM_FRACTION {
        AnomalySeverity::Medium
    } else {
        return None;
    };

    Some(DetectedAnomaly {
        category: Category::Diaper,
        severity,
        title: "Few wet diapers".to_string(),
        description: format!(
            "{:.1} wet diapers/day is below the {:.0}/day minimum expected at {} months",
            actual, expected, age_months
        ),
        observed_value: format!("{:.1} wet diapers/day", actual),
        expected_value: format!("at least {:.0} wet diapers/day", expected),
        recommendation:
            "Low urine output can signal dehydration; offer feeds and contact your pediatrician \
             promptly if it continues."
                .to_string(),
    })
}

fn absent_stooling(
    diaper: &DiaperSummary,
    age_months: u32,
    window_hours: f64,
) -> Option<DetectedAnomaly> {
    if diaper.total_count == 0 || age_months >= 2 || window_hours < 24.0 {
        return None;
    }
    if diaper.dirty_count + diaper.mixed_count > 0 {
        return None;
    }

    Some(DetectedAnomaly {
        category: Category::Diaper,
        severity: AnomalySeverity::Low,
        title: "No dirty diapers recorded".to_string(),
        description: format!(
            "No dirty diapers over {:.0} hours; frequent stooling is typical in the first weeks",
            window_hours
        ),
        observed_value: "0 dirty diapers".to_string(),
        expected_value: "at least 1 dirty diaper/day".to_string(),
        recommendation:
            "Keep an eye on stooling for the next day and mention it at your next checkup if it \
             does not resume."
                .to_string(),
    })
}
