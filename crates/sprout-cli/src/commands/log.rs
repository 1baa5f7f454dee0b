//! Event logging commands

use std::path::Path;

use anyhow::{Context, Result};

use sprout_core::models::{
    DiaperKind, FeedingKind, NewActivity, NewDiaperChange, NewFeeding, NewGrowthMeasurement,
    NewSleepSession, SleepKind,
};

use super::{open_db, parse_timestamp};

/// Log a completed sleep session
pub fn cmd_log_sleep(
    db_path: &Path,
    baby_id: i64,
    start: &str,
    end: &str,
    kind: &str,
) -> Result<()> {
    let start_time = parse_timestamp(Some(start))?;
    let end_time = parse_timestamp(Some(end))?;
    let kind: SleepKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let db = open_db(db_path)?;
    let id = db.insert_sleep_session(
        baby_id,
        &NewSleepSession {
            start_time,
            end_time,
            kind,
            notes: None,
        },
    )?;

    let minutes = (end_time - start_time).num_minutes();
    println!("Logged {} sleep of {} minutes (event {})", kind, minutes, id);
    Ok(())
}

/// Log a feeding
pub fn cmd_log_feeding(
    db_path: &Path,
    baby_id: i64,
    at: Option<&str>,
    kind: &str,
    amount_ml: Option<f64>,
    duration_minutes: Option<i64>,
) -> Result<()> {
    let timestamp = parse_timestamp(at)?;
    let kind: FeedingKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let db = open_db(db_path)?;
    let id = db.insert_feeding(
        baby_id,
        &NewFeeding {
            timestamp,
            kind,
            amount_ml,
            duration_minutes,
        },
    )?;

    println!("Logged {} feeding (event {})", kind, id);
    Ok(())
}

/// Log a diaper change
pub fn cmd_log_diaper(db_path: &Path, baby_id: i64, at: Option<&str>, kind: &str) -> Result<()> {
    let timestamp = parse_timestamp(at)?;
    let kind: DiaperKind = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let db = open_db(db_path)?;
    let id = db.insert_diaper_change(baby_id, &NewDiaperChange { timestamp, kind })?;

    println!("Logged {} diaper (event {})", kind, id);
    Ok(())
}

/// Log a growth measurement
pub fn cmd_log_growth(
    db_path: &Path,
    baby_id: i64,
    at: Option<&str>,
    weight_grams: Option<i64>,
    height_mm: Option<i64>,
    head_circumference_mm: Option<i64>,
) -> Result<()> {
    if weight_grams.is_none() && height_mm.is_none() && head_circumference_mm.is_none() {
        anyhow::bail!("Provide at least one of --weight-g, --height-mm, --head-mm");
    }
    let timestamp = parse_timestamp(at)?;

    let db = open_db(db_path)?;
    let id = db.insert_growth_measurement(
        baby_id,
        &NewGrowthMeasurement {
            timestamp,
            weight_grams,
            height_mm,
            head_circumference_mm,
        },
    )?;

    println!("Logged growth measurement (event {})", id);
    Ok(())
}

/// Log an activity
pub fn cmd_log_activity(
    db_path: &Path,
    baby_id: i64,
    at: Option<&str>,
    kind: &str,
    duration_minutes: i64,
) -> Result<()> {
    if duration_minutes < 0 {
        anyhow::bail!("Duration must not be negative");
    }
    let timestamp = parse_timestamp(at)?;

    let db = open_db(db_path)?;
    let id = db
        .insert_activity(
            baby_id,
            &NewActivity {
                timestamp,
                activity_type: kind.to_string(),
                duration_minutes,
            },
        )
        .context("Could not log activity")?;

    println!("Logged {} minutes of {} (event {})", duration_minutes, kind, id);
    Ok(())
}
