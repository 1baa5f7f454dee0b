//! Insight report, anomaly, and prediction commands

use std::path::Path;

use anyhow::Result;

use sprout_core::{AIClient, InsightEngine, InsightReport, Period};

use super::{open_db, LOCAL_CALLER};

fn build_engine(db_path: &Path) -> Result<InsightEngine> {
    let db = open_db(db_path)?;
    let mut engine = InsightEngine::from_database(db);
    if let Some(ai) = AIClient::from_env() {
        engine = engine.with_ai(ai);
    }
    Ok(engine)
}

/// Show the insight report for a baby
pub async fn cmd_insights(db_path: &Path, baby_id: i64, period: &str, json: bool) -> Result<()> {
    let period: Period = period.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let engine = build_engine(db_path)?;

    let report = engine.report(baby_id, LOCAL_CALLER, period, None).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    render_report(&report);
    Ok(())
}

fn render_report(report: &InsightReport) {
    println!(
        "Insights for {} ({} months) - {} {} to {}",
        report.baby_name,
        report.age_months,
        report.period,
        report.period_start.format("%Y-%m-%d"),
        report.period_end.format("%Y-%m-%d"),
    );
    println!();
    println!(
        "Sleep     {:>6.1} h total  {:>2} sessions ({} naps)  consistency {:>3.0}/100",
        report.sleep.total_minutes as f64 / 60.0,
        report.sleep.session_count,
        report.sleep.nap_count,
        report.sleep.consistency_score,
    );
    println!(
        "Feeding   {:>6} feeds   {:>5.1}/day  consistency {:>3.0}/100",
        report.feeding.total_count, report.feeding.feedings_per_day, report.feeding.consistency_score,
    );
    println!(
        "Diapers   {:>6} changes {:>5.1} wet/day",
        report.diaper.total_count, report.diaper.wet_per_day,
    );
    println!(
        "Activity  {:>6} min     {:>2} sessions",
        report.activity.total_minutes, report.activity.session_count,
    );

    if !report.anomalies.is_empty() {
        println!();
        println!("Flags:");
        for anomaly in &report.anomalies {
            println!(
                "  [{}] {}: observed {}, expected {}",
                anomaly.severity, anomaly.title, anomaly.observed_value, anomaly.expected_value
            );
        }
    }

    if !report.highlights.is_empty() {
        println!();
        println!("Highlights:");
        for item in &report.highlights {
            println!("  + {}", item.title);
        }
    }

    if !report.concerns.is_empty() {
        println!();
        println!("Concerns:");
        for item in &report.concerns {
            println!("  - {}", item.title);
        }
    }

    println!();
    println!("{}", report.narrative);
    if !report.ai_generated {
        println!("(deterministic summary; AI narrative unavailable)");
    }
}

/// Run anomaly detection over the last day
pub async fn cmd_anomalies(db_path: &Path, baby_id: i64) -> Result<()> {
    let engine = build_engine(db_path)?;
    let report = engine.anomaly_report(baby_id, LOCAL_CALLER).await?;

    if report.anomalies.is_empty() {
        println!("No anomalies detected over the last day.");
    } else {
        for anomaly in &report.anomalies {
            println!(
                "[{}] {} - {}\n    observed {}, expected {}\n    {}",
                anomaly.severity,
                anomaly.title,
                anomaly.description,
                anomaly.observed_value,
                anomaly.expected_value,
                anomaly.recommendation,
            );
        }
    }

    println!();
    println!("{}", report.narrative.text);
    Ok(())
}

/// Predict the next sleep
pub async fn cmd_predict(db_path: &Path, baby_id: i64) -> Result<()> {
    let engine = build_engine(db_path)?;
    let report = engine.sleep_pattern(baby_id, LOCAL_CALLER).await?;

    match report.prediction {
        Some(prediction) => {
            println!(
                "Next sleep around {} (confidence {:.0}%, based on {} wake windows of ~{:.0} min)",
                prediction.predicted_time.format("%H:%M UTC"),
                prediction.confidence * 100.0,
                prediction.sample_count,
                prediction.basis_window_minutes,
            );
        }
        None => println!("No sleep logged in the last day; nothing to predict from."),
    }

    println!();
    println!("{}", report.narrative.text);
    Ok(())
}
