//! Sprout CLI - Baby tracking insights engine
//!
//! Usage:
//!   sprout baby add "Nora" --dob 2026-01-15   Create a profile
//!   sprout log sleep 1 --start ... --end ...  Log events
//!   sprout insights 1 --period weekly         Show the insight report
//!   sprout serve --port 3000                  Start the web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db_path = commands::resolve_db_path(cli.db.as_deref())?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            no_cache,
        } => commands::cmd_serve(&db_path, &host, port, no_cache).await,
        Commands::Baby { action } => match action {
            BabyAction::Add { name, dob, gender } => {
                commands::cmd_baby_add(&db_path, &name, &dob, &gender)
            }
            BabyAction::List => commands::cmd_baby_list(&db_path),
        },
        Commands::Log { event } => match event {
            LogEvent::Sleep {
                baby_id,
                start,
                end,
                kind,
            } => commands::cmd_log_sleep(&db_path, baby_id, &start, &end, &kind),
            LogEvent::Feeding {
                baby_id,
                at,
                kind,
                amount_ml,
                duration,
            } => commands::cmd_log_feeding(&db_path, baby_id, at.as_deref(), &kind, amount_ml, duration),
            LogEvent::Diaper { baby_id, at, kind } => {
                commands::cmd_log_diaper(&db_path, baby_id, at.as_deref(), &kind)
            }
            LogEvent::Growth {
                baby_id,
                at,
                weight_g,
                height_mm,
                head_mm,
            } => commands::cmd_log_growth(&db_path, baby_id, at.as_deref(), weight_g, height_mm, head_mm),
            LogEvent::Activity {
                baby_id,
                at,
                kind,
                duration,
            } => commands::cmd_log_activity(&db_path, baby_id, at.as_deref(), &kind, duration),
        },
        Commands::Insights {
            baby_id,
            period,
            json,
        } => commands::cmd_insights(&db_path, baby_id, &period, json).await,
        Commands::Anomalies { baby_id } => commands::cmd_anomalies(&db_path, baby_id).await,
        Commands::Predict { baby_id } => commands::cmd_predict(&db_path, baby_id).await,
        Commands::Status => commands::cmd_status(&db_path),
    }
}
