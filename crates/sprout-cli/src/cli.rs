//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sprout - Baby tracking with an insights engine
#[derive(Parser)]
#[command(name = "sprout")]
#[command(about = "Self-hosted baby tracking insights engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable the in-memory insight report cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Manage baby profiles
    Baby {
        #[command(subcommand)]
        action: BabyAction,
    },

    /// Log a tracked event
    Log {
        #[command(subcommand)]
        event: LogEvent,
    },

    /// Show the insight report for a baby
    Insights {
        /// Baby id
        baby_id: i64,

        /// Report period: daily, weekly, monthly, yearly
        #[arg(short, long, default_value = "weekly")]
        period: String,

        /// Print the raw JSON report instead of the rendered view
        #[arg(long)]
        json: bool,
    },

    /// Run anomaly detection over the last day
    Anomalies {
        /// Baby id
        baby_id: i64,
    },

    /// Predict the next sleep from recent wake windows
    Predict {
        /// Baby id
        baby_id: i64,
    },

    /// Show database status and event counts
    Status,
}

#[derive(Subcommand)]
pub enum BabyAction {
    /// Add a baby profile
    Add {
        /// Baby name
        name: String,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: String,

        /// Gender: female, male, unspecified
        #[arg(long, default_value = "unspecified")]
        gender: String,
    },

    /// List baby profiles
    List,
}

#[derive(Subcommand)]
pub enum LogEvent {
    /// Log a sleep session
    Sleep {
        /// Baby id
        baby_id: i64,

        /// Start time (RFC 3339, e.g. 2026-05-10T09:00:00Z)
        #[arg(long)]
        start: String,

        /// End time (RFC 3339)
        #[arg(long)]
        end: String,

        /// Session kind: nap or night
        #[arg(long, default_value = "nap")]
        kind: String,
    },

    /// Log a feeding
    Feeding {
        /// Baby id
        baby_id: i64,

        /// Timestamp (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,

        /// Feeding kind: breast, bottle, solid
        #[arg(long)]
        kind: String,

        /// Bottle amount in milliliters
        #[arg(long)]
        amount_ml: Option<f64>,

        /// Breastfeeding duration in minutes
        #[arg(long)]
        duration: Option<i64>,
    },

    /// Log a diaper change
    Diaper {
        /// Baby id
        baby_id: i64,

        /// Timestamp (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,

        /// Diaper kind: wet, dirty, mixed
        #[arg(long)]
        kind: String,
    },

    /// Log a growth measurement
    Growth {
        /// Baby id
        baby_id: i64,

        /// Timestamp (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,

        /// Weight in grams
        #[arg(long)]
        weight_g: Option<i64>,

        /// Height in millimeters
        #[arg(long)]
        height_mm: Option<i64>,

        /// Head circumference in millimeters
        #[arg(long)]
        head_mm: Option<i64>,
    },

    /// Log an activity
    Activity {
        /// Baby id
        baby_id: i64,

        /// Timestamp (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,

        /// Activity type (e.g. "tummy time")
        #[arg(long)]
        kind: String,

        /// Duration in minutes
        #[arg(long)]
        duration: i64,
    },
}
