//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `babies` - Baby profile commands (add, list)
//! - `insights` - Insight report, anomaly, and prediction commands
//! - `log` - Event logging commands
//! - `serve` - Web server command
//! - `status` - Database status command

pub mod babies;
pub mod insights;
pub mod log;
pub mod serve;
pub mod status;

// Re-export command functions for main.rs
pub use babies::*;
pub use insights::*;
pub use log::*;
pub use serve::*;
pub use status::*;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use sprout_core::db::Database;

/// Caller id used for everything logged through the local CLI
pub const LOCAL_CALLER: &str = "local";

/// Resolve the database path: explicit flag, or the platform data directory
pub fn resolve_db_path(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    let mut dir = dirs::data_dir().context("Could not determine platform data directory")?;
    dir.push("sprout");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Could not create data directory {}", dir.display()))?;
    dir.push("sprout.db");
    Ok(dir)
}

/// Open the database, creating it if needed
pub fn open_db(path: &Path) -> Result<Database> {
    let path_str = path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).with_context(|| format!("Could not open database at {}", path_str))
}

/// Parse an RFC 3339 timestamp argument, or default to now
pub fn parse_timestamp(arg: Option<&str>) -> Result<DateTime<Utc>> {
    match arg {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("Invalid timestamp '{}' (use RFC 3339)", s)),
        None => Ok(Utc::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        let parsed = parse_timestamp(Some("2026-05-10T09:00:00Z")).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-05-10T09:00:00+00:00");

        assert!(parse_timestamp(Some("yesterday")).is_err());
        assert!(parse_timestamp(None).is_ok());
    }

    #[test]
    fn test_resolve_db_path_prefers_flag() {
        let path = resolve_db_path(Some(Path::new("/tmp/custom.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.db"));
    }
}
