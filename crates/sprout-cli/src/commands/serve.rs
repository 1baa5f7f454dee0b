//! Web server command

use std::path::Path;

use anyhow::Result;
use tracing::info;

use sprout_core::AIClient;
use sprout_server::ServerConfig;

use super::open_db;

/// Start the web server
pub async fn cmd_serve(db_path: &Path, host: &str, port: u16, no_cache: bool) -> Result<()> {
    let db = open_db(db_path)?;
    let ai = AIClient::from_env();

    let allowed_origins = std::env::var("SPROUT_ALLOWED_ORIGINS")
        .map(|s| {
            s.split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let config = ServerConfig { allowed_origins };

    info!(db = %db_path.display(), cache = !no_cache, "Starting Sprout server");
    sprout_server::serve(db, ai, config, host, port, !no_cache).await
}
