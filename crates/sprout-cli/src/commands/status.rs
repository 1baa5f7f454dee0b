//! Database status command

use std::path::Path;

use anyhow::Result;

use super::open_db;

/// Show database status and per-baby event counts
pub fn cmd_status(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;

    println!("Database: {}", db.path());

    let size = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    println!("Size:     {:.1} KB", size as f64 / 1024.0);

    match std::env::var("OLLAMA_HOST") {
        Ok(host) => println!("AI:       ollama at {}", host),
        Err(_) => println!("AI:       not configured (narratives use deterministic fallback)"),
    }

    let babies = db.list_babies()?;
    println!("Babies:   {}", babies.len());

    for baby in babies {
        let counts = db.event_counts(baby.id)?;
        println!(
            "  {} (id {}): {} sleep, {} feeding, {} diaper, {} growth, {} activity",
            baby.name,
            baby.id,
            counts.sleep,
            counts.feeding,
            counts.diaper,
            counts.growth,
            counts.activity,
        );
    }

    Ok(())
}
