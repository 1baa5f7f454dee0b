//! Baby profile commands

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use sprout_core::models::{Gender, NewBaby};

use super::{open_db, LOCAL_CALLER};

/// Add a baby profile and grant the local caller access
pub fn cmd_baby_add(db_path: &Path, name: &str, dob: &str, gender: &str) -> Result<()> {
    let date_of_birth = NaiveDate::parse_from_str(dob, "%Y-%m-%d")
        .with_context(|| format!("Invalid date of birth '{}' (use YYYY-MM-DD)", dob))?;
    let gender: Gender = gender.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let db = open_db(db_path)?;
    let id = db.insert_baby(&NewBaby {
        name: name.to_string(),
        date_of_birth,
        gender,
    })?;
    db.grant_access(id, LOCAL_CALLER)?;

    println!("Added {} (id {})", name, id);
    Ok(())
}

/// List baby profiles
pub fn cmd_baby_list(db_path: &Path) -> Result<()> {
    let db = open_db(db_path)?;
    let babies = db.list_babies()?;

    if babies.is_empty() {
        println!("No babies yet. Add one with: sprout baby add <name> --dob YYYY-MM-DD");
        return Ok(());
    }

    println!("{:<5} {:<20} {:<12} {:<12} AGE", "ID", "NAME", "DOB", "GENDER");
    let today = chrono::Utc::now().date_naive();
    for baby in babies {
        println!(
            "{:<5} {:<20} {:<12} {:<12} {} months",
            baby.id,
            baby.name,
            baby.date_of_birth,
            baby.gender,
            baby.age_in_months(today)
        );
    }
    Ok(())
}
