//! Baby profile and caregiver access operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};
use std::str::FromStr;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{Baby, Gender, NewBaby};

impl Database {
    /// Insert a baby profile and return its id
    pub fn insert_baby(&self, baby: &NewBaby) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO babies (name, date_of_birth, gender) VALUES (?, ?, ?)",
            params![
                baby.name,
                baby.date_of_birth.to_string(),
                baby.gender.as_str()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Look up a baby profile by id
    pub fn get_baby(&self, baby_id: i64) -> Result<Option<Baby>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, name, date_of_birth, gender FROM babies WHERE id = ?",
            params![baby_id],
            |row| {
                let dob: String = row.get(2)?;
                let gender: String = row.get(3)?;
                Ok(Baby {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    date_of_birth: NaiveDate::parse_from_str(&dob, "%Y-%m-%d").map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            2,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                    gender: Gender::from_str(&gender).unwrap_or(Gender::Unspecified),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    /// List all baby profiles
    pub fn list_babies(&self) -> Result<Vec<Baby>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, date_of_birth, gender FROM babies ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            let dob: String = row.get(2)?;
            let gender: String = row.get(3)?;
            Ok(Baby {
                id: row.get(0)?,
                name: row.get(1)?,
                date_of_birth: NaiveDate::parse_from_str(&dob, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?,
                gender: Gender::from_str(&gender).unwrap_or(Gender::Unspecified),
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Error::from)
    }

    /// Grant a caller access to a baby's records (idempotent)
    pub fn grant_access(&self, baby_id: i64, caller_id: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO caregivers (baby_id, caller_id) VALUES (?, ?)",
            params![baby_id, caller_id],
        )?;
        Ok(())
    }

    /// Revoke a caller's access to a baby's records
    pub fn revoke_access(&self, baby_id: i64, caller_id: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM caregivers WHERE baby_id = ? AND caller_id = ?",
            params![baby_id, caller_id],
        )?;
        Ok(())
    }

    /// Check whether a caller may read a baby's records
    pub fn caller_has_access(&self, baby_id: i64, caller_id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM caregivers WHERE baby_id = ? AND caller_id = ?",
                params![baby_id, caller_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_baby() -> NewBaby {
        NewBaby {
            name: "Nora".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            gender: Gender::Female,
        }
    }

    #[test]
    fn test_insert_and_get_baby() {
        let db = Database::in_memory().unwrap();
        let id = db.insert_baby(&new_baby()).unwrap();

        let baby = db.get_baby(id).unwrap().unwrap();
        assert_eq!(baby.name, "Nora");
        assert_eq!(baby.gender, Gender::Female);
        assert_eq!(
            baby.date_of_birth,
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
        );

        assert!(db.get_baby(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_access_grants() {
        let db = Database::in_memory().unwrap();
        let id = db.insert_baby(&new_baby()).unwrap();

        assert!(!db.caller_has_access(id, "alex").unwrap());

        db.grant_access(id, "alex").unwrap();
        // Granting twice is fine
        db.grant_access(id, "alex").unwrap();
        assert!(db.caller_has_access(id, "alex").unwrap());
        assert!(!db.caller_has_access(id, "sam").unwrap());

        db.revoke_access(id, "alex").unwrap();
        assert!(!db.caller_has_access(id, "alex").unwrap());
    }

    #[test]
    fn test_list_babies() {
        let db = Database::in_memory().unwrap();
        db.insert_baby(&new_baby()).unwrap();
        db.insert_baby(&NewBaby {
            name: "Theo".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            gender: Gender::Male,
        })
        .unwrap();

        let babies = db.list_babies().unwrap();
        assert_eq!(babies.len(), 2);
        assert_eq!(babies[0].name, "Nora");
        assert_eq!(babies[1].name, "Theo");
    }
}
