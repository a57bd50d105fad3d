//! Excluded models and their error history

use super::Database;
use crate::error::Result;
use rusqlite::params;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Failure history of a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error_time: String,
    pub error_count: u32,
}

/// Narrow interface over the persisted exclusion list
pub trait ExclusionStore {
    fn is_excluded(&self, model_id: &str) -> Result<bool>;

    /// Excluded ids, oldest exclusion first
    fn excluded_models(&self) -> Result<Vec<String>>;

    /// Add to the exclusion list; records an error only when newly excluded
    fn exclude(&self, model_id: &str) -> Result<bool>;

    /// Remove from the exclusion list; the error record is kept
    fn restore(&self, model_id: &str) -> Result<bool>;

    fn record_error(&self, model_id: &str) -> Result<ErrorRecord>;

    fn error_records(&self) -> Result<HashMap<String, ErrorRecord>>;

    fn excluded_set(&self) -> Result<HashSet<String>> {
        Ok(self.excluded_models()?.into_iter().collect())
    }

    /// Restore every excluded model, returning how many were restored
    fn restore_all(&self) -> Result<usize> {
        let mut restored = 0;
        for model_id in self.excluded_models()? {
            if self.restore(&model_id)? {
                restored += 1;
            }
        }
        Ok(restored)
    }
}

impl ExclusionStore for Database {
    fn is_excluded(&self, model_id: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM excluded_models WHERE model_id = ?1",
            params![model_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn excluded_models(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT model_id FROM excluded_models ORDER BY rowid")?;

        let results = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(results)
    }

    fn exclude(&self, model_id: &str) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        // Exclusion and error count land together or not at all.
        let tx = self.conn.unchecked_transaction()?;
        let rows = tx.execute(
            "INSERT OR IGNORE INTO excluded_models (model_id, excluded_at) VALUES (?1, ?2)",
            params![model_id, now],
        )?;

        if rows == 0 {
            return Ok(false);
        }

        let record = self.record_error(model_id)?;
        tx.commit()?;
        tracing::info!(
            "Excluded model '{}' (error count {})",
            model_id,
            record.error_count
        );
        Ok(true)
    }

    fn restore(&self, model_id: &str) -> Result<bool> {
        let rows = self.conn.execute(
            "DELETE FROM excluded_models WHERE model_id = ?1",
            params![model_id],
        )?;
        if rows > 0 {
            tracing::info!("Restored model '{}'", model_id);
        }
        Ok(rows > 0)
    }

    fn record_error(&self, model_id: &str) -> Result<ErrorRecord> {
        let now = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO model_errors (model_id, error_time, error_count) VALUES (?1, ?2, 1)
             ON CONFLICT(model_id) DO UPDATE SET
                 error_time = excluded.error_time,
                 error_count = model_errors.error_count + 1",
            params![model_id, now],
        )?;

        let record = self.conn.query_row(
            "SELECT error_time, error_count FROM model_errors WHERE model_id = ?1",
            params![model_id],
            |row| {
                Ok(ErrorRecord {
                    error_time: row.get(0)?,
                    error_count: row.get(1)?,
                })
            },
        )?;
        Ok(record)
    }

    fn error_records(&self) -> Result<HashMap<String, ErrorRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT model_id, error_time, error_count FROM model_errors")?;

        let results = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    ErrorRecord {
                        error_time: row.get(1)?,
                        error_count: row.get(2)?,
                    },
                ))
            })?
            .collect::<std::result::Result<HashMap<_, _>, _>>()?;

        Ok(results)
    }
}
