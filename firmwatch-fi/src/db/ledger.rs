//! Processed-file ledger queries
//!
//! Entries are created only after a file has both parsed and delivered
//! successfully, and are never updated or deleted afterwards.

use firmwatch_common::Result;
use sqlx::SqlitePool;
use std::collections::HashSet;

/// Load every known processed file path in one bulk read.
///
/// Membership checks against large candidate sets then cost O(1) each with
/// no per-file round trips.
pub async fn load_all(pool: &SqlitePool) -> Result<HashSet<String>> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT file_path FROM processed_files")
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|(path,)| path).collect())
}

/// Insert a batch of newly processed paths in one transaction.
///
/// No-op on an empty batch. Duplicates should not occur by construction,
/// but are ignored rather than failing the whole commit.
pub async fn commit_batch(pool: &SqlitePool, paths: &[String]) -> Result<()> {
    if paths.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for path in paths {
        sqlx::query("INSERT OR IGNORE INTO processed_files (file_path) VALUES (?)")
            .bind(path)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::info!("Ledger updated: {} file(s) committed", paths.len());
    Ok(())
}
