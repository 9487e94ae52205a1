//! Ledger database access
//!
//! The processed-file ledger is a single-table SQLite database exclusively
//! owned by this process. It is the sole source of truth for "already
//! handled"; the remote store is never consulted for idempotence.

pub mod ledger;

use firmwatch_common::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Open the processed-file ledger, creating it on first run.
///
/// Safe to call every invocation; table creation is idempotent.
pub async fn init_ledger_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to ledger database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

pub(crate) async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS processed_files (
            file_path TEXT PRIMARY KEY,
            processed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
