//! Append-only error log
//!
//! One entry per failed file so an operator can review what an unattended
//! run skipped. Log-write failures are warned and swallowed: the error log
//! must never take the run down with it.

use chrono::Utc;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one entry with the failed file and its full cause chain.
    pub fn record(&self, file: &Path, error: &(dyn std::error::Error + 'static)) {
        let mut entry = format!(
            "[{}] {}: {}",
            Utc::now().to_rfc3339(),
            file.display(),
            error
        );

        let mut cause = error.source();
        while let Some(err) = cause {
            let _ = write!(entry, "\n    caused by: {}", err);
            cause = err.source();
        }
        entry.push('\n');

        if let Err(e) = self.append(&entry) {
            tracing::warn!("Cannot write error log {}: {}", self.path.display(), e);
        }
    }

    fn append(&self, entry: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        file.write_all(entry.as_bytes())
    }
}
