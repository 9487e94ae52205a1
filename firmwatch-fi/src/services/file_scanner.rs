//! Measurement file scanner
//!
//! Recursive discovery of firmness-meter export files. Archival subtrees
//! are pruned during traversal, and files the instrument may still be
//! writing are held back until they have settled.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// File discovery errors
///
/// These abort the whole run: without a readable scan root there is nothing
/// meaningful to do, and proceeding could silently skip every file.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Scan root does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Scan root exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Measurement file scanner
pub struct FileScanner {
    archive_dir_name: String,
    file_extension: String,
}

impl FileScanner {
    /// Create a scanner that prunes `archive_dir_name` directories and
    /// selects files carrying `file_extension` (both case-insensitive).
    pub fn new(archive_dir_name: impl Into<String>, file_extension: impl Into<String>) -> Self {
        Self {
            archive_dir_name: archive_dir_name.into(),
            file_extension: file_extension
                .into()
                .trim_start_matches('.')
                .to_lowercase(),
        }
    }

    /// Scan the root for measurement files.
    ///
    /// Archival directories are pruned during traversal, so their contents
    /// are never enumerated regardless of nesting depth. Unreadable entries
    /// inside the tree are warned and skipped, not fatal.
    pub fn scan(&self, root_path: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        let mut files = Vec::new();

        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_descend(e));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.is_measurement_file(entry.path()) {
                        files.push(entry.path().to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    // Continue scanning, don't abort
                }
            }
        }

        tracing::debug!("Discovered {} measurement file(s)", files.len());

        Ok(files)
    }

    /// Retain only files whose last modification is older than `threshold`.
    ///
    /// A file the instrument is still writing must never be read mid-write;
    /// the threshold is a settle-time heuristic, not a lock. Files whose
    /// mtime cannot be read are held back and retried next run.
    pub fn filter_stable(&self, paths: Vec<PathBuf>, threshold: Duration) -> Vec<PathBuf> {
        self.filter_stable_at(paths, threshold, SystemTime::now())
    }

    fn filter_stable_at(
        &self,
        paths: Vec<PathBuf>,
        threshold: Duration,
        now: SystemTime,
    ) -> Vec<PathBuf> {
        paths
            .into_iter()
            .filter(|path| match file_age(path, now) {
                Ok(age) => age > threshold,
                Err(e) => {
                    tracing::warn!("Cannot read mtime for {}: {}", path.display(), e);
                    false
                }
            })
            .collect()
    }

    /// The scan root itself is always entered, even if it happens to carry
    /// the archival name.
    fn should_descend(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        !name.eq_ignore_ascii_case(&self.archive_dir_name)
    }

    fn is_measurement_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase() == self.file_extension)
            .unwrap_or(false)
    }
}

fn file_age(path: &Path, now: SystemTime) -> std::io::Result<Duration> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(now.duration_since(modified).unwrap_or(Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> FileScanner {
        FileScanner::new("old", "csv")
    }

    #[test]
    fn test_scan_nonexistent_path() {
        let result = scanner().scan(Path::new("/nonexistent/rundata"));
        match result.unwrap_err() {
            ScanError::PathNotFound(_) => {}
            other => panic!("Expected PathNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_file_as_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("run.csv");
        fs::write(&file, "Ticket #,X\n").unwrap();

        let result = scanner().scan(&file);
        match result.unwrap_err() {
            ScanError::NotADirectory(_) => {}
            other => panic!("Expected NotADirectory, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_selects_only_csv_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("lot1")).unwrap();
        fs::write(root.join("lot1/run.csv"), "data").unwrap();
        fs::write(root.join("lot1/run.CSV"), "data").unwrap();
        fs::write(root.join("lot1/notes.txt"), "data").unwrap();
        fs::write(root.join("readme"), "data").unwrap();

        let files = scanner().scan(root).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| {
            p.extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        }));
    }

    #[test]
    fn test_archival_subtrees_pruned_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("old")).unwrap();
        fs::create_dir_all(root.join("lot1/OLD/deep")).unwrap();
        fs::create_dir_all(root.join("lot2/Old")).unwrap();
        fs::write(root.join("old/a.csv"), "data").unwrap();
        fs::write(root.join("lot1/OLD/deep/b.csv"), "data").unwrap();
        fs::write(root.join("lot2/Old/c.csv"), "data").unwrap();
        fs::write(root.join("lot1/keep.csv"), "data").unwrap();
        fs::write(root.join("lot2/keep.csv"), "data").unwrap();

        let files = scanner().scan(root).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files
            .iter()
            .all(|p| p.file_name().map(|n| n == "keep.csv").unwrap_or(false)));
    }

    #[test]
    fn test_directory_named_like_file_extension_not_selected() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("weird.csv")).unwrap();
        fs::write(root.join("weird.csv/inner.csv"), "data").unwrap();

        let files = scanner().scan(root).unwrap();
        // The directory itself is not a candidate; the file inside it is
        assert_eq!(files.len(), 1);
        assert!(files[0].is_file());
    }

    #[test]
    fn test_staleness_boundary() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("run.csv");
        fs::write(&file, "data").unwrap();
        let mtime = fs::metadata(&file).unwrap().modified().unwrap();

        let threshold = Duration::from_secs(120);

        // 60 seconds after the write: still settling, excluded
        let stable = scanner().filter_stable_at(
            vec![file.clone()],
            threshold,
            mtime + Duration::from_secs(60),
        );
        assert!(stable.is_empty());

        // 121 seconds after the write: settled, included
        let stable = scanner().filter_stable_at(
            vec![file.clone()],
            threshold,
            mtime + Duration::from_secs(121),
        );
        assert_eq!(stable, vec![file]);
    }

    #[test]
    fn test_missing_file_held_back_by_staleness_filter() {
        let stable = scanner().filter_stable(
            vec![PathBuf::from("/nonexistent/run.csv")],
            Duration::from_secs(0),
        );
        assert!(stable.is_empty());
    }
}
