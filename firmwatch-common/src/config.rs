//! Configuration file loading and default paths
//!
//! Resolution priority (highest first): command-line argument, environment
//! variable, TOML config file, OS-dependent compiled default. The CLI and
//! environment tiers live with the binary; this module covers the TOML and
//! default tiers.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional overrides read from a TOML config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub scan_root: Option<PathBuf>,
    pub ledger_path: Option<PathBuf>,
    pub error_log_path: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub staleness_secs: Option<u64>,
    pub archive_dir_name: Option<String>,
    pub file_extension: Option<String>,
}

impl TomlConfig {
    /// Load an explicitly named config file. Missing or malformed files are
    /// configuration errors.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Cannot parse {}: {}", path.display(), e)))
    }

    /// Probe the platform config locations; absent files yield defaults.
    pub fn load_default_locations() -> Self {
        for path in default_config_paths() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring config {}: {}", path.display(), e);
                    }
                }
            }
        }
        Self::default()
    }
}

/// Platform config file locations, most specific first
fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("firmwatch").join("config.toml"));
    }
    if cfg!(target_os = "linux") {
        paths.push(PathBuf::from("/etc/firmwatch/config.toml"));
    }
    paths
}

/// Data directory holding the ledger and error log
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("firmwatch"))
        .unwrap_or_else(|| PathBuf::from("./firmwatch_data"))
}

/// Default location of the processed-file ledger
pub fn default_ledger_path() -> PathBuf {
    default_data_dir().join("processed_files.db")
}

/// Default location of the append-only error log
pub fn default_error_log_path() -> PathBuf {
    default_data_dir().join("firmwatch_errors.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
scan_root = "/mnt/rundata"
endpoint = "http://farm.example.com/fruit_firm"
api_key = "test-key"
staleness_secs = 60
archive_dir_name = "archive"
"#,
        )
        .unwrap();

        let config = TomlConfig::load(&path).unwrap();
        assert_eq!(config.scan_root, Some(PathBuf::from("/mnt/rundata")));
        assert_eq!(
            config.endpoint.as_deref(),
            Some("http://farm.example.com/fruit_firm")
        );
        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.staleness_secs, Some(60));
        assert_eq!(config.archive_dir_name.as_deref(), Some("archive"));
        assert!(config.ledger_path.is_none());
        assert!(config.file_extension.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let result = TomlConfig::load(Path::new("/nonexistent/firmwatch.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "scan_root = [not toml").unwrap();

        let result = TomlConfig::load(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_default_paths_share_data_dir() {
        let data_dir = default_data_dir();
        assert!(default_ledger_path().starts_with(&data_dir));
        assert!(default_error_log_path().starts_with(&data_dir));
    }
}
