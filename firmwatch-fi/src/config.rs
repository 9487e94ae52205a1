//! Runtime configuration
//!
//! Resolution priority per field: command-line argument, environment
//! variable, TOML config file, compiled default. The scan root and API key
//! have no defaults; a run cannot start without them.

use clap::Parser;
use firmwatch_common::config::{default_error_log_path, default_ledger_path, TomlConfig};
use firmwatch_common::{Error, Result};
use std::path::PathBuf;

pub const DEFAULT_STALENESS_SECS: u64 = 120;
pub const DEFAULT_ARCHIVE_DIR_NAME: &str = "old";
pub const DEFAULT_FILE_EXTENSION: &str = "csv";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5001/fruit_firm";

/// Command-line and environment overrides
#[derive(Debug, Default, Parser)]
#[command(name = "firmwatch-fi", about = "Firmness-meter export ingest")]
pub struct Args {
    /// Directory tree to scan for measurement files
    #[arg(long, env = "FIRMWATCH_SCAN_ROOT")]
    pub scan_root: Option<PathBuf>,

    /// Location of the processed-file ledger database
    #[arg(long, env = "FIRMWATCH_LEDGER_PATH")]
    pub ledger_path: Option<PathBuf>,

    /// Append-only error log
    #[arg(long, env = "FIRMWATCH_ERROR_LOG")]
    pub error_log_path: Option<PathBuf>,

    /// Remote aggregation endpoint URL
    #[arg(long, env = "FIRMWATCH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Static API key for the remote endpoint
    #[arg(long, env = "FIRMWATCH_API_KEY")]
    pub api_key: Option<String>,

    /// Minimum file age in seconds before it is considered safe to read
    #[arg(long, env = "FIRMWATCH_STALENESS_SECS")]
    pub staleness_secs: Option<u64>,

    /// Explicit TOML config file (default: platform config locations)
    #[arg(long, env = "FIRMWATCH_CONFIG")]
    pub config_file: Option<PathBuf>,
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub scan_root: PathBuf,
    pub ledger_path: PathBuf,
    pub error_log_path: PathBuf,
    pub endpoint: String,
    pub api_key: String,
    pub staleness_secs: u64,
    pub archive_dir_name: String,
    pub file_extension: String,
}

impl Config {
    /// Merge CLI/ENV overrides with the TOML file and compiled defaults.
    pub fn resolve(args: Args) -> Result<Self> {
        let toml_config = match &args.config_file {
            Some(path) => TomlConfig::load(path)?,
            None => TomlConfig::load_default_locations(),
        };

        let scan_root = args.scan_root.or(toml_config.scan_root).ok_or_else(|| {
            Error::Config(
                "Scan root not configured. Pass --scan-root, set FIRMWATCH_SCAN_ROOT, \
                 or add scan_root to the TOML config"
                    .to_string(),
            )
        })?;

        let api_key = args.api_key.or(toml_config.api_key).ok_or_else(|| {
            Error::Config(
                "API key not configured. Pass --api-key, set FIRMWATCH_API_KEY, \
                 or add api_key to the TOML config"
                    .to_string(),
            )
        })?;

        Ok(Self {
            scan_root,
            ledger_path: args
                .ledger_path
                .or(toml_config.ledger_path)
                .unwrap_or_else(default_ledger_path),
            error_log_path: args
                .error_log_path
                .or(toml_config.error_log_path)
                .unwrap_or_else(default_error_log_path),
            endpoint: args
                .endpoint
                .or(toml_config.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_key,
            staleness_secs: args
                .staleness_secs
                .or(toml_config.staleness_secs)
                .unwrap_or(DEFAULT_STALENESS_SECS),
            archive_dir_name: toml_config
                .archive_dir_name
                .unwrap_or_else(|| DEFAULT_ARCHIVE_DIR_NAME.to_string()),
            file_extension: toml_config
                .file_extension
                .unwrap_or_else(|| DEFAULT_FILE_EXTENSION.to_string()),
        })
    }
}
