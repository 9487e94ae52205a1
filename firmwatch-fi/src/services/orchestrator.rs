//! Batch orchestrator
//!
//! One run: discover, hold back unsettled files, drop already-ledgered
//! paths, then parse and deliver each remaining file in order. Per-file
//! failures are logged and skipped; the ledger is committed once at the end
//! with exactly the files that both parsed and delivered.

use crate::config::Config;
use crate::db::ledger;
use crate::error_log::ErrorLog;
use crate::models::RunReport;
use crate::services::delivery_client::DeliveryClient;
use crate::services::file_scanner::FileScanner;
use crate::services::lot_parser;
use firmwatch_common::{Error, Result};
use sqlx::SqlitePool;
use std::time::Duration;

pub struct Orchestrator {
    config: Config,
    pool: SqlitePool,
    scanner: FileScanner,
    delivery: DeliveryClient,
    error_log: ErrorLog,
}

impl Orchestrator {
    pub fn new(config: Config, pool: SqlitePool) -> Result<Self> {
        let scanner = FileScanner::new(&config.archive_dir_name, &config.file_extension);
        let delivery = DeliveryClient::new(&config.endpoint, &config.api_key)
            .map_err(|e| Error::Internal(e.to_string()))?;
        let error_log = ErrorLog::new(&config.error_log_path);

        Ok(Self {
            config,
            pool,
            scanner,
            delivery,
            error_log,
        })
    }

    /// Execute one batch run.
    ///
    /// Only discovery failure and ledger storage failure abort the run; a
    /// malformed or undeliverable file never blocks its siblings. A run
    /// with nothing to do stays quiet (debug-level only).
    pub async fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::default();

        let discovered = self
            .scanner
            .scan(&self.config.scan_root)
            .map_err(|e| Error::Discovery(e.to_string()))?;
        report.discovered = discovered.len();

        let stable = self.scanner.filter_stable(
            discovered,
            Duration::from_secs(self.config.staleness_secs),
        );
        report.stable = stable.len();

        let processed = ledger::load_all(&self.pool).await?;
        let candidates: Vec<_> = stable
            .into_iter()
            .filter(|path| !processed.contains(&path.display().to_string()))
            .collect();
        report.new = candidates.len();

        if candidates.is_empty() {
            tracing::debug!("No new measurement files; nothing to do");
            return Ok(report);
        }

        tracing::info!("{} new measurement file(s) to process", candidates.len());

        let mut delivered = Vec::new();

        for path in &candidates {
            let summary = match lot_parser::parse(path) {
                Ok(summary) => summary,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    self.error_log.record(path, &e);
                    report.failed += 1;
                    continue;
                }
            };

            tracing::info!(
                barcode = %summary.barcode,
                avg_diameter = summary.avg_diameter,
                sd_diameter = summary.sd_diameter,
                avg_firmness = summary.avg_firmness,
                sd_firmness = summary.sd_firmness,
                "Parsed {}",
                path.display()
            );

            match self.delivery.deliver(&summary).await {
                Ok(_receipt) => {
                    delivered.push(path.display().to_string());
                    report.delivered += 1;
                }
                Err(e) => {
                    tracing::warn!("Delivery failed for {}: {}", path.display(), e);
                    self.error_log.record(path, &e);
                    report.failed += 1;
                }
            }
        }

        // A file enters the ledger if and only if it parsed and delivered
        // in this run.
        ledger::commit_batch(&self.pool, &delivered).await?;

        tracing::info!(
            "Run complete: {} delivered, {} failed, {} already ledgered",
            report.delivered,
            report.failed,
            report.stable - report.new
        );

        Ok(report)
    }
}
