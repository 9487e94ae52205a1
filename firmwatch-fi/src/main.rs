//! firmwatch-fi - Firmness Ingest batch job
//!
//! Walks the firmness meter's export tree, computes per-lot firmness and
//! diameter statistics, and posts them to the plant-data store. Intended
//! to run from cron; a run with nothing to do stays quiet.

use anyhow::Result;
use clap::Parser;
use firmwatch_fi::config::{Args, Config};
use firmwatch_fi::services::Orchestrator;
use tracing::{debug, error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; quiet by default so scheduled runs with nothing
    // to do produce no output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Starting firmwatch-fi (Firmness Ingest)");
    debug!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::resolve(Args::parse())?;
    debug!("Scan root: {}", config.scan_root.display());
    debug!("Ledger: {}", config.ledger_path.display());

    let pool = firmwatch_fi::db::init_ledger_pool(&config.ledger_path).await?;

    let orchestrator = Orchestrator::new(config, pool)?;

    match orchestrator.run().await {
        Ok(report) if report.new > 0 => {
            info!(
                "Processed {} file(s): {} delivered, {} failed",
                report.new, report.delivered, report.failed
            );
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(e) => {
            error!("Run aborted: {}", e);
            Err(e.into())
        }
    }
}
