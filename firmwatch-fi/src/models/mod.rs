//! Wire and report types

use serde::{Deserialize, Serialize};

/// Aggregate statistics for one measured lot, keyed by barcode.
///
/// Never persisted locally; its only destination is the remote plant-data
/// store, which upserts by barcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotSummary {
    pub barcode: String,
    pub avg_firmness: f64,
    pub avg_diameter: f64,
    pub sd_firmness: f64,
    pub sd_diameter: f64,
}

/// Per-run outcome counts reported by the orchestrator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Measurement files found under the scan root
    pub discovered: usize,
    /// Files old enough to be safely read
    pub stable: usize,
    /// Stable files not yet in the ledger
    pub new: usize,
    /// Files parsed and delivered this run
    pub delivered: usize,
    /// Files that failed parse or delivery this run
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lot_summary_json_shape() {
        let summary = LotSummary {
            barcode: "BB-0042".to_string(),
            avg_firmness: 7.0,
            avg_diameter: 12.0,
            sd_firmness: 2.0,
            sd_diameter: 2.0,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["barcode"], "BB-0042");
        assert_eq!(json["avg_firmness"], 7.0);
        assert_eq!(json["avg_diameter"], 12.0);
        assert_eq!(json["sd_firmness"], 2.0);
        assert_eq!(json["sd_diameter"], 2.0);

        let back: LotSummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }
}
