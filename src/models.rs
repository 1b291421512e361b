//! Core data models for interwatch
//!
//! These are the serialized shapes of a scan: one [`ScanResult`] per
//! watchable, collected into a [`ScanReport`]. Maps are insertion-ordered so
//! the JSON follows the order of the watchables file.

use crate::scoring::{ConfidenceTier, RecommendedAction};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Output of one signal for one watchable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalResult {
    /// Evidence count, already saturated at the signal's cap
    pub count: u32,
    pub weight: u32,
    /// `weight * count`; may exceed the cap
    pub score: u64,
}

impl SignalResult {
    pub fn new(count: u32, weight: u32) -> Self {
        Self {
            count,
            weight,
            score: u64::from(weight) * u64::from(count),
        }
    }
}

/// Drift assessment of one watchable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Path as written in the watchables file
    pub path: String,
    pub exists: bool,
    /// Sum of all signal scores
    pub score: u64,
    pub confidence: ConfidenceTier,
    pub stale: bool,
    /// Signal type -> result, in configuration order
    pub signals: IndexMap<String, SignalResult>,
    pub recommended_action: RecommendedAction,
    pub generator: String,
    pub generator_args: serde_json::Value,
}

/// A full scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Local time the scan started, `YYYY-MM-DDTHH:MM:SS`
    pub scan_date: String,
    /// Watchable name -> result, in configuration order
    pub watchables: IndexMap<String, ScanResult>,
}

/// Counts of watchables per tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TierSummary {
    pub green: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub certain: usize,
    pub total: usize,
}

impl TierSummary {
    pub fn from_report(report: &ScanReport) -> Self {
        let mut summary = Self::default();
        for result in report.watchables.values() {
            match result.confidence {
                ConfidenceTier::Green => summary.green += 1,
                ConfidenceTier::Low => summary.low += 1,
                ConfidenceTier::Medium => summary.medium += 1,
                ConfidenceTier::High => summary.high += 1,
                ConfidenceTier::Certain => summary.certain += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

impl ScanReport {
    /// Highest tier among scanned watchables, if any were scanned
    pub fn worst_tier(&self) -> Option<ConfidenceTier> {
        self.watchables.values().map(|r| r.confidence).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(tier: ConfidenceTier) -> ScanResult {
        ScanResult {
            path: "docs/x.md".into(),
            exists: true,
            score: 0,
            confidence: tier,
            stale: false,
            signals: IndexMap::new(),
            recommended_action: tier.action(),
            generator: String::new(),
            generator_args: serde_json::json!({}),
        }
    }

    #[test]
    fn test_signal_score_can_exceed_cap() {
        let r = SignalResult::new(10, 4);
        assert_eq!(r.score, 40);
        assert_eq!(SignalResult::new(0, 9).score, 0);
        assert_eq!(
            SignalResult::new(u32::MAX, u32::MAX).score,
            u64::from(u32::MAX) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn test_summary_and_worst_tier() {
        let mut watchables = IndexMap::new();
        watchables.insert("a".to_string(), result(ConfidenceTier::Low));
        watchables.insert("b".to_string(), result(ConfidenceTier::High));
        watchables.insert("c".to_string(), result(ConfidenceTier::Low));
        let report = ScanReport {
            scan_date: "2026-01-01T00:00:00".into(),
            watchables,
        };
        let summary = TierSummary::from_report(&report);
        assert_eq!(summary.low, 2);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(report.worst_tier(), Some(ConfidenceTier::High));

        let empty = ScanReport {
            scan_date: String::new(),
            watchables: IndexMap::new(),
        };
        assert_eq!(empty.worst_tier(), None);
    }

    #[test]
    fn test_result_json_shape() {
        let mut r = result(ConfidenceTier::Medium);
        r.signals.insert("bead_closed".into(), SignalResult::new(2, 2));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["confidence"], "Medium");
        assert_eq!(v["recommended_action"], "suggest-refresh");
        assert_eq!(v["signals"]["bead_closed"]["score"], 4);
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        for key in [
            "path", "exists", "score", "confidence", "stale", "signals",
            "recommended_action", "generator", "generator_args",
        ] {
            assert!(keys.contains(&key), "missing {}", key);
        }
    }
}
