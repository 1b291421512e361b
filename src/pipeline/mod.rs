//! Scan orchestration
//!
//! Runs the scanner over the selected watchables and assembles the report:
//! 1. Filter to a single document path if requested
//! 2. Scan each watchable (sequentially, or on a rayon pool)
//! 3. Key results by watchable name, in input order
//! 4. Stamp the report with the scan time

use anyhow::Result;
use chrono::Local;
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::Watchable;
use crate::models::{ScanReport, ScanResult, TierSummary};
use crate::scanner::{scan_watchable, ScanContext};

/// Format of `ScanReport::scan_date`
pub const SCAN_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Drift scan over a list of watchables.
pub struct ScanPipeline<'a> {
    ctx: &'a ScanContext,
    /// Only scan the watchable whose configured path equals this
    check: Option<String>,
    workers: usize,
}

impl<'a> ScanPipeline<'a> {
    pub fn new(ctx: &'a ScanContext) -> Self {
        Self {
            ctx,
            check: None,
            workers: 1,
        }
    }

    /// Restrict the scan to one document path (exact match on the configured path)
    pub fn with_check(mut self, path: Option<String>) -> Self {
        self.check = path;
        self
    }

    /// Scan watchables on this many threads; 1 keeps everything on the caller's thread
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Run the scan.
    ///
    /// Fails only if a worker pool cannot be created; evidence problems never
    /// surface here.
    pub fn run(&self, watchables: &[Watchable]) -> Result<ScanReport> {
        let scan_date = Local::now().format(SCAN_DATE_FORMAT).to_string();

        let selected: Vec<&Watchable> = watchables
            .iter()
            .filter(|w| self.check.as_deref().map_or(true, |p| w.path == p))
            .collect();
        debug!(
            "Scanning {} of {} watchables",
            selected.len(),
            watchables.len()
        );

        let results: Vec<ScanResult> = if self.workers > 1 && selected.len() > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()?;
            pool.install(|| {
                selected
                    .par_iter()
                    .map(|w| scan_watchable(w, self.ctx))
                    .collect()
            })
        } else {
            selected.iter().map(|w| scan_watchable(w, self.ctx)).collect()
        };

        let mut report = ScanReport {
            scan_date,
            watchables: IndexMap::with_capacity(results.len()),
        };
        for (watchable, result) in selected.iter().zip(results) {
            report.watchables.insert(watchable.name.clone(), result);
        }

        let summary = TierSummary::from_report(&report);
        info!(
            "Scanned {} watchables: {} certain, {} high, {} medium, {} low, {} green",
            summary.total, summary.certain, summary.high, summary.medium, summary.low, summary.green
        );
        Ok(report)
    }
}
