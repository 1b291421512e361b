//! Scan command - evaluate drift for every watchable and emit the report

use crate::config::load_config;
use crate::models::ScanReport;
use crate::pipeline::ScanPipeline;
use crate::reporters::{self, OutputFormat};
use crate::scanner::ScanContext;
use crate::scoring::ConfidenceTier;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Options for a scan run
#[derive(Debug, Clone)]
pub struct ScanArgs {
    pub config: Option<PathBuf>,
    pub check: Option<String>,
    pub format: String,
    pub output: Option<PathBuf>,
    pub compact: bool,
    pub fail_on: Option<String>,
    pub workers: usize,
}

impl Default for ScanArgs {
    fn default() -> Self {
        Self {
            config: None,
            check: None,
            format: "json".to_string(),
            output: None,
            compact: false,
            fail_on: None,
            workers: 1,
        }
    }
}

pub fn run(root: &Path, args: ScanArgs) -> Result<()> {
    // Validate before touching the filesystem
    let format = OutputFormat::from_str(&args.format)?;
    let fail_on = args
        .fail_on
        .as_deref()
        .map(ConfidenceTier::from_str)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let loaded = load_config(root, args.config.as_deref())?;
    info!(
        "Loaded {} watchable(s) from {}",
        loaded.config.watchables.len(),
        loaded.path.display()
    );

    let ctx = ScanContext::new(root).with_layout(loaded.config.layout.clone());
    let report = ScanPipeline::new(&ctx)
        .with_check(args.check)
        .with_workers(args.workers)
        .run(&loaded.config.watchables)?;

    let output = match format {
        OutputFormat::Json if args.compact => reporters::render_compact(&report)?,
        _ => reporters::report_with_format(&report, format)?,
    };

    if let Some(path) = &args.output {
        std::fs::write(path, format!("{}\n", output))
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report written to {}", path.display());
    } else {
        println!("{}", output);
    }

    check_fail_threshold(fail_on, &report);
    Ok(())
}

/// Whether any scanned watchable reached the threshold tier
fn exceeds_threshold(threshold: ConfidenceTier, report: &ScanReport) -> bool {
    report
        .worst_tier()
        .is_some_and(|worst| worst >= threshold)
}

fn check_fail_threshold(fail_on: Option<ConfidenceTier>, report: &ScanReport) {
    if let Some(threshold) = fail_on {
        if exceeds_threshold(threshold, report) {
            eprintln!("Failing due to --fail-on={} threshold", threshold);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_exceeds_threshold() {
        let report = test_report();
        assert!(exceeds_threshold(ConfidenceTier::Low, &report));
        assert!(exceeds_threshold(ConfidenceTier::High, &report));
        assert!(!exceeds_threshold(ConfidenceTier::Certain, &report));
    }

    #[test]
    fn test_empty_report_never_trips() {
        let mut report = test_report();
        report.watchables.clear();
        assert!(!exceeds_threshold(ConfidenceTier::Low, &report));
    }

    #[test]
    fn test_missing_config_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(dir.path(), ScanArgs::default()).unwrap_err();
        assert!(err.downcast_ref::<crate::config::ConfigError>().is_some());
    }

    #[test]
    fn test_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".interwatch")).unwrap();
        std::fs::write(
            dir.path().join(".interwatch/watchables.yaml"),
            "watchables:\n  - name: readme\n    path: README.md\n",
        )
        .unwrap();
        let out = dir.path().join("drift.json");
        run(
            dir.path(),
            ScanArgs {
                output: Some(out.clone()),
                compact: true,
                ..ScanArgs::default()
            },
        )
        .unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written.trim_end().lines().count(), 1);
        let report: ScanReport = serde_json::from_str(&written).unwrap();
        assert!(!report.watchables["readme"].exists);
        assert_eq!(report.watchables["readme"].confidence, ConfidenceTier::Green);
    }
}
