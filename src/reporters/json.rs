//! JSON reporter
//!
//! The JSON report is the tool's contract with its callers:
//! `{"scan_date": ..., "watchables": {name: ScanResult, ...}}`.

use crate::models::ScanReport;
use anyhow::Result;

/// Render report as pretty-printed JSON
pub fn render(report: &ScanReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Render report as compact JSON (single line)
pub fn render_compact(report: &ScanReport) -> Result<String> {
    Ok(serde_json::to_string(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_json_render_valid() {
        let report = test_report();
        let json_str = render(&report).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["scan_date"], "2026-10-18T09:30:00");

        let roadmap = &parsed["watchables"]["roadmap"];
        assert_eq!(roadmap["path"], "docs/roadmap.md");
        assert_eq!(roadmap["exists"], true);
        assert_eq!(roadmap["score"], 7);
        assert_eq!(roadmap["confidence"], "High");
        assert_eq!(roadmap["stale"], false);
        assert_eq!(roadmap["recommended_action"], "auto-refresh");
        assert_eq!(roadmap["signals"]["bead_closed"]["count"], 3);
        assert_eq!(roadmap["signals"]["bead_closed"]["weight"], 2);
        assert_eq!(roadmap["signals"]["bead_closed"]["score"], 6);
        assert_eq!(roadmap["generator_args"]["type"], "roadmap");
    }

    #[test]
    fn test_json_keeps_watchable_order() {
        let json_str = render(&test_report()).unwrap();
        let roadmap = json_str.find("\"roadmap\"").unwrap();
        let agents = json_str.find("\"agents\"").unwrap();
        assert!(roadmap < agents);
    }

    #[test]
    fn test_json_render_compact() {
        let report = test_report();
        let json_str = render_compact(&report).expect("render compact JSON");
        assert!(!json_str.contains('\n'));
        let back: ScanReport = serde_json::from_str(&json_str).expect("parse compact JSON");
        assert_eq!(back, report);
    }
}
