//! Text (terminal) reporter with colors and formatting

use crate::models::{ScanReport, TierSummary};
use crate::scoring::ConfidenceTier;
use anyhow::Result;
use console::style;

fn styled_tier(tier: ConfidenceTier) -> String {
    let label = format!("{:<8}", tier.as_str());
    match tier {
        ConfidenceTier::Green => style(label).green().to_string(),
        ConfidenceTier::Low => style(label).blue().to_string(),
        ConfidenceTier::Medium => style(label).yellow().to_string(),
        ConfidenceTier::High => style(label).red().to_string(),
        ConfidenceTier::Certain => style(label).red().bold().to_string(),
    }
}

/// Render report as formatted terminal output
pub fn render(report: &ScanReport) -> Result<String> {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", style("Interwatch Drift Scan").bold()));
    out.push_str(&format!(
        "{}\n",
        style("──────────────────────────────────────").dim()
    ));
    out.push_str(&format!("Scanned: {}\n\n", report.scan_date));

    if report.watchables.is_empty() {
        out.push_str("No watchables matched.\n");
        return Ok(out);
    }

    out.push_str(&format!(
        "{}\n",
        style(format!(
            "  {:<20} {:<8} {:>5}  {:<5}  {:<20} PATH",
            "NAME", "TIER", "SCORE", "STALE", "ACTION"
        ))
        .dim()
    ));

    for (name, result) in &report.watchables {
        let path = if result.exists {
            result.path.clone()
        } else {
            format!("{} {}", result.path, style("(missing)").dim())
        };
        out.push_str(&format!(
            "  {:<20} {} {:>5}  {:<5}  {:<20} {}\n",
            truncate(name, 20),
            styled_tier(result.confidence),
            result.score,
            if result.stale { "yes" } else { "no" },
            result.recommended_action.as_str(),
            path
        ));

        let firing: Vec<String> = result
            .signals
            .iter()
            .filter(|(_, s)| s.count > 0)
            .map(|(kind, s)| format!("{} {}x{}", kind, s.count, s.weight))
            .collect();
        if !firing.is_empty() {
            out.push_str(&format!(
                "  {:<20} {}\n",
                "",
                style(firing.join(", ")).dim()
            ));
        }
    }

    let summary = TierSummary::from_report(report);
    out.push_str(&format!(
        "\n{} {} certain | {} high | {} medium | {} low | {} green\n",
        style("SUMMARY").bold(),
        summary.certain,
        summary.high,
        summary.medium,
        summary.low,
        summary.green
    ));

    Ok(out)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_report;

    #[test]
    fn test_text_render() {
        console::set_colors_enabled(false);
        let out = render(&test_report()).unwrap();
        assert!(out.contains("roadmap"));
        assert!(out.contains("auto-refresh"));
        assert!(out.contains("bead_closed 3x2"));
        assert!(out.contains("AGENTS.md (missing)"));
        assert!(out.contains("1 high"));
        assert!(out.contains("1 green"));
    }

    #[test]
    fn test_text_render_empty() {
        let mut report = test_report();
        report.watchables.clear();
        let out = render(&report).unwrap();
        assert!(out.contains("No watchables matched."));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }
}
