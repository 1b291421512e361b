//! Signals command - list the signal registry

use crate::reporters::OutputFormat;
use crate::signals::SignalKind;
use anyhow::Result;
use console::style;
use std::str::FromStr;

pub fn run(format: &str) -> Result<()> {
    println!("{}", render(OutputFormat::from_str(format)?)?);
    Ok(())
}

fn render(format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = SignalKind::ALL
                .iter()
                .map(|kind| {
                    serde_json::json!({
                        "type": kind.name(),
                        "cap": kind.cap(),
                        "deterministic": kind.is_deterministic(),
                        "accepts_threshold": kind.accepts_threshold(),
                        "description": kind.description(),
                    })
                })
                .collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
        OutputFormat::Text => {
            let mut out = format!(
                "{}\n",
                style(format!("  {:<24} {:>3}  DESCRIPTION", "TYPE", "CAP")).dim()
            );
            for kind in SignalKind::ALL {
                let marker = if kind.is_deterministic() { "*" } else { " " };
                out.push_str(&format!(
                    "  {:<24} {:>3}{} {}\n",
                    kind.name(),
                    kind.cap(),
                    marker,
                    kind.description()
                ));
            }
            out.push_str(&format!(
                "\n{}",
                style("* deterministic: any firing forces the Certain tier").dim()
            ));
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_lists_every_signal() {
        let out = render(OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), SignalKind::ALL.len());
        assert_eq!(entries[0]["type"], "bead_closed");
        assert_eq!(entries[0]["cap"], 10);

        let version_bump = entries
            .iter()
            .find(|e| e["type"] == "version_bump")
            .unwrap();
        assert_eq!(version_bump["deterministic"], true);
    }

    #[test]
    fn test_text_lists_every_signal() {
        console::set_colors_enabled(false);
        let out = render(OutputFormat::Text).unwrap();
        for kind in SignalKind::ALL {
            assert!(out.contains(kind.name()), "missing {}", kind.name());
        }
    }
}
