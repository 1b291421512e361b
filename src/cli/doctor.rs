//! Doctor command - check configuration and environment

use crate::config::{load_config, locate_config};
use crate::runner::is_tool_available;
use crate::scanner::ScanContext;
use crate::signals::{component_counts, manifest_version, ProjectLayout};
use anyhow::Result;
use console::style;
use std::path::Path;

pub fn run(root: &Path) -> Result<()> {
    println!("🩺 Interwatch Doctor\n");

    let mut layout = ProjectLayout::default();
    let mut healthy = true;

    match locate_config(root, None) {
        Ok(path) => match load_config(root, Some(&path)) {
            Ok(loaded) => {
                println!(
                    "{} Watchables: {} ({} watchable(s))",
                    style("✓").green(),
                    loaded.path.display(),
                    loaded.config.watchables.len()
                );
                layout = loaded.config.layout;
            }
            Err(e) => {
                healthy = false;
                println!("{} Watchables: {}", style("✗").red(), e);
            }
        },
        Err(e) => {
            healthy = false;
            println!("{} Watchables: {}", style("✗").red(), e);
            println!("  Run `interwatch init` to create one");
        }
    }

    let ctx = ScanContext::new(root).with_layout(layout);

    for (tool, purpose) in [
        ("git", "history signals"),
        ("bd", "tracker signals"),
    ] {
        if is_tool_available(ctx.runner(), tool) {
            println!("{} {}: available", style("✓").green(), tool);
        } else {
            println!(
                "○ {}: not found ({} will report no evidence)",
                tool, purpose
            );
        }
    }

    match manifest_version(&ctx.signal_env()) {
        Some(version) => println!("{} Manifest version: {}", style("✓").green(), version),
        None => println!("○ Manifest version: none found (version_bump will not fire)"),
    }

    let counts = component_counts(ctx.root(), &ctx.layout().components);
    let summary: Vec<String> = counts
        .iter()
        .map(|(kind, count)| format!("{} {}", count, kind))
        .collect();
    println!("{} Components: {}", style("✓").green(), summary.join(", "));

    if healthy {
        println!("\n✅ Ready to scan");
    } else {
        println!("\n⚠️  Scans will fail until the watchables file is fixed");
    }
    Ok(())
}
