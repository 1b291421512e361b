//! Init command - write an example watchables file

use crate::config::CONFIG_CANDIDATES;
use anyhow::{Context, Result};
use console::style;
use std::path::{Path, PathBuf};

const EXAMPLE_WATCHABLES: &str = r#"# Interwatch watchables
#
# Each watchable is a document plus the drift signals that suggest it is out
# of date. A signal's score is its evidence count times its weight.
# Run `interwatch signals` to list the available signal types.

watchables:
  - name: roadmap
    path: docs/roadmap.md
    staleness_days: 14
    generator: interpath:artifact-gen
    generator_args:
      type: roadmap
    signals:
      - type: bead_closed
        weight: 2
      - type: bead_created
        weight: 1
      - type: brainstorm_created
        weight: 1

  - name: readme
    path: README.md
    staleness_days: 30
    signals:
      - type: version_bump
        weight: 3
      - type: component_count_changed
        weight: 3
      - type: commits_since_update
        weight: 1
        threshold: 20

  - name: agents
    path: AGENTS.md
    staleness_days: 30
    signals:
      - type: file_renamed
        weight: 2
      - type: file_deleted
        weight: 2
      - type: file_created
        weight: 1
      - type: companion_extracted
        weight: 2

# Override where the evaluators look (defaults shown)
# layout:
#   manifests: [.claude-plugin/plugin.json, plugin.json]
#   tracked_dirs: [skills/, commands/, agents/, hooks/]
#   brainstorm_dir: docs/brainstorms
#   research_dir: docs/research
"#;

/// Run the init command
pub fn run(root: &Path, force: bool) -> Result<()> {
    let path = write_example(root, force)?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(path.display()).cyan()
    );
    println!(
        "\n  Edit it, then run {} to see the drift report.",
        style("interwatch scan --format text").bold()
    );
    Ok(())
}

fn write_example(root: &Path, force: bool) -> Result<PathBuf> {
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let path = root.join(CONFIG_CANDIDATES[0]);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, EXAMPLE_WATCHABLES)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, SignalSpec};
    use crate::signals::SignalKind;
    use std::str::FromStr;

    #[test]
    fn test_example_parses_with_known_signals() {
        let dir = tempfile::tempdir().unwrap();
        write_example(dir.path(), false).unwrap();

        let loaded = load_config(dir.path(), None).unwrap();
        assert_eq!(loaded.config.watchables.len(), 3);
        let specs: Vec<&SignalSpec> = loaded
            .config
            .watchables
            .iter()
            .flat_map(|w| w.signals.iter())
            .collect();
        for spec in specs {
            assert!(
                SignalKind::from_str(&spec.signal_type).is_ok(),
                "unknown signal type {}",
                spec.signal_type
            );
        }
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_example(dir.path(), false).unwrap();
        std::fs::write(&path, "watchables: []\n").unwrap();

        assert!(write_example(dir.path(), false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "watchables: []\n");

        write_example(dir.path(), true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), EXAMPLE_WATCHABLES);
    }
}
