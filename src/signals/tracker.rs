//! Bead tracker signals
//!
//! `bd list` has no date filter, so both counts are totals rather than
//! "since the document changed". They are rough proxies and are kept that way.

use super::SignalEnv;
use tracing::debug;

/// Marker `bd` prints in front of closed items
const CLOSED_MARKER: char = '✓';
/// Marker `bd` prints in front of warnings
const WARNING_MARKER: char = '⚠';

/// Closed items reported by the tracker
pub(super) fn closed_items(env: &SignalEnv<'_>) -> usize {
    let Some(output) = list_items(env, "closed") else {
        return 0;
    };
    output
        .lines()
        .filter(|line| line.starts_with(CLOSED_MARKER))
        .count()
}

/// Open items reported by the tracker, ignoring blank and warning lines
pub(super) fn open_items(env: &SignalEnv<'_>) -> usize {
    let Some(output) = list_items(env, "open") else {
        return 0;
    };
    output
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with(WARNING_MARKER))
        .count()
}

fn list_items(env: &SignalEnv<'_>, status: &str) -> Option<String> {
    let args = vec!["list".to_string(), format!("--status={}", status)];
    let output = env.runner.run("bd", &args);
    match output.text() {
        Some(text) => Some(text.to_string()),
        None => {
            debug!("bd list --status={} gave no output", status);
            None
        }
    }
}
