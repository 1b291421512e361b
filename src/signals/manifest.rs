//! `version_bump`: manifest version vs. document header

use super::{SignalEnv, TrackedDoc};
use regex::Regex;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

/// Only the document header is searched for a version line
const HEADER_LINES: usize = 10;

static VERSION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn version_pattern() -> &'static Regex {
    VERSION_PATTERN.get_or_init(|| Regex::new(r"\d+\.\d+\.\d+").expect("valid regex"))
}

/// Version declared by the first manifest that parses.
///
/// Manifests are tried in layout order; missing or malformed files fall
/// through to the next. The first parsable one settles it: `None` when it has
/// no non-empty string `version`.
pub fn manifest_version(env: &SignalEnv<'_>) -> Option<String> {
    let json = env
        .layout
        .manifests
        .iter()
        .map(|m| env.resolve(m))
        .filter(|p| p.is_file())
        .find_map(|manifest| read_manifest(&manifest))?;
    json.get("version")
        .and_then(|v| v.as_str())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn read_manifest(manifest: &Path) -> Option<serde_json::Value> {
    let content = std::fs::read_to_string(manifest).ok()?;
    match serde_json::from_str(&content) {
        Ok(json) => Some(json),
        Err(e) => {
            debug!("Malformed manifest {}: {}", manifest.display(), e);
            None
        }
    }
}

/// Version quoted on the first header line that mentions `version:` and
/// carries an `X.Y.Z` number.
fn header_version(doc: &TrackedDoc) -> Option<String> {
    let file = std::fs::File::open(&doc.path).ok()?;
    BufReader::new(file)
        .lines()
        .take(HEADER_LINES)
        .map_while(Result::ok)
        .filter(|line| line.to_lowercase().contains("version:"))
        .find_map(|line| version_pattern().find(&line).map(|m| m.as_str().to_string()))
}

pub(super) fn version_mismatch(doc: &TrackedDoc, env: &SignalEnv<'_>) -> usize {
    let Some(manifest) = manifest_version(env) else {
        return 0;
    };
    match header_version(doc) {
        Some(documented) if documented != manifest => {
            debug!(
                "{} documents version {} but manifest has {}",
                doc.path.display(),
                documented,
                manifest
            );
            1
        }
        _ => 0,
    }
}
