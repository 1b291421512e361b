//! `component_count_changed`: "N commands" claims vs. files on disk

use super::{ComponentGlob, SignalEnv, TrackedDoc};
use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Number of component kinds whose claims disagree with disk.
///
/// A kind counts once no matter how many of its claims are wrong.
pub(super) fn mismatched_claims(doc: &TrackedDoc, env: &SignalEnv<'_>) -> usize {
    let Some(content) = doc.read_text() else {
        return 0;
    };

    env.layout
        .components
        .iter()
        .filter(|component| {
            let Some(actual) = count_matching_files(env.root, &component.pattern) else {
                return false;
            };
            let wrong = first_wrong_claim(&content, &component.kind, actual);
            if let Some(claimed) = wrong {
                debug!(
                    "{} claims {} {} but {} exist",
                    doc.path.display(),
                    claimed,
                    component.kind,
                    actual
                );
            }
            wrong.is_some()
        })
        .count()
}

/// First "<number> <kind>" claim whose number differs from `actual`
fn first_wrong_claim(content: &str, kind: &str, actual: usize) -> Option<u64> {
    let pattern = Regex::new(&format!(r"(\d+)\s+{}", regex::escape(kind))).ok()?;
    let wrong = pattern
        .captures_iter(content)
        .filter_map(|cap| cap.get(1)?.as_str().parse::<u64>().ok())
        .find(|&claimed| claimed != actual as u64);
    wrong
}

/// Count files under `root` matching a `/`-separated glob. `*` never crosses
/// a directory boundary. `None` if the glob is invalid.
pub(crate) fn count_matching_files(root: &Path, pattern: &str) -> Option<usize> {
    let matcher = compile(pattern)?;
    let depth = pattern.split('/').filter(|s| !s.is_empty()).count();
    let count = WalkDir::new(root)
        .min_depth(1)
        .max_depth(depth.max(1))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .map(|rel| matcher.is_match(to_slash(rel)))
                .unwrap_or(false)
        })
        .count();
    Some(count)
}

fn compile(pattern: &str) -> Option<GlobMatcher> {
    match GlobBuilder::new(pattern).literal_separator(true).build() {
        Ok(glob) => Some(glob.compile_matcher()),
        Err(e) => {
            debug!("Invalid component glob '{}': {}", pattern, e);
            None
        }
    }
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Actual counts for every configured component kind
pub fn component_counts(root: &Path, components: &[ComponentGlob]) -> Vec<(String, usize)> {
    components
        .iter()
        .filter_map(|c| count_matching_files(root, &c.pattern).map(|n| (c.kind.clone(), n)))
        .collect()
}
