//! Auxiliary note directories: brainstorms and research written after the document

use super::{SignalEnv, TrackedDoc};
use chrono::{DateTime, Utc};

/// Markdown files directly inside `dir` modified strictly after the document
pub(super) fn newer_notes(doc: &TrackedDoc, env: &SignalEnv<'_>, dir: &str) -> usize {
    if !doc.has_timestamp() {
        return 0;
    }
    let Ok(entries) = std::fs::read_dir(env.resolve(dir)) else {
        return 0;
    };

    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "md"))
        // Follow symlinks so linked notes count by their target's mtime
        .filter_map(|entry| std::fs::metadata(entry.path()).ok())
        .filter(|meta| meta.is_file())
        .filter_map(|meta| meta.modified().ok())
        .filter(|modified| DateTime::<Utc>::from(*modified) > doc.modified)
        .count()
}
