//! Git history signals
//!
//! All three queries go through the command runner:
//! - nearest commit at or before the document's mtime (`git log --until`)
//! - name-status diff from that commit to HEAD over the tracked directories
//! - commit count since the document's mtime (`git rev-list --since`)
//!
//! Documents without a real timestamp produce no git evidence.

use super::{SignalEnv, TrackedDoc};
use tracing::debug;

/// `git diff --name-status` status letters we count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ChangeStatus {
    Renamed,
    Deleted,
    Added,
}

impl ChangeStatus {
    fn prefix(self) -> char {
        match self {
            ChangeStatus::Renamed => 'R',
            ChangeStatus::Deleted => 'D',
            ChangeStatus::Added => 'A',
        }
    }
}

/// Hash of the last commit at or before the document's modification time
fn doc_commit(doc: &TrackedDoc, env: &SignalEnv<'_>) -> Option<String> {
    if !doc.has_timestamp() {
        return None;
    }
    let args = vec![
        "log".to_string(),
        "-1".to_string(),
        "--format=%H".to_string(),
        format!("--until=@{}", doc.modified.timestamp()),
    ];
    let output = env.runner.run("git", &args);
    let commit = output.text()?.lines().next()?.trim().to_string();
    debug!("{} last covered by commit {}", doc.path.display(), commit);
    Some(commit)
}

/// Diff entries of the given status between the document's commit and HEAD
pub(super) fn changed_files(doc: &TrackedDoc, env: &SignalEnv<'_>, status: ChangeStatus) -> usize {
    let Some(commit) = doc_commit(doc, env) else {
        return 0;
    };
    if env.layout.tracked_dirs.is_empty() {
        return 0;
    }

    let mut args = vec![
        "diff".to_string(),
        "--name-status".to_string(),
        format!("{}..HEAD", commit),
        "--".to_string(),
    ];
    args.extend(env.layout.tracked_dirs.iter().cloned());

    let output = env.runner.run("git", &args);
    let Some(text) = output.text() else {
        return 0;
    };
    text.lines()
        .filter(|line| line.starts_with(status.prefix()))
        .count()
}

/// 1 when at least `threshold` commits landed since the document changed
pub(super) fn commits_since_update(doc: &TrackedDoc, env: &SignalEnv<'_>, threshold: u64) -> usize {
    if !doc.has_timestamp() {
        return 0;
    }
    let args = vec![
        "rev-list".to_string(),
        "--count".to_string(),
        "HEAD".to_string(),
        format!("--since=@{}", doc.modified.timestamp()),
    ];
    let output = env.runner.run("git", &args);
    let Some(count) = output.text().and_then(|t| t.trim().parse::<u64>().ok()) else {
        return 0;
    };
    debug!("{} commits since {} changed", count, doc.path.display());
    usize::from(count >= threshold)
}
