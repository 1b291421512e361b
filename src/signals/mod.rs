//! Drift signal evaluators
//!
//! Each signal answers one question: how much evidence of drift does X
//! contribute for this document, as of its last modification time? The set
//! of signals is closed; a configuration naming anything else is skipped by
//! the scanner rather than loaded dynamically.
//!
//! # Signals
//!
//! | Signal | Evidence | Cap |
//! |---|---|---|
//! | `bead_closed` | closed items listed by `bd` | 10 |
//! | `bead_created` | open items listed by `bd` | 10 |
//! | `version_bump` | manifest version differs from the document header | 1 |
//! | `component_count_changed` | "N commands"-style claims that disagree with disk | 3 |
//! | `file_renamed` / `file_deleted` / `file_created` | git status entries since the document's commit | 5 |
//! | `commits_since_update` | commit count since the document reached a threshold | 1 |
//! | `brainstorm_created` | brainstorm notes newer than the document | 5 |
//! | `research_completed` | research notes newer than the document | 3 |
//! | `companion_extracted` | known companions the document never mentions | 5 |
//!
//! Every count is saturated at its cap so that no single noisy signal can
//! dominate a weighted total. Unavailable evidence (missing tool, file,
//! manifest, unparsable output) is a count of 0, never an error.

mod companions;
mod components;
mod history;
mod layout;
mod manifest;
mod timeline;
mod tracker;

pub use components::component_counts;
pub use layout::{ComponentGlob, ProjectLayout, KNOWN_COMPANIONS};
pub use manifest::manifest_version;

use crate::runner::CommandRunner;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Commit count at which `commits_since_update` fires when no threshold is set
pub const DEFAULT_COMMIT_THRESHOLD: u64 = 20;

/// Everything an evaluator may consult besides the document itself
#[derive(Clone, Copy)]
pub struct SignalEnv<'a> {
    /// Project root; relative layout entries resolve against it
    pub root: &'a Path,
    pub layout: &'a ProjectLayout,
    pub runner: &'a dyn CommandRunner,
}

impl SignalEnv<'_> {
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

/// Filesystem state of a tracked document at scan time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedDoc {
    /// Resolved path
    pub path: PathBuf,
    pub exists: bool,
    /// Last modification, or the Unix epoch when unknown
    pub modified: DateTime<Utc>,
}

impl TrackedDoc {
    /// Stat the document. Missing or unreadable documents get the epoch sentinel.
    pub fn inspect(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let meta = std::fs::metadata(&path).ok();
        let modified = meta
            .as_ref()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        Self {
            exists: meta.is_some(),
            path,
            modified,
        }
    }

    /// Whether `modified` is a real timestamp rather than the sentinel
    pub fn has_timestamp(&self) -> bool {
        self.modified != DateTime::<Utc>::UNIX_EPOCH
    }

    pub(crate) fn read_text(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }
}

/// The closed registry of drift signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    BeadClosed,
    BeadCreated,
    VersionBump,
    ComponentCountChanged,
    FileRenamed,
    FileDeleted,
    FileCreated,
    CommitsSinceUpdate,
    BrainstormCreated,
    ResearchCompleted,
    CompanionExtracted,
}

impl SignalKind {
    pub const ALL: [SignalKind; 11] = [
        SignalKind::BeadClosed,
        SignalKind::BeadCreated,
        SignalKind::VersionBump,
        SignalKind::ComponentCountChanged,
        SignalKind::FileRenamed,
        SignalKind::FileDeleted,
        SignalKind::FileCreated,
        SignalKind::CommitsSinceUpdate,
        SignalKind::BrainstormCreated,
        SignalKind::ResearchCompleted,
        SignalKind::CompanionExtracted,
    ];

    /// Configuration key
    pub fn name(&self) -> &'static str {
        match self {
            SignalKind::BeadClosed => "bead_closed",
            SignalKind::BeadCreated => "bead_created",
            SignalKind::VersionBump => "version_bump",
            SignalKind::ComponentCountChanged => "component_count_changed",
            SignalKind::FileRenamed => "file_renamed",
            SignalKind::FileDeleted => "file_deleted",
            SignalKind::FileCreated => "file_created",
            SignalKind::CommitsSinceUpdate => "commits_since_update",
            SignalKind::BrainstormCreated => "brainstorm_created",
            SignalKind::ResearchCompleted => "research_completed",
            SignalKind::CompanionExtracted => "companion_extracted",
        }
    }

    /// Upper bound on the count this signal can report
    pub fn cap(&self) -> u32 {
        match self {
            SignalKind::BeadClosed | SignalKind::BeadCreated => 10,
            SignalKind::VersionBump | SignalKind::CommitsSinceUpdate => 1,
            SignalKind::ComponentCountChanged | SignalKind::ResearchCompleted => 3,
            SignalKind::FileRenamed
            | SignalKind::FileDeleted
            | SignalKind::FileCreated
            | SignalKind::BrainstormCreated
            | SignalKind::CompanionExtracted => 5,
        }
    }

    /// Deterministic signals report verified mismatches, not proxies
    pub fn is_deterministic(&self) -> bool {
        matches!(
            self,
            SignalKind::VersionBump | SignalKind::ComponentCountChanged
        )
    }

    /// Whether the signal reads a `threshold` from its configuration
    pub fn accepts_threshold(&self) -> bool {
        matches!(self, SignalKind::CommitsSinceUpdate)
    }

    pub fn description(&self) -> &'static str {
        match self {
            SignalKind::BeadClosed => {
                "Closed beads in the tracker (total, the tracker has no date filter)"
            }
            SignalKind::BeadCreated => {
                "Open beads in the tracker (proxy for work filed since the update)"
            }
            SignalKind::VersionBump => {
                "Manifest version differs from the version in the document header"
            }
            SignalKind::ComponentCountChanged => {
                "Component counts claimed in the document disagree with disk"
            }
            SignalKind::FileRenamed => {
                "Files renamed in tracked directories since the document's commit"
            }
            SignalKind::FileDeleted => {
                "Files deleted in tracked directories since the document's commit"
            }
            SignalKind::FileCreated => {
                "Files added in tracked directories since the document's commit"
            }
            SignalKind::CommitsSinceUpdate => "Commit count since the update reached the threshold",
            SignalKind::BrainstormCreated => "Brainstorm notes newer than the document",
            SignalKind::ResearchCompleted => "Research notes newer than the document",
            SignalKind::CompanionExtracted => "Known companion plugins the document never mentions",
        }
    }

    /// Evaluate the signal. The result is always within `0..=self.cap()`.
    ///
    /// `threshold` is only consulted by signals that
    /// [accept one](Self::accepts_threshold).
    pub fn evaluate(&self, doc: &TrackedDoc, env: &SignalEnv<'_>, threshold: Option<u64>) -> u32 {
        let raw = match self {
            SignalKind::BeadClosed => tracker::closed_items(env),
            SignalKind::BeadCreated => tracker::open_items(env),
            SignalKind::VersionBump => manifest::version_mismatch(doc, env),
            SignalKind::ComponentCountChanged => components::mismatched_claims(doc, env),
            SignalKind::FileRenamed => {
                history::changed_files(doc, env, history::ChangeStatus::Renamed)
            }
            SignalKind::FileDeleted => {
                history::changed_files(doc, env, history::ChangeStatus::Deleted)
            }
            SignalKind::FileCreated => {
                history::changed_files(doc, env, history::ChangeStatus::Added)
            }
            SignalKind::CommitsSinceUpdate => history::commits_since_update(
                doc,
                env,
                threshold.unwrap_or(DEFAULT_COMMIT_THRESHOLD),
            ),
            SignalKind::BrainstormCreated => {
                timeline::newer_notes(doc, env, &env.layout.brainstorm_dir)
            }
            SignalKind::ResearchCompleted => {
                timeline::newer_notes(doc, env, &env.layout.research_dir)
            }
            SignalKind::CompanionExtracted => companions::missing_companions(doc, env),
        };
        saturate(raw, self.cap())
    }
}

fn saturate(raw: usize, cap: u32) -> u32 {
    u32::try_from(raw).unwrap_or(u32::MAX).min(cap)
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalKind::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown signal type '{}'", s))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::runner::tests::ScriptedRunner;
    use chrono::Duration;
    use std::time::SystemTime;

    /// Set a file's mtime to `now - age`
    pub(crate) fn backdate(path: &Path, age: Duration) {
        let when = SystemTime::from(Utc::now() - age);
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(when).unwrap();
    }

    #[test]
    fn test_names_round_trip() {
        for kind in SignalKind::ALL {
            assert_eq!(kind.name().parse::<SignalKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.name());
        }
        assert!("bead_reopened".parse::<SignalKind>().is_err());
        assert!("Bead_Closed".parse::<SignalKind>().is_err());
    }

    #[test]
    fn test_caps() {
        let caps: Vec<u32> = SignalKind::ALL.iter().map(|k| k.cap()).collect();
        assert_eq!(caps, vec![10, 10, 1, 3, 5, 5, 5, 1, 5, 3, 5]);
    }

    #[test]
    fn test_deterministic_kinds() {
        let det: Vec<SignalKind> = SignalKind::ALL
            .into_iter()
            .filter(|k| k.is_deterministic())
            .collect();
        assert_eq!(
            det,
            vec![SignalKind::VersionBump, SignalKind::ComponentCountChanged]
        );
    }

    #[test]
    fn test_serializes_as_config_key() {
        let json = serde_json::to_string(&SignalKind::ComponentCountChanged).unwrap();
        assert_eq!(json, "\"component_count_changed\"");
    }

    #[test]
    fn test_saturate() {
        assert_eq!(saturate(0, 5), 0);
        assert_eq!(saturate(4, 5), 4);
        assert_eq!(saturate(500, 10), 10);
        assert_eq!(saturate(usize::MAX, 3), 3);
    }

    #[test]
    fn test_inspect_missing_doc() {
        let dir = tempfile::tempdir().unwrap();
        let doc = TrackedDoc::inspect(dir.path().join("missing.md"));
        assert!(!doc.exists);
        assert!(!doc.has_timestamp());
        assert_eq!(doc.modified.timestamp(), 0);
    }

    #[test]
    fn test_inspect_existing_doc() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "# Doc").unwrap();
        backdate(&path, Duration::days(3));
        let doc = TrackedDoc::inspect(&path);
        assert!(doc.exists);
        assert!(doc.has_timestamp());
        let age = Utc::now() - doc.modified;
        assert!(age >= Duration::days(3) - Duration::seconds(5));
    }

    #[test]
    fn test_every_signal_is_zero_without_evidence() {
        // Empty project, no tools, missing document
        let dir = tempfile::tempdir().unwrap();
        let layout = ProjectLayout::default();
        let runner = ScriptedRunner::new();
        let env = SignalEnv {
            root: dir.path(),
            layout: &layout,
            runner: &runner,
        };
        let doc = TrackedDoc::inspect(dir.path().join("missing.md"));
        for kind in SignalKind::ALL {
            assert_eq!(kind.evaluate(&doc, &env, None), 0, "{} should be 0", kind);
        }
    }

    #[test]
    fn test_counts_never_exceed_caps() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let layout = ProjectLayout::default();

        // Document mentions nothing, claims wrong counts, has an old version
        let doc_path = root.join("README.md");
        std::fs::write(
            &doc_path,
            "Version: 0.0.1\n99 skills, 99 commands, 99 agents\n",
        )
        .unwrap();
        std::fs::create_dir_all(root.join(".claude-plugin")).unwrap();
        std::fs::write(
            root.join(".claude-plugin/plugin.json"),
            r#"{"version": "1.2.3"}"#,
        )
        .unwrap();
        backdate(&doc_path, Duration::days(30));
        for dir_name in ["docs/brainstorms", "docs/research"] {
            std::fs::create_dir_all(root.join(dir_name)).unwrap();
            for i in 0..12 {
                std::fs::write(root.join(dir_name).join(format!("n{}.md", i)), "x").unwrap();
            }
        }

        let doc = TrackedDoc::inspect(&doc_path);
        let secs = doc.modified.timestamp();
        let closed: String = (0..500).map(|i| format!("✓ bd-{} done\n", i)).collect();
        let open: String = (0..500).map(|i| format!("○ bd-{} todo\n", i)).collect();
        let status: String = (0..50)
            .map(|i| {
                format!(
                    "R100\tcommands/a{i}.md\tcommands/b{i}.md\nD\tskills/s{i}/SKILL.md\nA\tagents/x/a{i}.md\n"
                )
            })
            .collect();
        let runner = ScriptedRunner::new()
            .respond("bd list --status=closed", &closed)
            .respond("bd list --status=open", &open)
            .respond(
                &format!("git log -1 --format=%H --until=@{}", secs),
                "abc123",
            )
            .respond(
                "git diff --name-status abc123..HEAD -- skills/ commands/ agents/ hooks/",
                &status,
            )
            .respond(
                &format!("git rev-list --count HEAD --since=@{}", secs),
                "9000",
            );
        let env = SignalEnv {
            root,
            layout: &layout,
            runner: &runner,
        };

        for kind in SignalKind::ALL {
            let count = kind.evaluate(&doc, &env, None);
            assert_eq!(count, kind.cap(), "{} should saturate at its cap", kind);
        }
    }
}
