//! Fixed repository locations the signal evaluators read
//!
//! Evaluators never hard-code paths; they read them from a [`ProjectLayout`].
//! The defaults describe a Claude Code plugin tree and can be overridden
//! field-by-field from the `layout:` section of the watchables file.

use serde::{Deserialize, Serialize};

/// Companion plugins a top-level document is expected to mention.
pub const KNOWN_COMPANIONS: &[&str] = &[
    "interphase",
    "interline",
    "interflux",
    "interwatch",
    "interdoc",
    "interpath",
    "interlock",
    "interslack",
    "interform",
    "intercraft",
    "interdev",
    "intercheck",
    "interject",
    "internext",
    "interpub",
    "intersearch",
    "tldr-swinton",
    "tool-time",
    "tuivision",
];

/// A kind of component whose on-disk count documents tend to quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentGlob {
    /// Word used in claims like "41 commands"
    pub kind: String,
    /// Glob relative to the project root
    pub pattern: String,
}

impl ComponentGlob {
    pub fn new(kind: &str, pattern: &str) -> Self {
        Self {
            kind: kind.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLayout {
    /// Manifest files carrying a `version` field; the first existing one wins
    pub manifests: Vec<String>,
    pub components: Vec<ComponentGlob>,
    /// Directories the file rename/delete/create signals diff against
    pub tracked_dirs: Vec<String>,
    pub brainstorm_dir: String,
    pub research_dir: String,
    pub companions: Vec<String>,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            manifests: vec![
                ".claude-plugin/plugin.json".to_string(),
                "plugin.json".to_string(),
            ],
            components: vec![
                ComponentGlob::new("skills", "skills/*/SKILL.md"),
                ComponentGlob::new("commands", "commands/*.md"),
                ComponentGlob::new("agents", "agents/*/*.md"),
            ],
            tracked_dirs: ["skills/", "commands/", "agents/", "hooks/"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            brainstorm_dir: "docs/brainstorms".to_string(),
            research_dir: "docs/research".to_string(),
            companions: KNOWN_COMPANIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
