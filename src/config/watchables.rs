//! Watchables file loading
//!
//! Searches for the watchables file in this order:
//! 1. an explicit `--config` path (skipped with a warning when missing)
//! 2. `.interwatch/watchables.yaml` under the project root
//! 3. `config/watchables.yaml` under the project root
//!
//! # Configuration Format
//!
//! ```yaml
//! watchables:
//!   - name: roadmap
//!     path: docs/roadmap.md
//!     staleness_days: 14
//!     generator: interpath:artifact-gen
//!     generator_args: { type: roadmap }
//!     signals:
//!       - type: bead_closed
//!         weight: 2
//!       - type: commits_since_update
//!         threshold: 20
//!
//! layout:
//!   tracked_dirs: [skills/, commands/]
//! ```
//!
//! Any failure here is fatal for the scan; see [`ConfigError`].

use super::ConfigError;
use crate::signals::ProjectLayout;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Candidate locations relative to the project root, in search order
pub const CONFIG_CANDIDATES: &[&str] = &[".interwatch/watchables.yaml", "config/watchables.yaml"];

/// Top-level watchables file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WatchablesConfig {
    #[serde(default)]
    pub watchables: Vec<Watchable>,

    /// Overrides for the fixed paths the evaluators read
    #[serde(default)]
    pub layout: ProjectLayout,
}

/// A tracked document under drift surveillance
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Watchable {
    pub name: String,
    pub path: String,

    /// Age in days after which the document is stale (0 disables)
    #[serde(default = "default_staleness_days")]
    pub staleness_days: u32,

    #[serde(default)]
    pub signals: Vec<SignalSpec>,

    /// Passed through untouched for whatever refreshes the document
    #[serde(default)]
    pub generator: String,
    #[serde(default = "empty_object")]
    pub generator_args: serde_json::Value,
}

/// One evaluator binding within a watchable
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignalSpec {
    /// Registry key; unknown values are skipped at scan time
    #[serde(rename = "type")]
    pub signal_type: String,

    #[serde(default = "default_weight")]
    pub weight: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u64>,
}

impl SignalSpec {
    pub fn new(signal_type: &str) -> Self {
        Self {
            signal_type: signal_type.to_string(),
            weight: default_weight(),
            threshold: None,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

impl Watchable {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            staleness_days: default_staleness_days(),
            signals: Vec::new(),
            generator: String::new(),
            generator_args: empty_object(),
        }
    }

    pub fn with_staleness_days(mut self, days: u32) -> Self {
        self.staleness_days = days;
        self
    }

    pub fn with_signal(mut self, spec: SignalSpec) -> Self {
        self.signals.push(spec);
        self
    }
}

fn default_staleness_days() -> u32 {
    14
}

fn default_weight() -> u32 {
    1
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Serialization format, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Unknown or missing extensions are read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => ConfigFormat::Json,
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// A parsed watchables file and where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: WatchablesConfig,
}

/// Find the watchables file without reading it.
///
/// An explicit path is only the first candidate; when it does not exist the
/// search continues with [`CONFIG_CANDIDATES`] under `root`.
pub fn locate_config(root: &Path, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let mut searched = Vec::with_capacity(CONFIG_CANDIDATES.len() + 1);
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        warn!(
            "Config {} not found, falling back to the default locations",
            path.display()
        );
        searched.push(path.to_path_buf());
    }

    for candidate in CONFIG_CANDIDATES {
        let path = root.join(candidate);
        if path.is_file() {
            return Ok(path);
        }
        searched.push(path);
    }
    Err(ConfigError::NotFound { searched })
}

/// Locate, read and parse the watchables file.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let path = locate_config(root, explicit)?;
    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let config = parse_config(&content, ConfigFormat::from_path(&path), &path)?;
    debug!(
        "Loaded {} watchables from {}",
        config.watchables.len(),
        path.display()
    );
    Ok(LoadedConfig { path, config })
}

/// Parse and validate watchables file content.
///
/// `origin` only labels errors.
pub fn parse_config(
    content: &str,
    format: ConfigFormat,
    origin: &Path,
) -> Result<WatchablesConfig, ConfigError> {
    if content.trim().is_empty() {
        return Ok(WatchablesConfig::default());
    }

    let parse_err = |message: String| ConfigError::Parse {
        path: origin.to_path_buf(),
        message,
    };

    let config: WatchablesConfig = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))?,
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))?,
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string()))?,
    };

    validate(&config).map_err(|message| ConfigError::Invalid {
        path: origin.to_path_buf(),
        message,
    })?;
    Ok(config)
}

fn validate(config: &WatchablesConfig) -> Result<(), String> {
    let mut names = HashSet::new();
    for (i, w) in config.watchables.iter().enumerate() {
        if w.name.trim().is_empty() {
            return Err(format!("watchable #{} has an empty name", i + 1));
        }
        if w.path.trim().is_empty() {
            return Err(format!("watchable '{}' has an empty path", w.name));
        }
        if !names.insert(w.name.as_str()) {
            return Err(format!("duplicate watchable name '{}'", w.name));
        }
    }
    Ok(())
}
