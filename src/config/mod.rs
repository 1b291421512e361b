//! Configuration module for interwatch
//!
//! This module handles:
//! - Locating the watchables file (explicit path or search order)
//! - Parsing YAML, JSON or TOML watchables files
//! - Layout overrides for the signal evaluators
//!
//! Configuration problems are the only fatal errors in a scan.

mod watchables;

pub use watchables::{
    load_config, locate_config, parse_config, ConfigFormat, LoadedConfig, SignalSpec, Watchable,
    WatchablesConfig, CONFIG_CANDIDATES,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a scan before any watchable is processed
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no watchables file found (searched: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid watchables file {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_lists_searched_paths() {
        let err = ConfigError::NotFound {
            searched: vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")],
        };
        assert_eq!(
            err.to_string(),
            "no watchables file found (searched: a.yaml, b.yaml)"
        );
    }
}
