//! Interwatch - documentation drift scanner
//!
//! Interwatch keeps a list of watched documents ("watchables"). For each one it
//! samples cheap signals from the repository (issue tracker activity, manifest
//! version, component counts, git history, new brainstorms and research notes),
//! combines them into a weighted score and maps that score to a
//! [`scoring::ConfidenceTier`] and a [`scoring::RecommendedAction`].
//!
//! Missing tools and unreadable files never fail a scan; they simply provide
//! no evidence. Only configuration problems ([`config::ConfigError`]) are fatal.

pub mod cli;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod runner;
pub mod scanner;
pub mod scoring;
pub mod signals;
