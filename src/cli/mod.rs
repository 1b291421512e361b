//! CLI command definitions and handlers

mod doctor;
mod init;
mod scan;
mod signals;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Interwatch - documentation drift scanner
#[derive(Parser, Debug)]
#[command(name = "interwatch")]
#[command(
    version,
    about = "Documentation drift scanner: samples cheap repository signals and recommends a refresh action per document",
    long_about = "Interwatch reads a list of watched documents, evaluates drift signals \
for each one (tracker activity, version mismatches, component counts, git history, \
new brainstorms and research notes) and reports a confidence tier plus a \
recommended action.\n\n\
Run without a subcommand to scan the current directory and print JSON:\n  \
interwatch",
    after_help = "\
Examples:
  interwatch                                    Scan with the discovered watchables file
  interwatch scan --check docs/roadmap.md       Scan a single document
  interwatch scan --format text                 Colored terminal summary
  interwatch scan --fail-on high                Exit code 1 if any doc is High or Certain
  interwatch --root ../plugin signals           List the available signal types
  interwatch init                               Write an example watchables file"
)]
pub struct Cli {
    /// Project root (default: current directory)
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64)
    #[arg(long, global = true, default_value = "1", value_parser = parse_workers)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan watched documents for drift (default command)
    #[command(after_help = "\
Examples:
  interwatch scan                                 JSON report on stdout
  interwatch scan --config ci/watchables.yaml     Use an explicit watchables file
  interwatch scan --check docs/roadmap.md         Only the watchable with this path
  interwatch scan -f text                         Terminal summary
  interwatch scan -o drift.json --compact         Single-line JSON written to a file
  interwatch scan --fail-on medium                CI gate")]
    Scan {
        /// Watchables file, tried before .interwatch/watchables.yaml and config/watchables.yaml
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Only scan the watchable whose configured path equals this value
        #[arg(long)]
        check: Option<String>,

        /// Output format: json, text
        #[arg(long, short = 'f', default_value = "json", value_parser = ["json", "text"])]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,

        /// Exit with code 1 if any watchable is at or above this tier
        #[arg(long, value_parser = ["low", "medium", "high", "certain"])]
        fail_on: Option<String>,
    },

    /// List the available signal types
    Signals {
        /// Output format: json, text
        #[arg(long, short = 'f', default_value = "text", value_parser = ["json", "text"])]
        format: String,
    },

    /// Write an example .interwatch/watchables.yaml
    Init {
        /// Overwrite an existing watchables file
        #[arg(long)]
        force: bool,
    },

    /// Check configuration discovery and external tool availability
    Doctor,

    /// Show version information
    Version,
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Scan {
            config,
            check,
            format,
            output,
            compact,
            fail_on,
        }) => scan::run(
            &cli.root,
            scan::ScanArgs {
                config,
                check,
                format,
                output,
                compact,
                fail_on,
                workers: cli.workers,
            },
        ),

        Some(Commands::Signals { format }) => signals::run(&format),

        Some(Commands::Init { force }) => init::run(&cli.root, force),

        Some(Commands::Doctor) => doctor::run(&cli.root),

        Some(Commands::Version) => {
            println!("interwatch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }

        None => scan::run(
            &cli.root,
            scan::ScanArgs {
                workers: cli.workers,
                ..scan::ScanArgs::default()
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_scan_with_globals() {
        let cli = Cli::try_parse_from(["interwatch"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.log_level, "warn");
        assert_eq!(cli.workers, 1);
    }

    #[test]
    fn test_scan_flags() {
        let cli = Cli::try_parse_from([
            "interwatch",
            "--root",
            "/tmp/plugin",
            "scan",
            "--check",
            "docs/roadmap.md",
            "-f",
            "text",
            "--fail-on",
            "high",
        ])
        .unwrap();
        assert_eq!(cli.root, PathBuf::from("/tmp/plugin"));
        match cli.command {
            Some(Commands::Scan {
                check,
                format,
                fail_on,
                ..
            }) => {
                assert_eq!(check.as_deref(), Some("docs/roadmap.md"));
                assert_eq!(format, "text");
                assert_eq!(fail_on.as_deref(), Some("high"));
            }
            other => panic!("expected scan, got {:?}", other),
        }
    }

    #[test]
    fn test_workers_bounds() {
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("abc").is_err());
        assert_eq!(parse_workers("4"), Ok(4));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["interwatch", "scan", "-f", "sarif"]).is_err());
    }
}
