//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `scan`: Collect module declarations and directory metadata
//! - `list`: Print the discovered module directories
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Scan the current directory
//! terradoc scan
//!
//! # Generate a JSON report for another tree
//! terradoc scan ./infra --format json --output inventory.json
//!
//! # List module directories only
//! terradoc list ./infra
//!
//! # Initialize configuration
//! terradoc init
//! ```

use crate::types::ReportFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// TerraDoc - Terraform/OpenTofu module inventory collector.
#[derive(Parser, Debug)]
#[command(
    name = "terradoc",
    author,
    version,
    about = "Terraform/OpenTofu module inventory collector",
    long_about = "TerraDoc walks a directory tree, finds Terraform/OpenTofu module \
                  directories and collects their variables, resources, module calls, \
                  outputs, data sources and providers into a flat report."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "TERRADOC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value = "text", env = "TERRADOC_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Format of the diagnostic log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect declarations and metadata of every module under a root
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    /// Print the module directories found under a root
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the scan command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Root directory to walk
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Patterns to exclude from the walk (glob patterns)
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude_patterns: Vec<String>,

    /// Maximum depth for recursive directory scanning
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Skip hidden files and directories
    #[arg(long)]
    pub skip_hidden: bool,

    /// Classify listed subdirectories by their full path
    #[arg(long)]
    pub match_child_paths: bool,

    /// Skip the directory and file listings
    #[arg(long)]
    pub no_metadata: bool,
}

/// Arguments for the list command.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Root directory to walk
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "terradoc.yaml")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parsing() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::parse_from(["terradoc", "scan"]);
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.root, PathBuf::from("."));
                assert_eq!(args.format, ReportFormat::Text);
                assert_eq!(args.max_depth, None);
                assert!(!args.match_child_paths);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_scan_with_options() {
        let cli = Cli::parse_from([
            "terradoc",
            "scan",
            "./infra",
            "--format",
            "json",
            "--output",
            "inventory.json",
            "-e",
            "vendor",
            "--max-depth",
            "3",
            "--match-child-paths",
        ]);
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.root, PathBuf::from("./infra"));
                assert_eq!(args.format, ReportFormat::Json);
                assert_eq!(args.output, Some(PathBuf::from("inventory.json")));
                assert_eq!(args.exclude_patterns, vec!["vendor".to_string()]);
                assert_eq!(args.max_depth, Some(3));
                assert!(args.match_child_paths);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_list_alias() {
        let cli = Cli::parse_from(["terradoc", "ls", "infra"]);
        match cli.command {
            Commands::List(args) => assert_eq!(args.root, PathBuf::from("infra")),
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::parse_from(["terradoc", "-vv", "--config", "custom.yaml", "scan"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    }

    #[test]
    fn test_log_format() {
        let cli = Cli::parse_from(["terradoc", "list"]);
        assert_eq!(cli.log_format, LogFormat::Text);

        let cli = Cli::parse_from(["terradoc", "list", "--log-format", "json"]);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["terradoc", "validate"]);
        match cli.command {
            Commands::Validate(args) => assert_eq!(args.config, PathBuf::from("terradoc.yaml")),
            _ => panic!("Expected Validate command"),
        }
    }
}
