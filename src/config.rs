//! Configuration module for TerraDoc.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`terradoc.yaml`)
//! - Environment variables
//! - CLI arguments
//!
//! # Configuration File Format
//!
//! ```yaml
//! # terradoc.yaml
//!
//! # Scanning options
//! scan:
//!   exclude_patterns:
//!     - ".terraform"
//!   skip_hidden: false
//!   follow_links: false
//!   max_depth: 100
//!   config_file_marker: ".tf"
//!   match_child_paths: false
//!
//! # Output options
//! output:
//!   colored: true
//!   pretty: true
//!   verbose: false
//! ```

use crate::error::{Result, TerraDocError};
use serde::{Deserialize, Serialize};

/// Scanning options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Patterns to exclude from the walk (glob patterns matched against entry names).
    pub exclude_patterns: Vec<String>,

    /// Skip entries whose name starts with a dot.
    pub skip_hidden: bool,

    /// Follow symbolic links while walking.
    pub follow_links: bool,

    /// Maximum depth for recursive directory scanning.
    pub max_depth: usize,

    /// Substring that marks a file as a configuration file in listings.
    pub config_file_marker: String,

    /// Check `parent/child` instead of the bare child name when classifying
    /// listed subdirectories.
    pub match_child_paths: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            skip_hidden: false,
            follow_links: false,
            max_depth: default_max_depth(),
            config_file_marker: default_marker(),
            match_child_paths: false,
        }
    }
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Use colored output.
    pub colored: bool,

    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Verbose output mode (include directory and file listings in text reports).
    pub verbose: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            colored: true,
            pretty: true,
            verbose: false,
        }
    }
}

/// Main configuration structure with nested sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scanning options
    pub scan: ScanOptions,

    /// Output options
    pub output: OutputOptions,
}

fn default_max_depth() -> usize {
    100
}

fn default_marker() -> String {
    ".tf".to_string()
}

impl Config {
    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or a value is out of range.
    pub fn from_yaml(content: &str) -> Result<Self> {
        tracing::debug!("Parsing configuration from YAML");
        let expanded = expand_env_vars(content);

        let config: Config = serde_yaml::from_str(&expanded).map_err(|e| {
            TerraDocError::config_parse(e.to_string(), Some(Box::new(e)), file!(), line!())
        })?;
        config.validate()?;

        tracing::debug!(
            exclude_patterns = config.scan.exclude_patterns.len(),
            max_depth = config.scan.max_depth,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValue` for the first offending key.
    pub fn validate(&self) -> Result<()> {
        if self.scan.max_depth == 0 {
            return Err(crate::err!(ConfigValue {
                key: "scan.max_depth".to_string(),
                message: "must be at least 1".to_string(),
            }));
        }
        if self.scan.config_file_marker.is_empty() {
            return Err(crate::err!(ConfigValue {
                key: "scan.config_file_marker".to_string(),
                message: "must not be empty".to_string(),
            }));
        }
        for pattern in &self.scan.exclude_patterns {
            if let Err(e) = glob::Pattern::new(pattern) {
                return Err(crate::err!(ConfigValue {
                    key: "scan.exclude_patterns".to_string(),
                    message: format!("invalid glob '{pattern}': {e}"),
                }));
            }
        }
        Ok(())
    }

    /// Generate an example YAML configuration.
    #[must_use]
    pub fn example_yaml() -> String {
        r#"# TerraDoc Configuration File

# Scanning options
scan:
  # Entry names to leave out of the walk (glob patterns)
  exclude_patterns:
    - ".terraform"
    - ".git"

  # Skip every entry starting with a dot
  skip_hidden: false

  # Follow symbolic links while walking
  follow_links: false

  # Maximum depth for recursive directory scanning
  max_depth: 100

  # Substring marking a file as Terraform configuration in listings
  config_file_marker: ".tf"

  # Classify listed subdirectories by their full path instead of their name
  match_child_paths: false

# Output options
output:
  # Use colored output in terminal
  colored: true

  # Pretty-print JSON output
  pretty: true

  # Include directory and file listings in text output
  verbose: false
"#
        .to_string()
    }

    /// Merge CLI arguments into the configuration.
    pub fn merge_cli_args(&mut self, args: &crate::cli::ScanArgs) {
        if !args.exclude_patterns.is_empty() {
            self.scan
                .exclude_patterns
                .extend(args.exclude_patterns.iter().cloned());
        }
        if let Some(max_depth) = args.max_depth {
            self.scan.max_depth = max_depth;
        }
        if args.match_child_paths {
            self.scan.match_child_paths = true;
        }
        if args.skip_hidden {
            self.scan.skip_hidden = true;
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. Unknown variables are left as-is.
fn expand_env_vars(content: &str) -> String {
    let mut result = content.to_string();

    let braced = regex::Regex::new(r"\$\{([^}]+)\}").expect("static regex");
    for cap in braced.captures_iter(content) {
        if let Ok(value) = std::env::var(&cap[1]) {
            result = result.replace(&cap[0], &value);
        }
    }

    let bare = regex::Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("static regex");
    for cap in bare.captures_iter(content) {
        if let Ok(value) = std::env::var(&cap[1]) {
            result = result.replace(&cap[0], &value);
        }
    }

    result
}
