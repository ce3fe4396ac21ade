//! Report generation module.
//!
//! This module renders scan results in two formats:
//! - JSON: Machine-readable structured output
//! - Text: Human-readable CLI tables
//!
//! # Example
//!
//! ```rust,no_run
//! use terradoc::reporter::Reporter;
//! use terradoc::{Config, DocScanner, ReportFormat};
//!
//! fn main() -> terradoc::Result<()> {
//!     let config = Config::default();
//!     let data = DocScanner::new(config.clone()).scan(".")?;
//!
//!     let reporter = Reporter::new(&config);
//!     println!("{}", reporter.generate(&data, ReportFormat::Text)?);
//!     Ok(())
//! }
//! ```

mod json;
mod text;

use crate::config::Config;
use crate::error::Result;
use crate::types::{DocData, ReportFormat};

pub use json::{JsonReport, JsonReporter};
pub use text::TextReporter;

/// Report generator that supports multiple output formats.
pub struct Reporter {
    config: Config,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate a report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate(&self, data: &DocData, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => JsonReporter::new(&self.config).generate(data),
            ReportFormat::Text => TextReporter::new(&self.config).generate(data),
        }
    }
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Generate a report from scan results.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn generate(&self, data: &DocData) -> Result<String>;
}
