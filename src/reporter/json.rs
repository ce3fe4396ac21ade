//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{AggregateReport, DocData, RepoInfo};
use serde::Serialize;

/// JSON report generator.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
        }
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, data: &DocData) -> Result<String> {
        let report = JsonReport::from(data);

        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };

        json.map_err(|e| crate::err!(ReportGeneration {
            message: format!("Failed to serialize JSON report: {e}"),
        }))
    }
}

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Report metadata
    pub meta: ReportMetadata,
    /// Discovered module directories
    pub module_dirs: Vec<String>,
    /// Declaration records
    pub stats: &'a AggregateReport,
    /// Directory listings
    pub repo: &'a RepoInfo,
}

impl<'a> From<&'a DocData> for JsonReport<'a> {
    fn from(data: &'a DocData) -> Self {
        Self {
            meta: ReportMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                module_count: data.module_dirs.len(),
            },
            module_dirs: data
                .module_dirs
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            stats: &data.stats,
            repo: &data.repo,
        }
    }
}

/// Report metadata.
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    /// TerraDoc version
    pub version: String,
    /// Report generation timestamp
    pub timestamp: String,
    /// Number of module directories
    pub module_count: usize,
}
