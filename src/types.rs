//! Core data types used throughout TerraDoc.
//!
//! This module defines:
//! - The parsed module model produced by a [`crate::parser::ModuleInspector`]
//! - The flat report records built from it
//! - Filesystem metadata entries and report formats

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// =============================================================================
// Parsed module model
// =============================================================================

/// Where a declaration was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePos {
    /// File the declaration lives in, joined onto the module directory
    pub file: PathBuf,
    /// 1-based line of the block header
    pub line: usize,
}

impl SourcePos {
    /// Create a position for `file_name` inside `dir`.
    ///
    /// A `.` directory (or a leading `./`) is dropped so that a module at the
    /// walk root reports `main.tf` rather than `./main.tf`.
    #[must_use]
    pub fn new(dir: &Path, file_name: &str, line: usize) -> Self {
        Self {
            file: clean_join(dir, file_name),
            line,
        }
    }

    /// The file rendered as reported by the loader.
    #[must_use]
    pub fn raw_file(&self) -> String {
        self.file.display().to_string()
    }

    /// The file rendered with a `./` prefix.
    #[must_use]
    pub fn prefixed_file(&self) -> String {
        format!("./{}", self.file.display())
    }

    /// The line rendered as decimal text.
    #[must_use]
    pub fn line_text(&self) -> String {
        self.line.to_string()
    }
}

/// Join `name` onto `dir`, skipping `.` components.
fn clean_join(dir: &Path, name: &str) -> PathBuf {
    let mut joined: PathBuf = dir
        .components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect();
    joined.push(name);
    joined
}

/// Resource mode: a managed `resource` or a `data` source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceMode {
    /// `resource` blocks
    Managed,
    /// `data` blocks
    Data,
}

impl std::fmt::Display for ResourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Managed => write!(f, "managed"),
            Self::Data => write!(f, "data"),
        }
    }
}

/// Provider a resource is bound to (`provider = aws.west`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRef {
    /// Provider local name (e.g. "aws")
    pub name: String,
    /// Alias, empty for the default configuration
    pub alias: String,
}

/// A `variable` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedVariable {
    pub name: String,
    /// Type constraint as written, empty when omitted
    pub type_expr: String,
    /// Constant default value, `None` when absent or not a constant
    pub default: Option<serde_json::Value>,
    pub description: String,
    /// True when no `default` attribute is present
    pub required: bool,
    pub sensitive: bool,
    pub pos: SourcePos,
}

/// A `resource` or `data` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResource {
    pub mode: ResourceMode,
    pub resource_type: String,
    pub name: String,
    pub provider: ProviderRef,
    pub pos: SourcePos,
}

/// A `module` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedModuleCall {
    pub name: String,
    pub source: String,
    pub version: String,
    pub pos: SourcePos,
}

/// An `output` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedOutput {
    pub name: String,
    pub description: String,
    pub sensitive: bool,
    pub pos: SourcePos,
}

/// A `provider` configuration block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedProviderConfig {
    pub name: String,
    pub alias: String,
}

/// Everything declared by one module directory, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedModule {
    /// The module directory
    pub path: PathBuf,
    pub variables: Vec<ParsedVariable>,
    pub managed_resources: Vec<ParsedResource>,
    pub data_resources: Vec<ParsedResource>,
    pub module_calls: Vec<ParsedModuleCall>,
    pub outputs: Vec<ParsedOutput>,
    pub provider_configs: Vec<ParsedProviderConfig>,
}

impl ParsedModule {
    /// Create an empty module description for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Append the declarations of another parsed file.
    pub fn merge(&mut self, other: Self) {
        self.variables.extend(other.variables);
        self.managed_resources.extend(other.managed_resources);
        self.data_resources.extend(other.data_resources);
        self.module_calls.extend(other.module_calls);
        self.outputs.extend(other.outputs);
        self.provider_configs.extend(other.provider_configs);
    }

    /// Total number of declarations.
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.variables.len()
            + self.managed_resources.len()
            + self.data_resources.len()
            + self.module_calls.len()
            + self.outputs.len()
            + self.provider_configs.len()
    }
}

// =============================================================================
// Report records
// =============================================================================

/// Report record for a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: String,
    pub default: Option<serde_json::Value>,
    pub description: String,
    pub required: bool,
    pub sensitive: bool,
    pub source_file: String,
    pub source_line: String,
}

impl From<ParsedVariable> for Variable {
    fn from(v: ParsedVariable) -> Self {
        Self {
            source_file: v.pos.prefixed_file(),
            source_line: v.pos.line_text(),
            name: v.name,
            var_type: v.type_expr,
            default: v.default,
            description: v.description,
            required: v.required,
            sensitive: v.sensitive,
        }
    }
}

/// Report record for a managed resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub mode: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub provider_name: String,
    pub provider_alias: String,
    pub source_file: String,
    pub source_line: String,
}

impl From<ParsedResource> for Resource {
    fn from(r: ParsedResource) -> Self {
        Self {
            mode: r.mode.to_string(),
            source_file: r.pos.prefixed_file(),
            source_line: r.pos.line_text(),
            resource_type: r.resource_type,
            name: r.name,
            provider_name: r.provider.name,
            provider_alias: r.provider.alias,
        }
    }
}

/// Report record for a module call.
///
/// Unlike [`Variable`] and [`Resource`], the file is reported without a `./`
/// prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCall {
    pub name: String,
    pub source: String,
    pub version: String,
    pub source_file: String,
    pub source_line: String,
}

impl From<ParsedModuleCall> for ModuleCall {
    fn from(m: ParsedModuleCall) -> Self {
        Self {
            source_file: m.pos.raw_file(),
            source_line: m.pos.line_text(),
            name: m.name,
            source: m.source,
            version: m.version,
        }
    }
}

/// Report record for an output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub name: String,
    pub description: String,
    pub sensitive: bool,
    pub source_file: String,
    pub source_line: String,
}

impl From<ParsedOutput> for Output {
    fn from(o: ParsedOutput) -> Self {
        Self {
            source_file: o.pos.raw_file(),
            source_line: o.pos.line_text(),
            name: o.name,
            description: o.description,
            sensitive: o.sensitive,
        }
    }
}

/// Report record for a data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub data_type: String,
    pub name: String,
    pub provider_name: String,
    pub provider_alias: String,
    pub source_file: String,
    pub source_line: String,
}

impl From<ParsedResource> for DataSource {
    fn from(d: ParsedResource) -> Self {
        Self {
            source_file: d.pos.raw_file(),
            source_line: d.pos.line_text(),
            data_type: d.resource_type,
            name: d.name,
            provider_name: d.provider.name,
            provider_alias: d.provider.alias,
        }
    }
}

/// Report record for a provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    pub alias: String,
}

impl From<ParsedProviderConfig> for Provider {
    fn from(p: ParsedProviderConfig) -> Self {
        Self {
            name: p.name,
            alias: p.alias,
        }
    }
}

/// All declaration records across every processed module directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub variables: Vec<Variable>,
    pub resources: Vec<Resource>,
    pub modules: Vec<ModuleCall>,
    pub outputs: Vec<Output>,
    pub data_sources: Vec<DataSource>,
    pub providers: Vec<Provider>,
}

impl AggregateReport {
    /// Translate and append every declaration of `module`.
    pub fn append_module(&mut self, module: ParsedModule) {
        self.variables
            .extend(module.variables.into_iter().map(Variable::from));
        self.resources
            .extend(module.managed_resources.into_iter().map(Resource::from));
        self.modules
            .extend(module.module_calls.into_iter().map(ModuleCall::from));
        self.outputs
            .extend(module.outputs.into_iter().map(Output::from));
        self.data_sources
            .extend(module.data_resources.into_iter().map(DataSource::from));
        self.providers
            .extend(module.provider_configs.into_iter().map(Provider::from));
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
            + self.resources.len()
            + self.modules.len()
            + self.outputs.len()
            + self.data_sources.len()
            + self.providers.len()
    }

    /// Whether the report holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Filesystem metadata
// =============================================================================

/// A subdirectory found while listing a module directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub modification_time: DateTime<Utc>,
    pub is_module_dir: bool,
}

/// A file found while listing a module directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub modification_time: DateTime<Utc>,
    pub is_config_file: bool,
}

/// Directory and file listings for a set of module directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub directories: Vec<DirectoryEntry>,
    pub files: Vec<FileEntry>,
}

/// Result of a full scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocData {
    /// Discovered module directories, in walk order
    pub module_dirs: Vec<PathBuf>,
    /// Declaration records
    pub stats: AggregateReport,
    /// Directory listings of every module directory
    pub repo: RepoInfo,
}

impl DocData {
    /// Generate a report in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate_report(&self, format: ReportFormat) -> crate::Result<String> {
        let config = crate::Config::default();
        let reporter = crate::reporter::Reporter::new(&config);
        reporter.generate(self, format)
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ReportFormat {
    /// JSON format
    #[default]
    Json,
    /// Plain text format
    Text,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(dir: &str, file: &str, line: usize) -> SourcePos {
        SourcePos::new(Path::new(dir), file, line)
    }

    #[test]
    fn test_source_pos_drops_current_dir() {
        assert_eq!(pos(".", "main.tf", 3).raw_file(), "main.tf");
        assert_eq!(pos("./modules/vpc", "main.tf", 3).raw_file(), "modules/vpc/main.tf");
        assert_eq!(pos("modules/vpc", "main.tf", 3).prefixed_file(), "./modules/vpc/main.tf");
        assert_eq!(pos(".", "main.tf", 12).line_text(), "12");
    }

    #[test]
    fn test_resource_mode_display() {
        assert_eq!(ResourceMode::Managed.to_string(), "managed");
        assert_eq!(ResourceMode::Data.to_string(), "data");
    }

    #[test]
    fn test_append_module_prefixes() {
        let mut module = ParsedModule::new("net");
        module.variables.push(ParsedVariable {
            name: "cidr".to_string(),
            type_expr: "string".to_string(),
            default: None,
            description: String::new(),
            required: true,
            sensitive: false,
            pos: pos("net", "variables.tf", 1),
        });
        module.managed_resources.push(ParsedResource {
            mode: ResourceMode::Managed,
            resource_type: "aws_vpc".to_string(),
            name: "this".to_string(),
            provider: ProviderRef { name: "aws".to_string(), alias: String::new() },
            pos: pos("net", "main.tf", 1),
        });
        module.module_calls.push(ParsedModuleCall {
            name: "subnets".to_string(),
            source: "./subnets".to_string(),
            version: String::new(),
            pos: pos("net", "main.tf", 5),
        });
        module.outputs.push(ParsedOutput {
            name: "id".to_string(),
            description: "VPC id".to_string(),
            sensitive: false,
            pos: pos("net", "outputs.tf", 1),
        });
        module.data_resources.push(ParsedResource {
            mode: ResourceMode::Data,
            resource_type: "aws_region".to_string(),
            name: "current".to_string(),
            provider: ProviderRef { name: "aws".to_string(), alias: String::new() },
            pos: pos("net", "main.tf", 9),
        });

        let mut report = AggregateReport::default();
        report.append_module(module);

        assert_eq!(report.len(), 5);
        assert_eq!(report.variables[0].source_file, "./net/variables.tf");
        assert_eq!(report.resources[0].source_file, "./net/main.tf");
        assert_eq!(report.resources[0].mode, "managed");
        assert_eq!(report.modules[0].source_file, "net/main.tf");
        assert_eq!(report.outputs[0].source_file, "net/outputs.tf");
        assert_eq!(report.data_sources[0].source_file, "net/main.tf");
        assert_eq!(report.data_sources[0].source_line, "9");
    }

    #[test]
    fn test_empty_report() {
        let report = AggregateReport::default();
        assert!(report.is_empty());
    }
}
