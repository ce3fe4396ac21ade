//! # TerraDoc
//!
//! A Terraform/OpenTofu module inventory collector.
//!
//! TerraDoc walks a directory tree, finds module directories, parses their
//! declarations and flattens them into report records ready to be rendered
//! as documentation or JSON.
//!
//! ## Stages
//!
//! - **Discovery**: recursive walk keeping the directories that hold `.tf`
//!   files
//! - **Extraction**: variables, resources, module calls, outputs, data
//!   sources and providers of every module, in a single aggregate report
//! - **Metadata**: name, modification time and classification of the
//!   immediate children of every module directory
//!
//! ## Example
//!
//! ```rust,no_run
//! use terradoc::{Config, DocScanner, ReportFormat};
//!
//! fn main() -> anyhow::Result<()> {
//!     let scanner = DocScanner::new(Config::default());
//!
//!     let data = scanner.scan("./terraform")?;
//!     println!("{}", data.generate_report(ReportFormat::Json)?);
//!
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rust_2018_idioms
)]

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod metadata;
pub mod parser;
pub mod reporter;
pub mod types;

// Re-export commonly used types at crate root
pub use config::Config;
pub use error::{Result, TerraDocError};
pub use parser::{HclInspector, ModuleInspector};
pub use types::{
    AggregateReport, DataSource, DirectoryEntry, DocData, FileEntry, ModuleCall, Output,
    Provider, RepoInfo, ReportFormat, Resource, Variable,
};

use std::path::{Path, PathBuf};

/// Scanner orchestrating discovery, extraction and metadata collection.
///
/// Each stage is available on its own; [`DocScanner::scan`] runs all of them
/// over one root.
///
/// # Example
///
/// ```rust,no_run
/// use terradoc::{Config, DocScanner};
///
/// fn main() -> terradoc::Result<()> {
///     let scanner = DocScanner::new(Config::default());
///
///     let modules = scanner.discover(".")?;
///     let report = scanner.collect(&modules)?;
///
///     println!("Found {} variables", report.variables.len());
///     Ok(())
/// }
/// ```
pub struct DocScanner {
    config: Config,
    inspector: Box<dyn ModuleInspector>,
}

impl DocScanner {
    /// Create a scanner using the HCL inspector.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_inspector(config, Box::new(HclInspector::new()))
    }

    /// Create a scanner with a custom inspector.
    #[must_use]
    pub fn with_inspector(config: Config, inspector: Box<dyn ModuleInspector>) -> Self {
        Self { config, inspector }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Find every module directory under `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist or the walk fails.
    pub fn discover<P: AsRef<Path>>(&self, root: P) -> Result<Vec<PathBuf>> {
        discovery::discover_module_dirs(root.as_ref(), &self.config.scan, self.inspector.as_ref())
    }

    /// Collect the declarations of every module in `paths`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first module that fails to load.
    pub fn collect<P: AsRef<Path>>(&self, paths: &[P]) -> Result<AggregateReport> {
        extract::collect_declarations(paths, self.inspector.as_ref())
    }

    /// List the subdirectories of every path.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be listed.
    pub fn directories<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<DirectoryEntry>> {
        metadata::collect_directories(
            paths,
            self.inspector.as_ref(),
            self.config.scan.match_child_paths,
        )
    }

    /// List the files of every path.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be listed.
    pub fn files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<FileEntry>> {
        metadata::collect_files(paths, &self.config.scan.config_file_marker)
    }

    /// List subdirectories and files of every path.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be listed.
    pub fn repo_info<P: AsRef<Path>>(&self, paths: &[P]) -> Result<RepoInfo> {
        metadata::collect_repo_info(
            paths,
            self.inspector.as_ref(),
            self.config.scan.match_child_paths,
            &self.config.scan.config_file_marker,
        )
    }

    /// Run every stage over `root`.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage.
    pub fn scan<P: AsRef<Path>>(&self, root: P) -> Result<DocData> {
        self.scan_with(root, true)
    }

    /// Run discovery and extraction, and metadata collection when
    /// `with_metadata` is set.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage.
    pub fn scan_with<P: AsRef<Path>>(&self, root: P, with_metadata: bool) -> Result<DocData> {
        let root = root.as_ref();
        tracing::info!(root = %root.display(), "Scanning path");

        let module_dirs = self.discover(root)?;
        let stats = self.collect(&module_dirs)?;
        let repo = if with_metadata {
            self.repo_info(&module_dirs)?
        } else {
            RepoInfo::default()
        };

        tracing::info!(
            modules = module_dirs.len(),
            records = stats.len(),
            directories = repo.directories.len(),
            files = repo.files.len(),
            "Scan complete"
        );

        Ok(DocData {
            module_dirs,
            stats,
            repo,
        })
    }
}
