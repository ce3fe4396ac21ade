//! Module inspection for Terraform/OpenTofu directories.
//!
//! This module decides whether a directory is a Terraform module and turns
//! its `.tf` and `.tf.json` files into a [`ParsedModule`].
//!
//! # Supported Constructs
//!
//! - `variable`, `output`, `module` blocks
//! - `resource` and `data` blocks, with their provider reference
//! - `provider` configuration blocks
//!
//! # Example
//!
//! ```rust,no_run
//! use terradoc::parser::{HclInspector, ModuleInspector};
//! use std::path::Path;
//!
//! fn main() -> terradoc::Result<()> {
//!     let inspector = HclInspector::new();
//!     if inspector.is_module_dir(Path::new("./terraform")) {
//!         let module = inspector.load_module(Path::new("./terraform"))?;
//!         println!("Found {} variables", module.variables.len());
//!     }
//!     Ok(())
//! }
//! ```

mod hcl;
mod json;
mod positions;

pub use self::hcl::HclInspector;
pub use self::json::parse_json_content;
pub use self::positions::{block_positions, BlockPosition};

use crate::types::{ParsedModule, ProviderRef};
use std::path::Path;

/// File suffixes of Terraform configuration files.
pub const TERRAFORM_EXTENSIONS: &[&str] = &[".tf", ".tf.json"];

/// Capability to recognize and load module directories.
///
/// Discovery, extraction and metadata collection only talk to this trait, so
/// tests can substitute a fake.
#[cfg_attr(test, mockall::automock)]
pub trait ModuleInspector {
    /// Whether `path` is a directory holding Terraform configuration files.
    ///
    /// Unreadable paths are not module directories.
    fn is_module_dir(&self, path: &Path) -> bool;

    /// Load every declaration of the module at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or one of its files cannot be read
    /// or parsed.
    fn load_module(&self, path: &Path) -> crate::Result<ParsedModule>;
}

/// Whether `name` is a Terraform configuration file name.
///
/// Editor artifacts (`.#main.tf`, `#main.tf#`, `main.tf~`) and hidden files
/// are not.
#[must_use]
pub fn is_config_file_name(name: &str) -> bool {
    if name.starts_with('.') || name.starts_with('#') || name.ends_with('~') {
        return false;
    }
    TERRAFORM_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// The default provider of a resource type is its prefix before the first `_`.
pub(crate) fn implied_provider(resource_type: &str) -> ProviderRef {
    let name = resource_type
        .split_once('_')
        .map_or(resource_type, |(prefix, _)| prefix);
    ProviderRef {
        name: name.to_string(),
        alias: String::new(),
    }
}
