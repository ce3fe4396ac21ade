//! Directory discovery.
//!
//! Walks a root directory and keeps every directory the inspector
//! recognizes as a Terraform module.

use crate::config::ScanOptions;
use crate::error::Result;
use crate::parser::ModuleInspector;

use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Return every module directory under `root`, `root` included.
///
/// Directories are visited depth-first with siblings in lexical order, so the
/// result is stable across runs on an unchanged tree.
///
/// # Errors
///
/// Returns `DirectoryNotFound` if `root` does not exist and `Walk` for the
/// first entry the walk cannot read. No partial result is returned.
pub fn discover_module_dirs(
    root: &Path,
    options: &ScanOptions,
    inspector: &dyn ModuleInspector,
) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(crate::err!(DirectoryNotFound {
            path: root.to_path_buf(),
        }));
    }

    let patterns: Vec<glob::Pattern> = options
        .exclude_patterns
        .iter()
        .filter_map(|p| glob::Pattern::new(p).ok())
        .collect();

    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(options.follow_links)
        .max_depth(options.max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !should_skip(e, options.skip_hidden, &patterns))
    {
        let entry = entry.map_err(|e| crate::err!(Walk {
            path: e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
            message: e.to_string(),
        }))?;

        if entry.file_type().is_dir() || (options.follow_links && entry.path().is_dir()) {
            dirs.push(clean_path(entry.path()));
        }
    }

    let modules: Vec<PathBuf> = dirs
        .into_iter()
        .filter(|dir| inspector.is_module_dir(dir))
        .collect();

    tracing::info!(
        root = %root.display(),
        modules = modules.len(),
        "Module discovery complete"
    );

    Ok(modules)
}

/// Check if a walk entry should be left out, together with its children.
fn should_skip(entry: &DirEntry, skip_hidden: bool, patterns: &[glob::Pattern]) -> bool {
    // the root itself is never skipped
    if entry.depth() == 0 {
        return false;
    }

    let Some(name) = entry.file_name().to_str() else {
        return false;
    };

    if skip_hidden && name.starts_with('.') {
        tracing::debug!(path = %entry.path().display(), reason = "hidden entry", "Skipping path");
        return true;
    }

    if patterns.iter().any(|p| p.matches(name)) {
        tracing::debug!(path = %entry.path().display(), reason = "matches exclude pattern", "Skipping path");
        return true;
    }

    false
}

/// Strip a leading `./` so walking `.` yields `.`, `modules`, `modules/vpc`.
fn clean_path(path: &Path) -> PathBuf {
    let mut components = path.components().peekable();
    if matches!(components.peek(), Some(Component::CurDir)) {
        components.next();
    }
    let cleaned: PathBuf = components.collect();
    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}
