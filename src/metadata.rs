//! Filesystem metadata collection.
//!
//! Lists the immediate children of module directories and records name,
//! modification time and a classification for each subdirectory and file.
//!
//! Both collectors fail atomically: on the first listing error only the
//! error is returned.

use crate::error::{Result, ResultExt};
use crate::parser::ModuleInspector;
use crate::types::{DirectoryEntry, FileEntry, RepoInfo};

use chrono::{DateTime, Utc};
use std::fs::Metadata;
use std::path::Path;

/// One listed child of a directory.
struct Child {
    name: String,
    metadata: Metadata,
}

/// List the children of `dir`, sorted by name.
///
/// Symbolic links are not followed, matching `lstat`.
fn list_children(dir: &Path) -> Result<Vec<Child>> {
    let mut children = Vec::new();
    for entry in std::fs::read_dir(dir).with_path(dir)? {
        let entry = entry.with_path(dir)?;
        let metadata = entry.metadata().with_path(entry.path())?;
        children.push(Child {
            name: entry.file_name().to_string_lossy().into_owned(),
            metadata,
        });
    }
    children.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(children)
}

fn modification_time(child: &Child, dir: &Path) -> Result<DateTime<Utc>> {
    let modified = child.metadata.modified().with_path(dir.join(&child.name))?;
    Ok(DateTime::<Utc>::from(modified))
}

/// Record every subdirectory of every path in `paths`.
///
/// By default a subdirectory is classified by passing its bare name to the
/// inspector, which resolves it against the process working directory rather
/// than the parent. Set `match_child_paths` to classify `parent/child`
/// instead.
///
/// # Errors
///
/// Returns `Io` for the first directory that cannot be listed.
pub fn collect_directories<P: AsRef<Path>>(
    paths: &[P],
    inspector: &dyn ModuleInspector,
    match_child_paths: bool,
) -> Result<Vec<DirectoryEntry>> {
    let mut dirs = Vec::new();

    for path in paths {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Listing directories");

        for child in list_children(path)? {
            if !child.metadata.is_dir() {
                continue;
            }
            let is_module_dir = if match_child_paths {
                inspector.is_module_dir(&path.join(&child.name))
            } else {
                inspector.is_module_dir(Path::new(&child.name))
            };
            dirs.push(DirectoryEntry {
                modification_time: modification_time(&child, path)?,
                name: child.name,
                is_module_dir,
            });
        }
    }

    Ok(dirs)
}

/// Record every non-directory child of every path in `paths`.
///
/// A file is a configuration file when its name contains `marker` anywhere,
/// so `vars.tfvars.bak` matches `.tf`.
///
/// # Errors
///
/// Returns `Io` for the first directory that cannot be listed.
pub fn collect_files<P: AsRef<Path>>(paths: &[P], marker: &str) -> Result<Vec<FileEntry>> {
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Listing files");

        for child in list_children(path)? {
            if child.metadata.is_dir() {
                continue;
            }
            files.push(FileEntry {
                modification_time: modification_time(&child, path)?,
                is_config_file: child.name.contains(marker),
                name: child.name,
            });
        }
    }

    Ok(files)
}

/// Collect both listings.
///
/// # Errors
///
/// Returns `Io` for the first directory that cannot be listed.
pub fn collect_repo_info<P: AsRef<Path>>(
    paths: &[P],
    inspector: &dyn ModuleInspector,
    match_child_paths: bool,
    marker: &str,
) -> Result<RepoInfo> {
    Ok(RepoInfo {
        directories: collect_directories(paths, inspector, match_child_paths)?,
        files: collect_files(paths, marker)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TerraDocError;
    use crate::parser::MockModuleInspector;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_files_substring_marker() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["main.tf", "readme.md", "vars.tfvars.bak"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("nested.tf")).unwrap();

        let files = collect_files(&[dir.path()], ".tf").unwrap();
        let got: Vec<_> = files
            .iter()
            .map(|f| (f.name.as_str(), f.is_config_file))
            .collect();

        assert_eq!(
            got,
            vec![("main.tf", true), ("readme.md", false), ("vars.tfvars.bak", true)]
        );
    }

    #[test]
    fn test_directories_bare_name_check() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("vpc")).unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("main.tf"), "").unwrap();

        let mut inspector = MockModuleInspector::new();
        inspector
            .expect_is_module_dir()
            .withf(|p| p.is_relative())
            .times(2)
            .returning(|p| p == Path::new("vpc"));

        let dirs = collect_directories(&[dir.path()], &inspector, false).unwrap();
        let got: Vec<_> = dirs.iter().map(|d| (d.name.as_str(), d.is_module_dir)).collect();
        assert_eq!(got, vec![("docs", false), ("vpc", true)]);
    }

    #[test]
    fn test_directories_joined_path_check() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("vpc")).unwrap();
        let expected = dir.path().join("vpc");

        let mut inspector = MockModuleInspector::new();
        inspector
            .expect_is_module_dir()
            .withf(move |p| p == expected)
            .times(1)
            .returning(|_| true);

        let dirs = collect_directories(&[dir.path()], &inspector, true).unwrap();
        assert!(dirs[0].is_module_dir);
    }

    #[test]
    fn test_listing_error_is_atomic() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.tf"), "").unwrap();
        let missing = dir.path().join("missing");

        let result = collect_files(&[dir.path(), missing.as_path()], ".tf");
        match result {
            Err(TerraDocError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_repo_info() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("child")).unwrap();
        fs::write(dir.path().join("outputs.tf"), "").unwrap();

        let mut inspector = MockModuleInspector::new();
        inspector.expect_is_module_dir().returning(|_| false);

        let info = collect_repo_info(&[dir.path()], &inspector, false, ".tf").unwrap();
        assert_eq!(info.directories.len(), 1);
        assert_eq!(info.files.len(), 1);
        assert!(info.files[0].is_config_file);
        assert!(info.files[0].modification_time <= Utc::now());
    }
}
