//! Declaration extraction.
//!
//! Loads each module directory and flattens its declarations into one
//! [`AggregateReport`].

use crate::error::Result;
use crate::parser::ModuleInspector;
use crate::types::AggregateReport;

use std::path::Path;

/// Load every module in `paths` and collect their declarations.
///
/// Records keep input order: all records of the first path come before those
/// of the second, and within a path variables come first, then resources,
/// module calls, outputs, data sources and providers.
///
/// # Errors
///
/// Returns `ModuleLoad` naming the first path that fails to load. Records
/// gathered from earlier paths are dropped.
pub fn collect_declarations<P: AsRef<Path>>(
    paths: &[P],
    inspector: &dyn ModuleInspector,
) -> Result<AggregateReport> {
    let mut report = AggregateReport::default();

    for path in paths {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading module");

        let module = inspector.load_module(path).map_err(|e| crate::err!(ModuleLoad {
            path: path.to_path_buf(),
            source: Box::new(e),
        }))?;
        report.append_module(module);
    }

    tracing::info!(
        modules = paths.len(),
        variables = report.variables.len(),
        resources = report.resources.len(),
        module_calls = report.modules.len(),
        outputs = report.outputs.len(),
        data_sources = report.data_sources.len(),
        providers = report.providers.len(),
        "Extraction complete"
    );

    Ok(report)
}
