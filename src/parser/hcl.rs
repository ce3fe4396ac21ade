//! HCL module inspector implementation.
//!
//! This module provides the production [`ModuleInspector`] using the `hcl-rs`
//! crate for the object model and `hcl-edit` for block positions.

use crate::error::{Result, ResultExt};
use crate::parser::json::parse_json_content;
use crate::parser::{block_positions, implied_provider, is_config_file_name, ModuleInspector};
use crate::types::{
    ParsedModule, ParsedModuleCall, ParsedOutput, ParsedProviderConfig, ParsedResource,
    ParsedVariable, ProviderRef, ResourceMode, SourcePos,
};

use hcl::eval::{Context, Evaluate};
use hcl::expr::TraversalOperator;
use hcl::{Block, Body, Expression};
use std::path::Path;

/// Inspector for native-syntax Terraform modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct HclInspector;

impl HclInspector {
    /// Create a new inspector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// List the configuration file names of a directory, sorted.
    fn config_files(path: &Path) -> std::io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_config_file_name(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Parse the contents of one file of the module at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid HCL or a block is
    /// malformed.
    pub fn parse_content(&self, content: &str, dir: &Path, file_name: &str) -> Result<ParsedModule> {
        let file_path = dir.join(file_name);

        let body: Body = hcl::from_str(content).map_err(|e| crate::err!(HclParse {
            file: file_path.clone(),
            message: e.to_string(),
            line: None,
            column: None,
        }))?;
        let positions = block_positions(content, &file_path)?;

        let mut result = ParsedModule::new(dir);
        let blocks: Vec<&Block> = body.blocks().collect();
        if blocks.len() != positions.len() {
            return Err(crate::err!(Internal {
                message: format!(
                    "block count mismatch in '{}': {} parsed, {} positioned",
                    file_path.display(),
                    blocks.len(),
                    positions.len()
                ),
            }));
        }

        for (block, position) in blocks.into_iter().zip(positions) {
            let pos = SourcePos::new(dir, file_name, position.line);
            match block.identifier.as_str() {
                "variable" => result.variables.push(parse_variable(
                    block,
                    pos,
                    position.type_source,
                    &file_path,
                )?),
                "resource" => result.managed_resources.push(parse_resource(
                    block,
                    ResourceMode::Managed,
                    pos,
                    &file_path,
                )?),
                "data" => result.data_resources.push(parse_resource(
                    block,
                    ResourceMode::Data,
                    pos,
                    &file_path,
                )?),
                "module" => result.module_calls.push(parse_module_call(block, pos, &file_path)?),
                "output" => result.outputs.push(parse_output(block, pos, &file_path)?),
                "provider" => result.provider_configs.push(parse_provider(block, &file_path)?),
                _ => {
                    // terraform, locals, moved, import, ... carry nothing we report
                }
            }
        }

        Ok(result)
    }
}

impl ModuleInspector for HclInspector {
    fn is_module_dir(&self, path: &Path) -> bool {
        match Self::config_files(path) {
            Ok(files) => !files.is_empty(),
            Err(e) => {
                tracing::trace!(path = %path.display(), error = %e, "Not a readable directory");
                false
            }
        }
    }

    fn load_module(&self, path: &Path) -> Result<ParsedModule> {
        let mut module = ParsedModule::new(path);

        for file_name in Self::config_files(path).with_path(path)? {
            let file_path = path.join(&file_name);
            tracing::debug!(file = %file_path.display(), "Parsing file");

            let content = std::fs::read_to_string(&file_path).with_path(&file_path)?;
            let parsed = if file_name.ends_with(".tf.json") {
                parse_json_content(&content, path, &file_name)?
            } else {
                self.parse_content(&content, path, &file_name)?
            };
            module.merge(parsed);
        }

        tracing::debug!(
            path = %path.display(),
            declarations = module.declaration_count(),
            "Module loaded"
        );

        Ok(module)
    }
}

/// Get a block label by position.
fn label(block: &Block, index: usize, what: &str, file_path: &Path) -> Result<String> {
    block
        .labels
        .get(index)
        .map(|l| l.as_str().to_string())
        .ok_or_else(|| crate::err!(HclStructure {
            file: file_path.to_path_buf(),
            message: format!("{} block requires a {what} label", block.identifier.as_str()),
        }))
}

/// Find an attribute expression in a block body.
fn attribute<'a>(block: &'a Block, key: &str) -> Option<&'a Expression> {
    block
        .body
        .attributes()
        .find(|attr| attr.key.as_str() == key)
        .map(|attr| &attr.expr)
}

/// Evaluate a constant expression (no variables, no functions).
fn constant(expr: &Expression) -> Option<hcl::Value> {
    expr.evaluate(&Context::new()).ok()
}

/// Read a string attribute; empty when absent.
fn string_attribute(block: &Block, key: &str, file_path: &Path) -> Result<String> {
    match attribute(block, key) {
        None => Ok(String::new()),
        Some(expr) => match constant(expr) {
            Some(hcl::Value::String(s)) => Ok(s),
            _ => Err(crate::err!(HclStructure {
                file: file_path.to_path_buf(),
                message: format!(
                    "attribute '{key}' of {} block must be a literal string",
                    block.identifier.as_str()
                ),
            })),
        },
    }
}

/// Read a bool attribute; false when absent.
fn bool_attribute(block: &Block, key: &str, file_path: &Path) -> Result<bool> {
    match attribute(block, key) {
        None => Ok(false),
        Some(expr) => match constant(expr) {
            Some(hcl::Value::Bool(b)) => Ok(b),
            _ => Err(crate::err!(HclStructure {
                file: file_path.to_path_buf(),
                message: format!(
                    "attribute '{key}' of {} block must be a literal bool",
                    block.identifier.as_str()
                ),
            })),
        },
    }
}

fn parse_variable(
    block: &Block,
    pos: SourcePos,
    type_source: Option<String>,
    file_path: &Path,
) -> Result<ParsedVariable> {
    let name = label(block, 0, "name", file_path)?;

    let default_expr = attribute(block, "default");
    let default = match default_expr {
        None => None,
        Some(expr) => {
            let value = constant(expr).ok_or_else(|| crate::err!(HclStructure {
                file: file_path.to_path_buf(),
                message: format!("default of variable '{name}' must be a constant value"),
            }))?;
            Some(serde_json::to_value(value)?)
        }
    };

    Ok(ParsedVariable {
        type_expr: type_source.unwrap_or_default(),
        default,
        description: string_attribute(block, "description", file_path)?,
        required: default_expr.is_none(),
        sensitive: bool_attribute(block, "sensitive", file_path)?,
        pos,
        name,
    })
}

fn parse_resource(
    block: &Block,
    mode: ResourceMode,
    pos: SourcePos,
    file_path: &Path,
) -> Result<ParsedResource> {
    let resource_type = label(block, 0, "type", file_path)?;
    let name = label(block, 1, "name", file_path)?;

    let provider = match attribute(block, "provider") {
        Some(expr) => provider_ref(expr).ok_or_else(|| crate::err!(HclStructure {
            file: file_path.to_path_buf(),
            message: format!("invalid provider reference in {resource_type}.{name}"),
        }))?,
        None => implied_provider(&resource_type),
    };

    Ok(ParsedResource {
        mode,
        resource_type,
        name,
        provider,
        pos,
    })
}

/// Parse `provider = aws`, `provider = aws.west` or legacy `provider = "aws.west"`.
fn provider_ref(expr: &Expression) -> Option<ProviderRef> {
    match expr {
        Expression::Variable(var) => Some(ProviderRef {
            name: var.as_str().to_string(),
            alias: String::new(),
        }),
        Expression::Traversal(traversal) => {
            let Expression::Variable(var) = &traversal.expr else {
                return None;
            };
            match traversal.operators.as_slice() {
                [TraversalOperator::GetAttr(alias)] => Some(ProviderRef {
                    name: var.as_str().to_string(),
                    alias: alias.as_str().to_string(),
                }),
                _ => None,
            }
        }
        Expression::String(s) => {
            let (name, alias) = s.split_once('.').unwrap_or((s.as_str(), ""));
            Some(ProviderRef {
                name: name.to_string(),
                alias: alias.to_string(),
            })
        }
        _ => None,
    }
}

fn parse_module_call(block: &Block, pos: SourcePos, file_path: &Path) -> Result<ParsedModuleCall> {
    Ok(ParsedModuleCall {
        name: label(block, 0, "name", file_path)?,
        source: string_attribute(block, "source", file_path)?,
        version: string_attribute(block, "version", file_path)?,
        pos,
    })
}

fn parse_output(block: &Block, pos: SourcePos, file_path: &Path) -> Result<ParsedOutput> {
    Ok(ParsedOutput {
        name: label(block, 0, "name", file_path)?,
        description: string_attribute(block, "description", file_path)?,
        sensitive: bool_attribute(block, "sensitive", file_path)?,
        pos,
    })
}

fn parse_provider(block: &Block, file_path: &Path) -> Result<ParsedProviderConfig> {
    Ok(ParsedProviderConfig {
        name: label(block, 0, "name", file_path)?,
        alias: string_attribute(block, "alias", file_path)?,
    })
}
