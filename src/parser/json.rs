//! Terraform JSON configuration syntax (`.tf.json`).
//!
//! Each block type is an object keyed by its labels, one nesting level per
//! label. A block body is an object, or an array of objects when the same
//! labels are declared more than once.

use crate::error::{Result, TerraDocError};
use crate::parser::implied_provider;
use crate::parser::positions::json_key_line;
use crate::types::{
    ParsedModule, ParsedModuleCall, ParsedOutput, ParsedProviderConfig, ParsedResource,
    ParsedVariable, ProviderRef, ResourceMode, SourcePos,
};

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

type Object = Map<String, Value>;

/// Parse one JSON-syntax file of the module at `dir`.
///
/// # Errors
///
/// Returns `HclParse` for invalid JSON and `HclStructure` when the document
/// does not have the Terraform block shape.
pub fn parse_json_content(content: &str, dir: &Path, file_name: &str) -> Result<ParsedModule> {
    let reader = JsonFile {
        content,
        dir,
        file_name,
        file_path: dir.join(file_name),
    };

    let root: Value = serde_json::from_str(content).map_err(|e| crate::err!(HclParse {
        file: reader.file_path.clone(),
        message: e.to_string(),
        line: Some(e.line()),
        column: Some(e.column()),
    }))?;
    let Value::Object(root) = root else {
        return Err(reader.invalid("the document root must be an object".to_string()));
    };

    let mut module = ParsedModule::new(dir);
    for (section, value) in &root {
        match section.as_str() {
            "variable" => {
                for (name, body) in reader.labelled(section, value)? {
                    module.variables.push(reader.variable(name, body)?);
                }
            }
            "resource" => module
                .managed_resources
                .extend(reader.resources(section, value, ResourceMode::Managed)?),
            "data" => module
                .data_resources
                .extend(reader.resources(section, value, ResourceMode::Data)?),
            "module" => {
                for (name, body) in reader.labelled(section, value)? {
                    module.module_calls.push(ParsedModuleCall {
                        name: name.clone(),
                        source: reader.string(body, "source", section)?,
                        version: reader.string(body, "version", section)?,
                        pos: reader.pos(&[section.as_str(), name.as_str()]),
                    });
                }
            }
            "output" => {
                for (name, body) in reader.labelled(section, value)? {
                    module.outputs.push(ParsedOutput {
                        name: name.clone(),
                        description: reader.string(body, "description", section)?,
                        sensitive: reader.bool(body, "sensitive", section)?,
                        pos: reader.pos(&[section.as_str(), name.as_str()]),
                    });
                }
            }
            "provider" => {
                for (name, body) in reader.labelled(section, value)? {
                    module.provider_configs.push(ParsedProviderConfig {
                        name: name.clone(),
                        alias: reader.string(body, "alias", section)?,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(module)
}

/// One JSON file being read.
struct JsonFile<'a> {
    content: &'a str,
    dir: &'a Path,
    file_name: &'a str,
    file_path: PathBuf,
}

impl JsonFile<'_> {
    fn invalid(&self, message: String) -> TerraDocError {
        crate::err!(HclStructure {
            file: self.file_path.clone(),
            message: message,
        })
    }

    fn pos(&self, keys: &[&str]) -> SourcePos {
        SourcePos::new(self.dir, self.file_name, json_key_line(self.content, keys))
    }

    /// Accept an object or an array of objects.
    fn objects<'v>(&self, value: &'v Value, what: &str) -> Result<Vec<&'v Object>> {
        match value {
            Value::Object(object) => Ok(vec![object]),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_object()
                        .ok_or_else(|| self.invalid(format!("{what} must hold objects")))
                })
                .collect(),
            _ => Err(self.invalid(format!("{what} must be an object"))),
        }
    }

    /// Flatten a single-label block type into `(label, body)` pairs.
    fn labelled<'v>(&self, section: &str, value: &'v Value) -> Result<Vec<(&'v String, &'v Object)>> {
        let mut blocks = Vec::new();
        for labels in self.objects(value, section)? {
            for (name, block) in labels {
                for body in self.objects(block, &format!("{section} \"{name}\""))? {
                    blocks.push((name, body));
                }
            }
        }
        Ok(blocks)
    }

    fn resources(&self, section: &str, value: &Value, mode: ResourceMode) -> Result<Vec<ParsedResource>> {
        let mut resources = Vec::new();
        for types in self.objects(value, section)? {
            for (resource_type, names) in types {
                let label = resource_type.as_str();
                for (name, body) in self.labelled(&format!("{section} \"{label}\""), names)? {
                    let provider = match body.get("provider") {
                        None => implied_provider(label),
                        Some(Value::String(reference)) => {
                            let (name, alias) = reference.split_once('.').unwrap_or((reference.as_str(), ""));
                            ProviderRef {
                                name: name.to_string(),
                                alias: alias.to_string(),
                            }
                        }
                        Some(_) => {
                            return Err(self.invalid(format!(
                                "invalid provider reference in {label}.{name}"
                            )))
                        }
                    };
                    resources.push(ParsedResource {
                        mode,
                        resource_type: resource_type.clone(),
                        name: name.clone(),
                        provider,
                        pos: self.pos(&[section, label, name.as_str()]),
                    });
                }
            }
        }
        Ok(resources)
    }

    fn variable(&self, name: &str, body: &Object) -> Result<ParsedVariable> {
        let type_expr = match body.get("type") {
            None => String::new(),
            Some(Value::String(expr)) => expr.clone(),
            Some(_) => {
                return Err(self.invalid(format!("type of variable '{name}' must be a string")))
            }
        };
        let default = body.get("default").cloned();

        Ok(ParsedVariable {
            name: name.to_string(),
            type_expr,
            required: default.is_none(),
            default,
            description: self.string(body, "description", "variable")?,
            sensitive: self.bool(body, "sensitive", "variable")?,
            pos: self.pos(&["variable", name]),
        })
    }

    fn string(&self, body: &Object, key: &str, section: &str) -> Result<String> {
        match body.get(key) {
            None => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(self.invalid(format!(
                "attribute '{key}' of {section} block must be a string"
            ))),
        }
    }

    fn bool(&self, body: &Object, key: &str, section: &str) -> Result<bool> {
        match body.get(key) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(self.invalid(format!(
                "attribute '{key}' of {section} block must be a bool"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(content: &str) -> ParsedModule {
        parse_json_content(content, Path::new("net"), "main.tf.json").unwrap()
    }

    #[test]
    fn test_parse_json_blocks() {
        let module = parse(
            r#"{
  "variable": {
    "region": {
      "type": "string",
      "default": "eu-west-1",
      "description": "Region"
    },
    "token": {
      "sensitive": true
    }
  },
  "provider": {
    "aws": [
      { "region": "eu-west-1" },
      { "alias": "us", "region": "us-east-1" }
    ]
  },
  "resource": {
    "aws_vpc": {
      "main": { "provider": "aws.us" }
    }
  },
  "data": {
    "aws_ami": {
      "ubuntu": {}
    }
  },
  "module": {
    "subnets": { "source": "./subnets", "version": "1.0.0" }
  },
  "output": {
    "vpc_id": { "value": "${aws_vpc.main.id}", "sensitive": true }
  },
  "locals": { "x": 1 }
}"#,
        );

        let names: Vec<_> = module.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["region", "token"]);
        let region = &module.variables[0];
        assert_eq!(region.type_expr, "string");
        assert_eq!(region.default, Some(json!("eu-west-1")));
        assert!(!region.required);
        assert_eq!(region.pos.line, 3);
        assert_eq!(region.pos.file, PathBuf::from("net/main.tf.json"));
        assert!(module.variables[1].required);
        assert!(module.variables[1].sensitive);

        assert_eq!(module.provider_configs.len(), 2);
        assert_eq!(module.provider_configs[1].alias, "us");

        let vpc = &module.managed_resources[0];
        assert_eq!(vpc.provider, ProviderRef { name: "aws".to_string(), alias: "us".to_string() });
        assert_eq!(vpc.pos.line, 20);

        let ami = &module.data_resources[0];
        assert_eq!(ami.mode, ResourceMode::Data);
        assert_eq!(ami.provider.name, "aws");

        assert_eq!(module.module_calls[0].version, "1.0.0");
        assert!(module.outputs[0].sensitive);
    }

    #[test]
    fn test_invalid_json() {
        let result = parse_json_content("{ \"variable\": ", Path::new("."), "main.tf.json");
        assert!(matches!(result, Err(TerraDocError::HclParse { line: Some(_), .. })));
    }

    #[test]
    fn test_wrong_shape() {
        let result = parse_json_content(r#"{"variable": ["x"]}"#, Path::new("."), "main.tf.json");
        assert!(matches!(result, Err(TerraDocError::HclStructure { .. })));

        let result = parse_json_content(r#"{"output": {"x": {"sensitive": "yes"}}}"#, Path::new("."), "main.tf.json");
        assert!(matches!(result, Err(TerraDocError::HclStructure { .. })));
    }
}
