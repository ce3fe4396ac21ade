//! Integration tests for TerraDoc.
//!
//! These tests run discovery, extraction, metadata collection and reporting
//! against the fixture trees, and drive the binary end to end.

use std::path::PathBuf;
use terradoc::{Config, DocScanner};

/// Get the path to the test fixtures directory.
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

mod discovery_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_discover_stack() {
        let scanner = DocScanner::new(Config::default());
        let root = fixtures_path().join("stack");

        let modules = scanner.discover(&root).unwrap();

        assert_eq!(modules, vec![root.clone(), root.join("modules/network")]);
    }

    #[test]
    fn test_discover_missing_root() {
        let scanner = DocScanner::new(Config::default());
        let result = scanner.discover(fixtures_path().join("does-not-exist"));
        assert!(matches!(
            result,
            Err(terradoc::TerraDocError::DirectoryNotFound { .. })
        ));
    }
}

mod extraction_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_collect_stack() {
        let scanner = DocScanner::new(Config::default());
        let root = fixtures_path().join("stack");
        let modules = scanner.discover(&root).unwrap();

        let report = scanner.collect(&modules).unwrap();

        let vars: Vec<_> = report.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(vars, vec!["bucket_name", "tags", "cidr"]);

        let bucket = &report.variables[0];
        assert_eq!(bucket.var_type, "string");
        assert_eq!(bucket.description, "Name of the log bucket");
        assert!(bucket.required);
        assert_eq!(bucket.default, None);

        let tags = &report.variables[1];
        assert_eq!(tags.var_type, "map(string)");
        assert_eq!(tags.default, Some(json!({ "team": "platform" })));
        assert!(!tags.required);
        assert_eq!(tags.source_line, "6");

        let resources: Vec<_> = report
            .resources
            .iter()
            .map(|r| (r.resource_type.as_str(), r.provider_name.as_str(), r.provider_alias.as_str()))
            .collect();
        assert_eq!(
            resources,
            vec![("aws_s3_bucket", "aws", ""), ("aws_vpc", "aws", "replica")]
        );
        assert_eq!(report.resources[0].source_line, "10");
        assert_eq!(report.resources[1].source_line, "5");

        assert_eq!(report.modules.len(), 1);
        assert_eq!(report.modules[0].source, "./modules/network");
        assert_eq!(report.modules[0].source_line, "16");

        assert_eq!(report.outputs.len(), 1);
        assert_eq!(report.outputs[0].description, "ARN of the log bucket");

        assert_eq!(report.data_sources.len(), 1);
        assert_eq!(report.data_sources[0].data_type, "aws_caller_identity");
        assert_eq!(report.data_sources[0].source_line, "14");

        let providers: Vec<_> = report.providers.iter().map(|p| p.alias.as_str()).collect();
        assert_eq!(providers, vec!["", "replica"]);
    }

    #[test]
    fn test_second_module_fails() {
        let scanner = DocScanner::new(Config::default());
        let good = fixtures_path().join("broken/good");
        let bad = fixtures_path().join("broken/bad");

        // good alone loads
        assert_eq!(scanner.collect(&[good.clone()]).unwrap().variables.len(), 1);

        let err = scanner.collect(&[good, bad.clone()]).unwrap_err();
        assert_eq!(err.module_path(), Some(bad.as_path()));
    }

    #[test]
    fn test_json_syntax_module() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("main.tf.json"),
            r#"{
  "variable": {
    "region": { "type": "string", "default": "eu-west-1" }
  }
}"#,
        )
        .unwrap();

        let scanner = DocScanner::new(Config::default());
        let modules = scanner.discover(dir.path()).unwrap();
        let report = scanner.collect(&modules).unwrap();

        assert_eq!(report.variables.len(), 1);
        assert_eq!(report.variables[0].name, "region");
        assert_eq!(report.variables[0].source_line, "3");
    }

    #[test]
    fn test_non_constant_default_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("variables.tf"),
            "variable \"n\" {\n  default = var.other\n}\n",
        )
        .unwrap();

        let scanner = DocScanner::new(Config::default());
        let err = scanner.collect(&[dir.path()]).unwrap_err();
        assert_eq!(err.module_path(), Some(dir.path()));
    }

    #[test]
    fn test_collect_nothing() {
        let scanner = DocScanner::new(Config::default());
        let report = scanner.collect::<PathBuf>(&[]).unwrap();
        assert!(report.is_empty());
    }
}

mod metadata_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_repo_info_stack() {
        let scanner = DocScanner::new(Config::default());
        let root = fixtures_path().join("stack");

        let info = scanner.repo_info(&[root]).unwrap();

        let dirs: Vec<_> = info.directories.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(dirs, vec!["docs", "modules"]);
        assert!(info.directories.iter().all(|d| !d.is_module_dir));

        let files: Vec<_> = info
            .files
            .iter()
            .map(|f| (f.name.as_str(), f.is_config_file))
            .collect();
        assert_eq!(
            files,
            vec![("main.tf", true), ("outputs.tf", true), ("variables.tf", true)]
        );
    }

    #[test]
    fn test_match_child_paths() {
        let mut config = Config::default();
        config.scan.match_child_paths = true;
        let scanner = DocScanner::new(config);

        let modules_dir = fixtures_path().join("stack/modules");
        let dirs = scanner.directories(&[modules_dir]).unwrap();

        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].name, "network");
        assert!(dirs[0].is_module_dir);
    }
}

mod reporter_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use terradoc::reporter::Reporter;
    use terradoc::ReportFormat;

    #[test]
    fn test_json_report() {
        let config = Config::default();
        let data = DocScanner::new(config.clone())
            .scan(fixtures_path().join("stack"))
            .unwrap();

        let json = Reporter::new(&config).generate(&data, ReportFormat::Json).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["meta"]["version"].is_string());
        assert_eq!(parsed["meta"]["module_count"], 2);
        assert_eq!(parsed["stats"]["variables"].as_array().unwrap().len(), 3);
        assert_eq!(parsed["stats"]["resources"][0]["mode"], "managed");
        assert!(parsed["repo"]["directories"].is_array());
    }

    #[test]
    fn test_text_report() {
        let mut config = Config::default();
        config.output.colored = false;
        let data = DocScanner::new(config.clone())
            .scan(fixtures_path().join("stack"))
            .unwrap();

        let text = Reporter::new(&config).generate(&data, ReportFormat::Text).unwrap();

        assert!(text.contains("TerraDoc"));
        assert!(text.contains("bucket_name"));
        assert!(text.contains("aws.replica"));
    }
}

mod cli_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use assert_cmd::Command;
    use predicates::prelude::*;

    #[test]
    fn test_scan_relative_paths() {
        let output = Command::cargo_bin("terradoc")
            .unwrap()
            .current_dir(fixtures_path().join("stack"))
            .args(["scan", ".", "--format", "json"])
            .env_remove("TERRADOC_CONFIG")
            .env_remove("RUST_LOG")
            .output()
            .unwrap();
        assert!(output.status.success());

        let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let stats = &parsed["stats"];

        assert_eq!(parsed["module_dirs"], serde_json::json!([".", "modules/network"]));
        assert_eq!(stats["variables"][0]["source_file"], "./variables.tf");
        assert_eq!(stats["variables"][2]["source_file"], "./modules/network/main.tf");
        assert_eq!(stats["resources"][0]["source_file"], "./main.tf");
        assert_eq!(stats["modules"][0]["source_file"], "main.tf");
        assert_eq!(stats["outputs"][0]["source_file"], "outputs.tf");
        assert_eq!(stats["data_sources"][0]["source_file"], "main.tf");
    }

    #[test]
    fn test_list_command() {
        Command::cargo_bin("terradoc")
            .unwrap()
            .current_dir(fixtures_path().join("stack"))
            .args(["list"])
            .env_remove("TERRADOC_CONFIG")
            .assert()
            .success()
            .stdout(predicate::str::contains("modules/network"));
    }

    #[test]
    fn test_scan_broken_tree_fails() {
        Command::cargo_bin("terradoc")
            .unwrap()
            .args(["scan", "--no-metadata"])
            .arg(fixtures_path().join("broken"))
            .env_remove("TERRADOC_CONFIG")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to load module"));
    }

    #[test]
    fn test_json_log_format() {
        Command::cargo_bin("terradoc")
            .unwrap()
            .current_dir(fixtures_path().join("stack"))
            .args(["-v", "--log-format", "json", "list"])
            .env_remove("TERRADOC_CONFIG")
            .env_remove("RUST_LOG")
            .assert()
            .success()
            .stderr(predicate::str::contains("\"message\":\"Module discovery complete\""));
    }

    #[test]
    fn test_validate_command() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terradoc.yaml");
        std::fs::write(&path, Config::example_yaml()).unwrap();

        Command::cargo_bin("terradoc")
            .unwrap()
            .arg("validate")
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration is valid"));
    }
}

mod config_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_loading() {
        let yaml = r#"
scan:
  exclude_patterns:
    - "modules"
"#;

        let config = Config::from_yaml(yaml).unwrap();
        let scanner = DocScanner::new(config);
        let root = fixtures_path().join("stack");

        assert_eq!(scanner.discover(&root).unwrap(), vec![root]);
    }
}
