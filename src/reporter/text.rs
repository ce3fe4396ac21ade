//! Plain text report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::DocData;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

/// Text report generator for CLI output.
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to include directory and file listings
    verbose: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
            verbose: config.output.verbose,
        }
    }
}

impl ReportGenerator for TextReporter {
    fn generate(&self, data: &DocData) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header());
        output.push_str(&self.format_summary(data));

        let stats = &data.stats;

        if !stats.variables.is_empty() {
            let rows = stats.variables.iter().map(|v| {
                vec![
                    v.name.clone(),
                    v.var_type.clone(),
                    v.default.as_ref().map(ToString::to_string).unwrap_or_default(),
                    yes_no(v.required),
                    yes_no(v.sensitive),
                    format!("{}:{}", v.source_file, v.source_line),
                ]
            });
            output.push_str(&self.format_table(
                "Variables",
                &["Name", "Type", "Default", "Required", "Sensitive", "Location"],
                rows,
            ));
        }

        if !stats.resources.is_empty() {
            let rows = stats.resources.iter().map(|r| {
                vec![
                    r.resource_type.clone(),
                    r.name.clone(),
                    provider_label(&r.provider_name, &r.provider_alias),
                    format!("{}:{}", r.source_file, r.source_line),
                ]
            });
            output.push_str(&self.format_table(
                "Resources",
                &["Type", "Name", "Provider", "Location"],
                rows,
            ));
        }

        if !stats.modules.is_empty() {
            let rows = stats.modules.iter().map(|m| {
                vec![
                    m.name.clone(),
                    m.source.clone(),
                    m.version.clone(),
                    format!("{}:{}", m.source_file, m.source_line),
                ]
            });
            output.push_str(&self.format_table(
                "Modules",
                &["Name", "Source", "Version", "Location"],
                rows,
            ));
        }

        if !stats.outputs.is_empty() {
            let rows = stats.outputs.iter().map(|o| {
                vec![
                    o.name.clone(),
                    o.description.clone(),
                    yes_no(o.sensitive),
                    format!("{}:{}", o.source_file, o.source_line),
                ]
            });
            output.push_str(&self.format_table(
                "Outputs",
                &["Name", "Description", "Sensitive", "Location"],
                rows,
            ));
        }

        if !stats.data_sources.is_empty() {
            let rows = stats.data_sources.iter().map(|d| {
                vec![
                    d.data_type.clone(),
                    d.name.clone(),
                    provider_label(&d.provider_name, &d.provider_alias),
                    format!("{}:{}", d.source_file, d.source_line),
                ]
            });
            output.push_str(&self.format_table(
                "Data Sources",
                &["Type", "Name", "Provider", "Location"],
                rows,
            ));
        }

        if !stats.providers.is_empty() {
            let rows = stats
                .providers
                .iter()
                .map(|p| vec![p.name.clone(), p.alias.clone()]);
            output.push_str(&self.format_table("Providers", &["Name", "Alias"], rows));
        }

        if self.verbose {
            let rows = data.repo.directories.iter().map(|d| {
                vec![
                    d.name.clone(),
                    d.modification_time.format("%Y-%m-%d %H:%M:%S").to_string(),
                    yes_no(d.is_module_dir),
                ]
            });
            output.push_str(&self.format_table("Directories", &["Name", "Modified", "Module"], rows));

            let rows = data.repo.files.iter().map(|f| {
                vec![
                    f.name.clone(),
                    f.modification_time.format("%Y-%m-%d %H:%M:%S").to_string(),
                    yes_no(f.is_config_file),
                ]
            });
            output.push_str(&self.format_table("Files", &["Name", "Modified", "Terraform"], rows));
        }

        Ok(output)
    }
}

impl TextReporter {
    /// Format the report header.
    fn format_header(&self) -> String {
        let title = "TerraDoc Inventory";
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));

        if self.use_colors {
            format!(
                "\n{} {}\n{}\n",
                title.bright_white().bold(),
                version.dimmed(),
                "=".repeat(80).bright_blue(),
            )
        } else {
            format!("\n{title} {version}\n{}\n", "=".repeat(80))
        }
    }

    /// Format the summary line.
    fn format_summary(&self, data: &DocData) -> String {
        let stats = &data.stats;
        let summary = format!(
            "  {} module dirs | {} variables | {} resources | {} module calls | {} outputs | {} data sources | {} providers\n",
            data.module_dirs.len(),
            stats.variables.len(),
            stats.resources.len(),
            stats.modules.len(),
            stats.outputs.len(),
            stats.data_sources.len(),
            stats.providers.len(),
        );
        format!("{}{summary}", self.section_title("Summary"))
    }

    fn section_title(&self, title: &str) -> String {
        let title = if self.use_colors {
            title.bright_cyan().bold().to_string()
        } else {
            title.to_string()
        };
        format!("\n{title}\n{}\n", "-".repeat(80))
    }

    fn format_table<I>(&self, title: &str, header: &[&str], rows: I) -> String
    where
        I: Iterator<Item = Vec<String>>,
    {
        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header.to_vec());
        for row in rows {
            table.add_row(row);
        }

        format!("{}{table}\n", self.section_title(title))
    }
}

fn yes_no(flag: bool) -> String {
    let label = if flag { "yes" } else { "no" };
    label.to_string()
}

fn provider_label(name: &str, alias: &str) -> String {
    if alias.is_empty() {
        name.to_string()
    } else {
        format!("{name}.{alias}")
    }
}
