//! Output formatting utilities

use colored::*;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

/// Print a vector of items in the specified format
pub fn print_output<T: Serialize + Tabled>(data: Vec<T>, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                println!("{}", "No results".dimmed());
            } else {
                let table = Table::new(data).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&data) {
            Ok(json) => println!("{}", json),
            Err(e) => print_error(&format!("serialization failed: {}", e)),
        },
        OutputFormat::Yaml => match serde_yaml::to_string(&data) {
            Ok(yaml) => println!("{}", yaml),
            Err(e) => print_error(&format!("serialization failed: {}", e)),
        },
    }
}

/// Print a single serializable item as JSON or YAML. Table format falls
/// back to YAML, which reads best for nested policy values.
pub fn print_single<T: Serialize>(data: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(data) {
            Ok(json) => println!("{}", json),
            Err(e) => print_error(&format!("serialization failed: {}", e)),
        },
        OutputFormat::Table | OutputFormat::Yaml => match serde_yaml::to_string(data) {
            Ok(yaml) => println!("{}", yaml),
            Err(e) => print_error(&format!("serialization failed: {}", e)),
        },
    }
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("{}", text.bold());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}
