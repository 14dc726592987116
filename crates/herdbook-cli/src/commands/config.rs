//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Result};

use herdbook_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
///
/// Passwords are never printed.
pub fn show(config: &Config, config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    match output.format {
        OutputFormat::Json => {
            let operators: Vec<_> = config
                .operators
                .iter()
                .map(|o| serde_json::json!({"username": o.username, "role": o.role}))
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "data_file": config.data_file,
                    "log_file": config.log_file,
                    "log_level": config.log_level,
                    "operators": operators
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_file.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_file: {}", config.data_file.display());
            println!(
                "  log_file:  {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(stderr)".to_string())
            );
            println!("  log_level: {}", config.log_level);
            println!("  operators:");
            for operator in &config.operators {
                println!("    {} ({})", operator.username, operator.role);
            }
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Write a config file holding the defaults
///
/// Refuses to replace an existing file unless `force` is set.
pub fn init(config_path: Option<&PathBuf>, force: bool, output: &Output) -> Result<()> {
    let path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);

    if path.exists() && !force {
        bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to_path(&path)?;
    output.success(&format!("Wrote default config to {}", path.display()));
    Ok(())
}
