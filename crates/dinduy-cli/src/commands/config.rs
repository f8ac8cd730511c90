//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use dinduy_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "log_file": config.log_file,
                    "history_limit": config.history_limit,
                    "long_press_ms": config.long_press_ms,
                    "scroll_settle_ms": config.scroll_settle_ms,
                    "header_offset": config.header_offset,
                    "swipe_threshold": config.swipe_threshold,
                    "copy_suffix": config.copy_suffix
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:         {}", config.data_dir.display());
            println!(
                "  log_file:         {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!("  history_limit:    {}", config.history_limit);
            println!("  long_press_ms:    {}", config.long_press_ms);
            println!("  scroll_settle_ms: {}", config.scroll_settle_ms);
            println!("  header_offset:    {}", config.header_offset);
            println!("  swipe_threshold:  {}", config.swipe_threshold);
            println!("  copy_suffix:      {:?}", config.copy_suffix);
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: &str,
    value: &str,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, key, value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

/// Apply one `key = value` assignment
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        "history_limit" => {
            let limit: usize = value
                .parse()
                .context("Invalid value for history_limit. Use a positive integer.")?;
            if limit == 0 {
                bail!("history_limit must be at least 1");
            }
            config.history_limit = limit;
        }
        "long_press_ms" => {
            config.long_press_ms = value
                .parse()
                .context("Invalid value for long_press_ms. Use milliseconds.")?;
        }
        "scroll_settle_ms" => {
            config.scroll_settle_ms = value
                .parse()
                .context("Invalid value for scroll_settle_ms. Use milliseconds.")?;
        }
        "header_offset" => {
            config.header_offset = value
                .parse()
                .context("Invalid value for header_offset. Use pixels.")?;
        }
        "swipe_threshold" => {
            let threshold: f64 = value
                .parse()
                .context("Invalid value for swipe_threshold. Use pixels.")?;
            if !threshold.is_finite() || threshold < 0.0 {
                bail!("swipe_threshold must be a non-negative number");
            }
            config.swipe_threshold = threshold;
        }
        "copy_suffix" => {
            config.copy_suffix = value.to_string();
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, log_file, history_limit, long_press_ms, \
                 scroll_settle_ms, header_offset, swipe_threshold, copy_suffix",
                key
            );
        }
    }
    Ok(())
}
