//! Show or initialize the configuration file.

use anyhow::Context;
use mvstab_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, init: bool) -> anyhow::Result<()> {
    let path = config_file_path();

    if init {
        if path.exists() {
            println!("Config already exists at: {}", path.display());
            return Ok(());
        }
        let written = AppConfig::default()
            .save()
            .context("Failed to write default config")?;
        println!("Default config written to: {}", written.display());
        return Ok(());
    }

    if path.exists() {
        println!("Config file: {}", path.display());
    } else {
        println!("Config file: {} (not found, using defaults)", path.display());
    }
    println!("{}", serde_json::to_string_pretty(config)?);

    let params = config.stabilizer.to_params();
    println!();
    println!("Effective kernel params:");
    println!("  history_weight: {}", params.history_weight);
    println!("  conf_influence: {}", params.conf_influence);
    println!("  neighborhood_size: {}", params.neighborhood_size);

    Ok(())
}
