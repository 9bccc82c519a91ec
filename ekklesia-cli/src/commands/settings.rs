//! Settings inspection.

use anyhow::{Context, Result};
use ekklesia_cell::Settings;
use std::path::Path;

const DEFAULT_CONFIG: &str = "ekklesia.yml";

/// Load settings from `config`, or from `ekklesia.yml` in the working
/// directory if it exists. Without either, every setting has its default.
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    let path = match config {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
        None => {
            tracing::debug!("No settings file, using defaults");
            return Ok(Settings::default());
        }
    };

    tracing::debug!("Loading settings from {}", path.display());
    Settings::from_file(path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

pub fn show_settings(config: Option<&Path>, key: Option<&str>, json: bool) -> Result<()> {
    let settings = load_settings(config)?;

    if let Some(key) = key {
        let value = settings
            .get(key)
            .with_context(|| format!("Setting '{}' is unknown or not set", key))?;
        println!("{value}");
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        print!("{}", serde_yaml::to_string(&settings)?);
    }
    Ok(())
}
