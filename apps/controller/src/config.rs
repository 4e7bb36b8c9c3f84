use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::{DEFAULT_BATTERY, DEFAULT_ENDPOINT, DEFAULT_SPEED};

pub const DEFAULT_CONFIG_FILE: &str = "controller.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub endpoint: String,
    pub initial_speed: i64,
    pub battery: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            initial_speed: DEFAULT_SPEED.into(),
            battery: DEFAULT_BATTERY.into(),
        }
    }
}

/// Defaults, then the config file, then environment overrides.
///
/// An explicitly requested file must exist; the default `controller.toml` is
/// optional.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<Settings> {
    let settings = match explicit_path {
        Some(path) => read_settings_file(path)?,
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read_settings_file(path)?
            } else {
                Settings::default()
            }
        }
    };

    Ok(apply_env_overrides(settings, |key| std::env::var(key).ok()))
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

fn apply_env_overrides(mut settings: Settings, lookup: impl Fn(&str) -> Option<String>) -> Settings {
    if let Some(v) = lookup("CONTROLLER_ENDPOINT") {
        settings.endpoint = v;
    }
    if let Some(v) = lookup("APP__ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = lookup("APP__INITIAL_SPEED") {
        match v.trim().parse::<i64>() {
            Ok(parsed) => settings.initial_speed = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring non-numeric APP__INITIAL_SPEED"),
        }
    }
    if let Some(v) = lookup("APP__BATTERY") {
        match v.trim().parse::<i64>() {
            Ok(parsed) => settings.battery = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring non-numeric APP__BATTERY"),
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
