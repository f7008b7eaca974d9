use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::LocationId;
use thiserror::Error;
use url::Url;

use crate::session::SessionOptions;

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

const DEFAULT_PRESETS: [&str; 8] = [
    "Lahore",
    "Karachi",
    "Islamabad",
    "Faisalabad",
    "Multan",
    "Delhi",
    "London",
    "New York",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub default_location: String,
    pub preset_locations: Vec<String>,
    pub history_hours: u32,
    pub request_timeout_secs: u64,
    pub cancel_superseded: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".into(),
            default_location: "Lahore".into(),
            preset_locations: DEFAULT_PRESETS.iter().map(|city| city.to_string()).collect(),
            history_hours: 24,
            request_timeout_secs: 10,
            cancel_superseded: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid api base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("api base url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("invalid {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Optional overrides read from `dashboard.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_base_url: Option<String>,
    default_location: Option<String>,
    preset_locations: Option<Vec<String>>,
    history_hours: Option<u32>,
    request_timeout_secs: Option<u64>,
    cancel_superseded: Option<bool>,
}

/// Connection parameters handed to the HTTP provider at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub base_url: Url,
    pub history_hours: u32,
    pub request_timeout: Duration,
}

impl Settings {
    pub fn apply_file_str(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw).context("failed to parse settings file")?;

        if let Some(v) = file_cfg.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file_cfg.default_location {
            self.default_location = v;
        }
        if let Some(v) = file_cfg.preset_locations {
            self.preset_locations = v;
        }
        if let Some(v) = file_cfg.history_hours {
            self.history_hours = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file_cfg.cancel_superseded {
            self.cancel_superseded = v;
        }
        Ok(())
    }

    /// Applies environment overrides through `lookup` so tests need not touch
    /// the process environment.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("APP__API_BASE_URL") {
            self.api_base_url = v;
        }

        if let Some(v) = lookup("APP__DEFAULT_LOCATION") {
            self.default_location = v;
        }

        if let Some(v) = lookup("APP__HISTORY_HOURS") {
            self.history_hours = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "APP__HISTORY_HOURS",
                value: v.clone(),
            })?;
        }

        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs =
                v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "APP__REQUEST_TIMEOUT_SECS",
                    value: v.clone(),
                })?;
        }

        if let Some(v) = lookup("APP__CANCEL_SUPERSEDED") {
            self.cancel_superseded = match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "APP__CANCEL_SUPERSEDED",
                        value: v,
                    })
                }
            };
        }

        Ok(())
    }

    pub fn default_location(&self) -> Result<LocationId, ConfigError> {
        LocationId::parse(&self.default_location).map_err(|_| ConfigError::InvalidValue {
            key: "default_location",
            value: self.default_location.clone(),
        })
    }

    /// Presets that survive trimming; blank entries are skipped.
    pub fn preset_locations(&self) -> Vec<LocationId> {
        self.preset_locations
            .iter()
            .filter_map(|raw| LocationId::parse(raw).ok())
            .collect()
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            cancel_superseded: self.cancel_superseded,
        }
    }

    pub fn provider_config(&self) -> Result<ProviderConfig, ConfigError> {
        Ok(ProviderConfig {
            base_url: parse_base_url(&self.api_base_url)?,
            history_hours: self.history_hours,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}

/// Defaults, then the settings file, then the environment.
///
/// An explicit `path` must exist; otherwise `dashboard.toml` in the working
/// directory is read when present.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (file, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    if required || file.exists() {
        let raw = fs::read_to_string(&file)
            .with_context(|| format!("failed to read settings file '{}'", file.display()))?;
        settings
            .apply_file_str(&raw)
            .with_context(|| format!("invalid settings file '{}'", file.display()))?;
    }

    settings.apply_env_with(|key| std::env::var(key).ok())?;
    Ok(settings)
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
