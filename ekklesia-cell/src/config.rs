//! Application settings read by cells.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Settings matching the ekklesia.yml schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: AppSettings,

    #[serde(default)]
    pub static_files: StaticFilesSettings,

    #[serde(default)]
    pub i18n: I18nSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub custom_footer_url: Option<String>,

    #[serde(default)]
    pub tos_url: Option<String>,

    #[serde(default)]
    pub faq_url: Option<String>,

    #[serde(default)]
    pub imprint_url: Option<String>,

    #[serde(default = "default_source_code_url")]
    pub source_code_url: String,
}

fn default_title() -> String {
    String::from("ekklesia")
}

fn default_source_code_url() -> String {
    String::from("https://github.com/dpausp/ekklesia-common")
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            custom_footer_url: None,
            tos_url: None,
            faq_url: None,
            imprint_url: None,
            source_code_url: default_source_code_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticFilesSettings {
    #[serde(default = "default_static_base_url")]
    pub base_url: String,
}

fn default_static_base_url() -> String {
    String::from("/static")
}

impl Default for StaticFilesSettings {
    fn default() -> Self {
        Self {
            base_url: default_static_base_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct I18nSettings {
    #[serde(default = "default_locale")]
    pub default_locale: String,

    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
}

fn default_locale() -> String {
    String::from("de")
}

fn default_locales() -> Vec<String> {
    vec![String::from("de"), String::from("en")]
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            locales: default_locales(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        // an empty document means "all defaults"
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Get a settings value using a dotted path (e.g., "app.title")
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["app", "title"] => Some(self.app.title.clone()),
            ["app", "custom_footer_url"] => self.app.custom_footer_url.clone(),
            ["app", "tos_url"] => self.app.tos_url.clone(),
            ["app", "faq_url"] => self.app.faq_url.clone(),
            ["app", "imprint_url"] => self.app.imprint_url.clone(),
            ["app", "source_code_url"] => Some(self.app.source_code_url.clone()),
            ["static_files", "base_url"] => Some(self.static_files.base_url.clone()),
            ["i18n", "default_locale"] => Some(self.i18n.default_locale.clone()),
            ["i18n", "locales"] => Some(self.i18n.locales.join(",")),
            _ => None,
        }
    }

    /// URL of a static asset below `static_files.base_url`.
    pub fn static_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            return path.to_string();
        }
        let base = self.static_files.base_url.as_str();
        if base.is_empty() || base.ends_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
