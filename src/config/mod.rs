// SPDX-License-Identifier: MPL-2.0
//! Site configuration stored in `settings.toml`.
//!
//! # Sections
//!
//! - `[contact]` - EmailJS identifiers and the recipient name
//! - `[resume]` - downloadable resume links
//! - `[download]` - download trigger timeout and fallback behaviour
//!
//! # Precedence
//!
//! Environment variables (see [`defaults`]) win over the file, which wins
//! over the built-in defaults. Empty environment values are ignored.
//!
//! # Examples
//!
//! ```no_run
//! use folio::config;
//!
//! let (config, warning) = config::load();
//! if let Some(key) = warning {
//!     eprintln!("settings ignored: {key}");
//! }
//! println!("resume: {}", config.resume.pdf_url);
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// EmailJS delivery settings for the contact form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContactConfig {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    /// Name the email template addresses the message to.
    pub to_name: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_EMAILJS_ENDPOINT.to_string(),
            service_id: DEFAULT_EMAILJS_SERVICE_ID.to_string(),
            template_id: DEFAULT_EMAILJS_TEMPLATE_ID.to_string(),
            public_key: DEFAULT_EMAILJS_PUBLIC_KEY.to_string(),
            to_name: DEFAULT_CONTACT_TO_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResumeConfig {
    pub pdf_url: String,
    pub docx_url: String,
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            pdf_url: DEFAULT_RESUME_LINK_PDF.to_string(),
            docx_url: DEFAULT_RESUME_LINK_DOCX.to_string(),
        }
    }
}

/// Download trigger settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DownloadConfig {
    /// Milliseconds to wait for a load/error event before assuming success.
    pub timeout_ms: u64,

    /// Navigate to the file directly when the embedded context fails.
    pub fallback_navigate: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_DOWNLOAD_TIMEOUT_MS,
            fallback_navigate: true,
        }
    }
}

impl DownloadConfig {
    /// The configured timeout, clamped to the accepted range.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(
            self.timeout_ms
                .clamp(MIN_DOWNLOAD_TIMEOUT_MS, MAX_DOWNLOAD_TIMEOUT_MS),
        )
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub contact: ContactConfig,

    #[serde(default)]
    pub resume: ResumeConfig,

    #[serde(default)]
    pub download: DownloadConfig,
}

impl Config {
    /// Applies environment overrides using the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(value) = read(ENV_EMAILJS_SERVICE_ID) {
            self.contact.service_id = value;
        }
        if let Some(value) = read(ENV_EMAILJS_TEMPLATE_ID) {
            self.contact.template_id = value;
        }
        if let Some(value) = read(ENV_EMAILJS_PUBLIC_KEY) {
            self.contact.public_key = value;
        }
        if let Some(value) = read(ENV_RESUME_LINK_PDF) {
            self.resume.pdf_url = value;
        }
        if let Some(value) = read(ENV_RESUME_LINK_DOCX) {
            self.resume.docx_url = value;
        }
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path, then applies the environment.
///
/// Returns a tuple of (config, optional_warning). If the file exists but
/// cannot be read, defaults are used and the warning carries an i18n key.
pub fn load() -> (Config, Option<String>) {
    let (mut config, warning) = load_with_override(None);
    config.apply_env();
    (config, warning)
}

/// Loads the file configuration from a custom directory, without env overrides.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), "failed to load settings: {err}");
                    return (
                        Config::default(),
                        Some("notification.configLoadError".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    match get_config_path_with_override(base_dir) {
        Some(path) => save_to_path(config, &path),
        None => Err(Error::Config("cannot determine config directory".to_string())),
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
