// SPDX-License-Identifier: MPL-2.0
//! Application root state.
//!
//! `App` wires together configuration, the durable preference store and the
//! site-wide contexts (language, theme), and hands out the per-feature state
//! objects (resume downloads, contact form) configured from them.

pub mod paths;
pub mod persisted_state;

use crate::config::{self, Config};
use crate::contact::{ContactFormState, EmailJsClient};
use crate::download::{FrameHost, ResumeDownloader};
use crate::error::Result;
use crate::i18n::{BundleSource, EmbeddedBundles, LanguageContext};
use crate::theming::ThemeContext;
use persisted_state::{FileStore, KeyValueStore, MemoryStore};
use std::fmt;
use std::sync::Arc;

/// Startup options, usually taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// Language to switch to after startup (persisted like any other switch).
    pub lang: Option<String>,
    pub config_dir: Option<String>,
    pub data_dir: Option<String>,
}

/// Which resume export a download button points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
}

impl ResumeFormat {
    pub fn url(self, config: &Config) -> &str {
        match self {
            ResumeFormat::Pdf => &config.resume.pdf_url,
            ResumeFormat::Docx => &config.resume.docx_url,
        }
    }
}

impl std::str::FromStr for ResumeFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(ResumeFormat::Pdf),
            "docx" | "word" => Ok(ResumeFormat::Docx),
            other => Err(format!("unknown resume format: {other}")),
        }
    }
}

pub struct App {
    pub config: Config,
    pub i18n: LanguageContext,
    pub theme: ThemeContext,
    store: Arc<dyn KeyValueStore>,
    /// Localization key of a problem met while loading the config, if any.
    config_warning: Option<String>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("language", &self.i18n.language())
            .field("theme", &self.theme.mode())
            .field("config_warning", &self.config_warning)
            .finish()
    }
}

impl App {
    /// Loads config and preferences from disk and waits for the startup
    /// translations to settle.
    pub async fn new(flags: Flags) -> Self {
        paths::init_cli_overrides(flags.data_dir, flags.config_dir);

        let (config, config_warning) = config::load();
        let store: Arc<dyn KeyValueStore> = match FileStore::open() {
            Ok(store) => Arc::new(store),
            Err(err) => {
                tracing::warn!("preferences unavailable, using in-memory store: {err}");
                Arc::new(MemoryStore::new())
            }
        };

        let mut app = Self::with_parts(config, store, Arc::new(EmbeddedBundles)).await;
        app.config_warning = config_warning;

        if let Some(code) = flags.lang.as_deref() {
            if let Err(err) = app.i18n.set_language_code(code).await {
                tracing::error!(code, "language switch aborted: {err}");
            }
        }
        app
    }

    /// Builds the application from already-loaded parts.
    pub async fn with_parts(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        bundles: Arc<dyn BundleSource>,
    ) -> Self {
        let i18n = LanguageContext::bootstrap(bundles, Arc::clone(&store)).await;
        let theme = ThemeContext::new(Arc::clone(&store));
        Self {
            config,
            i18n,
            theme,
            store,
            config_warning: None,
        }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Localized text of the config warning, if loading the config failed.
    pub fn config_warning(&self) -> Option<String> {
        self.config_warning.as_deref().map(|key| self.i18n.tr(key))
    }

    pub fn resume_downloader(&self, host: Arc<dyn FrameHost>, format: ResumeFormat) -> ResumeDownloader {
        ResumeDownloader::new(host, format.url(&self.config), self.config.download.timeout())
    }

    /// Contact form delivering through EmailJS with the configured credentials.
    pub fn contact_form(&self) -> Result<ContactFormState> {
        let client = EmailJsClient::new(self.config.contact.clone())?;
        Ok(ContactFormState::new(
            Arc::new(client),
            self.config.contact.to_name.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::persisted_state::LANGUAGE_KEY;
    use crate::i18n::{Direction, Language};

    async fn app_with(store: Arc<MemoryStore>) -> App {
        App::with_parts(Config::default(), store, Arc::new(EmbeddedBundles)).await
    }

    #[tokio::test]
    async fn startup_restores_persisted_language() {
        let store = Arc::new(MemoryStore::new());
        store.set(LANGUAGE_KEY, "ar").unwrap();

        let app = app_with(store).await;

        assert_eq!(app.i18n.language(), Language::Ar);
        assert!(!app.i18n.is_loading());
        assert_eq!(app.i18n.document().dir(), Direction::Rtl);
    }

    #[tokio::test]
    async fn resume_format_selects_configured_url() {
        let app = app_with(Arc::new(MemoryStore::new())).await;
        assert_eq!(ResumeFormat::Pdf.url(&app.config), app.config.resume.pdf_url);
        assert_eq!(ResumeFormat::Docx.url(&app.config), app.config.resume.docx_url);
        assert_eq!("Word".parse::<ResumeFormat>(), Ok(ResumeFormat::Docx));
        assert!("odt".parse::<ResumeFormat>().is_err());
    }

    #[tokio::test]
    async fn config_warning_is_localized() {
        let mut app = app_with(Arc::new(MemoryStore::new())).await;
        assert_eq!(app.config_warning(), None);

        app.config_warning = Some("notification.configLoadError".into());
        let text = app.config_warning().unwrap();
        assert_ne!(text, "notification.configLoadError");
    }

    #[tokio::test]
    async fn contact_form_uses_configured_recipient() {
        let app = app_with(Arc::new(MemoryStore::new())).await;
        let form = app.contact_form().unwrap();
        assert!(!form.is_submitting());
        assert!(form.status().is_none());
    }
}
