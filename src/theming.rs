// SPDX-License-Identifier: MPL-2.0
//! Light/dark theme selection.

use crate::app::persisted_state::{KeyValueStore, THEME_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }

    /// Returns true if the effective theme is dark.
    /// For System mode, detects the actual system theme.
    #[must_use]
    pub fn is_dark(self) -> bool {
        // Default to dark on detection error
        self.is_dark_given(!matches!(dark_light::detect(), Ok(dark_light::Mode::Light)))
    }

    /// Like [`ThemeMode::is_dark`] with the system preference supplied.
    #[must_use]
    pub fn is_dark_given(self, system_is_dark: bool) -> bool {
        match self {
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
            ThemeMode::System => system_is_dark,
        }
    }

    /// The explicit mode showing the opposite of the current effective theme.
    #[must_use]
    pub fn toggled_given(self, system_is_dark: bool) -> Self {
        if self.is_dark_given(system_is_dark) {
            ThemeMode::Light
        } else {
            ThemeMode::Dark
        }
    }

    /// i18n key of the toggle button label for this mode.
    pub fn toggle_label_key(self, system_is_dark: bool) -> &'static str {
        if self.is_dark_given(system_is_dark) {
            "theme.switchToLight"
        } else {
            "theme.switchToDark"
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            other => Err(format!("invalid theme mode: {}", other)),
        }
    }
}

/// Process-wide theme preference, persisted under the `"theme"` key.
#[derive(Clone)]
pub struct ThemeContext {
    mode: Arc<watch::Sender<ThemeMode>>,
    store: Arc<dyn KeyValueStore>,
}

impl ThemeContext {
    /// Restores the persisted mode; unknown values fall back to System.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let mode = store
            .get(THEME_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        let (sender, _) = watch::channel(mode);
        Self {
            mode: Arc::new(sender),
            store,
        }
    }

    pub fn mode(&self) -> ThemeMode {
        *self.mode.borrow()
    }

    pub fn is_dark(&self) -> bool {
        self.mode().is_dark()
    }

    pub fn set_mode(&self, mode: ThemeMode) {
        self.mode.send_replace(mode);
        if let Err(err) = self.store.set(THEME_KEY, mode.as_str()) {
            tracing::warn!(%mode, "failed to persist theme: {err}");
        }
    }

    /// Flips the effective theme and returns the new explicit mode.
    pub fn toggle(&self) -> ThemeMode {
        let system_is_dark = ThemeMode::System.is_dark();
        self.toggle_given(system_is_dark)
    }

    pub fn toggle_given(&self, system_is_dark: bool) -> ThemeMode {
        let next = self.mode().toggled_given(system_is_dark);
        self.set_mode(next);
        next
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.mode.subscribe()
    }
}
