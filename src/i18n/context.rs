// SPDX-License-Identifier: MPL-2.0
//! The language context: the one place that owns the active language and
//! its translation bundle.
//!
//! Readers take a [`LanguageState`] snapshot or subscribe to changes; the only
//! mutation entry points are [`LanguageContext::initialize`] and
//! [`LanguageContext::set_language`].
//!
//! Bundle loads may overlap when the visitor switches quickly. Each load is
//! tagged with a sequence number and only the most recently issued one is
//! allowed to settle the state.

use super::bundle::BundleSource;
use super::language::{DocumentAttributes, Language};
use super::lookup::{self, Params};
use crate::app::persisted_state::{KeyValueStore, LANGUAGE_KEY};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Where the context is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Uninitialized,
    Loading(Language),
    Ready(Language),
}

/// Everything a component needs to render localized text.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageState {
    pub language: Language,
    pub translations: Arc<Value>,
    /// Language of the bundle in `translations`; differs from `language`
    /// after a fallback, `None` until a bundle has loaded.
    pub bundle_language: Option<Language>,
    pub is_loading: bool,
    pub phase: LoadPhase,
    pub document: DocumentAttributes,
}

impl Default for LanguageState {
    fn default() -> Self {
        Self {
            language: Language::default(),
            translations: Arc::new(Value::Object(Default::default())),
            bundle_language: None,
            is_loading: true,
            phase: LoadPhase::Uninitialized,
            document: DocumentAttributes::default(),
        }
    }
}

impl LanguageState {
    pub fn t(&self, key: &str, params: Option<&Params>) -> Value {
        lookup::translate(&self.translations, key, params)
    }

    pub fn tr(&self, key: &str) -> String {
        lookup::tr(&self.translations, key, None)
    }

    pub fn tr_with(&self, key: &str, params: &Params) -> String {
        lookup::tr(&self.translations, key, Some(params))
    }

    pub fn tr_list(&self, key: &str) -> Vec<String> {
        lookup::tr_list(&self.translations, key)
    }
}

/// Shared handle to the language context. Cloning shares the same state.
#[derive(Clone)]
pub struct LanguageContext {
    inner: Arc<Inner>,
}

struct Inner {
    state: watch::Sender<LanguageState>,
    source: Arc<dyn BundleSource>,
    store: Arc<dyn KeyValueStore>,
    latest_request: AtomicU64,
}

impl LanguageContext {
    /// Creates an uninitialized context. Nothing is read or loaded yet.
    pub fn new(source: Arc<dyn BundleSource>, store: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(LanguageState::default());
        Self {
            inner: Arc::new(Inner {
                state,
                source,
                store,
                latest_request: AtomicU64::new(0),
            }),
        }
    }

    /// Creates the context and waits for the startup bundle to settle.
    pub async fn bootstrap(source: Arc<dyn BundleSource>, store: Arc<dyn KeyValueStore>) -> Self {
        let context = Self::new(source, store);
        if let Err(err) = context.initialize().await {
            tracing::error!("initial translation load aborted: {err}");
        }
        context
    }

    /// Startup transition: restores the persisted language (English when absent
    /// or unrecognized) and starts loading its bundle.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn initialize(&self) -> JoinHandle<()> {
        let language = self
            .inner
            .store
            .get(LANGUAGE_KEY)
            .map(|code| Language::from_code(&code))
            .unwrap_or_default();
        tracing::debug!(%language, "initializing language context");
        self.begin_load(language)
    }

    /// Switches language: persists the choice, applies the document
    /// attributes right away and starts loading the bundle.
    ///
    /// The returned handle completes once this request has settled (or been
    /// superseded). Must be called from within a Tokio runtime.
    pub fn set_language(&self, language: Language) -> JoinHandle<()> {
        if let Err(err) = self.inner.store.set(LANGUAGE_KEY, language.code()) {
            tracing::warn!(%language, "failed to persist language choice: {err}");
        }
        self.begin_load(language)
    }

    /// [`LanguageContext::set_language`] for a raw code; unsupported codes
    /// select English.
    pub fn set_language_code(&self, code: &str) -> JoinHandle<()> {
        let language = Language::parse(code).unwrap_or_else(|| {
            tracing::warn!(code, "unsupported language code, using English");
            Language::default()
        });
        self.set_language(language)
    }

    pub fn language(&self) -> Language {
        self.inner.state.borrow().language
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    pub fn document(&self) -> DocumentAttributes {
        self.inner.state.borrow().document
    }

    pub fn snapshot(&self) -> LanguageState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<LanguageState> {
        self.inner.state.subscribe()
    }

    pub fn t(&self, key: &str, params: Option<&Params>) -> Value {
        self.inner.state.borrow().t(key, params)
    }

    pub fn tr(&self, key: &str) -> String {
        self.inner.state.borrow().tr(key)
    }

    pub fn tr_with(&self, key: &str, params: &Params) -> String {
        self.inner.state.borrow().tr_with(key, params)
    }

    pub fn tr_list(&self, key: &str) -> Vec<String> {
        self.inner.state.borrow().tr_list(key)
    }

    fn begin_load(&self, language: Language) -> JoinHandle<()> {
        let mut sequence = 0;
        // The sequence number is taken under the state lock so that issue
        // order and state order agree.
        self.inner.state.send_modify(|state| {
            sequence = self.inner.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
            state.language = language;
            state.is_loading = true;
            state.phase = LoadPhase::Loading(language);
            state.document = DocumentAttributes::for_language(language);
        });

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let loaded = load_with_fallback(inner.source.as_ref(), language).await;
            inner.settle(sequence, language, loaded);
        })
    }
}

impl Inner {
    fn settle(&self, sequence: u64, requested: Language, loaded: Option<(Language, Value)>) {
        self.state.send_if_modified(|state| {
            let latest = self.latest_request.load(Ordering::SeqCst);
            if sequence != latest {
                tracing::debug!(
                    %requested,
                    sequence,
                    latest,
                    "discarding superseded translation load"
                );
                return false;
            }

            if let Some((bundle_language, bundle)) = loaded {
                state.translations = Arc::new(bundle);
                state.bundle_language = Some(bundle_language);
            }
            state.is_loading = false;
            state.phase = LoadPhase::Ready(requested);
            true
        });
    }
}

/// Loads `language`, retrying with English on failure.
///
/// `None` means nothing could be loaded and the previous bundle stays.
async fn load_with_fallback(
    source: &dyn BundleSource,
    language: Language,
) -> Option<(Language, Value)> {
    match source.load(language).await {
        Ok(bundle) => return Some((language, bundle)),
        Err(err) => {
            tracing::error!(%language, "failed to load translations: {err}");
        }
    }

    if language == Language::En {
        return None;
    }

    match source.load(Language::En).await {
        Ok(bundle) => Some((Language::En, bundle)),
        Err(err) => {
            tracing::error!("failed to load fallback English translations: {err}");
            None
        }
    }
}
