// SPDX-License-Identifier: MPL-2.0
//! Contact form submission.
//!
//! [`ContactFormState`] owns the form fields and the inline status line shown
//! under the form. Messages are delivered by an [`EmailTransport`], normally
//! the [`EmailJsClient`].

pub mod emailjs;
pub mod form;

pub use emailjs::{EmailJsClient, EmailTransport};
pub use form::{service_slug, ContactForm, TemplateParams};

use crate::i18n::lookup;
use crate::i18n::LanguageState;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;

const SUCCESS_KEY: &str = "contact.successMessage";
const ERROR_KEY: &str = "contact.errorMessage";
const INCOMPLETE_KEY: &str = "contact.incompleteMessage";

const SUCCESS_FALLBACK: &str = "Message sent successfully! I'll get back to you soon.";
const ERROR_FALLBACK: &str = "Failed to send message. Please try again or email me directly.";
const INCOMPLETE_FALLBACK: &str = "Please fill in every field with a valid email address.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    Success,
    Error,
}

/// Result line displayed after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitStatus {
    pub kind: SubmitKind,
    pub message: String,
    /// Localized cause of a delivery failure (network, server, bad endpoint).
    pub detail: Option<String>,
}

impl SubmitStatus {
    pub fn is_success(&self) -> bool {
        self.kind == SubmitKind::Success
    }
}

/// What the form shows: the button is disabled while `is_submitting`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitState {
    pub is_submitting: bool,
    pub status: Option<SubmitStatus>,
}

pub struct ContactFormState {
    pub form: ContactForm,
    transport: Arc<dyn EmailTransport>,
    to_name: String,
    state: watch::Sender<SubmitState>,
}

impl ContactFormState {
    pub fn new(transport: Arc<dyn EmailTransport>, to_name: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SubmitState::default());
        Self {
            form: ContactForm::default(),
            transport,
            to_name: to_name.into(),
            state,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.state.borrow().is_submitting
    }

    pub fn status(&self) -> Option<SubmitStatus> {
        self.state.borrow().status.clone()
    }

    /// Receiver notified when a submission starts and when it settles.
    pub fn subscribe(&self) -> watch::Receiver<SubmitState> {
        self.state.subscribe()
    }

    /// Sends the current form. On success the fields are cleared; on failure
    /// they are kept so the visitor can retry. Status text is taken from
    /// `texts`, falling back to built-in English sentences.
    pub async fn submit(&mut self, texts: &LanguageState) -> SubmitStatus {
        self.state.send_replace(SubmitState {
            is_submitting: true,
            status: None,
        });

        let status = if !self.form.is_complete() {
            SubmitStatus {
                kind: SubmitKind::Error,
                message: localized(texts, INCOMPLETE_KEY, INCOMPLETE_FALLBACK),
                detail: None,
            }
        } else {
            let params = self.form.template_params(&self.to_name);
            match self.transport.send(params).await {
                Ok(()) => {
                    tracing::info!("contact message sent");
                    self.form.clear();
                    SubmitStatus {
                        kind: SubmitKind::Success,
                        message: localized(texts, SUCCESS_KEY, SUCCESS_FALLBACK),
                        detail: None,
                    }
                }
                Err(err) => {
                    tracing::error!("failed to send contact message: {err}");
                    SubmitStatus {
                        kind: SubmitKind::Error,
                        message: localized(texts, ERROR_KEY, ERROR_FALLBACK),
                        detail: err.i18n_key().map(|key| texts.tr(key)),
                    }
                }
            }
        };

        self.state.send_replace(SubmitState {
            is_submitting: false,
            status: Some(status.clone()),
        });
        status
    }
}

/// Translated string for `key`, or `fallback` when the key is missing or empty.
fn localized(texts: &LanguageState, key: &str, fallback: &str) -> String {
    match lookup::lookup(&texts.translations, key) {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        _ => fallback.to_string(),
    }
}
