// SPDX-License-Identifier: MPL-2.0
//! Starting a file download without leaving the page.
//!
//! [`trigger_download`] points an invisible embedded context at the file URL
//! and waits for the first of three things:
//!
//! - the context reports a load: the download started (`Done`)
//! - the context reports an error: `Error`, optionally followed by
//!   navigating the page itself to the URL
//! - nothing within the timeout: assumed started (`Done`), since attachment
//!   responses often never report a load
//!
//! Exactly one terminal status is reported per call, and the context is
//! removed on every path that created one.

pub mod frame;
pub mod http;
pub mod resume;

pub use frame::{AttachedFrame, FrameEvent, FrameHost, FrameId};
pub use http::HttpFrameHost;
pub use resume::{ResumeDownloader, ResumeStatus};

use crate::config::DEFAULT_DOWNLOAD_TIMEOUT_MS;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadStatus {
    Starting,
    Done,
    Error,
}

impl DownloadStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, DownloadStatus::Starting)
    }

    /// i18n key of the inline status text.
    pub fn i18n_key(self) -> &'static str {
        match self {
            DownloadStatus::Starting => "download.starting",
            DownloadStatus::Done => "download.done",
            DownloadStatus::Error => "download.error",
        }
    }
}

/// Terminal result of one [`trigger_download`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Done,
    Error(String),
}

impl DownloadOutcome {
    pub fn status(&self) -> DownloadStatus {
        match self {
            DownloadOutcome::Done => DownloadStatus::Done,
            DownloadOutcome::Error(_) => DownloadStatus::Error,
        }
    }
}

pub type StatusCallback = Arc<dyn Fn(DownloadStatus) + Send + Sync>;

#[derive(Clone)]
pub struct DownloadOptions {
    pub timeout: Duration,
    pub on_status_change: Option<StatusCallback>,
    /// Navigate the page to the URL when the embedded context fails.
    pub fallback_navigate: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_DOWNLOAD_TIMEOUT_MS),
            on_status_change: None,
            fallback_navigate: false,
        }
    }
}

impl DownloadOptions {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn on_status_change(mut self, callback: impl Fn(DownloadStatus) + Send + Sync + 'static) -> Self {
        self.on_status_change = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn fallback_navigate(mut self, enabled: bool) -> Self {
        self.fallback_navigate = enabled;
        self
    }
}

impl fmt::Debug for DownloadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadOptions")
            .field("timeout", &self.timeout)
            .field("on_status_change", &self.on_status_change.is_some())
            .field("fallback_navigate", &self.fallback_navigate)
            .finish()
    }
}

/// Forwards statuses to the caller's callback. `finish` consumes the
/// reporter, so a terminal status can only be sent once.
struct StatusReporter {
    callback: Option<StatusCallback>,
}

impl StatusReporter {
    fn starting(&self) {
        if let Some(callback) = &self.callback {
            callback(DownloadStatus::Starting);
        }
    }

    fn finish(self, outcome: &DownloadOutcome) {
        if let Some(callback) = self.callback {
            callback(outcome.status());
        }
    }
}

/// Resolves to the [`DownloadOutcome`] of a [`trigger_download`] call.
///
/// Dropping the handle does not cancel the download.
#[derive(Debug)]
pub struct DownloadHandle {
    state: HandleState,
}

#[derive(Debug)]
enum HandleState {
    Ready(Option<DownloadOutcome>),
    Waiting(JoinHandle<DownloadOutcome>),
}

impl DownloadHandle {
    fn ready(outcome: DownloadOutcome) -> Self {
        Self {
            state: HandleState::Ready(Some(outcome)),
        }
    }
}

impl Future for DownloadHandle {
    type Output = DownloadOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            HandleState::Ready(outcome) => Poll::Ready(
                outcome
                    .take()
                    .unwrap_or_else(|| DownloadOutcome::Error("outcome already taken".into())),
            ),
            HandleState::Waiting(task) => match Pin::new(task).poll(cx) {
                Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
                Poll::Ready(Err(err)) => Poll::Ready(DownloadOutcome::Error(err.to_string())),
                Poll::Pending => Poll::Pending,
            },
        }
    }
}

/// Starts downloading `url` through an invisible context hosted by `host`.
///
/// `Starting` is reported before the context is created, then exactly one of
/// `Done`/`Error`. An empty URL reports `Error` without navigating. Must be
/// called from within a Tokio runtime.
pub fn trigger_download(
    host: Arc<dyn FrameHost>,
    url: &str,
    options: DownloadOptions,
) -> DownloadHandle {
    let reporter = StatusReporter {
        callback: options.on_status_change.clone(),
    };
    let url = url.trim();

    if url.is_empty() {
        let outcome = DownloadOutcome::Error("empty download URL".to_string());
        reporter.finish(&outcome);
        return DownloadHandle::ready(outcome);
    }

    reporter.starting();

    let frame = match host.attach(url) {
        Ok(frame) => frame,
        Err(err) => {
            tracing::warn!(url, "could not create download frame: {err}");
            let outcome = DownloadOutcome::Error(err.to_string());
            reporter.finish(&outcome);
            if options.fallback_navigate {
                host.navigate(url);
            }
            return DownloadHandle::ready(outcome);
        }
    };

    let url = url.to_string();
    let task = tokio::spawn(async move {
        let outcome = wait_for_frame(frame.events, options.timeout).await;
        tracing::debug!(url = %url, ?outcome, "download frame settled");

        reporter.finish(&outcome);
        host.detach(frame.id);
        if matches!(outcome, DownloadOutcome::Error(_)) && options.fallback_navigate {
            tracing::info!(url = %url, "falling back to direct navigation");
            host.navigate(&url);
        }
        outcome
    });

    DownloadHandle {
        state: HandleState::Waiting(task),
    }
}

/// First of: frame event, or timeout (treated as success).
///
/// A sender dropped without an event leaves the decision to the timeout.
async fn wait_for_frame(
    events: oneshot::Receiver<FrameEvent>,
    timeout: Duration,
) -> DownloadOutcome {
    let event = async move {
        match events.await {
            Ok(FrameEvent::Load) => DownloadOutcome::Done,
            Ok(FrameEvent::Error(reason)) => DownloadOutcome::Error(reason),
            Err(_) => std::future::pending().await,
        }
    };

    tokio::select! {
        biased;
        outcome = event => outcome,
        _ = tokio::time::sleep(timeout) => DownloadOutcome::Done,
    }
}
