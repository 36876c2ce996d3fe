// SPDX-License-Identifier: MPL-2.0
//! State behind the "Download Resume" buttons.

use super::{trigger_download, DownloadHandle, DownloadOptions, DownloadStatus, FrameHost};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Button state: idle until clicked, then the download's statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumeStatus {
    #[default]
    Idle,
    Starting,
    Done,
    Error,
}

impl From<DownloadStatus> for ResumeStatus {
    fn from(status: DownloadStatus) -> Self {
        match status {
            DownloadStatus::Starting => ResumeStatus::Starting,
            DownloadStatus::Done => ResumeStatus::Done,
            DownloadStatus::Error => ResumeStatus::Error,
        }
    }
}

/// Triggers the resume download with direct-navigation fallback enabled.
#[derive(Clone)]
pub struct ResumeDownloader {
    host: Arc<dyn FrameHost>,
    url: String,
    timeout: Duration,
    status: Arc<watch::Sender<ResumeStatus>>,
}

impl ResumeDownloader {
    pub fn new(host: Arc<dyn FrameHost>, url: impl Into<String>, timeout: Duration) -> Self {
        let (status, _) = watch::channel(ResumeStatus::Idle);
        Self {
            host,
            url: url.into(),
            timeout,
            status: Arc::new(status),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Starts a download. Does nothing (and returns `None`) without a URL.
    pub fn start(&self) -> Option<DownloadHandle> {
        if self.url.trim().is_empty() {
            return None;
        }

        let status = Arc::clone(&self.status);
        let options = DownloadOptions::default()
            .timeout(self.timeout)
            .fallback_navigate(true)
            .on_status_change(move |s| {
                status.send_replace(s.into());
            });

        Some(trigger_download(Arc::clone(&self.host), &self.url, options))
    }

    pub fn status(&self) -> ResumeStatus {
        *self.status.borrow()
    }

    pub fn downloading(&self) -> bool {
        self.status() == ResumeStatus::Starting
    }

    pub fn reset(&self) {
        self.status.send_replace(ResumeStatus::Idle);
    }

    pub fn subscribe(&self) -> watch::Receiver<ResumeStatus> {
        self.status.subscribe()
    }
}
