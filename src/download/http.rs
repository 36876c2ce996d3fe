// SPDX-License-Identifier: MPL-2.0
//! Native [`FrameHost`]: the "embedded context" is a background HTTP transfer.
//!
//! A frame reports `Load` once the server answers with a success status and
//! `Error` when the request fails or the status is not a success. The body is
//! then streamed into the destination directory. Detaching a frame only
//! forgets it; like a browser's download manager, the transfer keeps going
//! and [`HttpFrameHost::finish_transfers`] can wait for it.

use super::frame::{AttachedFrame, FrameEvent, FrameHost, FrameId};
use crate::error::{Error, Result, TransportError};
use futures_util::StreamExt;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

const FALLBACK_FILENAME: &str = "download";

pub struct HttpFrameHost {
    client: reqwest::Client,
    destination: PathBuf,
    next_id: AtomicU64,
    live_frames: Mutex<HashSet<FrameId>>,
    transfers: Mutex<Vec<JoinHandle<Result<PathBuf>>>>,
    navigations: Mutex<Vec<String>>,
}

impl HttpFrameHost {
    /// Saves into `destination`, created on first use.
    pub fn new(destination: impl Into<PathBuf>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(concat!("Folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::from)?;

        Ok(Self {
            client,
            destination: destination.into(),
            next_id: AtomicU64::new(0),
            live_frames: Mutex::new(HashSet::new()),
            transfers: Mutex::new(Vec::new()),
            navigations: Mutex::new(Vec::new()),
        })
    }

    /// Saves into the user's download directory (the current directory when
    /// the platform has none).
    pub fn with_default_destination() -> Result<Self> {
        let destination = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(destination)
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Number of frames attached and not yet detached.
    pub fn live_frames(&self) -> usize {
        lock(&self.live_frames).len()
    }

    /// URLs the page was asked to navigate to, oldest first.
    pub fn navigations(&self) -> Vec<String> {
        lock(&self.navigations).clone()
    }

    /// Transfers not yet collected. Each `attach` prunes the ones that have
    /// already finished, so a long session keeps only running transfers.
    pub fn pending_transfers(&self) -> usize {
        lock(&self.transfers).len()
    }

    /// Waits for every transfer still held; returns the saved files.
    /// Transfers that failed are logged and left out.
    pub async fn finish_transfers(&self) -> Vec<PathBuf> {
        let pending: Vec<_> = lock(&self.transfers).drain(..).collect();
        let mut saved = Vec::with_capacity(pending.len());
        for transfer in pending {
            match transfer.await {
                Ok(Ok(path)) => saved.push(path),
                Ok(Err(err)) => tracing::warn!("download transfer failed: {err}"),
                Err(err) => tracing::warn!("download transfer aborted: {err}"),
            }
        }
        saved
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FrameHost for HttpFrameHost {
    fn attach(&self, url: &str) -> Result<AttachedFrame> {
        let parsed =
            Url::parse(url).map_err(|_| TransportError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::InvalidUrl(url.to_string()).into());
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (events, receiver) = oneshot::channel();
        lock(&self.live_frames).insert(id);

        let transfer = tokio::spawn(fetch(
            self.client.clone(),
            parsed,
            self.destination.clone(),
            events,
        ));
        let mut transfers = lock(&self.transfers);
        transfers.retain(|t| !t.is_finished());
        transfers.push(transfer);
        drop(transfers);

        tracing::debug!(id, url, "attached download frame");
        Ok(AttachedFrame {
            id,
            events: receiver,
        })
    }

    fn detach(&self, id: FrameId) {
        if lock(&self.live_frames).remove(&id) {
            tracing::debug!(id, "detached download frame");
        }
    }

    fn navigate(&self, url: &str) {
        tracing::warn!(url, "download needs direct navigation");
        lock(&self.navigations).push(url.to_string());
    }
}

async fn fetch(
    client: reqwest::Client,
    url: Url,
    destination: PathBuf,
    events: oneshot::Sender<FrameEvent>,
) -> Result<PathBuf> {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(err) => {
            let _ = events.send(FrameEvent::Error(err.to_string()));
            return Err(TransportError::Request(err.to_string()).into());
        }
    };

    let status = response.status();
    if !status.is_success() {
        let error = TransportError::Status {
            code: status.as_u16(),
            body: String::new(),
        };
        let _ = events.send(FrameEvent::Error(error.to_string()));
        return Err(error.into());
    }

    let filename = response
        .headers()
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(filename_from_disposition)
        .unwrap_or_else(|| filename_from_url(&url));

    // The receiver may already be gone if the caller timed out first.
    let _ = events.send(FrameEvent::Load);

    std::fs::create_dir_all(&destination)?;
    let path = destination.join(filename);
    let mut file = std::fs::File::create(&path)?;

    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                let _ = std::fs::remove_file(&path);
                return Err(TransportError::Request(err.to_string()).into());
            }
        };
        file.write_all(&chunk)?;
        written += chunk.len() as u64;
    }
    file.flush()?;

    tracing::info!(path = %path.display(), bytes = written, "download saved");
    Ok(path)
}

/// Extracts a safe file name from a `Content-Disposition` header value.
fn filename_from_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|raw| raw.trim_matches('"'))
        .and_then(sanitize)
}

/// Last non-empty path segment of the URL, or a generic name.
fn filename_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .and_then(sanitize)
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}

/// Keeps only the final path component so a header cannot escape the
/// destination directory.
fn sanitize(name: &str) -> Option<String> {
    let name = name.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_filename_is_extracted() {
        assert_eq!(
            filename_from_disposition("attachment; filename=\"Ahmed Tamer CV.pdf\""),
            Some("Ahmed Tamer CV.pdf".to_string())
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=resume.docx"),
            Some("resume.docx".to_string())
        );
        assert_eq!(filename_from_disposition("inline"), None);
    }

    #[test]
    fn disposition_cannot_traverse_directories() {
        assert_eq!(
            filename_from_disposition("attachment; filename=\"../../etc/passwd\""),
            Some("passwd".to_string())
        );
        assert_eq!(filename_from_disposition("attachment; filename=\"..\""), None);
    }

    #[test]
    fn url_filename_uses_last_segment() {
        let url = Url::parse("https://docs.google.com/document/d/abc/export?format=pdf").unwrap();
        assert_eq!(filename_from_url(&url), "export");

        let bare = Url::parse("https://example.com/").unwrap();
        assert_eq!(filename_from_url(&bare), FALLBACK_FILENAME);
    }

    #[tokio::test]
    async fn attach_rejects_non_http_urls() {
        let dir = tempfile::tempdir().unwrap();
        let host = HttpFrameHost::new(dir.path()).unwrap();

        assert!(matches!(
            host.attach("not a url"),
            Err(Error::Transport(TransportError::InvalidUrl(_)))
        ));
        assert!(host.attach("file:///etc/hosts").is_err());
        assert_eq!(host.live_frames(), 0);
    }

    #[test]
    fn detach_tolerates_unknown_frames() {
        let dir = tempfile::tempdir().unwrap();
        let host = HttpFrameHost::new(dir.path()).unwrap();
        host.detach(42);
        host.navigate("https://example.com/cv.pdf");
        assert_eq!(host.navigations(), vec!["https://example.com/cv.pdf".to_string()]);
    }

    #[tokio::test]
    async fn attach_drops_finished_transfers() {
        use axum::http::StatusCode;
        use axum::routing::get;

        let app = axum::Router::new().route("/gone.pdf", get(|| async { StatusCode::NOT_FOUND }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/gone.pdf", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let dir = tempfile::tempdir().unwrap();
        let host = HttpFrameHost::new(dir.path()).unwrap();

        for _ in 0..3 {
            let frame = host.attach(&url).unwrap();
            assert!(matches!(frame.events.await, Ok(FrameEvent::Error(_))));
            host.detach(frame.id);
            while !lock(&host.transfers).iter().all(|t| t.is_finished()) {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        }
        assert_eq!(host.pending_transfers(), 1);

        host.attach(&url).unwrap();
        assert_eq!(host.pending_transfers(), 1);
    }
}
