// SPDX-License-Identifier: MPL-2.0
//! The embedding environment a download is triggered in.

use crate::error::Result;
use tokio::sync::oneshot;

/// Identifies one invisible embedded context created by a [`FrameHost`].
pub type FrameId = u64;

/// What an embedded context reports about the URL it was pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    Load,
    Error(String),
}

/// An embedded context that has been created and pointed at a URL.
///
/// The host reports at most one event through `events`. Dropping the sender
/// without reporting is allowed; many environments never report anything
/// for attachment responses.
#[derive(Debug)]
pub struct AttachedFrame {
    pub id: FrameId,
    pub events: oneshot::Receiver<FrameEvent>,
}

/// Environment able to host invisible embedded browsing contexts.
pub trait FrameHost: Send + Sync + 'static {
    /// Creates an invisible context and points it at `url`.
    ///
    /// Fails when the environment forbids creating one.
    fn attach(&self, url: &str) -> Result<AttachedFrame>;

    /// Removes the context. Must tolerate ids that are already gone.
    fn detach(&self, id: FrameId);

    /// Last-resort fallback: send the visible page to `url`.
    fn navigate(&self, url: &str);
}
