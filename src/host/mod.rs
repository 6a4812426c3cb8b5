// Host bridge - the boundary to the Clipray daemon
//
// The daemon monitors the OS clipboard, persists history and owns the
// window/process lifecycle. The client talks to it through the HostBridge
// trait: request/response commands plus a push-event subscription. Two
// implementations exist - the Unix socket transport for a real daemon and
// an in-process demo host for --demo runs and tests.

pub mod demo;
pub mod socket;
pub mod wire;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::model::{AppConfig, ClipboardEntry, ContentType};

pub use wire::PushEvent as HostEvent;

/// Capacity of the push-event fanout channel. Events only trigger reloads,
/// so losing one under extreme lag is recoverable on the next event.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Command surface of the host daemon
///
/// All calls are asynchronous requests that suspend only the issuing call
/// site; callers must not block the input loop on them. Errors are reported
/// to the caller and never leave client state half-updated.
#[async_trait]
pub trait HostBridge: Send + Sync {
    async fn get_clipboard_history(&self) -> Result<Vec<ClipboardEntry>>;

    async fn get_config(&self) -> Result<AppConfig>;

    /// Persist `config` on the host; it becomes the committed configuration
    async fn update_config(&self, config: AppConfig) -> Result<()>;

    /// Copy without hiding the window
    async fn copy_to_clipboard(&self, content: String, content_type: ContentType) -> Result<()>;

    /// Copy, then hide the window
    async fn copy_and_hide(&self, content: String, content_type: ContentType) -> Result<()>;

    async fn delete_clipboard_item(&self, id: i64) -> Result<()>;

    async fn toggle_pin(&self, id: i64) -> Result<()>;

    async fn hide_window(&self) -> Result<()>;

    /// Terminate the host process
    async fn exit_app(&self) -> Result<()>;

    /// Acquire a push-event subscription. The handle is taken once at
    /// controller start and released by dropping it on teardown.
    fn subscribe(&self) -> EventSubscription;
}

/// Scoped handle on the host's push-event stream
pub struct EventSubscription {
    rx: broadcast::Receiver<HostEvent>,
}

impl EventSubscription {
    pub(crate) fn new(rx: broadcast::Receiver<HostEvent>) -> Self {
        Self { rx }
    }

    /// Next push event, or None once the sender side is gone.
    ///
    /// A lagged receiver skips ahead rather than erroring: push events are
    /// only reload triggers, so dropped ones are subsumed by the next.
    pub async fn recv(&mut self) -> Option<HostEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "push-event subscription lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Fanout used by bridge implementations to publish push events
pub(crate) fn event_channel() -> broadcast::Sender<HostEvent> {
    broadcast::channel(EVENT_CHANNEL_CAPACITY).0
}
