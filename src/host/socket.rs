// Unix socket transport for the host bridge
//
// One newline-delimited JSON frame per line in both directions. A reader
// task owns the receive half and splits frames into correlated responses
// (routed to per-request oneshot channels) and push events (fanned out on
// a broadcast channel). Requests that get no response within the timeout
// fail instead of wedging the UI.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::UnixStream;
use tokio::sync::{broadcast, oneshot};

use super::wire::{Command, HostFrame, Request, Response};
use super::{event_channel, EventSubscription, HostBridge, HostEvent};
use crate::model::{AppConfig, ClipboardEntry, ContentType};

/// How long a command may wait for its response
const CALL_TIMEOUT: Duration = Duration::from_secs(5);

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Response>>>>;

/// Host bridge over a Unix domain socket
pub struct SocketBridge {
    writer: tokio::sync::Mutex<OwnedWriteHalf>,
    pending: PendingMap,
    events: broadcast::Sender<HostEvent>,
    next_id: AtomicU64,
}

impl SocketBridge {
    /// Connect to the daemon socket and start the reader task
    pub async fn connect(path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(path)
            .await
            .with_context(|| format!("connecting to host socket {}", path.display()))?;
        let (read_half, write_half) = stream.into_split();

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let events = event_channel();

        tokio::spawn(read_frames(
            BufReader::new(read_half),
            Arc::clone(&pending),
            events.clone(),
        ));

        Ok(Self {
            writer: tokio::sync::Mutex::new(write_half),
            pending,
            events,
            next_id: AtomicU64::new(1),
        })
    }

    /// Issue one command and await its correlated response
    async fn call(&self, command: Command) -> Result<serde_json::Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let name = command.name();

        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().insert(id, tx);

        let mut frame = serde_json::to_string(&Request { id, command })?;
        frame.push('\n');

        let write_result = {
            let mut writer = self.writer.lock().await;
            writer.write_all(frame.as_bytes()).await
        };
        if let Err(e) = write_result {
            self.pending.lock().unwrap().remove(&id);
            return Err(anyhow!(e).context(format!("sending {name} to host")));
        }

        let response = match tokio::time::timeout(CALL_TIMEOUT, rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => {
                // Reader task dropped the sender: connection is gone
                bail!("host connection closed while awaiting {name}");
            }
            Err(_) => {
                self.pending.lock().unwrap().remove(&id);
                bail!("host did not answer {name} within {CALL_TIMEOUT:?}");
            }
        };

        match response {
            Response { error: Some(message), .. } => bail!("host rejected {name}: {message}"),
            Response { result, .. } => Ok(result.unwrap_or(serde_json::Value::Null)),
        }
    }
}

/// Reader task: route incoming frames until the socket closes
async fn read_frames(
    reader: BufReader<tokio::net::unix::OwnedReadHalf>,
    pending: PendingMap,
    events: broadcast::Sender<HostEvent>,
) {
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<HostFrame>(&line) {
                    Ok(HostFrame::Response(response)) => {
                        let tx = pending.lock().unwrap().remove(&response.id);
                        match tx {
                            // Receiver may have timed out already; that is fine
                            Some(tx) => drop(tx.send(response)),
                            None => {
                                tracing::warn!(id = response.id, "response for unknown request")
                            }
                        }
                    }
                    Ok(HostFrame::Event(frame)) => {
                        // No subscribers yet is not an error
                        let _ = events.send(frame.event);
                    }
                    Err(e) => tracing::warn!(error = %e, "unparseable frame from host"),
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "host socket read failed");
                break;
            }
        }
    }

    tracing::info!("host connection closed");
    // Wake every pending caller so they fail fast instead of timing out
    pending.lock().unwrap().clear();
}

#[async_trait]
impl HostBridge for SocketBridge {
    async fn get_clipboard_history(&self) -> Result<Vec<ClipboardEntry>> {
        let value = self.call(Command::GetClipboardHistory).await?;
        serde_json::from_value(value).context("decoding clipboard history")
    }

    async fn get_config(&self) -> Result<AppConfig> {
        let value = self.call(Command::GetConfig).await?;
        serde_json::from_value(value).context("decoding app config")
    }

    async fn update_config(&self, config: AppConfig) -> Result<()> {
        self.call(Command::UpdateConfig { config }).await.map(drop)
    }

    async fn copy_to_clipboard(&self, content: String, content_type: ContentType) -> Result<()> {
        self.call(Command::CopyToClipboard { content, content_type })
            .await
            .map(drop)
    }

    async fn copy_and_hide(&self, content: String, content_type: ContentType) -> Result<()> {
        self.call(Command::CopyAndHide { content, content_type })
            .await
            .map(drop)
    }

    async fn delete_clipboard_item(&self, id: i64) -> Result<()> {
        self.call(Command::DeleteClipboardItem { id }).await.map(drop)
    }

    async fn toggle_pin(&self, id: i64) -> Result<()> {
        self.call(Command::TogglePin { id }).await.map(drop)
    }

    async fn hide_window(&self) -> Result<()> {
        self.call(Command::HideWindow).await.map(drop)
    }

    async fn exit_app(&self) -> Result<()> {
        self.call(Command::ExitApp).await.map(drop)
    }

    fn subscribe(&self) -> EventSubscription {
        EventSubscription::new(self.events.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::UnixListener;

    /// Serve a single connection: answer each request with `reply_for`
    async fn serve_once<F>(listener: UnixListener, reply_for: F)
    where
        F: Fn(&Request) -> String + Send + 'static,
    {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let request: Request = serde_json::from_str(&line).unwrap();
            let mut reply = reply_for(&request);
            reply.push('\n');
            write_half.write_all(reply.as_bytes()).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_call_correlates_response_by_id() {
        let path = std::env::temp_dir().join("clipray-test-correlate");
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path).unwrap();
        tokio::spawn(serve_once(listener, |req| {
            format!(r#"{{"id":{},"result":[]}}"#, req.id)
        }));

        let bridge = SocketBridge::connect(&path).await.unwrap();
        let history = bridge.get_clipboard_history().await.unwrap();
        assert!(history.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_host_error_surfaces_as_err() {
        let path = std::env::temp_dir().join("clipray-test-error");
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path).unwrap();
        tokio::spawn(serve_once(listener, |req| {
            format!(r#"{{"id":{},"error":"nope"}}"#, req.id)
        }));

        let bridge = SocketBridge::connect(&path).await.unwrap();
        let err = bridge.delete_clipboard_item(1).await.unwrap_err();
        assert!(err.to_string().contains("nope"));
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_push_events_reach_subscribers() {
        let path = std::env::temp_dir().join("clipray-test-events");
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path).unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (_read_half, mut write_half) = stream.into_split();
            // Give the client time to subscribe before firing the event
            tokio::time::sleep(Duration::from_millis(100)).await;
            write_half
                .write_all(b"{\"event\":\"clipboard-updated\"}\n")
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(200)).await;
        });

        let bridge = SocketBridge::connect(&path).await.unwrap();
        let mut subscription = bridge.subscribe();
        let event = tokio::time::timeout(Duration::from_secs(1), subscription.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(HostEvent::ClipboardUpdated));
        let _ = std::fs::remove_file(&path);
    }
}
