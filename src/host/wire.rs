// Wire format for the host daemon socket
//
// Newline-delimited JSON frames in both directions. Client -> host frames
// are requests with a correlation id; host -> client frames are either the
// matching response or an unsolicited push event.

use crate::model::{AppConfig, ContentType};
use serde::{Deserialize, Serialize};

/// A command the client can issue, tagged with the host's method names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum Command {
    GetClipboardHistory,
    GetConfig,
    UpdateConfig { config: AppConfig },
    CopyToClipboard { content: String, content_type: ContentType },
    CopyAndHide { content: String, content_type: ContentType },
    DeleteClipboardItem { id: i64 },
    TogglePin { id: i64 },
    HideWindow,
    ExitApp,
}

impl Command {
    /// Method name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetClipboardHistory => "get_clipboard_history",
            Command::GetConfig => "get_config",
            Command::UpdateConfig { .. } => "update_config",
            Command::CopyToClipboard { .. } => "copy_to_clipboard",
            Command::CopyAndHide { .. } => "copy_and_hide",
            Command::DeleteClipboardItem { .. } => "delete_clipboard_item",
            Command::TogglePin { .. } => "toggle_pin",
            Command::HideWindow => "hide_window",
            Command::ExitApp => "exit_app",
        }
    }
}

/// Request frame: correlation id plus the command fields
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    #[serde(flatten)]
    pub command: Command,
}

/// Response frame matched to a request by id
///
/// Exactly one of `result` / `error` is set by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: u64,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Push events the host fires without a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PushEvent {
    /// The OS-level monitor captured a new entry
    ClipboardUpdated,
    /// The global hotkey fired; the window is being shown
    ShowClipboard,
}

/// Event frame wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct EventFrame {
    pub event: PushEvent,
}

/// Any frame arriving from the host
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HostFrame {
    Response(Response),
    Event(EventFrame),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_method_and_id() {
        let req = Request {
            id: 3,
            command: Command::DeleteClipboardItem { id: 42 },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["method"], "delete_clipboard_item");
        assert_eq!(json["params"]["id"], 42);
    }

    #[test]
    fn test_parameterless_commands_serialize() {
        let json = serde_json::to_value(Request {
            id: 1,
            command: Command::HideWindow,
        })
        .unwrap();
        assert_eq!(json["method"], "hide_window");
    }

    #[test]
    fn test_frames_split_into_responses_and_events() {
        let frame: HostFrame =
            serde_json::from_str(r#"{"id":7,"result":[]}"#).unwrap();
        assert!(matches!(frame, HostFrame::Response(Response { id: 7, .. })));

        let frame: HostFrame =
            serde_json::from_str(r#"{"event":"clipboard-updated"}"#).unwrap();
        match frame {
            HostFrame::Event(e) => assert_eq!(e.event, PushEvent::ClipboardUpdated),
            other => panic!("expected event frame, got {other:?}"),
        }
    }

    #[test]
    fn test_event_names_are_kebab_case() {
        assert_eq!(
            serde_json::to_string(&PushEvent::ShowClipboard).unwrap(),
            "\"show-clipboard\""
        );
    }

    #[test]
    fn test_error_response_round_trips() {
        let resp: Response =
            serde_json::from_str(r#"{"id":9,"error":"no such item"}"#).unwrap();
        assert_eq!(resp.id, 9);
        assert_eq!(resp.error.as_deref(), Some("no such item"));
        assert!(resp.result.is_none());
    }
}
