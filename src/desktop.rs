//! Tauri-backed implementations of the UI, clipboard and camera seams.

use serde::Serialize;
use tauri::{AppHandle, Emitter};

use crate::error::ClipboardError;
use crate::feedback::{CameraState, Notice, Notifier};
use crate::history::render::render_ledger;
use crate::history::{ClipboardBackend, LedgerKind, LedgerSnapshot};

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct FeedbackEvent {
    kind: LedgerKind,
    notice: Notice,
    message: &'static str,
    duration_ms: u64,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct StatusEvent<'a> {
    kind: LedgerKind,
    text: &'a str,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct HistoryChangedEvent<'a> {
    #[serde(flatten)]
    snapshot: &'a LedgerSnapshot,
    html: String,
}

#[derive(Serialize, Clone)]
struct MessageEvent<'a> {
    message: &'a str,
}

#[derive(Serialize, Clone)]
struct CameraStateEvent {
    state: CameraState,
}

pub struct TauriNotifier {
    app_handle: AppHandle,
    feedback_ms: u64,
}

impl TauriNotifier {
    pub fn new(app_handle: AppHandle, feedback_ms: u64) -> Self {
        Self {
            app_handle,
            feedback_ms,
        }
    }

    fn emit<S: Serialize + Clone>(&self, event: &str, payload: S) {
        if let Err(err) = self.app_handle.emit(event, payload) {
            log::error!("failed to emit {event}: {err}");
        }
    }
}

impl Notifier for TauriNotifier {
    fn feedback(&self, kind: LedgerKind, notice: Notice) {
        self.emit(
            "scan-feedback",
            FeedbackEvent {
                kind,
                notice,
                message: notice.message(),
                duration_ms: self.feedback_ms,
            },
        );
    }

    fn status(&self, kind: LedgerKind, text: &str) {
        self.emit("scan-status", StatusEvent { kind, text });
    }

    fn alert(&self, message: &str) {
        self.emit("app-alert", MessageEvent { message });
    }

    fn ledger_changed(&self, snapshot: &LedgerSnapshot) {
        self.emit(
            "history-changed",
            HistoryChangedEvent {
                snapshot,
                html: render_ledger(snapshot),
            },
        );
    }

    fn camera_state(&self, state: CameraState) {
        self.emit("camera-state-changed", CameraStateEvent { state });
    }
}

/// System clipboard through `arboard`.
pub struct ArboardClipboard;

impl ClipboardBackend for ArboardClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|err| {
            log::warn!("system clipboard unavailable: {err}");
            ClipboardError::Unavailable
        })?;
        clipboard
            .set_text(text.to_string())
            .map_err(|err| ClipboardError::Write(err.to_string()))
    }
}

/// Legacy path: asks the webview to select-and-copy the text itself.
pub struct WebviewSelectionCopy {
    app_handle: AppHandle,
}

impl WebviewSelectionCopy {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl ClipboardBackend for WebviewSelectionCopy {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.app_handle
            .emit("clipboard-fallback", MessageEvent { message: text })
            .map_err(|err| ClipboardError::Write(err.to_string()))
    }
}
