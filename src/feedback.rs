use serde::Serialize;

use crate::history::{LedgerKind, LedgerSnapshot};

/// Transient toast shown over a view.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Notice {
    Detected,
    Duplicate,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::Detected => "QR code detected!",
            Notice::Duplicate => "This QR code was already read",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CameraState {
    Idle,
    Active,
}

/// Everything the UI needs to hear about. Implementations must not block.
pub trait Notifier: Send + Sync {
    /// Transient notice, hidden again after the configured feedback duration.
    fn feedback(&self, kind: LedgerKind, notice: Notice);

    /// Status line of a view (latest result, camera errors).
    fn status(&self, kind: LedgerKind, text: &str);

    /// Modal message.
    fn alert(&self, message: &str);

    fn ledger_changed(&self, snapshot: &LedgerSnapshot);

    fn camera_state(&self, state: CameraState);
}

pub fn latest_result_text(payload: &str) -> String {
    format!("Latest read: {payload}")
}

pub const SCANNING_TEXT: &str = "Scanning...";
