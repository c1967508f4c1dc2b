use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scanner::frame::Thumbnail;

/// Which scan pathway a ledger belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum LedgerKind {
    /// In-app camera loop
    Camera,
    /// Host platform's native scanner
    Platform,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Camera => "camera",
            LedgerKind::Platform => "platform",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    pub id: String,
    /// Insertion label, not the current display position
    pub sequence_number: u32,
    pub payload: String,
    pub captured_at: DateTime<Utc>,
    pub thumbnail: Option<Thumbnail>,
}
