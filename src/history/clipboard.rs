use serde::Serialize;
use std::sync::Arc;

use crate::error::ClipboardError;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

pub trait ClipboardBackend: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CopyOutcome {
    Copied,
    /// Primary clipboard missing; the legacy selection copy was used
    CopiedWithFallback,
    Failed,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CopyReport {
    pub outcome: CopyOutcome,
    pub message: String,
}

impl CopyReport {
    fn copied(outcome: CopyOutcome, text: &str) -> Self {
        Self {
            outcome,
            message: format!("Copied: {text}"),
        }
    }

    fn failed(err: &ClipboardError) -> Self {
        Self {
            outcome: CopyOutcome::Failed,
            message: format!("Copy failed: {err}"),
        }
    }
}

/// Text-only clipboard with a legacy fallback path.
#[derive(Clone)]
pub struct Clipboard {
    primary: Option<Arc<dyn ClipboardBackend>>,
    fallback: Arc<dyn ClipboardBackend>,
}

impl Clipboard {
    pub fn new(
        primary: Option<Arc<dyn ClipboardBackend>>,
        fallback: Arc<dyn ClipboardBackend>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Places `text` on the clipboard. Never fails; the outcome is in the
    /// report.
    pub fn copy(&self, text: &str) -> CopyReport {
        if let Some(primary) = &self.primary {
            match primary.write_text(text) {
                Ok(()) => return CopyReport::copied(CopyOutcome::Copied, text),
                Err(ClipboardError::Unavailable) => {
                    log_info!("Primary clipboard unavailable, using fallback copy");
                }
                Err(err) => {
                    log_error!("Copy failed: {err}");
                    return CopyReport::failed(&err);
                }
            }
        }

        match self.fallback.write_text(text) {
            Ok(()) => CopyReport::copied(CopyOutcome::CopiedWithFallback, text),
            Err(err) => {
                log_error!("Fallback copy failed: {err}");
                CopyReport::failed(&err)
            }
        }
    }
}
