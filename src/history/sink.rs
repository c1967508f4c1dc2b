use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::feedback::{latest_result_text, Notifier, SCANNING_TEXT};
use crate::scanner::frame::Thumbnail;

use super::{DetectionRecord, HistoryLedger, LedgerKind};

/// Shared handle to one ledger plus the notifier that mirrors it to the UI.
#[derive(Clone)]
pub struct DetectionSink {
    kind: LedgerKind,
    ledger: Arc<Mutex<HistoryLedger>>,
    notifier: Arc<dyn Notifier>,
}

impl DetectionSink {
    pub fn new(kind: LedgerKind, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            kind,
            ledger: Arc::new(Mutex::new(HistoryLedger::new(kind))),
            notifier,
        }
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    pub fn ledger(&self) -> Arc<Mutex<HistoryLedger>> {
        Arc::clone(&self.ledger)
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Appends a detection, updates the status line and publishes the ledger.
    pub async fn record(
        &self,
        payload: String,
        captured_at: DateTime<Utc>,
        thumbnail: Option<Thumbnail>,
    ) -> DetectionRecord {
        let mut ledger = self.ledger.lock().await;
        let record = ledger.append(payload, captured_at, thumbnail);
        self.notifier.status(self.kind, &latest_result_text(&record.payload));
        self.notifier.ledger_changed(&ledger.snapshot());
        record
    }

    pub async fn remove(&self, id: &str) -> Option<DetectionRecord> {
        let mut ledger = self.ledger.lock().await;
        let removed = ledger.remove(id);
        if removed.is_some() {
            self.notifier.ledger_changed(&ledger.snapshot());
        }
        removed
    }

    /// Empties the ledger and puts the status line back to scanning.
    pub async fn clear(&self) {
        let mut ledger = self.ledger.lock().await;
        ledger.clear();
        self.notifier.status(self.kind, SCANNING_TEXT);
        self.notifier.ledger_changed(&ledger.snapshot());
    }

    pub async fn payload_of(&self, id: &str) -> Option<String> {
        self.ledger.lock().await.get(id).map(|r| r.payload.clone())
    }

    pub async fn count(&self) -> usize {
        self.ledger.lock().await.len()
    }
}
