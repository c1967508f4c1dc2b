use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::scanner::frame::Thumbnail;

use super::record::{DetectionRecord, LedgerKind};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub kind: LedgerKind,
    pub count: usize,
    pub entries: Vec<DetectionRecord>,
}

/// Ordered, append-only list of detections for one scan pathway.
///
/// Sequence numbers are handed out in insertion order and are never reused
/// until the ledger is cleared; removing an entry leaves the others' numbers
/// untouched.
#[derive(Debug)]
pub struct HistoryLedger {
    kind: LedgerKind,
    entries: Vec<DetectionRecord>,
    next_sequence: u32,
}

impl HistoryLedger {
    pub fn new(kind: LedgerKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            next_sequence: 1,
        }
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    pub fn append(
        &mut self,
        payload: impl Into<String>,
        captured_at: DateTime<Utc>,
        thumbnail: Option<Thumbnail>,
    ) -> DetectionRecord {
        let record = DetectionRecord {
            id: Uuid::new_v4().to_string(),
            sequence_number: self.next_sequence,
            payload: payload.into(),
            captured_at,
            thumbnail,
        };
        self.next_sequence = self.next_sequence.saturating_add(1);
        self.entries.push(record.clone());
        record
    }

    pub fn remove(&mut self, id: &str) -> Option<DetectionRecord> {
        let index = self.entries.iter().position(|r| r.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&DetectionRecord> {
        self.entries.iter().find(|r| r.id == id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_sequence = 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DetectionRecord] {
        &self.entries
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            kind: self.kind,
            count: self.entries.len(),
            entries: self.entries.clone(),
        }
    }
}
