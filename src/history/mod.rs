pub mod clipboard;
pub mod ledger;
pub mod record;
pub mod render;
pub mod sink;

pub use clipboard::{Clipboard, ClipboardBackend, CopyOutcome, CopyReport};
pub use ledger::{HistoryLedger, LedgerSnapshot};
pub use record::{DetectionRecord, LedgerKind};
pub use sink::DetectionSink;
