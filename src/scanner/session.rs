use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use uuid::Uuid;

/// Classification of one successful decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First sighting this session; goes into the history.
    New,
    /// Already recorded. `notify` is false while the suppression window for
    /// this payload is still open.
    Duplicate { notify: bool },
}

/// Dedup and feedback-suppression state for one camera scan session.
#[derive(Debug)]
pub struct ScanSession {
    id: String,
    suppression_ms: i64,
    seen: HashSet<String>,
    /// Last time a notice was shown per payload
    last_feedback: HashMap<String, DateTime<Utc>>,
}

impl ScanSession {
    pub fn new(suppression: Duration) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            suppression_ms: i64::try_from(suppression.as_millis()).unwrap_or(i64::MAX),
            seen: HashSet::new(),
            last_feedback: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn observe(&mut self, payload: &str, now: DateTime<Utc>) -> Observation {
        if self.seen.insert(payload.to_string()) {
            self.last_feedback.insert(payload.to_string(), now);
            return Observation::New;
        }

        let notify = match self.last_feedback.get(payload) {
            None => true,
            Some(last) => now.signed_duration_since(*last).num_milliseconds() >= self.suppression_ms,
        };
        if notify {
            self.last_feedback.insert(payload.to_string(), now);
        }
        Observation::Duplicate { notify }
    }

    pub fn last_feedback_at(&self, payload: &str) -> Option<DateTime<Utc>> {
        self.last_feedback.get(payload).copied()
    }

    pub fn has_seen(&self, payload: &str) -> bool {
        self.seen.contains(payload)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Forgets every payload; the next sighting of any of them is new again.
    pub fn reset(&mut self) {
        self.seen.clear();
        self.last_feedback.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    fn session() -> ScanSession {
        ScanSession::new(Duration::from_millis(3000))
    }

    #[test]
    fn distinct_payloads_are_new_once() {
        let mut session = session();
        let feed = ["a", "b", "a", "c", "b", "a"];
        let new_count = feed
            .iter()
            .enumerate()
            .filter(|(i, p)| session.observe(p, at(*i as i64 * 10)) == Observation::New)
            .count();

        assert_eq!(new_count, 3);
        assert_eq!(session.seen_count(), 3);
    }

    #[test]
    fn duplicate_inside_window_is_suppressed() {
        let mut session = session();
        assert_eq!(session.observe("p", at(0)), Observation::New);
        assert_eq!(
            session.observe("p", at(2999)),
            Observation::Duplicate { notify: false }
        );
        assert_eq!(session.last_feedback_at("p"), Some(at(0)));
    }

    #[test]
    fn duplicate_after_window_notifies_once_and_moves_clock() {
        let mut session = session();
        session.observe("p", at(0));

        assert_eq!(
            session.observe("p", at(3000)),
            Observation::Duplicate { notify: true }
        );
        assert_eq!(session.last_feedback_at("p"), Some(at(3000)));

        assert_eq!(
            session.observe("p", at(3500)),
            Observation::Duplicate { notify: false }
        );
        assert_eq!(
            session.observe("p", at(6001)),
            Observation::Duplicate { notify: true }
        );
    }

    #[test]
    fn clock_running_backwards_stays_suppressed() {
        let mut session = session();
        session.observe("p", at(5000));
        assert_eq!(
            session.observe("p", at(0)),
            Observation::Duplicate { notify: false }
        );
    }

    #[test]
    fn reset_makes_payloads_new_again() {
        let mut session = session();
        session.observe("p", at(0));
        session.reset();

        assert!(!session.has_seen("p"));
        assert_eq!(session.observe("p", at(10)), Observation::New);
    }
}
