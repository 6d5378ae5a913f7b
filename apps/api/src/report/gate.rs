//! Last-processed-conversation gate.
//!
//! Remembers the id of the most recent conversation a report was started for.
//! `claim` is check-and-set under one lock, so two report jobs racing on the
//! same conversation cannot both proceed. Only the latest id is kept.

use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct ProcessedGate {
    last: Mutex<Option<String>>,
}

impl ProcessedGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks `conversation_id` as processed. Returns false if it already was.
    pub fn claim(&self, conversation_id: &str) -> bool {
        let mut last = self.lock();
        if last.as_deref() == Some(conversation_id) {
            return false;
        }
        *last = Some(conversation_id.to_string());
        true
    }

    #[cfg(test)]
    pub fn is_processed(&self, conversation_id: &str) -> bool {
        self.lock().as_deref() == Some(conversation_id)
    }

    pub fn last_processed(&self) -> Option<String> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_first_claim_wins() {
        let gate = ProcessedGate::new();
        assert!(!gate.is_processed("conv_1"));
        assert!(gate.claim("conv_1"));
        assert!(!gate.claim("conv_1"));
        assert!(gate.is_processed("conv_1"));
    }

    #[test]
    fn test_newer_conversation_replaces_last() {
        let gate = ProcessedGate::new();
        assert!(gate.claim("conv_1"));
        assert!(gate.claim("conv_2"));
        assert_eq!(gate.last_processed().as_deref(), Some("conv_2"));
        assert!(!gate.is_processed("conv_1"));
    }

    #[test]
    fn test_concurrent_claims_admit_exactly_one() {
        let gate = Arc::new(ProcessedGate::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let gate = Arc::clone(&gate);
                std::thread::spawn(move || gate.claim("conv_race"))
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
