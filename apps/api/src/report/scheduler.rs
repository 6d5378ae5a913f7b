//! Delayed report jobs keyed by call id.
//!
//! The vendor needs a short while after hang-up to finish processing a
//! conversation, so each completed call arms a one-shot timer that runs the
//! report generator once it expires. A second callback for a call that
//! already has a pending timer is coalesced into it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::report::generator::ReportGenerator;

struct PendingJob {
    id: u64,
    handle: JoinHandle<()>,
}

type PendingJobs = Arc<Mutex<HashMap<String, PendingJob>>>;

pub struct ReportScheduler {
    generator: Arc<ReportGenerator>,
    delay: Duration,
    pending: PendingJobs,
    next_id: AtomicU64,
}

fn lock(pending: &PendingJobs) -> MutexGuard<'_, HashMap<String, PendingJob>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ReportScheduler {
    pub fn new(generator: Arc<ReportGenerator>, delay: Duration) -> Self {
        Self {
            generator,
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn generator(&self) -> &ReportGenerator {
        &self.generator
    }

    /// Arms a report job for `call_key`. Returns false when one is already
    /// pending for that key; the existing timer is kept.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, call_key: &str) -> bool {
        let mut pending = lock(&self.pending);
        if pending.contains_key(call_key) {
            debug!(call_key, "Report already scheduled for call");
            return false;
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let handle = tokio::spawn(run_after_delay(
            Arc::clone(&self.generator),
            Arc::clone(&self.pending),
            call_key.to_string(),
            id,
            self.delay,
        ));
        pending.insert(call_key.to_string(), PendingJob { id, handle });
        info!(call_key, delay_secs = self.delay.as_secs(), "Report scheduled");
        true
    }

    /// Aborts the pending job for `call_key`. Returns false if none was armed.
    pub fn cancel(&self, call_key: &str) -> bool {
        match lock(&self.pending).remove(call_key) {
            Some(job) => {
                job.handle.abort();
                info!(call_key, "Report cancelled");
                true
            }
            None => false,
        }
    }

    /// Number of armed timers that have not fired yet.
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }
}

async fn run_after_delay(
    generator: Arc<ReportGenerator>,
    pending: PendingJobs,
    call_key: String,
    id: u64,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;

    {
        let mut jobs = lock(&pending);
        // A cancel followed by a reschedule may have replaced this entry.
        if jobs.get(&call_key).is_some_and(|job| job.id == id) {
            jobs.remove(&call_key);
        }
    }

    match generator.run().await {
        Ok(outcome) => info!(call_key = %call_key, outcome = ?outcome, "Report job finished"),
        Err(e) => error!(call_key = %call_key, error = %e, "Report job failed"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::interviews::InMemoryRegistry;
    use crate::report::generator::tests::{detail, summary, FakeConversations, RecordingMailer};
    use crate::report::generator::ReportSettings;

    const DELAY: Duration = Duration::from_secs(20);

    /// A scheduler whose generator finds no completed conversation, so each
    /// run is observable only through the listing call count.
    fn scheduler() -> (ReportScheduler, Arc<FakeConversations>) {
        let conversations = Arc::new(FakeConversations {
            summaries: vec![summary("live", "in-progress", Some(1))],
            detail: detail(None),
            list_calls: AtomicUsize::new(0),
        });
        let generator = ReportGenerator::new(
            conversations.clone(),
            Arc::new(InMemoryRegistry::new()),
            Arc::new(RecordingMailer::default()),
            ReportSettings {
                page_size: 10,
                report_dir: std::env::temp_dir(),
                include_questionnaire: true,
            },
        );
        (ReportScheduler::new(Arc::new(generator), DELAY), conversations)
    }

    fn runs(conversations: &FakeConversations) -> usize {
        conversations.list_calls.load(Ordering::SeqCst)
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_fires_after_delay() {
        let (scheduler, conversations) = scheduler();
        assert!(scheduler.schedule("CA1"));
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_secs(19)).await;
        assert_eq!(runs(&conversations), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(runs(&conversations), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_key_is_coalesced() {
        let (scheduler, conversations) = scheduler();
        assert!(scheduler.schedule("CA1"));
        assert!(!scheduler.schedule("CA1"));
        assert!(scheduler.schedule("CA2"));
        assert_eq!(scheduler.pending(), 2);

        tokio::time::sleep(DELAY + Duration::from_secs(1)).await;
        assert_eq!(runs(&conversations), 2);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_pending_job() {
        let (scheduler, conversations) = scheduler();
        assert!(scheduler.schedule("CA1"));
        assert!(scheduler.cancel("CA1"));
        assert!(!scheduler.cancel("CA1"));
        assert_eq!(scheduler.pending(), 0);

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(runs(&conversations), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_can_be_rescheduled_after_firing() {
        let (scheduler, conversations) = scheduler();
        assert!(scheduler.schedule("CA1"));
        tokio::time::sleep(DELAY + Duration::from_secs(1)).await;

        assert!(scheduler.schedule("CA1"));
        tokio::time::sleep(DELAY + Duration::from_secs(1)).await;
        assert_eq!(runs(&conversations), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_after_cancel_keeps_new_timer() {
        let (scheduler, conversations) = scheduler();
        assert!(scheduler.schedule("CA1"));
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(scheduler.cancel("CA1"));
        assert!(scheduler.schedule("CA1"));

        // The cancelled timer would have fired here.
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(runs(&conversations), 0);
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(runs(&conversations), 1);
    }
}
