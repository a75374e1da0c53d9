use crate::system::ISys;
use backoffice_bot_domain::ID;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

struct ArmedTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// In-memory table of pending delayed callbacks, one per document.
/// Arming a new timer for a document cancels and replaces any earlier
/// one. Timers live only inside this process: a restart forgets every
/// armed reminder, which is an accepted limitation of the system.
pub struct ReminderScheduler {
    timers: Mutex<HashMap<ID, ArmedTimer>>,
    generation: AtomicU64,
    sys: Arc<dyn ISys>,
    max_lead_millis: i64,
}

impl ReminderScheduler {
    pub fn new(sys: Arc<dyn ISys>, max_lead_millis: i64) -> Self {
        Self {
            timers: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
            sys,
            max_lead_millis,
        }
    }

    /// Arms a timer that runs `task` at the absolute timestamp
    /// `fire_at` (unix millis). Rejected when the target is not
    /// strictly in the future or further out than the ceiling.
    /// Returns whether a timer was armed.
    pub fn arm<F>(self: &Arc<Self>, document_id: ID, fire_at: i64, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = fire_at - self.sys.get_timestamp_millis();
        self.arm_in(document_id, delay, task)
    }

    /// Arms a timer that runs `task` after `delay_millis`. Same
    /// replace-on-conflict rule and ceiling as `arm`.
    pub fn arm_in<F>(self: &Arc<Self>, document_id: ID, delay_millis: i64, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if delay_millis <= 0 || delay_millis > self.max_lead_millis {
            warn!(
                "Rejecting reminder for document {} with delay of {} millis",
                document_id, delay_millis
            );
            return false;
        }

        let generation = self.generation.fetch_add(1, Ordering::Relaxed);
        let scheduler = Arc::clone(self);
        let task_document_id = document_id.clone();

        // Holding the lock across the spawn keeps the spawned task from
        // touching the table before its own entry exists
        let mut timers = self.timers.lock().unwrap();
        if let Some(previous) = timers.remove(&document_id) {
            previous.handle.abort();
        }
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_millis as u64)).await;
            // Drop the bookkeeping entry before running the task, so a
            // task that re-arms a reminder for the same document does
            // not cancel itself
            scheduler.remove_if_current(&task_document_id, generation);
            task.await;
        });
        timers.insert(document_id, ArmedTimer { generation, handle });
        true
    }

    /// Cancels the armed timer for a document if there is one
    pub fn cancel(&self, document_id: &ID) -> bool {
        let mut timers = self.timers.lock().unwrap();
        match timers.remove(document_id) {
            Some(timer) => {
                timer.handle.abort();
                debug!("Cancelled reminder timer for document {}", document_id);
                true
            }
            None => false,
        }
    }

    /// Best-effort teardown on shutdown
    pub fn cancel_all(&self) {
        let mut timers = self.timers.lock().unwrap();
        for (_, timer) in timers.drain() {
            timer.handle.abort();
        }
    }

    pub fn is_armed(&self, document_id: &ID) -> bool {
        self.timers.lock().unwrap().contains_key(document_id)
    }

    fn remove_if_current(&self, document_id: &ID, generation: u64) {
        let mut timers = self.timers.lock().unwrap();
        if let Some(timer) = timers.get(document_id) {
            if timer.generation == generation {
                timers.remove(document_id);
            }
        }
    }
}
