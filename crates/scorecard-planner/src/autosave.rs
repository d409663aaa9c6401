//! Debounced autosave queue.
//!
//! A queue holds a single pending payload. Each [`AutoSaveQueue::schedule`]
//! call replaces it and restarts the quiet-period timer; when the timer
//! runs out without another call, the saver is invoked once with the
//! latest payload. [`AutoSaveQueue::flush`] writes the pending payload
//! immediately.
//!
//! Timers are tokio tasks tagged with a generation number. A superseded
//! timer wakes, sees a newer generation and exits without saving, so a save
//! that is already running is never interrupted.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::error::{PlannerError, Result};

/// Writes one payload to the backing store.
#[async_trait]
pub trait Saver<P>: Send + Sync {
    async fn save(&self, payload: P) -> Result<()>;
}

/// Called when a timer-triggered save fails. Flush failures are returned to
/// the caller instead.
pub type FailureHook = Arc<dyn Fn(&PlannerError) + Send + Sync>;

struct Slot<P> {
    pending: Option<P>,
    generation: u64,
    in_flight: usize,
}

/// Single-slot debounced save queue.
pub struct AutoSaveQueue<P> {
    delay: Duration,
    saver: Arc<dyn Saver<P>>,
    on_failure: Option<FailureHook>,
    slot: Arc<Mutex<Slot<P>>>,
    /// Signalled whenever the last running save finishes.
    idle: Arc<Notify>,
}

fn lock<P>(slot: &Mutex<Slot<P>>) -> Result<MutexGuard<'_, Slot<P>>> {
    slot.lock()
        .map_err(|e| PlannerError::LockPoisoned(e.to_string()))
}

fn finish_save<P>(slot: &Mutex<Slot<P>>, idle: &Notify) {
    if let Ok(mut guard) = slot.lock() {
        guard.in_flight -= 1;
        if guard.in_flight == 0 {
            idle.notify_waiters();
        }
    }
}

impl<P: Send + 'static> AutoSaveQueue<P> {
    pub fn new(delay: Duration, saver: Arc<dyn Saver<P>>) -> Self {
        Self {
            delay,
            saver,
            on_failure: None,
            slot: Arc::new(Mutex::new(Slot {
                pending: None,
                generation: 0,
                in_flight: 0,
            })),
            idle: Arc::new(Notify::new()),
        }
    }

    pub fn with_failure_hook(mut self, hook: FailureHook) -> Self {
        self.on_failure = Some(hook);
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces the pending payload and restarts the timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, payload: P) -> Result<()> {
        let generation = {
            let mut slot = lock(&self.slot)?;
            slot.pending = Some(payload);
            slot.generation += 1;
            slot.generation
        };

        let slot = Arc::clone(&self.slot);
        let saver = Arc::clone(&self.saver);
        let idle = Arc::clone(&self.idle);
        let on_failure = self.on_failure.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let payload = match slot.lock() {
                Ok(mut guard) => {
                    if guard.generation != generation {
                        return;
                    }
                    let payload = guard.pending.take();
                    if payload.is_some() {
                        guard.in_flight += 1;
                    }
                    payload
                }
                Err(e) => {
                    warn!(error = %e, "autosave slot poisoned");
                    return;
                }
            };
            let Some(payload) = payload else {
                return;
            };

            debug!(generation, "autosave timer fired");
            let result = saver.save(payload).await;
            finish_save(&slot, &idle);
            if let Err(err) = result {
                warn!(error = %err, "autosave failed");
                if let Some(hook) = on_failure {
                    hook(&err);
                }
            }
        });
        Ok(())
    }

    /// Saves the pending payload now, if there is one, and waits for it.
    ///
    /// Returns whether anything was saved. On failure the payload is not
    /// restored; the caller decides what to do with the error.
    pub async fn flush(&self) -> Result<bool> {
        let payload = {
            let mut slot = lock(&self.slot)?;
            slot.generation += 1;
            let payload = slot.pending.take();
            if payload.is_some() {
                slot.in_flight += 1;
            }
            payload
        };
        let Some(payload) = payload else {
            return Ok(false);
        };

        let result = self.saver.save(payload).await;
        finish_save(&self.slot, &self.idle);
        result.map(|_| true)
    }

    /// Waits until no save is running. A pending payload is not sent.
    pub async fn wait_idle(&self) -> Result<()> {
        loop {
            let notified = self.idle.notified();
            let busy = lock(&self.slot)?.in_flight > 0;
            if !busy {
                return Ok(());
            }
            notified.await;
        }
    }

    /// Drops the pending payload and stops its timer.
    pub fn discard(&self) -> Result<Option<P>> {
        let mut slot = lock(&self.slot)?;
        slot.generation += 1;
        Ok(slot.pending.take())
    }

    pub fn has_pending(&self) -> bool {
        lock(&self.slot).map(|s| s.pending.is_some()).unwrap_or(false)
    }

    /// True while a payload is waiting or a save is running.
    pub fn is_saving(&self) -> bool {
        lock(&self.slot)
            .map(|s| s.pending.is_some() || s.in_flight > 0)
            .unwrap_or(false)
    }
}
