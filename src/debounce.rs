//! Debounce and Generation Primitives
//!
//! [`Debouncer`] keeps at most one scheduled-but-unfired timer per slot. Scheduling
//! again for a slot replaces the pending timer, so only the last trigger in a burst
//! ever runs. Once a timer fires its work is detached from the slot: later
//! scheduling cancels timers, never work that is already running.
//!
//! [`GenerationCounter`] tags asynchronous work so results can be dropped when a
//! newer trigger has superseded them.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Token identifying one dispatch on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Monotonic counter scoped to a single surface. Starts at zero.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the next generation and return it.
    pub fn advance(&self) -> Generation {
        Generation(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> Generation {
        Generation(self.current.load(Ordering::SeqCst))
    }

    /// Whether `generation` is still the latest one issued.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }
}

struct PendingTimer {
    seq: u64,
    handle: JoinHandle<()>,
}

/// Single-slot-per-key timer scheduler.
///
/// Must be used from within a tokio runtime. Dropping the debouncer aborts every
/// timer that has not fired yet.
pub struct Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    slots: Arc<Mutex<HashMap<K, PendingTimer>>>,
    next_seq: AtomicU64,
}

impl<K> Default for Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    fn default() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            next_seq: AtomicU64::new(0),
        }
    }
}

impl<K> Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` after `delay` unless `slot` is rescheduled or cancelled first.
    ///
    /// Any timer already pending for `slot` is cancelled.
    pub fn schedule<F>(&self, slot: K, delay: Duration, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let slots = Arc::clone(&self.slots);
        let key = slot.clone();

        // The guard is held across spawn and insert so the timer can never look
        // at the slot before its own entry is in place.
        let mut guard = self.slots.lock();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let fired = {
                let mut slots = slots.lock();
                match slots.get(&key) {
                    Some(pending) if pending.seq == seq => {
                        slots.remove(&key);
                        true
                    }
                    _ => false,
                }
            };
            if fired {
                work.await;
            }
        });

        if let Some(previous) = guard.insert(slot, PendingTimer { seq, handle }) {
            trace!(superseded = previous.seq, by = seq, "Debounce timer replaced");
            previous.handle.abort();
        }
    }

    /// Clear `slot` unconditionally. Returns whether a timer was pending.
    pub fn cancel(&self, slot: &K) -> bool {
        match self.slots.lock().remove(slot) {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, slot: &K) -> bool {
        self.slots.lock().contains_key(slot)
    }

    /// Number of slots with a timer that has not fired yet.
    pub fn pending_count(&self) -> usize {
        self.slots.lock().len()
    }
}

impl<K> Drop for Debouncer<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    fn drop(&mut self) {
        for (_, pending) in self.slots.lock().drain() {
            pending.handle.abort();
        }
    }
}
