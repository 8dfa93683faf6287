//! Staleness signal for cached component status.
//!
//! Status is computed on demand and cached until something invalidates it.
//! [`StatusSignal`] holds the dirty flag and notifies subscribers when the
//! flag goes from clean to dirty, so repeated invalidations before the next
//! refresh produce a single notification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct SignalState {
    dirty: AtomicBool,
    subscribers: Mutex<Vec<Sender<()>>>,
}

/// Shared dirty flag with change notification.
///
/// Clones share the same flag. A new signal starts dirty because nothing has
/// been computed yet.
///
/// # Example
///
/// ```
/// use engine_admin::invalidation::StatusSignal;
///
/// let signal = StatusSignal::new();
/// let events = signal.subscribe();
/// assert!(signal.begin_refresh());
/// assert!(signal.invalidate());
/// assert!(!signal.invalidate());
/// assert_eq!(events.try_iter().count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StatusSignal {
    state: Arc<SignalState>,
}

impl Default for StatusSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSignal {
    pub fn new() -> Self {
        Self {
            state: Arc::new(SignalState {
                dirty: AtomicBool::new(true),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state.dirty.load(Ordering::Acquire)
    }

    /// Mark status stale. Returns `true` if this call made it stale.
    ///
    /// Subscribers hear about the transition only; the call never waits on
    /// them.
    pub fn invalidate(&self) -> bool {
        if self.state.dirty.swap(true, Ordering::AcqRel) {
            return false;
        }
        tracing::debug!("Status invalidated");
        let mut subscribers = self
            .state
            .subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        subscribers.retain(|tx| tx.send(()).is_ok());
        true
    }

    /// Clear the flag before recomputing. Returns whether it was dirty.
    ///
    /// Invalidations that arrive while the refresh runs leave the flag set
    /// for the next one.
    pub fn begin_refresh(&self) -> bool {
        self.state.dirty.swap(false, Ordering::AcqRel)
    }

    /// Receive one message per clean-to-dirty transition.
    pub fn subscribe(&self) -> Receiver<()> {
        let (tx, rx) = mpsc::channel();
        self.state
            .subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_signal_is_dirty() {
        assert!(StatusSignal::new().is_dirty());
    }

    #[test]
    fn begin_refresh_clears_flag() {
        let signal = StatusSignal::new();
        assert!(signal.begin_refresh());
        assert!(!signal.is_dirty());
        assert!(!signal.begin_refresh());
    }

    #[test]
    fn repeated_invalidations_collapse() {
        let signal = StatusSignal::new();
        signal.begin_refresh();
        let events = signal.subscribe();
        assert!(signal.invalidate());
        assert!(!signal.invalidate());
        assert!(!signal.invalidate());
        assert_eq!(events.try_iter().count(), 1);
    }

    #[test]
    fn invalidating_dirty_signal_does_not_notify() {
        let signal = StatusSignal::new();
        let events = signal.subscribe();
        assert!(!signal.invalidate());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn each_refresh_cycle_notifies_again() {
        let signal = StatusSignal::new();
        let events = signal.subscribe();
        for _ in 0..3 {
            signal.begin_refresh();
            signal.invalidate();
        }
        assert_eq!(events.try_iter().count(), 3);
    }

    #[test]
    fn clones_share_state() {
        let signal = StatusSignal::new();
        let other = signal.clone();
        signal.begin_refresh();
        assert!(!other.is_dirty());
        other.invalidate();
        assert!(signal.is_dirty());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let signal = StatusSignal::new();
        drop(signal.subscribe());
        let events = signal.subscribe();
        signal.begin_refresh();
        assert!(signal.invalidate());
        assert_eq!(events.try_iter().count(), 1);
        assert_eq!(signal.state.subscribers.lock().unwrap().len(), 1);
    }

    #[test]
    fn invalidation_from_another_thread_wakes_subscriber() {
        let signal = StatusSignal::new();
        signal.begin_refresh();
        let events = signal.subscribe();
        let remote = signal.clone();
        std::thread::spawn(move || remote.invalidate()).join().unwrap();
        assert!(events
            .recv_timeout(std::time::Duration::from_secs(1))
            .is_ok());
    }
}
