//! Error collection for operations that report failure as a status.
//!
//! Probes and database calls never return their transport errors; they hand
//! them to an [`ErrorSink`] and return a status or sentinel instead. Callers
//! read the accumulated text afterwards to explain what went wrong.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::sync::{Mutex, MutexGuard};

/// Destination for captured errors.
pub trait ErrorSink: Send + Sync {
    /// Record the root cause of `error`.
    fn add_error(&self, error: &(dyn StdError + 'static));

    /// Record a plain message.
    fn add_message(&self, message: &str);

    /// Forget everything recorded so far.
    fn reset(&self);

    /// Recorded messages, newest first and newline separated, or `None`.
    fn retrieve_errors(&self) -> Option<String>;
}

/// What to do with a watch after reading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchQuery {
    /// Leave the watch and its history untouched.
    Keep,
    /// Empty the watch history.
    Clear,
    /// Stop watching.
    Remove,
}

#[derive(Debug, Default)]
struct LogState {
    errors: Vec<String>,
    watches: BTreeMap<String, Vec<String>>,
}

/// Thread-safe [`ErrorSink`] with named watches.
///
/// A watch sees only the errors recorded after it was added, which lets a
/// multi-step operation report its own failures without clearing the
/// global history.
#[derive(Debug, Default)]
pub struct ErrorLog {
    state: Mutex<LogState>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, LogState> {
        // a poisoned log still holds valid strings
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn has_errors(&self) -> bool {
        !self.state().errors.is_empty()
    }

    /// Start (or restart) a named watch.
    pub fn add_watch(&self, name: &str) {
        self.state().watches.insert(name.to_string(), Vec::new());
    }

    pub fn has_watch(&self, name: &str) -> bool {
        self.state().watches.contains_key(name)
    }

    /// Errors recorded since the watch was added, newest first.
    pub fn watch_errors(&self, name: &str, query: WatchQuery) -> Option<String> {
        let mut state = self.state();
        let text = state.watches.get(name).and_then(|errors| join_newest_first(errors));
        match query {
            WatchQuery::Keep => {}
            WatchQuery::Clear => {
                if let Some(errors) = state.watches.get_mut(name) {
                    errors.clear();
                }
            }
            WatchQuery::Remove => {
                state.watches.remove(name);
            }
        }
        text
    }

    fn record(&self, message: String) {
        if message.trim().is_empty() {
            return;
        }
        tracing::debug!("Captured error: {}", message);
        let mut state = self.state();
        for errors in state.watches.values_mut() {
            errors.push(message.clone());
        }
        state.errors.push(message);
    }
}

impl ErrorSink for ErrorLog {
    fn add_error(&self, error: &(dyn StdError + 'static)) {
        let mut root = error;
        while let Some(source) = root.source() {
            root = source;
        }
        self.record(root.to_string());
    }

    fn add_message(&self, message: &str) {
        self.record(message.to_string());
    }

    fn reset(&self) {
        self.state().errors.clear();
    }

    fn retrieve_errors(&self) -> Option<String> {
        join_newest_first(&self.state().errors)
    }
}

fn join_newest_first(errors: &[String]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    Some(errors.iter().rev().cloned().collect::<Vec<_>>().join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "request failed")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn empty_log_has_no_errors() {
        let log = ErrorLog::new();
        assert!(!log.has_errors());
        assert_eq!(log.retrieve_errors(), None);
    }

    #[test]
    fn records_root_cause() {
        let log = ErrorLog::new();
        let error = Outer(std::io::Error::other("connection refused"));
        log.add_error(&error);
        assert_eq!(log.retrieve_errors().as_deref(), Some("connection refused"));
    }

    #[test]
    fn retrieves_newest_first() {
        let log = ErrorLog::new();
        log.add_message("first");
        log.add_message("second");
        assert_eq!(log.retrieve_errors().as_deref(), Some("second\nfirst"));
    }

    #[test]
    fn blank_messages_are_ignored() {
        let log = ErrorLog::new();
        log.add_message("  ");
        assert!(!log.has_errors());
    }

    #[test]
    fn reset_clears_history() {
        let log = ErrorLog::new();
        log.add_message("boom");
        log.reset();
        assert_eq!(log.retrieve_errors(), None);
    }

    #[test]
    fn watch_sees_only_later_errors() {
        let log = ErrorLog::new();
        log.add_message("before");
        log.add_watch("setup");
        log.add_message("during");
        assert_eq!(
            log.watch_errors("setup", WatchQuery::Keep).as_deref(),
            Some("during")
        );
        assert_eq!(log.retrieve_errors().as_deref(), Some("during\nbefore"));
    }

    #[test]
    fn clearing_one_watch_keeps_others() {
        let log = ErrorLog::new();
        log.add_watch("a");
        log.add_watch("b");
        log.add_message("boom");
        log.watch_errors("a", WatchQuery::Clear);
        assert_eq!(log.watch_errors("a", WatchQuery::Keep), None);
        assert_eq!(
            log.watch_errors("b", WatchQuery::Keep).as_deref(),
            Some("boom")
        );
    }

    #[test]
    fn remove_drops_watch() {
        let log = ErrorLog::new();
        log.add_watch("a");
        log.add_message("boom");
        assert_eq!(
            log.watch_errors("a", WatchQuery::Remove).as_deref(),
            Some("boom")
        );
        assert!(!log.has_watch("a"));
        assert_eq!(log.watch_errors("a", WatchQuery::Keep), None);
    }

    #[test]
    fn shared_across_threads() {
        let log = Arc::new(ErrorLog::new());
        std::thread::scope(|scope| {
            for i in 0..4 {
                let log = Arc::clone(&log);
                scope.spawn(move || log.add_message(&format!("error {i}")));
            }
        });
        let text = log.retrieve_errors().unwrap();
        assert_eq!(text.lines().count(), 4);
    }
}
