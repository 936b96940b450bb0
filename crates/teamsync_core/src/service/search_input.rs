//! Debounced search input.
//!
//! # Responsibility
//! - Track the raw draft text as the user types.
//! - Propagate the draft as the active query only after a quiet period.
//!
//! # Invariants
//! - At most one pending propagation exists; a new keystroke replaces it.
//! - A propagation always carries the latest draft.
//! - Time is supplied by the caller, so the timer never blocks or spawns.

use std::time::{Duration, Instant};

/// Quiet period used by the search box.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Single-slot cancellable timer owned by the search component.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    quiet_period: Duration,
    draft: String,
    committed: String,
    deadline: Option<Instant>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            draft: String::new(),
            committed: String::new(),
            deadline: None,
        }
    }

    /// Text currently in the input box.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Query last propagated to filters.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// When the pending propagation fires, if one is scheduled.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Records a keystroke and restarts the quiet period.
    pub fn keystroke(&mut self, text: impl Into<String>, now: Instant) {
        self.draft = text.into();
        self.deadline = Some(now + self.quiet_period);
    }

    /// Fires the pending propagation when its deadline has passed.
    ///
    /// Returns the new query only when it differs from the committed one.
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        if self.draft == self.committed {
            return None;
        }
        self.committed.clone_from(&self.draft);
        Some(&self.committed)
    }

    /// Sets draft and query at once, cancelling any pending propagation.
    pub fn commit(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.committed.clone_from(&self.draft);
        self.deadline = None;
    }

    /// Clears the box and the query immediately.
    pub fn clear(&mut self) {
        self.commit(String::new());
    }
}
