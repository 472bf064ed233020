use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::error::MailResult;
use crate::session::{EditingSession, SessionState};

/// Maximum number of retained snapshots; the oldest falls off first.
pub const HISTORY_CAPACITY: usize = 60;

/// Trailing-edge window for debounced recording, in milliseconds.
pub const DEBOUNCE_WINDOW_MS: u64 = 200;

/// An immutable full copy of the undoable state. The serialized form is
/// kept alongside so equality checks are a string compare.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub state: SessionState,
    pub serialized: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMode {
    /// Commit the snapshot synchronously (structural edits).
    Immediate,
    /// Hold the snapshot until the debounce window expires, so a burst of
    /// rapid edits collapses into one undo step (typing, style tweaks).
    Debounced,
}

#[derive(Debug)]
struct Pending {
    snapshot: Snapshot,
    deadline: Instant,
}

/// Snapshot-based undo/redo over an [`EditingSession`]. Restores replace
/// the whole undoable state; nothing is ever diff-patched back in.
#[derive(Debug)]
pub struct HistoryManager {
    past: VecDeque<Snapshot>,
    future: Vec<Snapshot>,
    pending: Option<Pending>,
    restoring: bool,
    capacity: usize,
    window: Duration,
}

impl Default for HistoryManager {
    fn default() -> Self {
        HistoryManager::new()
    }
}

impl HistoryManager {
    pub fn new() -> Self {
        HistoryManager::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        HistoryManager {
            past: VecDeque::new(),
            future: Vec::new(),
            pending: None,
            restoring: false,
            capacity: capacity.max(1),
            window: Duration::from_millis(DEBOUNCE_WINDOW_MS),
        }
    }

    /// Number of committed snapshots (the current state counts as one).
    pub fn depth(&self) -> usize {
        self.past.len()
    }

    pub fn can_undo(&self) -> bool {
        self.past.len() >= 2 || self.pending.is_some()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records the session's current state. Returns `true` when the state
    /// was committed or scheduled, `false` when it matched the latest
    /// snapshot (no-op edits leave history untouched) or a restore is in
    /// flight.
    pub fn record(
        &mut self,
        session: &EditingSession,
        mode: RecordMode,
        now: Instant,
    ) -> MailResult<bool> {
        if self.restoring {
            return Ok(false);
        }
        let serialized = session.serialize()?;
        if self.is_current(&serialized) {
            log::trace!("history: state unchanged, not recording");
            return Ok(false);
        }
        let snapshot = Snapshot {
            state: session.state(),
            serialized,
        };
        // The state diverged, so any redo branch is dead either way.
        self.future.clear();
        match mode {
            RecordMode::Immediate => {
                self.commit_pending();
                self.push(snapshot);
            }
            RecordMode::Debounced => {
                self.pending = Some(Pending {
                    snapshot,
                    deadline: now + self.window,
                });
            }
        }
        Ok(true)
    }

    /// Commits a pending debounced snapshot whose window has expired.
    /// Returns `true` when something was committed.
    pub fn flush_expired(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                self.commit_pending();
                true
            }
            _ => false,
        }
    }

    /// Steps the session back one snapshot. Returns `false` when there is
    /// nothing earlier to return to.
    pub fn undo(&mut self, session: &mut EditingSession) -> bool {
        self.commit_pending();
        if self.past.len() < 2 {
            return false;
        }
        let current = match self.past.pop_back() {
            Some(snapshot) => snapshot,
            None => return false,
        };
        self.future.push(current);
        match self.past.back() {
            Some(previous) => {
                let state = previous.state.clone();
                self.apply_restore(session, &state);
                true
            }
            None => false,
        }
    }

    /// Steps the session forward along the redo branch.
    pub fn redo(&mut self, session: &mut EditingSession) -> bool {
        self.commit_pending();
        let snapshot = match self.future.pop() {
            Some(snapshot) => snapshot,
            None => return false,
        };
        let state = snapshot.state.clone();
        self.past.push_back(snapshot);
        self.evict();
        self.apply_restore(session, &state);
        true
    }

    fn apply_restore(&mut self, session: &mut EditingSession, state: &SessionState) {
        // Guard so reflexive record calls during the restore are dropped
        // instead of becoming new undo steps.
        self.restoring = true;
        session.restore(state);
        self.restoring = false;
        log::debug!("history: restored snapshot, depth {}", self.past.len());
    }

    fn is_current(&self, serialized: &str) -> bool {
        if let Some(pending) = &self.pending {
            return pending.snapshot.serialized == serialized;
        }
        self.past
            .back()
            .is_some_and(|top| top.serialized == serialized)
    }

    fn commit_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.push(pending.snapshot);
        }
    }

    fn push(&mut self, snapshot: Snapshot) {
        if self
            .past
            .back()
            .is_some_and(|top| top.serialized == snapshot.serialized)
        {
            return;
        }
        self.past.push_back(snapshot);
        self.evict();
    }

    fn evict(&mut self) {
        while self.past.len() > self.capacity {
            self.past.pop_front();
        }
    }
}
