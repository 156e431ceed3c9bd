//! Bounded two-stack undo/redo history.

use std::collections::VecDeque;

/// Maximum number of undoable edits kept per session.
pub const HISTORY_LIMIT: usize = 200;

/// A bounded two-stack history over snapshots of `T`.
///
/// The history never holds the *current* state, only past states (undo
/// stack) and undone states (redo stack). Committing an edit pushes the
/// prior state, evicting the oldest entry past the limit, and invalidates
/// the redo stack. Undo and redo exchange the caller's current state for
/// the stacked one, so the two operations are exact inverses of each other.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    limit: usize,
}

impl<T: Clone> History<T> {
    /// Creates an empty history bounded to [`HISTORY_LIMIT`] entries.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }

    /// Creates an empty history bounded to `limit` entries.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Records `prior` as the state an undo should return to.
    ///
    /// Any redoable states become unreachable and are discarded.
    pub fn commit(&mut self, prior: T) {
        self.undo.push_back(prior);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Steps back one edit: returns the previous state and stashes
    /// `current` for redo. Returns `None` when there is nothing to undo.
    #[must_use]
    pub fn undo(&mut self, current: &T) -> Option<T> {
        let prior = self.undo.pop_back()?;
        self.redo.push(current.clone());
        Some(prior)
    }

    /// Steps forward one undone edit: returns the undone state and stashes
    /// `current` for undo. Returns `None` when there is nothing to redo.
    #[must_use]
    pub fn redo(&mut self, current: &T) -> Option<T> {
        let next = self.redo.pop()?;
        self.undo.push_back(current.clone());
        Some(next)
    }

    /// Returns `true` when an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Returns `true` when a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Discards all history.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}
