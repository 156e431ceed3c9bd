//! Per-date persistence of player progress.
//!
//! Progress is keyed by the puzzle's UTC date, so returning to the page on
//! the same day restores where the player left off, while a new day's
//! puzzle starts clean. The store itself is a seam: browsers back it with
//! `localStorage`, tests with [`MemoryStore`]. Storage is best-effort
//! throughout, a failed write never interrupts play and a corrupt record
//! is discarded rather than reported.

use dailoku_core::{Board, Digit, DigitSet, Position};
use serde::{Deserialize, Serialize};

/// The persisted snapshot of one day's play.
///
/// Values are stored as one-character digit strings (`null` for empty
/// cells) and candidate masks as raw 9-bit integers, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProgress {
    /// Entered digit per cell, `None` where empty.
    pub values: Vec<Option<char>>,
    /// Candidate bitmask per cell.
    pub candidates: Vec<u16>,
    /// Whether this puzzle has already been solved.
    pub solved: bool,
}

impl SavedProgress {
    /// Snapshots a board's player progress.
    #[must_use]
    pub fn capture(board: &Board, solved: bool) -> Self {
        let mut values = Vec::with_capacity(81);
        let mut candidates = Vec::with_capacity(81);
        for pos in Position::ALL {
            values.push(board.value(pos).map(|d| d.as_char()));
            candidates.push(board.notes(pos).bits());
        }
        Self {
            values,
            candidates,
            solved,
        }
    }

    /// Installs this snapshot onto `board`'s givens. Returns `None` when
    /// the record is malformed (wrong lengths, bad digits, out-of-range
    /// masks); a valid record is repaired against the board invariants by
    /// [`Board::with_progress`].
    #[must_use]
    pub fn apply_to(&self, board: &Board) -> Option<Board> {
        if self.values.len() != 81 || self.candidates.len() != 81 {
            return None;
        }
        let mut values = [None; 81];
        for (slot, &c) in values.iter_mut().zip(&self.values) {
            *slot = match c {
                Some(c) => Some(Digit::from_char(c)?),
                None => None,
            };
        }
        let mut candidates = [DigitSet::EMPTY; 81];
        for (slot, &bits) in candidates.iter_mut().zip(&self.candidates) {
            *slot = DigitSet::try_from_bits(bits)?;
        }
        Some(board.with_progress(values, candidates))
    }
}

/// Error from a progress store write.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("progress store write failed: {message}")]
pub struct StoreError {
    /// Backend-specific description of the failure.
    pub message: String,
}

/// Client-local key/value storage for progress records.
pub trait ProgressStore {
    /// Reads the raw record under `key`, if present.
    fn read(&self, key: &str) -> Option<String>;
    /// Writes `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend rejects the write, e.g. when a
    /// browser storage quota is exhausted.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory [`ProgressStore`] used in tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when no records have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProgressStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Storage key for the given UTC date.
#[must_use]
pub fn storage_key(date_utc: &str) -> String {
    format!("dailoku.progress.{date_utc}")
}

/// Persists `progress` for `date_utc`. Failures are logged and swallowed.
pub fn save<S: ProgressStore + ?Sized>(store: &mut S, date_utc: &str, progress: &SavedProgress) {
    let json = match serde_json::to_string(progress) {
        Ok(json) => json,
        Err(err) => {
            log::warn!("failed to serialize progress for {date_utc}: {err}");
            return;
        }
    };
    if let Err(err) = store.write(&storage_key(date_utc), &json) {
        log::warn!("failed to persist progress for {date_utc}: {err}");
    }
}

/// Loads the saved progress for `date_utc`, if a readable record exists.
/// Unparseable records are treated as absent.
#[must_use]
pub fn load<S: ProgressStore + ?Sized>(store: &S, date_utc: &str) -> Option<SavedProgress> {
    let json = store.read(&storage_key(date_utc))?;
    match serde_json::from_str(&json) {
        Ok(progress) => Some(progress),
        Err(err) => {
            log::debug!("discarding unreadable progress record for {date_utc}: {err}");
            None
        }
    }
}
