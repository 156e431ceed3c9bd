//! The grid state store: entered values and candidate masks for all 81
//! cells, plus the immutable given clues they sit alongside.

use crate::{Digit, DigitSet, Position};

/// Input to [`Board::set_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInput {
    /// Write this digit as the cell value.
    Digit(Digit),
    /// Clear the cell value.
    Erase,
}

/// Input to [`Board::toggle_note`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteInput {
    /// Toggle this digit's candidate bit.
    Digit(Digit),
    /// Clear the whole candidate mask.
    Clear,
}

/// The authoritative model of one in-progress grid.
///
/// Given clues come from the puzzle document and never change for the life
/// of a board; player values and candidate masks are edited through the two
/// reducer operations [`set_value`](Board::set_value) and
/// [`toggle_note`](Board::toggle_note). Both uphold two invariants:
///
/// - a cell holding a value has an empty candidate mask;
/// - given cells are never mutation targets (they are silently skipped).
///
/// Operations return the next state, or `None` when nothing would change.
/// The `None` case is what keeps idempotent keystrokes from polluting the
/// undo history.
///
/// # Examples
///
/// ```
/// use dailoku_core::{Board, Digit, Position, ValueInput};
///
/// let mut givens = [None; 81];
/// givens[0] = Some(Digit::D5);
/// let board = Board::from_givens(givens);
///
/// // Given cells are skipped: the write changes nothing, so it is a no-op.
/// let targets = [Position::new(0, 0)];
/// assert!(board.set_value(&targets, ValueInput::Digit(Digit::D7)).is_none());
///
/// let targets = [Position::new(1, 1)];
/// let next = board.set_value(&targets, ValueInput::Digit(Digit::D3)).unwrap();
/// assert_eq!(next.value(Position::new(1, 1)), Some(Digit::D3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    givens: [Option<Digit>; 81],
    values: [Option<Digit>; 81],
    candidates: [DigitSet; 81],
}

impl Board {
    /// Creates an empty board over the given clues.
    #[must_use]
    pub fn from_givens(givens: [Option<Digit>; 81]) -> Self {
        Self {
            givens,
            values: [None; 81],
            candidates: [DigitSet::EMPTY; 81],
        }
    }

    /// Returns a copy of this board with player progress installed
    /// wholesale, replacing whatever values and notes it held.
    ///
    /// The arrays come from untrusted places (persisted storage, pre-filled
    /// documents), so the invariants are repaired rather than assumed:
    /// entries on given cells are dropped, and any cell that ends up with a
    /// value has its mask zeroed.
    #[must_use]
    pub fn with_progress(
        &self,
        values: [Option<Digit>; 81],
        candidates: [DigitSet; 81],
    ) -> Self {
        let mut next = Self {
            givens: self.givens,
            values,
            candidates,
        };
        for pos in Position::ALL {
            let i = pos.index();
            if next.givens[i].is_some() {
                next.values[i] = None;
                next.candidates[i] = DigitSet::EMPTY;
            } else if next.values[i].is_some() {
                next.candidates[i] = DigitSet::EMPTY;
            }
        }
        next
    }

    /// Returns the given clue at `pos`, if any.
    #[must_use]
    pub fn given(&self, pos: Position) -> Option<Digit> {
        self.givens[pos.index()]
    }

    /// Returns `true` if `pos` holds a given clue.
    #[must_use]
    pub fn is_given(&self, pos: Position) -> bool {
        self.givens[pos.index()].is_some()
    }

    /// Returns the player-entered value at `pos`, if any.
    #[must_use]
    pub fn value(&self, pos: Position) -> Option<Digit> {
        self.values[pos.index()]
    }

    /// Returns the candidate mask at `pos`.
    #[must_use]
    pub fn notes(&self, pos: Position) -> DigitSet {
        self.candidates[pos.index()]
    }

    /// Returns the digit displayed at `pos`: the given clue if there is
    /// one, otherwise the player value.
    #[must_use]
    pub fn digit_at(&self, pos: Position) -> Option<Digit> {
        self.givens[pos.index()].or(self.values[pos.index()])
    }

    /// Returns `true` when every cell shows a digit, givens and player
    /// values combined.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        Position::ALL.into_iter().all(|pos| self.digit_at(pos).is_some())
    }

    /// Renders the grid as the 81-character wire string: digits `'1'..='9'`
    /// with `'.'` for blank cells, row-major.
    #[must_use]
    pub fn grid_string(&self) -> String {
        Position::ALL
            .into_iter()
            .map(|pos| self.digit_at(pos).map_or('.', |d| d.as_char()))
            .collect()
    }

    /// Applies a value-mode edit to every target cell.
    ///
    /// Writing a digit replaces the cell value and zeroes its candidate
    /// mask; erasing clears the value. Given cells in `targets` are
    /// silently skipped. Returns the next board, or `None` when the edit
    /// changes nothing.
    #[must_use]
    pub fn set_value(&self, targets: &[Position], input: ValueInput) -> Option<Self> {
        let mut next = self.clone();
        for &pos in targets {
            let i = pos.index();
            if next.givens[i].is_some() {
                continue;
            }
            match input {
                ValueInput::Digit(digit) => {
                    next.values[i] = Some(digit);
                    next.candidates[i] = DigitSet::EMPTY;
                }
                ValueInput::Erase => {
                    next.values[i] = None;
                }
            }
        }
        (next != *self).then_some(next)
    }

    /// Applies a note-mode edit to every target cell.
    ///
    /// Toggling a digit XORs its bit in the candidate mask, but only on
    /// cells without a value; `Clear` zeroes the whole mask. Given cells
    /// and valued cells are silently skipped. Returns the next board, or
    /// `None` when the edit changes nothing.
    #[must_use]
    pub fn toggle_note(&self, targets: &[Position], input: NoteInput) -> Option<Self> {
        let mut next = self.clone();
        for &pos in targets {
            let i = pos.index();
            if next.givens[i].is_some() || next.values[i].is_some() {
                continue;
            }
            match input {
                NoteInput::Digit(digit) => next.candidates[i].toggle(digit),
                NoteInput::Clear => next.candidates[i] = DigitSet::EMPTY,
            }
        }
        (next != *self).then_some(next)
    }
}
