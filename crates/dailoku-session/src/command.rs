//! The single input funnel: every pointer, keyboard and button event the
//! host page sees is translated into one of these commands.

use dailoku_core::{Digit, Position};

/// One unit of player input.
///
/// Routing all input through this enum keeps the selection controller and
/// the grid store decoupled from event-listener wiring, and lets tests
/// replay whole input sequences against a [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pointer pressed on a cell.
    PointerDown(Position),
    /// Pointer moved over a cell while pressed.
    PointerMove(Position),
    /// Pointer released.
    PointerUp,
    /// Click landed outside every cell.
    BackgroundClick,
    /// Arrow-key navigation.
    Move(MoveDirection),
    /// Digit entered via keyboard or the digit pad.
    Digit(Digit),
    /// Erase key: clears values or pencil marks depending on mode.
    Erase,
    /// Explicit switch between value entry and pencil-mark entry.
    ToggleInputMode,
    /// Multi-select toggle button.
    SetMultiSelect(bool),
    /// Shift key pressed (transient pencil-mark override).
    ShiftDown,
    /// Shift key released.
    ShiftUp,
    /// Undo button.
    Undo,
    /// Redo button.
    Redo,
    /// Explicit check button.
    Check,
}

/// Direction of one keyboard navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Up one row.
    Up,
    /// Down one row.
    Down,
    /// Left one column.
    Left,
    /// Right one column.
    Right,
}

impl MoveDirection {
    /// Row/column delta of this direction.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}
