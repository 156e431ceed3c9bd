//! Selection state machine: which cells are selected, which has focus,
//! and which entry mode the next digit lands in.

use std::collections::BTreeSet;

use dailoku_core::Position;

use crate::MoveDirection;

/// Sticky entry mode for digit input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum InputMode {
    /// Digits are written as cell values.
    #[default]
    Fill,
    /// Digits toggle candidate marks.
    Notes,
}

impl InputMode {
    /// Returns the other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Fill => Self::Notes,
            Self::Notes => Self::Fill,
        }
    }
}

/// The selection controller.
///
/// Tracks the selected cell set, the focus cell keyboard navigation moves
/// from, the sticky input mode plus its transient shift override, and the
/// pointer-drag bookkeeping needed to tell a drag apart from the synthetic
/// click browsers fire after one.
///
/// Dragging only ever *adds* cells to the selection; sweeping back over an
/// already-selected cell does not deselect it.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    cells: BTreeSet<Position>,
    focus: Option<Position>,
    input_mode: InputMode,
    multi_select: bool,
    shift_notes: bool,
    drag_armed: bool,
    drag_occurred: bool,
}

impl SelectionState {
    /// Creates an empty selection in fill mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> Vec<Position> {
        self.cells.iter().copied().collect()
    }

    /// Returns `true` when `pos` is selected.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// The cell keyboard navigation moves from.
    #[must_use]
    pub fn focus(&self) -> Option<Position> {
        self.focus
    }

    /// The sticky input mode, ignoring any shift override.
    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// The mode the next digit actually lands in: notes while shift is
    /// held, the sticky mode otherwise.
    #[must_use]
    pub fn effective_mode(&self) -> InputMode {
        if self.shift_notes {
            InputMode::Notes
        } else {
            self.input_mode
        }
    }

    /// Returns `true` when multi-select is on.
    #[must_use]
    pub fn multi_select(&self) -> bool {
        self.multi_select
    }

    /// Flips the sticky input mode.
    pub fn toggle_input_mode(&mut self) {
        self.input_mode = self.input_mode.toggled();
    }

    /// Shift pressed. The override only engages from fill mode; in notes
    /// mode shift changes nothing, so releasing it cannot kick the player
    /// out of a mode they chose.
    pub fn shift_down(&mut self) {
        if self.input_mode.is_fill() {
            self.shift_notes = true;
        }
    }

    /// Shift released.
    pub fn shift_up(&mut self) {
        self.shift_notes = false;
    }

    /// Turns multi-select on or off.
    ///
    /// Turning it off with several cells selected collapses the selection
    /// to the focus cell, or to the first selected cell when focus sits
    /// outside the set.
    pub fn set_multi_select(&mut self, enabled: bool) {
        self.multi_select = enabled;
        if enabled || self.cells.len() <= 1 {
            return;
        }
        let keep = self
            .focus
            .filter(|pos| self.cells.contains(pos))
            .or_else(|| self.cells.iter().next().copied());
        self.cells.clear();
        if let Some(pos) = keep {
            self.cells.insert(pos);
            self.focus = Some(pos);
        }
    }

    /// Pointer pressed on a cell. Arms drag tracking and applies the
    /// click semantics for the current multi-select setting.
    pub fn pointer_down(&mut self, pos: Position) {
        self.drag_armed = true;
        self.drag_occurred = false;

        if self.multi_select {
            if self.cells.remove(&pos) {
                if self.focus == Some(pos) {
                    self.focus = None;
                }
            } else {
                self.cells.insert(pos);
                self.focus = Some(pos);
            }
        } else if self.cells.len() == 1 && self.cells.contains(&pos) {
            // Clicking the sole selected cell deselects it.
            self.cells.clear();
            self.focus = None;
        } else {
            self.cells.clear();
            self.cells.insert(pos);
            self.focus = Some(pos);
        }
    }

    /// Pointer dragged over a cell while pressed. Returns `true` when the
    /// selection changed.
    pub fn pointer_move(&mut self, pos: Position) -> bool {
        if !self.drag_armed || self.cells.contains(&pos) {
            return false;
        }
        self.cells.insert(pos);
        self.focus = Some(pos);
        self.drag_occurred = true;
        true
    }

    /// Pointer released. Returns `true` when a drag happened, so the
    /// caller can suppress the click event the browser synthesizes next.
    pub fn pointer_up(&mut self) -> bool {
        let dragged = self.drag_occurred;
        self.drag_armed = false;
        self.drag_occurred = false;
        dragged
    }

    /// Click outside the grid clears the selection.
    pub fn background_click(&mut self) {
        self.clear();
    }

    /// Clears the selected set and focus.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.focus = None;
    }

    /// Arrow-key navigation: moves focus one cell, collapsing the
    /// selection to the target. Steps off the grid edge keep the focus in
    /// place rather than wrapping.
    pub fn move_focus(&mut self, direction: MoveDirection) {
        let from = self.focus.unwrap_or(Position::new(0, 0));
        let (dr, dc) = direction.delta();
        let target = from.offset(dr, dc).unwrap_or(from);
        self.cells.clear();
        self.cells.insert(target);
        self.focus = Some(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn click_selects_and_reclick_deselects() {
        let mut sel = SelectionState::new();
        sel.pointer_down(pos(2, 3));
        assert_eq!(sel.cells(), vec![pos(2, 3)]);
        assert_eq!(sel.focus(), Some(pos(2, 3)));

        sel.pointer_up();
        sel.pointer_down(pos(2, 3));
        assert!(sel.cells().is_empty());
        assert_eq!(sel.focus(), None);
    }

    #[test]
    fn click_elsewhere_replaces_selection() {
        let mut sel = SelectionState::new();
        sel.pointer_down(pos(0, 0));
        sel.pointer_up();
        sel.pointer_down(pos(4, 4));
        assert_eq!(sel.cells(), vec![pos(4, 4)]);
    }

    #[test]
    fn multi_select_click_toggles_membership() {
        let mut sel = SelectionState::new();
        sel.set_multi_select(true);
        sel.pointer_down(pos(0, 0));
        sel.pointer_up();
        sel.pointer_down(pos(1, 1));
        sel.pointer_up();
        assert_eq!(sel.cells(), vec![pos(0, 0), pos(1, 1)]);
        assert_eq!(sel.focus(), Some(pos(1, 1)));

        sel.pointer_down(pos(1, 1));
        sel.pointer_up();
        assert_eq!(sel.cells(), vec![pos(0, 0)]);
        assert_eq!(sel.focus(), None);
    }

    #[test]
    fn disabling_multi_select_collapses_to_focus() {
        let mut sel = SelectionState::new();
        sel.set_multi_select(true);
        for p in [pos(0, 0), pos(1, 1), pos(2, 2)] {
            sel.pointer_down(p);
            sel.pointer_up();
        }
        assert_eq!(sel.focus(), Some(pos(2, 2)));

        sel.set_multi_select(false);
        assert_eq!(sel.cells(), vec![pos(2, 2)]);
        assert_eq!(sel.focus(), Some(pos(2, 2)));
    }

    #[test]
    fn drag_unions_and_never_removes() {
        let mut sel = SelectionState::new();
        sel.pointer_down(pos(3, 3));
        assert!(sel.pointer_move(pos(3, 4)));
        assert!(sel.pointer_move(pos(3, 5)));
        // Sweeping back over a selected cell is a no-op.
        assert!(!sel.pointer_move(pos(3, 4)));
        assert_eq!(sel.cells(), vec![pos(3, 3), pos(3, 4), pos(3, 5)]);

        // The release reports the drag so the follow-up click is ignored.
        assert!(sel.pointer_up());
        assert!(!sel.pointer_up());
    }

    #[test]
    fn move_without_press_changes_nothing() {
        let mut sel = SelectionState::new();
        assert!(!sel.pointer_move(pos(5, 5)));
        assert!(sel.cells().is_empty());
    }

    #[test]
    fn arrow_keys_collapse_selection_and_stop_at_edges() {
        let mut sel = SelectionState::new();
        sel.set_multi_select(true);
        for p in [pos(0, 0), pos(0, 1)] {
            sel.pointer_down(p);
            sel.pointer_up();
        }

        sel.move_focus(MoveDirection::Right);
        assert_eq!(sel.cells(), vec![pos(0, 2)]);

        // No wraparound: stepping off the top edge stays put.
        sel.move_focus(MoveDirection::Up);
        assert_eq!(sel.cells(), vec![pos(0, 2)]);
    }

    #[test]
    fn arrow_key_with_no_focus_starts_at_origin() {
        let mut sel = SelectionState::new();
        sel.move_focus(MoveDirection::Down);
        assert_eq!(sel.cells(), vec![pos(1, 0)]);
    }

    #[test]
    fn background_click_clears_selection() {
        let mut sel = SelectionState::new();
        sel.pointer_down(pos(4, 4));
        sel.pointer_up();
        sel.background_click();
        assert!(sel.cells().is_empty());
        assert_eq!(sel.focus(), None);
    }

    #[test]
    fn shift_overrides_fill_mode_only() {
        let mut sel = SelectionState::new();
        assert_eq!(sel.effective_mode(), InputMode::Fill);

        sel.shift_down();
        assert_eq!(sel.effective_mode(), InputMode::Notes);
        assert_eq!(sel.input_mode(), InputMode::Fill);
        sel.shift_up();
        assert_eq!(sel.effective_mode(), InputMode::Fill);

        sel.toggle_input_mode();
        assert_eq!(sel.input_mode(), InputMode::Notes);
        sel.shift_down();
        sel.shift_up();
        // Releasing shift in notes mode must not flip back to fill.
        assert_eq!(sel.effective_mode(), InputMode::Notes);
    }
}
