//! Cell positions on the 9x9 grid.

use std::fmt::{self, Display};

/// A cell position: `row` and `col` in the range 0-8.
///
/// Positions map to flat indices as `row * 9 + col`, the ordering used by
/// the grid wire string, the persisted-progress arrays, and the board
/// document layers.
///
/// # Examples
///
/// ```
/// use dailoku_core::Position;
///
/// let pos = Position::new(1, 1);
/// assert_eq!(pos.index(), 10);
/// assert_eq!(Position::from_index(10), pos);
///
/// // Keyboard navigation does not wrap at the edges
/// assert_eq!(Position::new(0, 0).offset(-1, 0), None);
/// assert_eq!(Position::new(0, 0).offset(0, 1), Some(Position::new(0, 1)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// All 81 positions in row-major order.
    pub const ALL: [Self; 81] = {
        let mut all = [Self { row: 0, col: 0 }; 81];
        let mut i = 0;
        while i < 81 {
            all[i] = Self {
                row: (i / 9) as u8,
                col: (i % 9) as u8,
            };
            i += 1;
        }
        all
    };

    /// Creates a position.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is 9 or greater.
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        assert!(row < 9, "row must be 0-8");
        assert!(col < 9, "col must be 0-8");
        Self { row, col }
    }

    /// Creates a position from a flat index in the range 0-80.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 81 or greater.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        assert!(index < 81, "index must be 0-80");
        Self {
            row: (index / 9) as u8,
            col: (index % 9) as u8,
        }
    }

    /// Returns the row (0-8).
    #[must_use]
    pub const fn row(self) -> u8 {
        self.row
    }

    /// Returns the column (0-8).
    #[must_use]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Returns the flat index `row * 9 + col` (0-80).
    #[must_use]
    pub const fn index(self) -> usize {
        self.row as usize * 9 + self.col as usize
    }

    /// Returns the 3x3 box index (0-8, row-major over boxes).
    #[must_use]
    pub const fn box_index(self) -> u8 {
        (self.row / 3) * 3 + self.col / 3
    }

    /// Returns the position shifted by `(dr, dc)`, or `None` if the result
    /// would leave the grid. There is no wraparound.
    #[must_use]
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = i16::from(self.row) + i16::from(dr);
        let col = i16::from(self.col) + i16::from(dc);
        if (0..9).contains(&row) && (0..9).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips() {
        for (i, pos) in Position::ALL.into_iter().enumerate() {
            assert_eq!(pos.index(), i);
            assert_eq!(Position::from_index(i), pos);
        }
    }

    #[test]
    fn box_indices() {
        assert_eq!(Position::new(0, 0).box_index(), 0);
        assert_eq!(Position::new(0, 8).box_index(), 2);
        assert_eq!(Position::new(4, 4).box_index(), 4);
        assert_eq!(Position::new(8, 0).box_index(), 6);
        assert_eq!(Position::new(8, 8).box_index(), 8);
    }

    #[test]
    fn offset_stops_at_edges() {
        assert_eq!(Position::new(0, 0).offset(-1, 0), None);
        assert_eq!(Position::new(0, 0).offset(0, -1), None);
        assert_eq!(Position::new(8, 8).offset(1, 0), None);
        assert_eq!(Position::new(8, 8).offset(0, 1), None);
        assert_eq!(
            Position::new(4, 4).offset(1, -1),
            Some(Position::new(5, 3))
        );
    }

    #[test]
    #[should_panic(expected = "row must be 0-8")]
    fn new_rejects_row_nine() {
        let _ = Position::new(9, 0);
    }

    #[test]
    #[should_panic(expected = "index must be 0-80")]
    fn from_index_rejects_81() {
        let _ = Position::from_index(81);
    }
}
