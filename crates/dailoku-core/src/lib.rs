//! Core grid model for the Dailoku play engine.
//!
//! This crate holds the headless half of the editor: type-safe digits and
//! cell positions, the 9-bit candidate mask, and [`Board`], the authoritative
//! store of player-entered values and pencil marks. `Board` is a pure
//! reducer: every editing operation takes `&self` and returns the next state
//! (or nothing, when the operation would change nothing), so the state
//! machine can be exercised without any visual document or host page.

mod board;
mod digit;
mod digit_set;
mod position;

pub use board::{Board, NoteInput, ValueInput};
pub use digit::Digit;
pub use digit_set::DigitSet;
pub use position::Position;
