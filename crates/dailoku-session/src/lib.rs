//! Session layer of the Dailoku play engine.
//!
//! One [`Session`] owns everything that lives for the duration of a loaded
//! puzzle: the grid state, the selection state machine, the bounded
//! undo/redo history, and the hydrated board document. Input arrives as
//! [`Command`] values through a single dispatcher, which keeps the whole
//! engine replayable from an input sequence in tests.
//!
//! The outside world is reached through three seams: [`PuzzleSource`]
//! (document fetch), [`ProgressService`] (completion checks and telemetry),
//! and [`ProgressStore`] (client-local persistence). All three are
//! synchronous traits; the host page's event loop decides how requests are
//! actually scheduled. No failure behind any of them is fatal to a running
//! session.

mod command;
mod history;
pub mod progress;
mod selection;
mod service;
mod session;

pub use command::{Command, MoveDirection};
pub use history::{HISTORY_LIMIT, History};
pub use progress::{MemoryStore, ProgressStore, SavedProgress, StoreError};
pub use selection::{InputMode, SelectionState};
pub use service::{
    CheckRequest, CheckResponse, CheckStatus, ProgressService, PuzzleDocument, PuzzleRequest,
    PuzzleSource, ServiceError, TrackEvent, TrackRequest,
};
pub use session::{CheckFeedback, Session, SessionError, SessionOptions};
