//! Seams to the backend: document fetch, completion checks, telemetry.
//!
//! The session never speaks HTTP itself. It talks to two synchronous
//! traits with JSON-shaped request/response types matching the backend
//! wire format, and the host decides how calls are actually carried out.

use serde::{Deserialize, Serialize};

/// A fetched puzzle document and its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDocument {
    /// The rendered SVG board markup.
    pub svg: String,
    /// Full 81-character solution grid, when the backend chose to embed
    /// it (preview documents do, dated documents usually do not).
    #[serde(default)]
    pub solution: Option<String>,
    /// Names of the variant rules active on this board.
    #[serde(default)]
    pub variants: Vec<String>,
    /// Display title.
    pub title: String,
    /// UTC date the puzzle belongs to, `None` for dateless random boards.
    #[serde(default)]
    pub date_utc: Option<String>,
    /// Backend difficulty rating, when published.
    #[serde(default)]
    pub difficulty: Option<i64>,
}

/// Which puzzle to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleRequest {
    /// Today's dated puzzle.
    Today,
    /// A random practice puzzle with no date.
    Random,
}

/// Request body of a completion check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    /// 81-character grid, `'.'` for blanks.
    pub grid: String,
}

/// Response body of a completion check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Verdict on the submitted grid.
    pub status: CheckStatus,
}

/// Backend verdict on a submitted grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Grid is full and matches the solution.
    Complete,
    /// Everything entered so far is right, but cells remain.
    Partial,
    /// At least one entered digit is wrong.
    Incorrect,
    /// The backend has no solution on record for this puzzle. Unknown
    /// future statuses also land here rather than failing deserialization.
    #[serde(other)]
    Unavailable,
}

/// A telemetry event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackEvent {
    /// The puzzle was viewed.
    View,
}

/// Request body of a telemetry call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRequest {
    /// The event being reported.
    pub event: TrackEvent,
}

/// Error from a backend call.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ServiceError {
    /// The request never completed.
    #[display("transport failure: {message}")]
    Transport {
        /// Transport-level description of the failure.
        message: String,
    },
    /// The backend answered with a non-success status.
    #[display("backend returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },
}

/// Where puzzle documents come from.
pub trait PuzzleSource {
    /// Fetches the requested puzzle document.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be fetched.
    fn fetch(&self, request: PuzzleRequest) -> Result<PuzzleDocument, ServiceError>;
}

/// Completion checks and telemetry for a loaded puzzle.
pub trait ProgressService {
    /// Asks the backend to judge `grid` against the stored solution.
    ///
    /// # Errors
    ///
    /// Returns an error when the check request fails outright; an
    /// unknown-puzzle answer is [`CheckStatus::Unavailable`], not an error.
    fn check(&self, grid: &str) -> Result<CheckStatus, ServiceError>;

    /// Reports a telemetry event.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails; callers treat this as
    /// non-fatal.
    fn track(&self, event: TrackEvent) -> Result<(), ServiceError>;
}
