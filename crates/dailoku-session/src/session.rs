//! The session controller: one loaded puzzle, wired end to end.

use dailoku_core::{Board, Digit, NoteInput, Position, ValueInput};
use dailoku_svg::{BoardSvg, SvgError};

use crate::{
    CheckStatus, Command, History, InputMode, ProgressService, ProgressStore, PuzzleDocument,
    PuzzleRequest, PuzzleSource, SelectionState, ServiceError, TrackEvent,
    progress::{self, SavedProgress},
};

/// Outcome of a completion check, as surfaced to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckFeedback {
    /// The grid is full and correct.
    Solved,
    /// Everything entered so far is right, keep going.
    KeepGoing,
    /// At least one entered digit is wrong.
    Mistake,
    /// No verdict could be produced.
    Unavailable,
}

/// Session start options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Preview sessions (admin page) neither read nor write saved
    /// progress and report no telemetry.
    pub preview: bool,
}

/// Error starting a session.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    /// The puzzle document could not be fetched.
    #[display("failed to load puzzle document: {_0}")]
    DocumentLoad(ServiceError),
    /// The fetched document could not be hydrated.
    #[display("failed to hydrate board document: {_0}")]
    Document(SvgError),
}

/// One loaded puzzle and everything that lives as long as it does.
///
/// The session owns the board, the selection controller, the undo/redo
/// history and the hydrated document, and keeps them consistent: every
/// state change flows through [`dispatch`](Self::dispatch), and every
/// board change is followed by re-projection onto the document, a
/// persistence write, and (when the grid just became full) a background
/// completion check.
///
/// A solved puzzle stays solved: once a dated puzzle passes its
/// completion check, further edits never trigger another one.
pub struct Session<S, P> {
    board: Board,
    selection: SelectionState,
    history: History<Board>,
    svg: BoardSvg,
    title: String,
    variants: Vec<String>,
    date_utc: Option<String>,
    solution: Option<String>,
    solved: bool,
    check_in_flight: bool,
    drag_just_ended: bool,
    preview: bool,
    feedback: Option<CheckFeedback>,
    store: S,
    service: P,
}

impl<S: ProgressStore, P: ProgressService> Session<S, P> {
    /// Fetches a puzzle document and starts a session over it.
    ///
    /// # Errors
    ///
    /// Returns an error when the fetch fails or the document cannot be
    /// hydrated.
    pub fn start(
        source: &dyn PuzzleSource,
        request: PuzzleRequest,
        store: S,
        service: P,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let document = source.fetch(request).map_err(SessionError::DocumentLoad)?;
        Self::from_document(document, store, service, options)
    }

    /// Starts a session over an already-fetched document.
    ///
    /// For dated puzzles, saved progress from the same date is restored
    /// on top of whatever the document carries; an unreadable or
    /// malformed record is discarded. A `view` telemetry event is
    /// reported once, unless this is a preview session.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be hydrated.
    pub fn from_document(
        document: PuzzleDocument,
        store: S,
        service: P,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        let mut svg = BoardSvg::parse(&document.svg).map_err(SessionError::Document)?;
        let mut board = svg.read_board();
        let mut solved = false;

        if !options.preview
            && let Some(date) = &document.date_utc
            && let Some(saved) = progress::load(&store, date)
        {
            if let Some(restored) = saved.apply_to(&board) {
                board = restored;
                solved = saved.solved;
            } else {
                log::debug!("ignoring malformed saved progress for {date}");
            }
        }

        svg.apply(&board);

        let session = Self {
            board,
            selection: SelectionState::new(),
            history: History::new(),
            svg,
            title: document.title,
            variants: document.variants,
            date_utc: document.date_utc,
            solution: document.solution,
            solved,
            check_in_flight: false,
            drag_just_ended: false,
            preview: options.preview,
            feedback: None,
            store,
            service,
        };

        if !session.preview
            && let Err(err) = session.service.track(TrackEvent::View)
        {
            log::warn!("view tracking failed: {err}");
        }

        Ok(session)
    }

    /// Applies one player input.
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::PointerDown(pos) => {
                self.drag_just_ended = false;
                self.selection.pointer_down(pos);
                self.refresh_highlight();
            }
            Command::PointerMove(pos) => {
                if self.selection.pointer_move(pos) {
                    self.refresh_highlight();
                }
            }
            Command::PointerUp => {
                self.drag_just_ended = self.selection.pointer_up();
            }
            Command::BackgroundClick => {
                // A drag that ends over the background is followed by a
                // synthetic click; it must not wipe the drag selection.
                if std::mem::take(&mut self.drag_just_ended) {
                    return;
                }
                self.selection.background_click();
                self.refresh_highlight();
            }
            Command::Move(direction) => {
                self.selection.move_focus(direction);
                self.refresh_highlight();
            }
            Command::Digit(digit) => self.edit(Some(digit)),
            Command::Erase => self.edit(None),
            Command::ToggleInputMode => self.selection.toggle_input_mode(),
            Command::SetMultiSelect(enabled) => {
                self.selection.set_multi_select(enabled);
                self.refresh_highlight();
            }
            Command::ShiftDown => self.selection.shift_down(),
            Command::ShiftUp => self.selection.shift_up(),
            Command::Undo => {
                if let Some(prior) = self.history.undo(&self.board) {
                    self.board = prior;
                    self.after_change();
                }
            }
            Command::Redo => {
                if let Some(next) = self.history.redo(&self.board) {
                    self.board = next;
                    self.after_change();
                }
            }
            Command::Check => self.manual_check(),
        }
    }

    /// Applies a digit or erase to the current selection in the effective
    /// mode. No-op edits leave the history untouched.
    fn edit(&mut self, digit: Option<Digit>) {
        let targets = self.selection.cells();
        if targets.is_empty() {
            return;
        }
        let next = match (self.selection.effective_mode(), digit) {
            (InputMode::Fill, Some(digit)) => {
                self.board.set_value(&targets, ValueInput::Digit(digit))
            }
            (InputMode::Fill, None) => self.board.set_value(&targets, ValueInput::Erase),
            (InputMode::Notes, Some(digit)) => {
                self.board.toggle_note(&targets, NoteInput::Digit(digit))
            }
            (InputMode::Notes, None) => self.board.toggle_note(&targets, NoteInput::Clear),
        };
        if let Some(next) = next {
            let prior = std::mem::replace(&mut self.board, next);
            self.history.commit(prior);
            self.after_change();
        }
    }

    /// Everything that follows a board change, in order: re-project onto
    /// the document, restyle the selection, persist, and run the
    /// background completion check.
    fn after_change(&mut self) {
        self.svg.apply(&self.board);
        self.refresh_highlight();
        self.persist();
        self.auto_check();
    }

    fn refresh_highlight(&mut self) {
        let cells = self.selection.cells();
        self.svg.highlight(&cells, &self.board);
    }

    fn persist(&mut self) {
        if self.preview {
            return;
        }
        if let Some(date) = &self.date_utc {
            let snapshot = SavedProgress::capture(&self.board, self.solved);
            progress::save(&mut self.store, date, &snapshot);
        }
    }

    /// Background completion check, run when a board change leaves the
    /// grid full. Guarded so a dated puzzle is judged at most once: never
    /// after it is solved, and never re-entrantly.
    fn auto_check(&mut self) {
        if self.solved
            || self.check_in_flight
            || self.date_utc.is_none()
            || !self.board.is_filled()
        {
            return;
        }
        self.check_in_flight = true;
        let result = self.service.check(&self.board.grid_string());
        self.check_in_flight = false;
        match result {
            Ok(CheckStatus::Complete) => {
                self.solved = true;
                self.persist();
                self.feedback = Some(CheckFeedback::Solved);
            }
            Ok(CheckStatus::Partial) => self.feedback = Some(CheckFeedback::KeepGoing),
            Ok(CheckStatus::Incorrect) => self.feedback = Some(CheckFeedback::Mistake),
            Ok(CheckStatus::Unavailable) => self.feedback = Some(CheckFeedback::Unavailable),
            Err(err) => log::warn!("completion check failed: {err}"),
        }
    }

    /// Explicit check requested by the player. Judged locally when the
    /// document embeds its solution, otherwise via the backend. Always
    /// produces feedback, a failed request included.
    fn manual_check(&mut self) {
        let feedback = if let Some(solution) = self.solution.clone() {
            self.compare_with_solution(&solution)
        } else {
            match self.service.check(&self.board.grid_string()) {
                Ok(CheckStatus::Complete) => CheckFeedback::Solved,
                Ok(CheckStatus::Partial) => CheckFeedback::KeepGoing,
                Ok(CheckStatus::Incorrect) => CheckFeedback::Mistake,
                Ok(CheckStatus::Unavailable) => CheckFeedback::Unavailable,
                Err(err) => {
                    log::warn!("check request failed: {err}");
                    CheckFeedback::Unavailable
                }
            }
        };
        if feedback == CheckFeedback::Solved && !self.solved {
            self.solved = true;
            self.persist();
        }
        self.feedback = Some(feedback);
    }

    fn compare_with_solution(&self, solution: &str) -> CheckFeedback {
        let chars: Vec<char> = solution.chars().collect();
        if chars.len() != 81 {
            log::warn!("embedded solution has {} characters", chars.len());
            return CheckFeedback::Unavailable;
        }
        let mut complete = true;
        for pos in Position::ALL {
            match self.board.digit_at(pos) {
                Some(digit) => {
                    if chars[pos.index()] != digit.as_char() {
                        return CheckFeedback::Mistake;
                    }
                }
                None => complete = false,
            }
        }
        if complete {
            CheckFeedback::Solved
        } else {
            CheckFeedback::KeepGoing
        }
    }

    /// The current board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The selection controller state.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Display title from the puzzle document.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Variant rule names from the puzzle document.
    #[must_use]
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// UTC date of the loaded puzzle, `None` for dateless boards.
    #[must_use]
    pub fn date_utc(&self) -> Option<&str> {
        self.date_utc.as_deref()
    }

    /// Whether this puzzle has passed its completion check.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Returns and clears the latest check feedback.
    pub fn take_feedback(&mut self) -> Option<CheckFeedback> {
        self.feedback.take()
    }

    /// Serializes the current document state back to SVG text.
    ///
    /// # Errors
    ///
    /// Returns an error when the patched tree cannot be written out.
    pub fn render(&self) -> Result<String, SessionError> {
        self.svg.to_svg().map_err(SessionError::Document)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use dailoku_svg::testing::DocumentBuilder;

    use super::*;
    use crate::{CheckStatus, Command, MemoryStore, MoveDirection, StoreError};

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col)
    }

    fn click(session: &mut Session<SharedStore, FakeService>, p: Position) {
        session.dispatch(Command::PointerDown(p));
        session.dispatch(Command::PointerUp);
    }

    /// Document with a single given '5' at the origin.
    fn sparse_document(date: Option<&str>) -> PuzzleDocument {
        PuzzleDocument {
            svg: DocumentBuilder::new().given(0, 0, '5').build(),
            solution: None,
            variants: vec!["knight".to_owned()],
            title: "Daily".to_owned(),
            date_utc: date.map(str::to_owned),
            difficulty: Some(3),
        }
    }

    /// Document where every cell but (8,8) carries the given `(i % 9) + 1`;
    /// writing 9 into (8,8) fills the grid.
    fn near_full_document(date: Option<&str>) -> PuzzleDocument {
        let mut builder = DocumentBuilder::new();
        for index in 0..80u8 {
            let digit = char::from(b'1' + index % 9);
            builder = builder.given(index / 9, index % 9, digit);
        }
        PuzzleDocument {
            svg: builder.build(),
            solution: None,
            variants: Vec::new(),
            title: "Daily".to_owned(),
            date_utc: date.map(str::to_owned),
            difficulty: None,
        }
    }

    fn pattern_solution() -> String {
        (0..81u8).map(|i| char::from(b'1' + i % 9)).collect()
    }

    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl ProgressStore for SharedStore {
        fn read(&self, key: &str) -> Option<String> {
            self.0.borrow().read(key)
        }

        fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.borrow_mut().write(key, value)
        }
    }

    struct ServiceInner {
        status: CheckStatus,
        checks: Vec<String>,
        tracks: usize,
    }

    #[derive(Clone)]
    struct FakeService(Rc<RefCell<ServiceInner>>);

    impl FakeService {
        fn new(status: CheckStatus) -> Self {
            Self(Rc::new(RefCell::new(ServiceInner {
                status,
                checks: Vec::new(),
                tracks: 0,
            })))
        }

        fn set_status(&self, status: CheckStatus) {
            self.0.borrow_mut().status = status;
        }

        fn check_count(&self) -> usize {
            self.0.borrow().checks.len()
        }

        fn track_count(&self) -> usize {
            self.0.borrow().tracks
        }
    }

    impl ProgressService for FakeService {
        fn check(&self, grid: &str) -> Result<CheckStatus, ServiceError> {
            let mut inner = self.0.borrow_mut();
            inner.checks.push(grid.to_owned());
            Ok(inner.status)
        }

        fn track(&self, _event: TrackEvent) -> Result<(), ServiceError> {
            self.0.borrow_mut().tracks += 1;
            Ok(())
        }
    }

    struct FailingSource;

    impl PuzzleSource for FailingSource {
        fn fetch(&self, _request: PuzzleRequest) -> Result<PuzzleDocument, ServiceError> {
            Err(ServiceError::Status {
                status: 503,
                message: "maintenance".to_owned(),
            })
        }
    }

    fn session_over(
        document: PuzzleDocument,
        store: SharedStore,
        service: FakeService,
        options: SessionOptions,
    ) -> Session<SharedStore, FakeService> {
        Session::from_document(document, store, service, options).unwrap()
    }

    #[test]
    fn view_is_tracked_once_at_start() {
        let service = FakeService::new(CheckStatus::Partial);
        let session = session_over(
            sparse_document(Some("2024-06-01")),
            SharedStore::default(),
            service.clone(),
            SessionOptions::default(),
        );
        assert_eq!(service.track_count(), 1);
        assert_eq!(session.title(), "Daily");
        assert_eq!(session.variants(), ["knight"]);
        assert_eq!(session.date_utc(), Some("2024-06-01"));
    }

    #[test]
    fn preview_sessions_track_nothing_and_persist_nothing() {
        let service = FakeService::new(CheckStatus::Partial);
        let store = SharedStore::default();
        let mut session = session_over(
            sparse_document(Some("2024-06-01")),
            store.clone(),
            service.clone(),
            SessionOptions { preview: true },
        );
        click(&mut session, pos(1, 1));
        session.dispatch(Command::Digit(Digit::D3));

        assert_eq!(service.track_count(), 0);
        assert!(store.read(&progress::storage_key("2024-06-01")).is_none());
    }

    #[test]
    fn digit_entry_undo_redo() {
        let mut session = session_over(
            sparse_document(Some("2024-06-01")),
            SharedStore::default(),
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );

        click(&mut session, pos(1, 1));
        session.dispatch(Command::Digit(Digit::D3));
        assert_eq!(session.board().value(pos(1, 1)), Some(Digit::D3));
        assert!(session.can_undo());

        session.dispatch(Command::Undo);
        assert_eq!(session.board().value(pos(1, 1)), None);
        assert!(session.can_redo());

        session.dispatch(Command::Redo);
        assert_eq!(session.board().value(pos(1, 1)), Some(Digit::D3));
        assert!(!session.can_redo());
    }

    #[test]
    fn repeated_digit_on_same_cell_does_not_grow_history() {
        let mut session = session_over(
            sparse_document(None),
            SharedStore::default(),
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );

        click(&mut session, pos(1, 1));
        session.dispatch(Command::Digit(Digit::D3));
        session.dispatch(Command::Digit(Digit::D3));

        session.dispatch(Command::Undo);
        assert_eq!(session.board().value(pos(1, 1)), None);
        assert!(!session.can_undo());
    }

    #[test]
    fn given_cells_ignore_input() {
        let mut session = session_over(
            sparse_document(None),
            SharedStore::default(),
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );

        click(&mut session, pos(0, 0));
        session.dispatch(Command::Digit(Digit::D7));
        session.dispatch(Command::Erase);

        assert_eq!(session.board().given(pos(0, 0)), Some(Digit::D5));
        assert!(!session.can_undo());
    }

    #[test]
    fn shift_forces_notes_transiently() {
        let mut session = session_over(
            sparse_document(None),
            SharedStore::default(),
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );

        click(&mut session, pos(2, 2));
        session.dispatch(Command::ShiftDown);
        session.dispatch(Command::Digit(Digit::D4));
        session.dispatch(Command::ShiftUp);
        assert!(session.board().notes(pos(2, 2)).contains(Digit::D4));
        assert_eq!(session.board().value(pos(2, 2)), None);

        session.dispatch(Command::Digit(Digit::D4));
        assert_eq!(session.board().value(pos(2, 2)), Some(Digit::D4));
        assert!(session.board().notes(pos(2, 2)).is_empty());
    }

    #[test]
    fn multi_select_writes_to_every_editable_cell() {
        let mut session = session_over(
            sparse_document(None),
            SharedStore::default(),
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );

        session.dispatch(Command::SetMultiSelect(true));
        click(&mut session, pos(0, 0)); // given, skipped by the write
        click(&mut session, pos(1, 1));
        click(&mut session, pos(2, 2));
        session.dispatch(Command::Digit(Digit::D9));

        assert_eq!(session.board().value(pos(1, 1)), Some(Digit::D9));
        assert_eq!(session.board().value(pos(2, 2)), Some(Digit::D9));
        assert_eq!(session.board().given(pos(0, 0)), Some(Digit::D5));
    }

    #[test]
    fn drag_selection_survives_the_synthetic_background_click() {
        let mut session = session_over(
            sparse_document(None),
            SharedStore::default(),
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );

        session.dispatch(Command::PointerDown(pos(3, 3)));
        session.dispatch(Command::PointerMove(pos(3, 4)));
        session.dispatch(Command::PointerMove(pos(3, 5)));
        session.dispatch(Command::PointerUp);
        // The click the browser synthesizes after the release.
        session.dispatch(Command::BackgroundClick);
        assert_eq!(
            session.selection().cells(),
            vec![pos(3, 3), pos(3, 4), pos(3, 5)]
        );

        // A later, genuine background click still clears.
        session.dispatch(Command::BackgroundClick);
        assert!(session.selection().cells().is_empty());
    }

    #[test]
    fn plain_click_does_not_suppress_background_clicks() {
        let mut session = session_over(
            sparse_document(None),
            SharedStore::default(),
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );

        click(&mut session, pos(4, 4));
        session.dispatch(Command::BackgroundClick);
        assert!(session.selection().cells().is_empty());
    }

    #[test]
    fn arrow_keys_move_and_edit_follows_focus() {
        let mut session = session_over(
            sparse_document(None),
            SharedStore::default(),
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );

        click(&mut session, pos(1, 1));
        session.dispatch(Command::Move(MoveDirection::Right));
        session.dispatch(Command::Digit(Digit::D6));
        assert_eq!(session.board().value(pos(1, 2)), Some(Digit::D6));
        assert_eq!(session.board().value(pos(1, 1)), None);
    }

    #[test]
    fn digit_without_selection_is_ignored() {
        let mut session = session_over(
            sparse_document(None),
            SharedStore::default(),
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );
        session.dispatch(Command::Digit(Digit::D1));
        assert!(!session.can_undo());
    }

    #[test]
    fn completion_check_fires_once_per_date() {
        let service = FakeService::new(CheckStatus::Complete);
        let store = SharedStore::default();
        let mut session = session_over(
            near_full_document(Some("2024-06-01")),
            store.clone(),
            service.clone(),
            SessionOptions::default(),
        );

        click(&mut session, pos(8, 8));
        session.dispatch(Command::Digit(Digit::D9));
        assert!(session.is_solved());
        assert_eq!(session.take_feedback(), Some(CheckFeedback::Solved));
        assert_eq!(service.check_count(), 1);

        // Emptying and refilling the cell must not re-judge the puzzle.
        // The cell stays selected from the click above.
        session.dispatch(Command::Undo);
        session.dispatch(Command::Redo);
        session.dispatch(Command::Erase);
        session.dispatch(Command::Digit(Digit::D9));
        assert_eq!(service.check_count(), 1);
        assert!(session.is_solved());
        assert_eq!(session.take_feedback(), None);
    }

    #[test]
    fn incorrect_full_grid_allows_later_rechecks() {
        let service = FakeService::new(CheckStatus::Incorrect);
        let mut session = session_over(
            near_full_document(Some("2024-06-01")),
            SharedStore::default(),
            service.clone(),
            SessionOptions::default(),
        );

        click(&mut session, pos(8, 8));
        session.dispatch(Command::Digit(Digit::D1));
        assert_eq!(service.check_count(), 1);
        assert_eq!(session.take_feedback(), Some(CheckFeedback::Mistake));
        assert!(!session.is_solved());

        service.set_status(CheckStatus::Complete);
        session.dispatch(Command::Digit(Digit::D9));
        assert_eq!(service.check_count(), 2);
        assert!(session.is_solved());
    }

    #[test]
    fn dateless_boards_skip_persistence_and_checks() {
        let service = FakeService::new(CheckStatus::Complete);
        let store = SharedStore::default();
        let mut session = session_over(
            near_full_document(None),
            store.clone(),
            service.clone(),
            SessionOptions::default(),
        );

        click(&mut session, pos(8, 8));
        session.dispatch(Command::Digit(Digit::D9));
        assert_eq!(service.check_count(), 0);
        assert!(!session.is_solved());
        assert!(store.0.borrow().is_empty());
    }

    #[test]
    fn progress_survives_a_reload() {
        let store = SharedStore::default();
        let mut session = session_over(
            sparse_document(Some("2024-06-01")),
            store.clone(),
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );
        click(&mut session, pos(1, 1));
        session.dispatch(Command::Digit(Digit::D3));
        session.dispatch(Command::ShiftDown);
        click(&mut session, pos(2, 2));
        session.dispatch(Command::Digit(Digit::D7));
        session.dispatch(Command::ShiftUp);

        let reloaded = session_over(
            sparse_document(Some("2024-06-01")),
            store,
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );
        assert_eq!(reloaded.board().value(pos(1, 1)), Some(Digit::D3));
        assert!(reloaded.board().notes(pos(2, 2)).contains(Digit::D7));
        assert!(!reloaded.can_undo());
    }

    #[test]
    fn solved_state_restores_without_rechecking() {
        let service = FakeService::new(CheckStatus::Complete);
        let store = SharedStore::default();
        let mut session = session_over(
            near_full_document(Some("2024-06-01")),
            store.clone(),
            service.clone(),
            SessionOptions::default(),
        );
        click(&mut session, pos(8, 8));
        session.dispatch(Command::Digit(Digit::D9));
        assert_eq!(service.check_count(), 1);

        let mut reloaded = session_over(
            near_full_document(Some("2024-06-01")),
            store,
            service.clone(),
            SessionOptions::default(),
        );
        assert!(reloaded.is_solved());

        // The restored full grid gets re-entered; still no second check.
        click(&mut reloaded, pos(8, 8));
        reloaded.dispatch(Command::Erase);
        reloaded.dispatch(Command::Digit(Digit::D9));
        assert_eq!(service.check_count(), 1);
    }

    #[test]
    fn malformed_saved_progress_is_discarded() {
        let store = SharedStore::default();
        store
            .0
            .borrow_mut()
            .write(&progress::storage_key("2024-06-01"), "{\"values\":[]}")
            .unwrap();

        let session = session_over(
            sparse_document(Some("2024-06-01")),
            store,
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );
        assert_eq!(session.board().value(pos(1, 1)), None);
        assert!(!session.is_solved());
    }

    #[test]
    fn manual_check_prefers_embedded_solution() {
        let service = FakeService::new(CheckStatus::Incorrect);
        let mut document = near_full_document(None);
        document.solution = Some(pattern_solution());
        let mut session = session_over(
            document,
            SharedStore::default(),
            service.clone(),
            SessionOptions { preview: true },
        );

        session.dispatch(Command::Check);
        assert_eq!(session.take_feedback(), Some(CheckFeedback::KeepGoing));

        click(&mut session, pos(8, 8));
        session.dispatch(Command::Digit(Digit::D1));
        session.dispatch(Command::Check);
        assert_eq!(session.take_feedback(), Some(CheckFeedback::Mistake));

        session.dispatch(Command::Digit(Digit::D9));
        session.dispatch(Command::Check);
        assert_eq!(session.take_feedback(), Some(CheckFeedback::Solved));
        assert!(session.is_solved());
        assert_eq!(service.check_count(), 0);
    }

    #[test]
    fn manual_check_maps_backend_statuses() {
        let service = FakeService::new(CheckStatus::Partial);
        let mut session = session_over(
            sparse_document(Some("2024-06-01")),
            SharedStore::default(),
            service.clone(),
            SessionOptions::default(),
        );

        session.dispatch(Command::Check);
        assert_eq!(session.take_feedback(), Some(CheckFeedback::KeepGoing));

        service.set_status(CheckStatus::Unavailable);
        session.dispatch(Command::Check);
        assert_eq!(session.take_feedback(), Some(CheckFeedback::Unavailable));
        assert!(!session.is_solved());
    }

    #[test]
    fn failed_document_fetch_surfaces_as_load_error() {
        let result = Session::start(
            &FailingSource,
            PuzzleRequest::Today,
            SharedStore::default(),
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );
        assert!(matches!(result, Err(SessionError::DocumentLoad(_))));
    }

    #[test]
    fn render_reflects_entered_digits() {
        let mut session = session_over(
            sparse_document(None),
            SharedStore::default(),
            FakeService::new(CheckStatus::Partial),
            SessionOptions::default(),
        );
        click(&mut session, pos(1, 1));
        session.dispatch(Command::Digit(Digit::D3));

        let svg = session.render().unwrap();
        assert!(svg.contains("user-value"));
        assert!(svg.contains("selected"));
    }
}
