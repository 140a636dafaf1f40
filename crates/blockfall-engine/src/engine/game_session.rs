use std::{mem, time::Duration};

use serde::Serialize;

use crate::{
    CommandError, PieceCollisionError,
    core::{
        board::Board,
        piece::{Piece, PieceKind},
    },
};

use super::{
    game_stats::GameStats,
    piece_source::{PieceSeed, PieceSource, RandomPieces},
};

/// Lifecycle of a session.
///
/// ```text
/// Idle ──start──▶ Running ◀──toggle_pause──▶ Paused
///                    │
///                 top-out
///                    ▼
///                 GameOver ──start──▶ Running
/// ```
///
/// `reset` returns to `Idle` from any state, `restart` to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Commands accepted by [`GameSession::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
    Start,
    TogglePause,
    Restart,
}

/// Result of a successful [`GameSession::try_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveOutcome {
    /// The piece moved by the requested offset.
    Moved,
    /// The piece could not move down and was locked into the board.
    Locked,
}

/// Final figures of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOverReport {
    pub score: u64,
    pub level: u32,
    pub lines: u32,
}

/// Something the presentation layer may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Started,
    Paused,
    Resumed,
    Reset,
    PieceSpawned(PieceKind),
    PieceLocked(PieceKind),
    RowsCleared { rows: usize, points: u64 },
    LevelUp(u32),
    GameOver(GameOverReport),
}

/// A single game: board, falling piece, next piece, statistics and state.
///
/// Sessions are plain values; any number of them can exist side by side.
/// Gameplay commands only apply while [`SessionState::Running`]. Each state
/// change is also recorded as a [`SessionEvent`], drained with
/// [`Self::take_events`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameSession, PieceSeed, SessionState};
///
/// let mut session = GameSession::with_seed(PieceSeed::from_bytes([1; 16]));
/// assert_eq!(session.state(), SessionState::Idle);
///
/// session.start().unwrap();
/// assert!(session.active_piece().is_some());
/// assert!(session.next_piece().is_some());
///
/// session.toggle_pause();
/// assert!(session.try_move(1, 0).is_err());
/// ```
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    active: Option<Piece>,
    next: Option<PieceKind>,
    state: SessionState,
    stats: GameStats,
    since_last_drop: Duration,
    play_time: Duration,
    pieces: Box<dyn PieceSource>,
    events: Vec<SessionEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates an idle session drawing pieces from a randomly seeded generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_piece_source(RandomPieces::new())
    }

    /// Like [`Self::new`], but with a fixed seed for a reproducible piece sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_piece_source(RandomPieces::with_seed(seed))
    }

    /// Creates an idle session drawing pieces from `pieces`.
    #[must_use]
    pub fn with_piece_source<S>(pieces: S) -> Self
    where
        S: PieceSource + 'static,
    {
        Self {
            board: Board::new(),
            active: None,
            next: None,
            state: SessionState::Idle,
            stats: GameStats::new(),
            since_last_drop: Duration::ZERO,
            play_time: Duration::ZERO,
            pieces: Box::new(pieces),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Returns the time spent in the running state since the last start.
    #[must_use]
    pub fn play_time(&self) -> Duration {
        self.play_time
    }

    /// Returns the final figures once the session is over.
    #[must_use]
    pub fn game_over_report(&self) -> Option<GameOverReport> {
        self.state.is_game_over().then(|| self.report())
    }

    /// Returns the events recorded since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.events)
    }

    /// Applies a command, dispatching to the matching method.
    pub fn apply(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::MoveLeft => self.try_move(-1, 0).map(|_| ()),
            Command::MoveRight => self.try_move(1, 0).map(|_| ()),
            Command::SoftDrop => self.try_move(0, 1).map(|_| ()),
            Command::Rotate => self.try_rotate(),
            Command::HardDrop => self.hard_drop().map(|_| ()),
            Command::Start => self.start(),
            Command::TogglePause => {
                self.toggle_pause();
                Ok(())
            }
            Command::Restart => {
                self.restart();
                Ok(())
            }
        }
    }

    /// Starts a fresh game from [`SessionState::Idle`] or [`SessionState::GameOver`].
    pub fn start(&mut self) -> Result<(), CommandError> {
        match self.state {
            SessionState::Idle | SessionState::GameOver => {}
            SessionState::Running | SessionState::Paused => {
                return Err(CommandError::AlreadyStarted);
            }
        }
        self.begin();
        Ok(())
    }

    /// Switches between running and paused. No effect in any other state.
    pub fn toggle_pause(&mut self) {
        let (state, event) = match self.state {
            SessionState::Running => (SessionState::Paused, SessionEvent::Paused),
            SessionState::Paused => (SessionState::Running, SessionEvent::Resumed),
            SessionState::Idle | SessionState::GameOver => return,
        };
        tracing::debug!(?state, "pause toggled");
        self.state = state;
        self.events.push(event);
    }

    /// Discards the current game and returns to [`SessionState::Idle`].
    pub fn reset(&mut self) {
        self.clear();
        self.state = SessionState::Idle;
        self.events.push(SessionEvent::Reset);
    }

    /// Discards the current game and immediately starts a new one.
    pub fn restart(&mut self) {
        self.reset();
        self.begin();
    }

    /// Advances the automatic descent by `elapsed`.
    ///
    /// Once the time since the previous automatic step exceeds the drop
    /// interval, the piece moves down one row (locking if it cannot) and the
    /// timer restarts. At most one step happens per call. Returns whether a
    /// step happened.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.play_time += elapsed;
        self.since_last_drop += elapsed;
        if self.since_last_drop <= self.stats.drop_interval() {
            return false;
        }
        self.since_last_drop = Duration::ZERO;
        _ = self.try_move(0, 1);
        true
    }

    /// Moves the falling piece by `(dx, dy)`.
    ///
    /// A blocked downward move locks the piece, clears rows and spawns the
    /// next one. A blocked sideways or upward move changes nothing.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<MoveOutcome, CommandError> {
        let piece = self.running_piece()?;
        if !self.board.collides(&piece, dx, dy) {
            self.active = Some(piece.moved(dx, dy));
            return Ok(MoveOutcome::Moved);
        }
        if dy > 0 {
            self.lock_piece(piece);
            return Ok(MoveOutcome::Locked);
        }
        Err(PieceCollisionError.into())
    }

    pub fn try_move_left(&mut self) -> Result<MoveOutcome, CommandError> {
        self.try_move(-1, 0)
    }

    pub fn try_move_right(&mut self) -> Result<MoveOutcome, CommandError> {
        self.try_move(1, 0)
    }

    pub fn try_soft_drop(&mut self) -> Result<MoveOutcome, CommandError> {
        self.try_move(0, 1)
    }

    /// Rotates the falling piece clockwise in place.
    ///
    /// The rotated mask keeps the same anchor. If it collides there the
    /// rotation is rejected; no alternative offsets are tried.
    pub fn try_rotate(&mut self) -> Result<(), CommandError> {
        let piece = self.running_piece()?;
        let rotated = piece.rotated_clockwise();
        if self.board.collides(&rotated, 0, 0) {
            return Err(PieceCollisionError.into());
        }
        self.active = Some(rotated);
        Ok(())
    }

    /// Drops the falling piece as far as it goes and locks it.
    ///
    /// Returns the number of rows the piece fell.
    pub fn hard_drop(&mut self) -> Result<u32, CommandError> {
        let mut piece = self.running_piece()?;
        let mut rows = 0;
        while !self.board.collides(&piece, 0, 1) {
            piece = piece.moved(0, 1);
            rows += 1;
        }
        self.lock_piece(piece);
        Ok(rows)
    }

    fn running_piece(&self) -> Result<Piece, CommandError> {
        if !self.state.is_running() {
            return Err(CommandError::NotRunning);
        }
        self.active.ok_or(CommandError::NotRunning)
    }

    fn clear(&mut self) {
        self.board = Board::new();
        self.active = None;
        self.next = None;
        self.stats = GameStats::new();
        self.since_last_drop = Duration::ZERO;
        self.play_time = Duration::ZERO;
    }

    fn begin(&mut self) {
        self.clear();
        self.state = SessionState::Running;
        tracing::info!("session started");
        self.events.push(SessionEvent::Started);
        self.spawn_next();
    }

    /// Promotes the next piece to the falling piece and draws a new next piece.
    ///
    /// Ends the session when the new piece collides right where it spawns.
    fn spawn_next(&mut self) {
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => self.pieces.next_piece(),
        };
        self.next = Some(self.pieces.next_piece());

        let piece = Piece::spawn(kind);
        self.active = Some(piece);
        if self.board.collides(&piece, 0, 0) {
            self.finish();
            return;
        }
        tracing::debug!(kind = %kind.as_char(), next = ?self.next, "piece spawned");
        self.events.push(SessionEvent::PieceSpawned(kind));
    }

    fn lock_piece(&mut self, piece: Piece) {
        self.board.fill_piece(&piece);
        self.events.push(SessionEvent::PieceLocked(piece.kind()));

        let cleared_rows = self.board.clear_completed_rows();
        let level = self.stats.level();
        let points = self.stats.complete_piece_drop(cleared_rows);
        tracing::debug!(
            kind = %piece.kind().as_char(),
            x = piece.position().x(),
            y = piece.position().y(),
            cleared_rows,
            points,
            "piece locked"
        );
        if cleared_rows > 0 {
            self.events.push(SessionEvent::RowsCleared {
                rows: cleared_rows,
                points,
            });
        }
        if self.stats.level() > level {
            tracing::info!(level = self.stats.level(), "level up");
            self.events.push(SessionEvent::LevelUp(self.stats.level()));
        }

        self.spawn_next();
    }

    fn finish(&mut self) {
        self.state = SessionState::GameOver;
        let report = self.report();
        tracing::info!(
            score = report.score,
            level = report.level,
            lines = report.lines,
            "game over"
        );
        self.events.push(SessionEvent::GameOver(report));
    }

    fn report(&self) -> GameOverReport {
        GameOverReport {
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.lines(),
        }
    }
}
