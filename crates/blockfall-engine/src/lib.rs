//! Rules engine for a single-player falling-block puzzle game.
//!
//! The crate has no I/O: a presentation layer drives a [`GameSession`] with
//! commands and elapsed time, then reads the board, the falling piece and the
//! statistics back to draw them.
//!
//! - [`core`] - board grid and piece catalog
//! - [`engine`] - session state machine, scoring and piece selection
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Command, GameSession, PieceKind, PieceSequence, SessionState};
//!
//! let mut session = GameSession::with_piece_source(PieceSequence::new([PieceKind::O]));
//! session.start().unwrap();
//! session.apply(Command::MoveLeft).unwrap();
//! session.apply(Command::HardDrop).unwrap();
//! session.tick(Duration::from_millis(16));
//!
//! assert_eq!(session.state(), SessionState::Running);
//! assert!(session.board().is_occupied(3, 19));
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding at the requested position")]
pub struct PieceCollisionError;

/// Reasons a [`Command`] is rejected.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CommandError {
    #[display("gameplay commands require a running session")]
    NotRunning,
    #[display("piece blocked: {_0}")]
    Blocked(PieceCollisionError),
    #[display("session already started")]
    AlreadyStarted,
}

impl From<PieceCollisionError> for CommandError {
    fn from(err: PieceCollisionError) -> Self {
        Self::Blocked(err)
    }
}

/// Error returned when parsing a [`PieceSeed`] from text.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid hex: expected 32 characters, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid hex: {_0}")]
    InvalidDigit(std::num::ParseIntError),
}
