//! Session logic built on top of the [`core`](crate::core) data structures.
//!
//! - [`GameSession`] - the session state machine (start, pause, moves, locking, top-out)
//! - [`GameStats`] - score, level, lines and drop interval policy
//! - [`PieceSource`] - injectable piece selection ([`RandomPieces`], [`PieceSequence`])
//! - [`SessionEvent`] - what happened during a command, for the presentation layer
//!
//! # Game Flow
//!
//! 1. [`GameSession::start`] resets the session and spawns the first piece
//! 2. Commands move, rotate and drop the falling piece
//! 3. [`GameSession::tick`] applies the automatic descent
//! 4. A piece that cannot move down locks, rows clear, the next piece spawns
//! 5. A piece that collides right at spawn ends the session

pub use self::{game_session::*, game_stats::*, piece_source::*};

mod game_session;
mod game_stats;
mod piece_source;
