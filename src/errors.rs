//! Errors used throughout the rules engine.
//!
//! `ChessError` is the single error type returned by the session API, move
//! parsing, and persistence. Recoverable failures (bad input, illegal moves,
//! unreadable files) are reported through these variants; programming errors
//! such as promoting a non-pawn panic instead, because they indicate a caller
//! bug rather than bad data.

use std::error::Error;
use std::fmt;

use crate::session::cell::Cell;
use crate::session::game_session::GameStatus;

#[derive(Debug)]
pub enum ChessError {
    /// A file or rank character outside `a-h` / `1-8`.
    InvalidAlgebraicChar(char),

    /// A move string that is not 4 or 5 valid algebraic characters.
    InvalidMoveString(String),

    /// An empty or `"(none)"` move was submitted.
    EmptyMoveString,

    /// The move's source cell holds no piece.
    EmptySourceCell(Cell),

    /// The move parsed but is not legal in the current position.
    IllegalMove(String),

    /// A move was submitted before the session left its setup phase.
    GameNotStarted,

    /// A move was submitted after checkmate or stalemate.
    GameOver(GameStatus),

    /// A saved move list contained an entry that does not parse.
    SaveFileMalformed { line: usize, entry: String },

    /// Underlying I/O failure from persistence or the engine bridge.
    Io(std::io::Error),
}

impl fmt::Display for ChessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChessError::InvalidAlgebraicChar(c) => {
                write!(f, "invalid algebraic character: {c:?}")
            }
            ChessError::InvalidMoveString(s) => write!(f, "invalid move string: {s:?}"),
            ChessError::EmptyMoveString => write!(f, "no move provided"),
            ChessError::EmptySourceCell(cell) => {
                write!(f, "no piece on source cell ({}, {})", cell.file, cell.rank)
            }
            ChessError::IllegalMove(s) => write!(f, "illegal move: {s}"),
            ChessError::GameNotStarted => write!(f, "game has not been started"),
            ChessError::GameOver(status) => write!(f, "game is over: {status:?}"),
            ChessError::SaveFileMalformed { line, entry } => {
                write!(f, "saved move list is malformed at line {line}: {entry:?}")
            }
            ChessError::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl Error for ChessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChessError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChessError {
    fn from(err: std::io::Error) -> Self {
        ChessError::Io(err)
    }
}
