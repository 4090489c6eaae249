//! Owned game session: board, players, history, and the state machine.
//!
//! `GameSession` is the single object the surrounding application (renderer,
//! persistence, engine bridge) holds a reference to; there is no ambient
//! global state. Every public operation runs to completion synchronously and
//! the session is not thread-safe: callers driving moves concurrently with a
//! background suggestion must serialize access.

use tracing::{trace, warn};

use crate::errors::ChessError;
use crate::rules::legality::{king_is_safe, legal_moves_for_color, legal_moves_from};
use crate::rules::move_record::MoveRecord;
use crate::session::board::Board;
use crate::session::cell::Cell;
use crate::session::piece::{PieceColor, PieceId, PieceKind};
use crate::session::player::{Controller, Player};

/// Session lifecycle states. Exactly one holds at any time once setup has
/// completed; `Stalemate` and `Checkmate` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Setup,
    Playing,
    PlayerInCheck,
    Stalemate,
    Checkmate,
}

impl GameStatus {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Stalemate | GameStatus::Checkmate)
    }
}

/// A capture reported to the presentation layer. `exit_slot` is the index of
/// the board-exit parking slot for the captured side, counted from zero in
/// capture order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub piece: PieceId,
    pub exit_slot: u8,
}

/// Everything a caller needs to reflect one committed move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub mover: PieceId,
    pub capture: Option<Capture>,
    pub castling_rook: Option<PieceId>,
    pub en_passant: bool,
    pub promotion: Option<PieceKind>,
    pub status: GameStatus,
    /// Pass-through presentation hint; the rules themselves are identical
    /// either way.
    pub animate: bool,
}

struct CommittedMove {
    mover: PieceId,
    capture: Option<Capture>,
    castling_rook: Option<PieceId>,
    en_passant: bool,
    promotion: Option<PieceKind>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    players: [Player; 2],
    current: usize,
    history: Vec<String>,
    status: GameStatus,
    captured_out: [u8; 2],
}

impl GameSession {
    /// Create a session with the standard starting position. The session
    /// stays in `Setup` until [`reset_game`](Self::reset_game) starts play,
    /// mirroring an application's load phase.
    pub fn new() -> Self {
        let (board, players) = Board::standard();
        Self {
            board,
            players,
            current: 0,
            history: Vec::new(),
            status: GameStatus::Setup,
            captured_out: [0, 0],
        }
    }

    /// Start a fresh game: every piece back on its origin square, history
    /// cleared, White to move.
    pub fn reset_game(&mut self) {
        self.board.rebuild_initial();
        self.current = 0;
        self.history.clear();
        self.captured_out = [0, 0];
        self.status = GameStatus::Playing;
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    #[inline]
    pub fn current_color(&self) -> PieceColor {
        match self.current {
            0 => PieceColor::White,
            _ => PieceColor::Black,
        }
    }

    #[inline]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    #[inline]
    pub fn player(&self, color: PieceColor) -> &Player {
        &self.players[color.index()]
    }

    pub fn set_controller(&mut self, color: PieceColor, controller: Controller) {
        self.players[color.index()].controller = controller;
    }

    /// Commit one wire-format move. Malformed or illegal input is rejected
    /// as a no-op with the board untouched; the state machine transition runs
    /// synchronously before returning.
    pub fn apply_move(&mut self, text: &str, animate: bool) -> Result<MoveOutcome, ChessError> {
        match self.status {
            GameStatus::Setup => return Err(ChessError::GameNotStarted),
            status if status.is_terminal() => return Err(ChessError::GameOver(status)),
            _ => {}
        }
        if text.is_empty() || text == "(none)" {
            return Err(ChessError::EmptyMoveString);
        }

        let record = MoveRecord::parse(text)?;
        let Some(source_id) = self.board.piece_at(record.src) else {
            warn!(mv = text, "rejected: no piece on source cell");
            return Err(ChessError::EmptySourceCell(record.src));
        };
        if self.board.piece(source_id).color != self.current_color() {
            warn!(mv = text, "rejected: piece does not belong to side to move");
            return Err(ChessError::IllegalMove(text.to_owned()));
        }

        let last = self.history.last().cloned();
        let legal = legal_moves_from(&mut self.board, record.src, last.as_deref());
        let Some(matched) = legal
            .iter()
            .find(|m| m.dst == record.dst && m.promotion == record.promotion)
            .copied()
        else {
            warn!(mv = text, "rejected: not a legal move");
            return Err(ChessError::IllegalMove(text.to_owned()));
        };

        let committed = self.commit(&matched.stripped());
        self.current = 1 - self.current;
        self.status = self.evaluate_position();

        Ok(MoveOutcome {
            mover: committed.mover,
            capture: committed.capture,
            castling_rook: committed.castling_rook,
            en_passant: committed.en_passant,
            promotion: committed.promotion,
            status: self.status,
            animate,
        })
    }

    /// Legal destination cells for the current player's piece on `cell`,
    /// deduplicated for UI highlighting. Empty for other cells or outside
    /// active play.
    pub fn legal_destinations(&mut self, cell: Cell) -> Vec<Cell> {
        if self.status == GameStatus::Setup || self.status.is_terminal() {
            return Vec::new();
        }
        let Some(id) = self.board.piece_at(cell) else {
            return Vec::new();
        };
        if self.board.piece(id).color != self.current_color() {
            return Vec::new();
        }

        let last = self.history.last().cloned();
        let mut out = Vec::new();
        for mv in legal_moves_from(&mut self.board, cell, last.as_deref()) {
            if !out.contains(&mv.dst) {
                out.push(mv.dst);
            }
        }
        out
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&mut self) -> Vec<MoveRecord> {
        if self.status == GameStatus::Setup || self.status.is_terminal() {
            return Vec::new();
        }
        let last = self.history.last().cloned();
        let color = self.current_color();
        legal_moves_for_color(&mut self.board, color, last.as_deref())
    }

    /// Undo the last committed move by replaying the shortened history from
    /// the initial position.
    pub fn undo_last_move(&mut self) {
        if self.history.is_empty() {
            return;
        }
        self.history.pop();
        self.replay_history();
    }

    /// Undo the last two committed moves; a human take-back against an
    /// engine opponent removes both the reply and the player's own move.
    pub fn undo_last_two_moves(&mut self) {
        if self.history.is_empty() {
            return;
        }
        self.history.pop();
        self.history.pop();
        self.replay_history();
    }

    /// Reset and re-apply a saved move list. Entries are fully validated;
    /// on error the session is left freshly reset.
    pub fn load_moves(&mut self, moves: &[String]) -> Result<(), ChessError> {
        self.reset_game();
        for text in moves {
            if let Err(err) = self.apply_move(text, false) {
                self.reset_game();
                return Err(err);
            }
        }
        Ok(())
    }

    // Steps 2-7 of move application. The caller has already validated the
    // move; this never fails on validated input.
    fn commit(&mut self, record: &MoveRecord) -> CommittedMove {
        let mover = self
            .board
            .piece_at(record.src)
            .expect("commit source was validated");
        let mover_kind = self.board.piece(mover).kind();
        let mover_color = self.board.piece(mover).color;

        // En passant is recognized from the board, not generator metadata:
        // a pawn changing file onto an empty destination.
        let en_passant = mover_kind == PieceKind::Pawn
            && record.src.file != record.dst.file
            && self.board.piece_at(record.dst).is_none();

        self.history.push(record.wire());

        self.board.lift(record.src);
        let capture_cell = if en_passant {
            Cell::new(record.dst.file, record.src.rank)
        } else {
            record.dst
        };
        let mut capture = None;
        if let Some(victim) = self.board.piece_at(capture_cell) {
            let victim_color = self.board.piece(victim).color;
            let exit_slot = self.captured_out[victim_color.index()];
            self.captured_out[victim_color.index()] += 1;
            self.board.capture(victim);
            self.board.piece_mut(victim).has_moved = true;
            capture = Some(Capture {
                piece: victim,
                exit_slot,
            });
        }
        self.board.place(mover, record.dst);
        self.board.piece_mut(mover).has_moved = true;

        let mut castling_rook = None;
        if !en_passant && mover_kind == PieceKind::King {
            let file_delta = record.src.file - record.dst.file;
            if file_delta.abs() == 2 {
                let (corner, rook_to) = if file_delta > 0 {
                    (
                        Cell::new(0, record.src.rank),
                        Cell::new(record.dst.file + 1, record.src.rank),
                    )
                } else {
                    (
                        Cell::new(7, record.src.rank),
                        Cell::new(record.dst.file - 1, record.src.rank),
                    )
                };
                let rook = self
                    .board
                    .piece_at(corner)
                    .expect("castling rook must stand on its corner");
                self.board.lift(corner);
                self.board.place(rook, rook_to);
                self.board.piece_mut(rook).has_moved = true;
                castling_rook = Some(rook);
            }
        }

        if let Some(kind) = record.promotion {
            assert_eq!(
                record.dst.rank,
                mover_color.promotion_rank(),
                "promotion committed outside the far rank"
            );
            self.board.piece_mut(mover).promote(kind);
        }

        trace!(mv = %record, "committed move");
        CommittedMove {
            mover,
            capture,
            castling_rook,
            en_passant,
            promotion: record.promotion,
        }
    }

    // Rebuild the board from scratch and re-apply the current history
    // silently: no state transitions per move, only the final position
    // matters. Turn parity falls out of the replayed count.
    fn replay_history(&mut self) {
        let moves = std::mem::take(&mut self.history);
        self.board.rebuild_initial();
        self.current = 0;
        self.captured_out = [0, 0];

        for text in &moves {
            let record =
                MoveRecord::parse(text).expect("history entries were validated when applied");
            self.commit(&record);
            self.current = 1 - self.current;
        }
        self.status = self.evaluate_position();
    }

    // The state machine decision table, evaluated for the side to move.
    fn evaluate_position(&mut self) -> GameStatus {
        let color = self.current_color();
        let last = self.history.last().cloned();
        let safe = king_is_safe(&self.board, color, last.as_deref());
        let has_reply =
            !legal_moves_for_color(&mut self.board, color, last.as_deref()).is_empty();

        match (safe, has_reply) {
            (true, true) => GameStatus::Playing,
            (true, false) => GameStatus::Stalemate,
            (false, true) => GameStatus::PlayerInCheck,
            (false, false) => GameStatus::Checkmate,
        }
    }

    /// Build a session around an arbitrary position for tests.
    #[cfg(test)]
    pub(crate) fn from_custom_position(
        setup: &[(PieceColor, PieceKind, Cell)],
        to_move: PieceColor,
    ) -> Self {
        let (board, players) = Board::custom(setup);
        let mut session = Self {
            board,
            players,
            current: to_move.index(),
            history: Vec::new(),
            status: GameStatus::Playing,
            captured_out: [0, 0],
        };
        session.status = session.evaluate_position();
        session
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
