//! Legality filtering via preview-and-restore simulation.
//!
//! A candidate move is legal when, after previewing it on the board, no
//! opponent pseudo-legal move lands on the mover's king. Previews are held by
//! an RAII guard that snapshots exactly the fields it touches and restores
//! them on drop, so the board can never be left mid-preview; holding the
//! mutable borrow also makes nested previews impossible to express.

use tracing::trace;

use crate::rules::move_generator::pseudo_legal_moves;
use crate::rules::move_record::MoveRecord;
use crate::session::board::Board;
use crate::session::cell::Cell;
use crate::session::piece::{PieceColor, PieceId};

/// Scoped preview of a single move. Restores the exact pre-preview state when
/// dropped, including un-simulating promotion and un-marking capture.
pub struct PreviewGuard<'a> {
    board: &'a mut Board,
    src: Cell,
    dst: Cell,
    prior_has_moved: bool,
    promoted: bool,
    captured: Option<PieceId>,
}

impl<'a> PreviewGuard<'a> {
    /// Apply `record` to the board without history or notifications. The
    /// caller passes the stripped form; previewing a king-landing move
    /// unstripped is a filtering bug.
    pub fn apply(board: &'a mut Board, record: &MoveRecord) -> PreviewGuard<'a> {
        debug_assert!(
            !record.threatens_king,
            "preview requires the stripped move form"
        );

        let mover = board
            .piece_at(record.src)
            .expect("preview source must hold a piece");

        let mut promoted = false;
        if let Some(kind) = record.promotion {
            board.piece_mut(mover).promote(kind);
            promoted = true;
        }

        let prior_has_moved = board.piece(mover).has_moved;
        board.lift(record.src);
        board.piece_mut(mover).has_moved = true;

        let capture_cell = if record.en_passant {
            Cell::new(record.dst.file, record.src.rank)
        } else {
            record.dst
        };
        let captured = board.piece_at(capture_cell);
        if let Some(id) = captured {
            board.capture(id);
        }

        board.place(mover, record.dst);

        PreviewGuard {
            board,
            src: record.src,
            dst: record.dst,
            prior_has_moved,
            promoted,
            captured,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        self.board
    }
}

impl Drop for PreviewGuard<'_> {
    fn drop(&mut self) {
        let mover = self
            .board
            .lift(self.dst)
            .expect("preview mover must still be on its destination");
        {
            let piece = self.board.piece_mut(mover);
            piece.has_moved = self.prior_has_moved;
            if self.promoted {
                piece.unpromote();
            }
        }
        self.board.place(mover, self.src);
        if let Some(id) = self.captured {
            self.board.restore_captured(id);
        }
    }
}

/// True when no opponent piece has a pseudo-legal move landing on the king of
/// `defender`. Works directly on the current board; callers preview first
/// when asking about a hypothetical move.
pub fn king_is_safe(board: &Board, defender: PieceColor, last_move: Option<&str>) -> bool {
    let attacker = defender.opposite();
    for (_, piece) in board.pieces() {
        if piece.color != attacker || piece.captured {
            continue;
        }
        for mv in pseudo_legal_moves(board, piece.cell, last_move) {
            if mv.threatens_king {
                return false;
            }
        }
    }
    true
}

/// Legal moves for the piece on `cell`: its pseudo-legal moves minus those
/// that leave its own king attacked.
pub fn legal_moves_from(board: &mut Board, cell: Cell, last_move: Option<&str>) -> Vec<MoveRecord> {
    let Some(id) = board.piece_at(cell) else {
        return Vec::new();
    };
    let mover_color = board.piece(id).color;

    let mut out = Vec::new();
    for candidate in pseudo_legal_moves(board, cell, last_move) {
        if candidate.threatens_king {
            trace!(candidate = %candidate, "previewing a king-landing candidate");
        }
        let stripped = candidate.stripped();
        let guard = PreviewGuard::apply(board, &stripped);
        let safe = king_is_safe(guard.board(), mover_color, last_move);
        drop(guard);

        if safe {
            out.push(candidate);
        }
    }
    out
}

/// Legal moves for every non-captured piece of `color`.
pub fn legal_moves_for_color(
    board: &mut Board,
    color: PieceColor,
    last_move: Option<&str>,
) -> Vec<MoveRecord> {
    let cells: Vec<Cell> = board
        .pieces()
        .filter(|(_, piece)| piece.color == color && !piece.captured)
        .map(|(_, piece)| piece.cell)
        .collect();

    let mut out = Vec::new();
    for cell in cells {
        out.extend(legal_moves_from(board, cell, last_move));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::piece::PieceKind;

    #[test]
    fn preview_restore_leaves_no_residue() {
        let (mut board, _) = Board::standard();
        let snapshot = board.clone();

        let record = MoveRecord::parse("e2e4").expect("move parses");
        {
            let guard = PreviewGuard::apply(&mut board, &record);
            assert!(guard.board().piece_at(Cell::new(4, 1)).is_none());
            assert!(guard.board().piece_at(Cell::new(4, 3)).is_some());
        }
        assert_eq!(board, snapshot);
    }

    #[test]
    fn capture_preview_restores_the_captured_piece() {
        let (mut board, _) = Board::custom(&[
            (PieceColor::White, PieceKind::King, Cell::new(4, 0)),
            (PieceColor::Black, PieceKind::King, Cell::new(4, 7)),
            (PieceColor::White, PieceKind::Rook, Cell::new(0, 3)),
            (PieceColor::Black, PieceKind::Knight, Cell::new(6, 3)),
        ]);
        let snapshot = board.clone();

        let record = MoveRecord::parse("a4g4").expect("move parses");
        {
            let guard = PreviewGuard::apply(&mut board, &record);
            let knight = guard.board().piece_at(Cell::new(6, 3)).expect("rook landed");
            assert_eq!(guard.board().piece(knight).kind(), PieceKind::Rook);
        }
        assert_eq!(board, snapshot);
    }

    #[test]
    fn en_passant_preview_removes_and_restores_the_bypassing_pawn() {
        let (mut board, _) = Board::custom(&[
            (PieceColor::White, PieceKind::King, Cell::new(4, 0)),
            (PieceColor::Black, PieceKind::King, Cell::new(4, 7)),
            (PieceColor::White, PieceKind::Pawn, Cell::new(4, 4)),
            (PieceColor::Black, PieceKind::Pawn, Cell::new(3, 4)),
        ]);
        let snapshot = board.clone();

        let mut record = MoveRecord::parse("e5d6").expect("move parses");
        record.en_passant = true;
        {
            let guard = PreviewGuard::apply(&mut board, &record);
            // The captured pawn leaves the grid entirely while previewed.
            assert!(guard.board().piece_at(Cell::new(3, 4)).is_none());
            assert!(guard.board().piece_at(Cell::new(3, 5)).is_some());
        }
        assert_eq!(board, snapshot);
    }

    #[test]
    fn promotion_preview_unpromotes_on_restore() {
        let (mut board, _) = Board::custom(&[
            (PieceColor::White, PieceKind::King, Cell::new(7, 0)),
            (PieceColor::Black, PieceKind::King, Cell::new(7, 7)),
            (PieceColor::White, PieceKind::Pawn, Cell::new(0, 6)),
        ]);
        let snapshot = board.clone();

        let record = MoveRecord::parse("a7a8q").expect("move parses");
        {
            let guard = PreviewGuard::apply(&mut board, &record);
            let pawn = guard.board().piece_at(Cell::new(0, 7)).expect("promoted");
            assert_eq!(guard.board().piece(pawn).kind(), PieceKind::Queen);
        }
        assert_eq!(board, snapshot);
        let pawn = board.piece_at(Cell::new(0, 6)).expect("pawn back home");
        assert!(!board.piece(pawn).is_promoted());
    }

    #[test]
    fn pinned_bishop_has_zero_legal_moves() {
        // White rook on e3 pins the black bishop on e6 against the king on e8.
        let (mut board, _) = Board::custom(&[
            (PieceColor::White, PieceKind::King, Cell::new(7, 0)),
            (PieceColor::White, PieceKind::Rook, Cell::new(4, 2)),
            (PieceColor::Black, PieceKind::King, Cell::new(4, 7)),
            (PieceColor::Black, PieceKind::Bishop, Cell::new(4, 5)),
        ]);

        let pseudo = pseudo_legal_moves(&board, Cell::new(4, 5), None);
        assert!(!pseudo.is_empty(), "generator ignores the pin");

        let legal = legal_moves_from(&mut board, Cell::new(4, 5), None);
        assert!(legal.is_empty(), "every bishop move exposes the king");
    }

    #[test]
    fn king_landing_candidates_are_filtered_without_panicking() {
        // The white rook may land on the exposed black king square during
        // generation; the filter must strip the flag before previewing.
        let (mut board, _) = Board::custom(&[
            (PieceColor::White, PieceKind::King, Cell::new(7, 0)),
            (PieceColor::White, PieceKind::Rook, Cell::new(4, 0)),
            (PieceColor::Black, PieceKind::King, Cell::new(4, 7)),
        ]);
        let legal = legal_moves_from(&mut board, Cell::new(4, 0), None);
        assert!(legal.iter().any(|m| m.threatens_king));
    }

    #[test]
    fn king_safety_reports_attacks() {
        let (board, _) = Board::custom(&[
            (PieceColor::White, PieceKind::King, Cell::new(4, 0)),
            (PieceColor::Black, PieceKind::King, Cell::new(4, 7)),
            (PieceColor::Black, PieceKind::Rook, Cell::new(4, 5)),
        ]);
        assert!(!king_is_safe(&board, PieceColor::White, None));
        assert!(king_is_safe(&board, PieceColor::Black, None));
    }
}
