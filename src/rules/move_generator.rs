//! Pseudo-legal move enumeration.
//!
//! Produces every move a piece could make by movement rules alone, ignoring
//! whether the mover's own king ends up attacked; the legality filter takes
//! care of that. Dispatch over piece kinds is a plain `match` into the
//! per-kind generator modules.

use crate::rules::king_moves;
use crate::rules::knight_moves;
use crate::rules::move_record::MoveRecord;
use crate::rules::pawn_moves;
use crate::rules::slider_moves::{self, BISHOP_DIRECTIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS};
use crate::session::board::Board;
use crate::session::cell::Cell;
use crate::session::piece::{PieceColor, PieceKind};

/// All pseudo-legal moves for the piece on `cell`, or nothing for an empty
/// cell. `last_move` is the most recent history entry, needed to recognize
/// en passant. Output order carries no meaning.
pub fn pseudo_legal_moves(board: &Board, cell: Cell, last_move: Option<&str>) -> Vec<MoveRecord> {
    let Some(id) = board.piece_at(cell) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    match board.piece(id).kind() {
        PieceKind::Pawn => pawn_moves::generate(board, cell, last_move, &mut out),
        PieceKind::Knight => knight_moves::generate(board, cell, &mut out),
        PieceKind::Bishop => slider_moves::generate(board, cell, BISHOP_DIRECTIONS, &mut out),
        PieceKind::Rook => slider_moves::generate(board, cell, ROOK_DIRECTIONS, &mut out),
        PieceKind::Queen => slider_moves::generate(board, cell, QUEEN_DIRECTIONS, &mut out),
        PieceKind::King => king_moves::generate(board, cell, &mut out),
    }
    out
}

/// Try a single fixed-offset step. Off-board and own-piece targets yield
/// nothing; an enemy target yields a capture, flagged when it is the king.
pub(crate) fn try_step(
    board: &Board,
    mover_color: PieceColor,
    src: Cell,
    d_file: i8,
    d_rank: i8,
) -> Option<MoveRecord> {
    let dst = src.offset(d_file, d_rank)?;
    let mut record = MoveRecord::plain(src, dst);

    if let Some(target_id) = board.piece_at(dst) {
        let target = board.piece(target_id);
        if target.color == mover_color {
            return None;
        }
        record.threatens_king = target.kind() == PieceKind::King;
    }
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::pseudo_legal_moves;
    use crate::session::board::Board;
    use crate::session::cell::Cell;
    use crate::session::piece::{PieceColor, PieceKind};

    #[test]
    fn empty_cell_generates_nothing() {
        let (board, _) = Board::standard();
        assert!(pseudo_legal_moves(&board, Cell::new(4, 3), None).is_empty());
    }

    #[test]
    fn starting_position_white_counts() {
        let (board, players) = Board::standard();
        let mut total = 0;
        for &id in &players[0].pieces {
            total += pseudo_legal_moves(&board, board.piece(id).cell, None).len();
        }
        // 8 pawns x 2 plus 2 knights x 2.
        assert_eq!(total, 20);
    }

    #[test]
    fn knight_step_counts_at_corner_and_center() {
        let (board, _) = Board::custom(&[
            (PieceColor::White, PieceKind::King, Cell::new(4, 0)),
            (PieceColor::Black, PieceKind::King, Cell::new(4, 7)),
            (PieceColor::White, PieceKind::Knight, Cell::new(0, 0)),
            (PieceColor::Black, PieceKind::Knight, Cell::new(3, 3)),
        ]);

        assert_eq!(pseudo_legal_moves(&board, Cell::new(0, 0), None).len(), 2);
        assert_eq!(pseudo_legal_moves(&board, Cell::new(3, 3), None).len(), 8);
    }

    #[test]
    fn knight_one_diagonal_in_from_corner_has_four_steps() {
        let (board, _) = Board::custom(&[
            (PieceColor::White, PieceKind::King, Cell::new(0, 0)),
            (PieceColor::Black, PieceKind::King, Cell::new(0, 7)),
            (PieceColor::White, PieceKind::Knight, Cell::new(6, 1)),
        ]);
        assert_eq!(pseudo_legal_moves(&board, Cell::new(6, 1), None).len(), 4);
    }
}
