//! King move generation, including the castling candidates.
//!
//! Castling is offered as a plain two-square king move; the matching rook
//! relocation is derived when the move is applied, not enumerated here.

use crate::rules::move_generator::try_step;
use crate::rules::move_record::MoveRecord;
use crate::session::board::Board;
use crate::session::cell::Cell;
use crate::session::piece::PieceKind;

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub(crate) fn generate(board: &Board, src: Cell, out: &mut Vec<MoveRecord>) {
    let Some(id) = board.piece_at(src) else {
        return;
    };
    let piece = board.piece(id);
    let color = piece.color;

    if !piece.has_moved {
        for corner_file in [0i8, 7i8] {
            let corner = Cell::new(corner_file, src.rank);
            let Some(rook_id) = board.piece_at(corner) else {
                continue;
            };
            let rook = board.piece(rook_id);
            if rook.color != color || rook.kind() != PieceKind::Rook || rook.has_moved {
                continue;
            }

            let (low, high) = if corner_file < src.file {
                (corner_file, src.file)
            } else {
                (src.file, corner_file)
            };
            let between_empty =
                (low + 1..high).all(|file| board.piece_at(Cell::new(file, src.rank)).is_none());
            if !between_empty {
                continue;
            }

            let toward = if corner_file < src.file { -2 } else { 2 };
            if let Some(dst) = src.offset(toward, 0) {
                out.push(MoveRecord::plain(src, dst));
            }
        }
    }

    for (d_file, d_rank) in KING_OFFSETS {
        if let Some(record) = try_step(board, color, src, d_file, d_rank) {
            out.push(record);
        }
    }
}
