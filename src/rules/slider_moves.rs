//! Ray-cast generation shared by rooks, bishops, and queens.

use crate::rules::move_record::MoveRecord;
use crate::session::board::Board;
use crate::session::cell::Cell;
use crate::session::piece::PieceKind;

pub(crate) const ROOK_DIRECTIONS: &[(i8, i8)] = &[(0, 1), (0, -1), (1, 0), (-1, 0)];
pub(crate) const BISHOP_DIRECTIONS: &[(i8, i8)] = &[(1, 1), (-1, -1), (1, -1), (-1, 1)];
pub(crate) const QUEEN_DIRECTIONS: &[(i8, i8)] = &[
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// Walk each direction until the board edge, stopping before an own piece and
/// on an enemy piece (which is included as a capture).
pub(crate) fn generate(
    board: &Board,
    src: Cell,
    directions: &[(i8, i8)],
    out: &mut Vec<MoveRecord>,
) {
    let Some(id) = board.piece_at(src) else {
        return;
    };
    let color = board.piece(id).color;

    for &(d_file, d_rank) in directions {
        let mut cursor = src;
        while let Some(dst) = cursor.offset(d_file, d_rank) {
            match board.piece_at(dst) {
                None => {
                    out.push(MoveRecord::plain(src, dst));
                    cursor = dst;
                }
                Some(target_id) => {
                    let target = board.piece(target_id);
                    if target.color != color {
                        let mut record = MoveRecord::plain(src, dst);
                        record.threatens_king = target.kind() == PieceKind::King;
                        out.push(record);
                    }
                    break;
                }
            }
        }
    }
}
