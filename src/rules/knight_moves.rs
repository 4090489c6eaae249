use crate::rules::move_generator::try_step;
use crate::rules::move_record::MoveRecord;
use crate::session::board::Board;
use crate::session::cell::Cell;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (-1, 2),
    (1, -2),
    (-1, -2),
];

pub(crate) fn generate(board: &Board, src: Cell, out: &mut Vec<MoveRecord>) {
    let Some(id) = board.piece_at(src) else {
        return;
    };
    let color = board.piece(id).color;

    for (d_file, d_rank) in KNIGHT_OFFSETS {
        if let Some(record) = try_step(board, color, src, d_file, d_rank) {
            out.push(record);
        }
    }
}
