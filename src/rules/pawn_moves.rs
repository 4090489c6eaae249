//! Pawn move generation: pushes, captures, en passant, promotion fan-out.

use crate::notation::algebraic::cell_to_algebraic;
use crate::rules::move_record::MoveRecord;
use crate::session::board::Board;
use crate::session::cell::Cell;
use crate::session::piece::{PieceColor, PieceKind};

pub(crate) fn generate(
    board: &Board,
    src: Cell,
    last_move: Option<&str>,
    out: &mut Vec<MoveRecord>,
) {
    let Some(id) = board.piece_at(src) else {
        return;
    };
    let piece = board.piece(id);
    let color = piece.color;
    let dir = color.pawn_direction();
    let promotion_rank = color.promotion_rank();

    // Forward moves never capture.
    if let Some(forward) = src.offset(0, dir) {
        if board.piece_at(forward).is_none() {
            if forward.rank == promotion_rank {
                push_promotions(src, forward, out);
            } else {
                out.push(MoveRecord::plain(src, forward));

                // Double step only while unmoved, and only when both the
                // intervening and the target square are empty.
                if !piece.has_moved {
                    if let Some(double) = src.offset(0, 2 * dir) {
                        if board.piece_at(double).is_none() {
                            out.push(MoveRecord::plain(src, double));
                        }
                    }
                }
            }
        }
    }

    for d_file in [-1i8, 1i8] {
        let Some(dst) = src.offset(d_file, dir) else {
            continue;
        };

        match board.piece_at(dst) {
            Some(target_id) => {
                let target = board.piece(target_id);
                if target.color == color {
                    continue;
                }
                if target.kind() == PieceKind::King {
                    let mut record = MoveRecord::plain(src, dst);
                    record.threatens_king = true;
                    out.push(record);
                } else if dst.rank == promotion_rank {
                    push_promotions(src, dst, out);
                } else {
                    out.push(MoveRecord::plain(src, dst));
                }
            }
            None => {
                // En passant: the mover sits on its capture rank, an enemy
                // pawn stands beside it on the destination file, and the last
                // committed move was exactly that pawn's double step.
                let ep_rank = match color {
                    PieceColor::White => 4,
                    PieceColor::Black => 3,
                };
                if src.rank != ep_rank {
                    continue;
                }
                let beside = Cell::new(dst.file, src.rank);
                let Some(target_id) = board.piece_at(beside) else {
                    continue;
                };
                let target = board.piece(target_id);
                if target.color == color || target.kind() != PieceKind::Pawn {
                    continue;
                }

                let double_step = match color {
                    PieceColor::White => format!(
                        "{}{}",
                        cell_to_algebraic(Cell::new(dst.file, 6)),
                        cell_to_algebraic(Cell::new(dst.file, 4))
                    ),
                    PieceColor::Black => format!(
                        "{}{}",
                        cell_to_algebraic(Cell::new(dst.file, 1)),
                        cell_to_algebraic(Cell::new(dst.file, 3))
                    ),
                };
                if last_move != Some(double_step.as_str()) {
                    continue;
                }

                let mut record = MoveRecord::plain(src, dst);
                record.en_passant = true;
                out.push(record);
            }
        }
    }
}

// One candidate per promotion choice, tagged with its letter.
fn push_promotions(src: Cell, dst: Cell, out: &mut Vec<MoveRecord>) {
    for kind in [
        PieceKind::Queen,
        PieceKind::Knight,
        PieceKind::Rook,
        PieceKind::Bishop,
    ] {
        let mut record = MoveRecord::plain(src, dst);
        record.promotion = Some(kind);
        out.push(record);
    }
}
