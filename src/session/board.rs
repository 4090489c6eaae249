//! Board grid and piece arena.
//!
//! The board is an 8x8 grid of optional piece handles over an arena of the
//! 32 pieces created at setup. The grid is the single source of truth for
//! occupancy: a piece appears in at most one cell, a captured piece appears
//! in no cell, and every placement updates the grid and the piece's own cell
//! field together.

use crate::session::cell::Cell;
use crate::session::piece::{Piece, PieceColor, PieceId, PieceKind};
use crate::session::player::{Controller, Player};

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    // Indexed [file][rank], file 0 = 'a', rank 0 = White's back rank.
    cells: [[Option<PieceId>; 8]; 8],
    pieces: Vec<Piece>,
}

impl Board {
    /// Build the standard starting position together with its two player
    /// records. Creation order per player is pawns, bishops, knights, rooks,
    /// queen, king; the king handle is recorded on the player.
    pub fn standard() -> (Board, [Player; 2]) {
        let mut board = Board {
            cells: [[None; 8]; 8],
            pieces: Vec::with_capacity(32),
        };
        let mut rosters: [Vec<PieceId>; 2] = [Vec::with_capacity(16), Vec::with_capacity(16)];

        let mut add = |board: &mut Board,
                       rosters: &mut [Vec<PieceId>; 2],
                       color: PieceColor,
                       kind: PieceKind,
                       file: i8,
                       rank: i8| {
            let id = PieceId::new(board.pieces.len() as u8);
            let origin = Cell::new(file, rank);
            board.pieces.push(Piece::new(color, kind, origin));
            board.cells[file as usize][rank as usize] = Some(id);
            rosters[color.index()].push(id);
            id
        };

        for file in 0..8 {
            add(&mut board, &mut rosters, PieceColor::White, PieceKind::Pawn, file, 1);
        }
        for file in 0..8 {
            add(&mut board, &mut rosters, PieceColor::Black, PieceKind::Pawn, file, 6);
        }

        for (color, rank) in [(PieceColor::White, 0), (PieceColor::Black, 7)] {
            add(&mut board, &mut rosters, color, PieceKind::Bishop, 2, rank);
            add(&mut board, &mut rosters, color, PieceKind::Bishop, 5, rank);
        }
        for (color, rank) in [(PieceColor::White, 0), (PieceColor::Black, 7)] {
            add(&mut board, &mut rosters, color, PieceKind::Knight, 1, rank);
            add(&mut board, &mut rosters, color, PieceKind::Knight, 6, rank);
        }
        for (color, rank) in [(PieceColor::White, 0), (PieceColor::Black, 7)] {
            add(&mut board, &mut rosters, color, PieceKind::Rook, 0, rank);
            add(&mut board, &mut rosters, color, PieceKind::Rook, 7, rank);
        }

        let mut kings = [None, None];
        for (color, rank) in [(PieceColor::White, 0), (PieceColor::Black, 7)] {
            add(&mut board, &mut rosters, color, PieceKind::Queen, 3, rank);
        }
        for (color, rank) in [(PieceColor::White, 0), (PieceColor::Black, 7)] {
            let id = add(&mut board, &mut rosters, color, PieceKind::King, 4, rank);
            kings[color.index()] = Some(id);
        }

        let [white_roster, black_roster] = rosters;
        let players = [
            Player {
                color: PieceColor::White,
                pieces: white_roster,
                king: kings[0].expect("white king was created"),
                promotion_rank: PieceColor::White.promotion_rank(),
                controller: Controller::Human,
            },
            Player {
                color: PieceColor::Black,
                pieces: black_roster,
                king: kings[1].expect("black king was created"),
                promotion_rank: PieceColor::Black.promotion_rank(),
                controller: Controller::Engine,
            },
        ];

        (board, players)
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    #[inline]
    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.index()]
    }

    #[inline]
    pub fn piece_at(&self, cell: Cell) -> Option<PieceId> {
        self.cells[cell.file as usize][cell.rank as usize]
    }

    /// All pieces in the arena, captured ones included.
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces
            .iter()
            .enumerate()
            .map(|(i, p)| (PieceId::new(i as u8), p))
    }

    /// Place a piece on a cell, keeping grid and piece cell field in sync.
    /// The target cell must already be empty.
    pub(crate) fn place(&mut self, id: PieceId, cell: Cell) {
        debug_assert!(self.piece_at(cell).is_none(), "cell already occupied");
        self.cells[cell.file as usize][cell.rank as usize] = Some(id);
        self.pieces[id.index()].cell = cell;
    }

    /// Empty a cell, returning the handle that occupied it.
    pub(crate) fn lift(&mut self, cell: Cell) -> Option<PieceId> {
        self.cells[cell.file as usize][cell.rank as usize].take()
    }

    /// Mark a piece captured and remove it from the grid.
    pub(crate) fn capture(&mut self, id: PieceId) {
        let cell = self.pieces[id.index()].cell;
        debug_assert_eq!(self.piece_at(cell), Some(id));
        self.cells[cell.file as usize][cell.rank as usize] = None;
        self.pieces[id.index()].captured = true;
    }

    /// Undo a capture marking and put the piece back on its cell.
    pub(crate) fn restore_captured(&mut self, id: PieceId) {
        let piece = &mut self.pieces[id.index()];
        debug_assert!(piece.captured);
        piece.captured = false;
        let cell = piece.cell;
        debug_assert!(self.piece_at(cell).is_none());
        self.cells[cell.file as usize][cell.rank as usize] = Some(id);
    }

    /// Reset every piece to its origin state and rebuild the grid from piece
    /// origins. Used by new-game and by the silent replay that powers undo.
    pub(crate) fn rebuild_initial(&mut self) {
        self.cells = [[None; 8]; 8];
        for (index, piece) in self.pieces.iter_mut().enumerate() {
            piece.reset();
            let origin = piece.origin;
            self.cells[origin.file as usize][origin.rank as usize] =
                Some(PieceId::new(index as u8));
        }
    }

    /// Build an arbitrary position for tests. Kings are required for both
    /// sides; pieces start unmoved with the given cell as their origin.
    #[cfg(test)]
    pub(crate) fn custom(setup: &[(PieceColor, PieceKind, Cell)]) -> (Board, [Player; 2]) {
        let mut board = Board {
            cells: [[None; 8]; 8],
            pieces: Vec::with_capacity(setup.len()),
        };
        let mut rosters: [Vec<PieceId>; 2] = [Vec::new(), Vec::new()];
        let mut kings = [None, None];

        for &(color, kind, cell) in setup {
            let id = PieceId::new(board.pieces.len() as u8);
            board.pieces.push(Piece::new(color, kind, cell));
            assert!(
                board.cells[cell.file as usize][cell.rank as usize].is_none(),
                "two pieces on one cell in test setup"
            );
            board.cells[cell.file as usize][cell.rank as usize] = Some(id);
            rosters[color.index()].push(id);
            if kind == PieceKind::King {
                kings[color.index()] = Some(id);
            }
        }

        let [white_roster, black_roster] = rosters;
        let players = [
            Player {
                color: PieceColor::White,
                pieces: white_roster,
                king: kings[0].expect("test setup needs a white king"),
                promotion_rank: PieceColor::White.promotion_rank(),
                controller: Controller::Human,
            },
            Player {
                color: PieceColor::Black,
                pieces: black_roster,
                king: kings[1].expect("test setup needs a black king"),
                promotion_rank: PieceColor::Black.promotion_rank(),
                controller: Controller::Human,
            },
        ];

        (board, players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_setup_has_consistent_grid_and_arena() {
        let (board, players) = Board::standard();

        assert_eq!(board.pieces.len(), 32);
        for player in &players {
            assert_eq!(player.pieces.len(), 16);
            assert_eq!(board.piece(player.king).kind(), PieceKind::King);
        }

        let mut seen = 0;
        for file in 0..8i8 {
            for rank in 0..8i8 {
                let cell = Cell::new(file, rank);
                if let Some(id) = board.piece_at(cell) {
                    seen += 1;
                    let piece = board.piece(id);
                    assert_eq!(piece.cell, cell);
                    assert!(!piece.captured);
                    assert!(!piece.has_moved);
                }
            }
        }
        assert_eq!(seen, 32);
    }

    #[test]
    fn standard_setup_piece_order_ends_with_king() {
        let (board, players) = Board::standard();
        for player in &players {
            let kinds: Vec<PieceKind> = player
                .pieces
                .iter()
                .map(|&id| board.piece(id).kind())
                .collect();
            assert_eq!(&kinds[0..8], &[PieceKind::Pawn; 8]);
            assert_eq!(kinds[15], PieceKind::King);
            assert_eq!(kinds[14], PieceKind::Queen);
        }
    }

    #[test]
    fn capture_removes_from_grid_and_restore_reverses_it() {
        let (mut board, _) = Board::standard();
        let cell = Cell::new(4, 1);
        let id = board.piece_at(cell).expect("e2 holds a pawn");

        board.capture(id);
        assert_eq!(board.piece_at(cell), None);
        assert!(board.piece(id).captured);

        board.restore_captured(id);
        assert_eq!(board.piece_at(cell), Some(id));
        assert!(!board.piece(id).captured);
    }

    #[test]
    fn rebuild_initial_restores_origins() {
        let (mut board, _) = Board::standard();
        let e2 = Cell::new(4, 1);
        let e4 = Cell::new(4, 3);
        let id = board.lift(e2).expect("e2 holds a pawn");
        board.place(id, e4);
        board.piece_mut(id).has_moved = true;

        let (fresh, _) = Board::standard();
        assert_ne!(board, fresh);
        board.rebuild_initial();
        assert_eq!(board, fresh);
    }
}
