//! Piece identity and in-place piece state.
//!
//! The 32 pieces of a game are created once at setup, live in the session
//! arena, and are only ever mutated in place: moved, marked captured,
//! promoted, and reset on a new game. They are never destroyed mid-game,
//! which is what makes undo-by-replay and capture animation possible for
//! the presentation layer.

use crate::session::cell::Cell;

/// Owning side of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceColor::White => 0,
            PieceColor::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// Forward direction of this side's pawns in rank deltas.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            PieceColor::White => 1,
            PieceColor::Black => -1,
        }
    }

    /// Rank index a pawn of this side promotes on.
    #[inline]
    pub const fn promotion_rank(self) -> i8 {
        match self {
            PieceColor::White => 7,
            PieceColor::Black => 0,
        }
    }
}

/// Piece kind. Dispatch over kinds is a plain `match`, not a trait hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Stable handle into the session's piece arena. Board cells store these so
/// that preview/restore only copies handles, never piece objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(u8);

impl PieceId {
    #[inline]
    pub(crate) const fn new(index: u8) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One physical chess piece for the whole game.
///
/// `cell` mirrors the board grid and the two are always updated together;
/// the grid remains the single source of truth for occupancy.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub color: PieceColor,
    base_kind: PieceKind,
    promotion: Option<PieceKind>,
    pub origin: Cell,
    pub cell: Cell,
    pub has_moved: bool,
    pub captured: bool,
}

impl Piece {
    pub(crate) fn new(color: PieceColor, kind: PieceKind, origin: Cell) -> Self {
        Self {
            color,
            base_kind: kind,
            promotion: None,
            origin,
            cell: origin,
            has_moved: false,
            captured: false,
        }
    }

    /// Effective kind: the base kind unless the piece has been promoted.
    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.promotion.unwrap_or(self.base_kind)
    }

    #[inline]
    pub fn base_kind(&self) -> PieceKind {
        self.base_kind
    }

    #[inline]
    pub fn is_promoted(&self) -> bool {
        self.promotion.is_some()
    }

    /// Promote this pawn to `kind`.
    ///
    /// Panics on a non-pawn, an already promoted piece, or a kind a pawn
    /// cannot promote to. These are caller bugs, not user input: the move
    /// pipeline validates promotion moves before they reach a piece.
    pub fn promote(&mut self, kind: PieceKind) {
        assert!(
            !self.is_promoted(),
            "attempted to promote an already promoted {:?}",
            self.kind()
        );
        assert!(
            self.base_kind == PieceKind::Pawn,
            "attempted to promote a {:?}",
            self.base_kind
        );
        assert!(
            matches!(
                kind,
                PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
            ),
            "a pawn cannot promote to {kind:?}"
        );
        self.promotion = Some(kind);
    }

    /// Revert a promotion. Panics if the piece is not promoted; used by
    /// preview restore, which tracks whether it simulated a promotion.
    pub fn unpromote(&mut self) {
        assert!(
            self.is_promoted(),
            "attempted to unpromote a non-promoted {:?}",
            self.base_kind
        );
        self.promotion = None;
    }

    /// Return the piece to its game-start state. Board placement is handled
    /// by the session, which rebuilds the grid from piece origins.
    pub(crate) fn reset(&mut self) {
        self.promotion = None;
        self.cell = self.origin;
        self.has_moved = false;
        self.captured = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_kind_follows_promotion() {
        let mut pawn = Piece::new(PieceColor::White, PieceKind::Pawn, Cell::new(0, 6));
        assert_eq!(pawn.kind(), PieceKind::Pawn);

        pawn.promote(PieceKind::Queen);
        assert_eq!(pawn.kind(), PieceKind::Queen);
        assert_eq!(pawn.base_kind(), PieceKind::Pawn);

        pawn.unpromote();
        assert_eq!(pawn.kind(), PieceKind::Pawn);
    }

    #[test]
    #[should_panic(expected = "already promoted")]
    fn double_promotion_panics() {
        let mut pawn = Piece::new(PieceColor::White, PieceKind::Pawn, Cell::new(0, 6));
        pawn.promote(PieceKind::Queen);
        pawn.promote(PieceKind::Rook);
    }

    #[test]
    #[should_panic(expected = "attempted to promote a")]
    fn promoting_non_pawn_panics() {
        let mut rook = Piece::new(PieceColor::White, PieceKind::Rook, Cell::new(0, 0));
        rook.promote(PieceKind::Queen);
    }

    #[test]
    #[should_panic(expected = "non-promoted")]
    fn unpromoting_non_promoted_panics() {
        let mut pawn = Piece::new(PieceColor::Black, PieceKind::Pawn, Cell::new(3, 1));
        pawn.unpromote();
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut pawn = Piece::new(PieceColor::White, PieceKind::Pawn, Cell::new(4, 1));
        pawn.cell = Cell::new(4, 6);
        pawn.has_moved = true;
        pawn.promote(PieceKind::Knight);
        pawn.captured = true;

        pawn.reset();
        assert_eq!(pawn.cell, pawn.origin);
        assert!(!pawn.has_moved);
        assert!(!pawn.captured);
        assert!(!pawn.is_promoted());
    }
}
