//! Parsed move representation and the wire format.
//!
//! A move travels externally as 4 or 5 ASCII characters: source square,
//! destination square, and an optional promotion letter (`q`, `r`, `b`, `k`
//! for knight). Internally a record also carries two flags the generator
//! attaches, `threatens_king` and `en_passant`, which must never leak into
//! the persisted history or the engine-facing protocol; `wire()` always emits
//! the plain form.

use std::fmt;

use crate::errors::ChessError;
use crate::notation::algebraic::{algebraic_to_cell, cell_to_algebraic};
use crate::session::cell::Cell;
use crate::session::piece::PieceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub src: Cell,
    pub dst: Cell,
    pub promotion: Option<PieceKind>,
    /// Set by the generator when this move lands on the enemy king. Used by
    /// the legality filter only; the king is never actually captured.
    pub threatens_king: bool,
    /// Set by the generator when this is an en passant capture. Application
    /// re-derives the condition from the board, so parsed records may leave
    /// this false.
    pub en_passant: bool,
}

impl MoveRecord {
    #[inline]
    pub fn plain(src: Cell, dst: Cell) -> Self {
        Self {
            src,
            dst,
            promotion: None,
            threatens_king: false,
            en_passant: false,
        }
    }

    /// Parse a wire move string. Flags are never encoded on the wire and are
    /// left unset.
    pub fn parse(text: &str) -> Result<Self, ChessError> {
        let bytes = text.as_bytes();
        if bytes.len() != 4 && bytes.len() != 5 {
            return Err(ChessError::InvalidMoveString(text.to_owned()));
        }

        let src = algebraic_to_cell(&text[0..2])
            .map_err(|_| ChessError::InvalidMoveString(text.to_owned()))?;
        let dst = algebraic_to_cell(&text[2..4])
            .map_err(|_| ChessError::InvalidMoveString(text.to_owned()))?;

        let promotion = if bytes.len() == 5 {
            Some(promotion_from_letter(bytes[4] as char)
                .ok_or_else(|| ChessError::InvalidMoveString(text.to_owned()))?)
        } else {
            None
        };

        Ok(Self {
            src,
            dst,
            promotion,
            threatens_king: false,
            en_passant: false,
        })
    }

    /// The 4- or 5-character external form, flags stripped.
    pub fn wire(&self) -> String {
        let mut out = String::with_capacity(5);
        out.push_str(&cell_to_algebraic(self.src));
        out.push_str(&cell_to_algebraic(self.dst));
        if let Some(kind) = self.promotion {
            out.push(promotion_letter(kind));
        }
        out
    }

    /// Copy of this record with the king-threat flag cleared, the form the
    /// legality filter hands to preview.
    #[inline]
    pub fn stripped(&self) -> Self {
        Self {
            threatens_king: false,
            ..*self
        }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.wire())
    }
}

/// Promotion letter for a kind a pawn can become. `k` is the knight letter in
/// this wire format.
pub fn promotion_letter(kind: PieceKind) -> char {
    match kind {
        PieceKind::Queen => 'q',
        PieceKind::Rook => 'r',
        PieceKind::Bishop => 'b',
        PieceKind::Knight => 'k',
        other => unreachable!("{other:?} is not a promotion kind"),
    }
}

/// Inverse of [`promotion_letter`]; `None` for characters outside the format.
pub fn promotion_from_letter(letter: char) -> Option<PieceKind> {
    match letter {
        'q' => Some(PieceKind::Queen),
        'r' => Some(PieceKind::Rook),
        'b' => Some(PieceKind::Bishop),
        'k' => Some(PieceKind::Knight),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_promotion_moves() {
        let plain = MoveRecord::parse("e2e4").expect("e2e4 should parse");
        assert_eq!(plain.src, Cell::new(4, 1));
        assert_eq!(plain.dst, Cell::new(4, 3));
        assert_eq!(plain.promotion, None);
        assert_eq!(plain.wire(), "e2e4");

        let promo = MoveRecord::parse("e7e8k").expect("e7e8k should parse");
        assert_eq!(promo.promotion, Some(PieceKind::Knight));
        assert_eq!(promo.wire(), "e7e8k");
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["", "e2", "e2e", "e2e9", "i2e4", "e2e4x", "e2e4qq", "E2E4"] {
            assert!(MoveRecord::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn wire_never_carries_internal_flags() {
        let mut record = MoveRecord::plain(Cell::new(4, 4), Cell::new(3, 5));
        record.threatens_king = true;
        record.en_passant = true;
        assert_eq!(record.wire(), "e5d6");

        let stripped = record.stripped();
        assert!(!stripped.threatens_king);
        assert!(stripped.en_passant, "stripping only clears the threat flag");
    }

    #[test]
    fn knight_letter_is_k() {
        assert_eq!(promotion_letter(PieceKind::Knight), 'k');
        assert_eq!(promotion_from_letter('k'), Some(PieceKind::Knight));
        assert_eq!(promotion_from_letter('n'), None);
    }
}
