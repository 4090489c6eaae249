//! Cell conversions for long algebraic coordinates.
//!
//! Converts between human-readable square names (e.g. `e4`) and board cells.
//! These are the building blocks of the wire move format shared with the
//! external engine and with saved move lists.

use crate::errors::ChessError;
use crate::session::cell::Cell;

/// Convert a square name such as `"e4"` to a cell.
#[inline]
pub fn algebraic_to_cell(square: &str) -> Result<Cell, ChessError> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidMoveString(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];
    if !(b'a'..=b'h').contains(&file) {
        return Err(ChessError::InvalidAlgebraicChar(file as char));
    }
    if !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidAlgebraicChar(rank as char));
    }

    Ok(Cell::new((file - b'a') as i8, (rank - b'1') as i8))
}

/// Convert a cell to its square name such as `"e4"`.
#[inline]
pub fn cell_to_algebraic(cell: Cell) -> String {
    debug_assert!((0..8).contains(&cell.file) && (0..8).contains(&cell.rank));
    let file_char = char::from(b'a' + cell.file as u8);
    let rank_char = char::from(b'1' + cell.rank as u8);
    format!("{file_char}{rank_char}")
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_cell, cell_to_algebraic};
    use crate::session::cell::Cell;

    #[test]
    fn round_trip_square_names() {
        assert_eq!(algebraic_to_cell("a1").expect("a1 should parse"), Cell::new(0, 0));
        assert_eq!(algebraic_to_cell("h8").expect("h8 should parse"), Cell::new(7, 7));
        assert_eq!(cell_to_algebraic(Cell::new(4, 3)), "e4");
        assert_eq!(
            algebraic_to_cell(&cell_to_algebraic(Cell::new(2, 6))).expect("round trip"),
            Cell::new(2, 6)
        );
    }

    #[test]
    fn rejects_out_of_range_characters() {
        assert!(algebraic_to_cell("i1").is_err());
        assert!(algebraic_to_cell("a9").is_err());
        assert!(algebraic_to_cell("a").is_err());
        assert!(algebraic_to_cell("A1").is_err());
    }
}
