//! Plain-text move list persistence.
//!
//! The save format is the history itself: one wire move string per line, in
//! order. Loading validates the shape of every entry; replaying it through a
//! session validates legality.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::errors::ChessError;
use crate::rules::move_record::MoveRecord;

/// Write a move history to `path`, one move per line.
pub fn save_move_list(path: &Path, history: &[String]) -> Result<(), ChessError> {
    let mut file = fs::File::create(path)?;
    for entry in history {
        writeln!(file, "{entry}")?;
    }
    Ok(())
}

/// Read a move list saved by [`save_move_list`]. Blank lines are skipped;
/// entries that do not parse as wire moves fail with their line number.
pub fn load_move_list(path: &Path) -> Result<Vec<String>, ChessError> {
    let text = fs::read_to_string(path)?;
    let mut moves = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let entry = line.trim();
        if entry.is_empty() {
            continue;
        }
        let record = MoveRecord::parse(entry).map_err(|_| ChessError::SaveFileMalformed {
            line: index + 1,
            entry: entry.to_owned(),
        })?;
        moves.push(record.wire());
    }
    Ok(moves)
}
