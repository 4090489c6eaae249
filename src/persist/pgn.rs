//! PGN export for game history interchange.
//!
//! Writes tag pairs and long-algebraic movetext from a session history. The
//! native save format stays the plain move list; PGN is an export for other
//! tools.

use std::collections::BTreeMap;

use chrono::Local;

use crate::session::game_session::GameStatus;
use crate::session::piece::PieceColor;

/// Serialize a history to PGN with default headers and today's date.
pub fn write_pgn(history: &[String], result: &str) -> String {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Event".to_owned(), "Tabula Chess Game".to_owned());
    headers.insert("Site".to_owned(), "Local".to_owned());
    headers.insert(
        "Date".to_owned(),
        Local::now().format("%Y.%m.%d").to_string(),
    );
    headers.insert("Round".to_owned(), "-".to_owned());
    headers.insert("White".to_owned(), "White".to_owned());
    headers.insert("Black".to_owned(), "Black".to_owned());
    headers.insert("Result".to_owned(), normalize_result(result).to_owned());

    write_pgn_with_headers(history, &headers)
}

/// Serialize a history with caller-provided tag pairs.
pub fn write_pgn_with_headers(history: &[String], headers: &BTreeMap<String, String>) -> String {
    let mut out = String::new();

    for (key, value) in headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    let mut movetext = Vec::<String>::with_capacity(history.len() + 1);
    for (ply, mv) in history.iter().enumerate() {
        if ply % 2 == 0 {
            movetext.push(format!("{}. {}", (ply / 2) + 1, mv));
        } else {
            movetext.push(mv.clone());
        }
    }

    let result = headers
        .get("Result")
        .map(|value| normalize_result(value))
        .unwrap_or("*");
    movetext.push(result.to_owned());
    out.push_str(&movetext.join(" "));
    out.push('\n');

    out
}

/// The PGN result token for a finished or running game. `side_to_move` is the
/// player facing the reported status.
pub fn game_result(status: GameStatus, side_to_move: PieceColor) -> &'static str {
    match status {
        GameStatus::Checkmate => match side_to_move {
            PieceColor::White => "0-1",
            PieceColor::Black => "1-0",
        },
        GameStatus::Stalemate => "1/2-1/2",
        _ => "*",
    }
}

fn normalize_result(result: &str) -> &str {
    match result {
        "1-0" | "0-1" | "1/2-1/2" => result,
        _ => "*",
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movetext_numbers_white_moves() {
        let history = vec![
            "e2e4".to_owned(),
            "e7e5".to_owned(),
            "g1f3".to_owned(),
        ];
        let pgn = write_pgn(&history, "*");

        assert!(pgn.contains("[Event \"Tabula Chess Game\"]"));
        assert!(pgn.contains("[Result \"*\"]"));
        assert!(pgn.ends_with("1. e2e4 e7e5 2. g1f3 *\n"));
    }

    #[test]
    fn unknown_results_normalize_to_unfinished() {
        let pgn = write_pgn(&[], "whatever");
        assert!(pgn.contains("[Result \"*\"]"));
    }

    #[test]
    fn result_tokens_follow_the_status() {
        assert_eq!(game_result(GameStatus::Checkmate, PieceColor::White), "0-1");
        assert_eq!(game_result(GameStatus::Checkmate, PieceColor::Black), "1-0");
        assert_eq!(game_result(GameStatus::Stalemate, PieceColor::White), "1/2-1/2");
        assert_eq!(game_result(GameStatus::Playing, PieceColor::White), "*");
    }
}
