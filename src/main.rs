//! Terminal front-end for the rules engine.
//!
//! Plays a game against an external UCI engine (or the built-in random
//! advisor when none is configured), driving the same session API a
//! graphical shell would: apply, highlight, undo, save, load, reset.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use tabula_chess::bridge::random_advisor::suggest_random_move;
use tabula_chess::bridge::uci_engine::UciEngine;
use tabula_chess::errors::ChessError;
use tabula_chess::notation::algebraic::algebraic_to_cell;
use tabula_chess::notation::render_board::render_board;
use tabula_chess::persist::move_list::{load_move_list, save_move_list};
use tabula_chess::persist::pgn::{game_result, write_pgn};
use tabula_chess::session::game_session::{GameSession, GameStatus};
use tabula_chess::session::piece::PieceColor;
use tabula_chess::session::player::Controller;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum SideArg {
    White,
    Black,
}

#[derive(Debug, Parser)]
#[command(name = "tabula_chess", about = "Terminal chess against a UCI engine")]
struct Args {
    /// Path to a UCI engine binary; without one the random advisor answers.
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Which side the engine plays.
    #[arg(long, value_enum, default_value_t = SideArg::Black)]
    engine_side: SideArg,

    /// Engine think time per move, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    movetime: u64,

    /// Move list file to resume from.
    #[arg(long)]
    load: Option<PathBuf>,
}

fn main() -> Result<(), ChessError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let engine_color = match args.engine_side {
        SideArg::White => PieceColor::White,
        SideArg::Black => PieceColor::Black,
    };

    let mut session = GameSession::new();
    session.reset_game();
    session.set_controller(engine_color, Controller::Engine);
    session.set_controller(engine_color.opposite(), Controller::Human);

    if let Some(path) = &args.load {
        let moves = load_move_list(path)?;
        session.load_moves(&moves)?;
        println!("resumed {} moves from {}", moves.len(), path.display());
    }

    let mut engine = match &args.engine {
        Some(path) => {
            let mut engine = UciEngine::spawn(path)?;
            engine.new_game()?;
            Some(engine)
        }
        None => None,
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("\n{}\n", render_board(session.board()));
        match session.status() {
            GameStatus::PlayerInCheck => {
                println!("{:?} to move, in check", session.current_color())
            }
            GameStatus::Checkmate | GameStatus::Stalemate => {
                let result = game_result(session.status(), session.current_color());
                println!("game over: {:?} ({result})", session.status());
                println!("type 'new' to play again, 'pgn' to export, or 'quit'");
            }
            _ => println!("{:?} to move", session.current_color()),
        }

        let engine_to_move = !session.status().is_terminal()
            && session.current_player().controller == Controller::Engine;

        if engine_to_move {
            match drive_engine(&mut session, engine.as_mut(), args.movetime) {
                Ok(Some(mv)) => {
                    println!("engine plays {mv}");
                    continue;
                }
                Ok(None) => {
                    // No usable reply; drop to the prompt so the user can
                    // undo, reset, or retry.
                    println!("engine offered no move");
                }
                Err(err) => {
                    warn!(error = %err, "engine turn failed; falling back to advisor");
                    engine = None;
                    continue;
                }
            }
        }

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut words = input.split_whitespace();
        match words.next().unwrap_or_default() {
            "quit" | "exit" => break,
            "new" => {
                session.reset_game();
                if let Some(engine) = engine.as_mut() {
                    engine.new_game()?;
                }
            }
            "undo" => {
                // Against an engine a take-back removes its reply too.
                if engine.is_some() {
                    session.undo_last_two_moves();
                } else {
                    session.undo_last_move();
                }
            }
            "save" => match words.next() {
                Some(path) => {
                    save_move_list(PathBuf::from(path).as_path(), session.history())?;
                    println!("saved {} moves", session.history().len());
                }
                None => println!("usage: save <file>"),
            },
            "load" => match words.next() {
                Some(path) => {
                    let moves = load_move_list(PathBuf::from(path).as_path())?;
                    match session.load_moves(&moves) {
                        Ok(()) => println!("loaded {} moves", moves.len()),
                        Err(err) => println!("load failed: {err}"),
                    }
                }
                None => println!("usage: load <file>"),
            },
            "pgn" => {
                let result = game_result(session.status(), session.current_color());
                print!("{}", write_pgn(session.history(), result));
            }
            "hint" => match suggest_random_move(&mut session) {
                Some(mv) => println!("try {mv}"),
                None => println!("no legal moves"),
            },
            "show" => match words.next().and_then(|sq| algebraic_to_cell(sq).ok()) {
                Some(cell) => {
                    let cells = session.legal_destinations(cell);
                    let names: Vec<String> = cells
                        .into_iter()
                        .map(tabula_chess::notation::algebraic::cell_to_algebraic)
                        .collect();
                    println!("{}", names.join(" "));
                }
                None => println!("usage: show <square>"),
            },
            mv => match session.apply_move(mv, false) {
                Ok(outcome) => {
                    if outcome.en_passant {
                        println!("en passant");
                    }
                    if outcome.castling_rook.is_some() {
                        println!("castled");
                    }
                }
                Err(err) => println!("rejected: {err}"),
            },
        }
    }

    Ok(())
}

/// Run one engine turn: sync the position, ask for a move, and apply the
/// answer unless it has gone stale (an undo or reset changed the position
/// while the engine was thinking).
fn drive_engine(
    session: &mut GameSession,
    engine: Option<&mut UciEngine>,
    movetime: u64,
) -> Result<Option<String>, ChessError> {
    let Some(engine) = engine else {
        let Some(mv) = suggest_random_move(session) else {
            return Ok(None);
        };
        session.apply_move(&mv, true)?;
        return Ok(Some(mv));
    };

    let seq = engine.set_position(session.history())?;
    engine.go(Some(movetime))?;

    let deadline = Duration::from_millis(movetime + 5000);
    let Some(suggestion) = engine.wait_suggestion(deadline) else {
        return Ok(None);
    };
    if suggestion.position_seq != seq {
        warn!("dropping stale engine suggestion");
        return Ok(None);
    }
    let Some(mv) = suggestion.best_move else {
        return Ok(None);
    };
    match session.apply_move(&mv, true) {
        Ok(_) => Ok(Some(mv)),
        Err(err) => {
            // A reply that no longer fits the position is dropped, not fatal.
            warn!(mv = %mv, error = %err, "engine suggestion rejected");
            Ok(None)
        }
    }
}
