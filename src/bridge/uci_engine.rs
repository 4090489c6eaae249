//! Line-oriented bridge to an external UCI engine subprocess.
//!
//! The engine is a black-box move oracle: it receives the full history as a
//! `position startpos moves ...` command followed by `go`, and answers with a
//! `bestmove` line on its own schedule. A background thread reads the
//! engine's stdout and forwards suggestions over a channel; each suggestion
//! carries the sequence token of the position it answers so callers can drop
//! stale replies after an undo or reset.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::errors::ChessError;

/// A `bestmove` reply. `best_move` is `None` when the engine reports
/// `(none)`; promotion letters are already normalized to this crate's wire
/// format.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub position_seq: u64,
    pub best_move: Option<String>,
}

pub struct UciEngine {
    child: Child,
    to_engine: BufWriter<ChildStdin>,
    suggestions: Receiver<Suggestion>,
    position_seq: Arc<AtomicU64>,
}

impl UciEngine {
    /// Start the engine process and perform the opening handshake.
    pub fn spawn(path: &Path) -> Result<Self, ChessError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = child.stdin.take().expect("stdin was configured as piped");
        let stdout = child.stdout.take().expect("stdout was configured as piped");

        let position_seq = Arc::new(AtomicU64::new(0));
        let reader_seq = Arc::clone(&position_seq);
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                let Ok(line) = line else {
                    break;
                };
                debug!(line = %line, "engine says");
                if let Some(rest) = line.strip_prefix("bestmove") {
                    let token = rest.split_whitespace().next().unwrap_or_default();
                    let best_move = if token.is_empty() || token == "(none)" {
                        None
                    } else {
                        Some(promotion_from_uci(token))
                    };
                    let suggestion = Suggestion {
                        position_seq: reader_seq.load(Ordering::SeqCst),
                        best_move,
                    };
                    if tx.send(suggestion).is_err() {
                        break;
                    }
                }
            }
        });

        let mut engine = Self {
            child,
            to_engine: BufWriter::new(stdin),
            suggestions: rx,
            position_seq,
        };
        engine.send_line("uci")?;
        engine.send_line("isready")?;
        Ok(engine)
    }

    fn send_line(&mut self, line: &str) -> Result<(), ChessError> {
        debug!(line, "to engine");
        writeln!(self.to_engine, "{line}")?;
        self.to_engine.flush()?;
        Ok(())
    }

    pub fn new_game(&mut self) -> Result<(), ChessError> {
        self.send_line("ucinewgame")
    }

    /// Send the full history as a position command and return the sequence
    /// token identifying it.
    pub fn set_position(&mut self, history: &[String]) -> Result<u64, ChessError> {
        let seq = self.position_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let mut command = String::from("position startpos");
        if !history.is_empty() {
            command.push_str(" moves");
            for mv in history {
                command.push(' ');
                command.push_str(&promotion_to_uci(mv));
            }
        }
        self.send_line(&command)?;
        Ok(seq)
    }

    /// Token of the most recently sent position. A suggestion whose token
    /// differs targets a stale position and should be dropped.
    pub fn position_seq(&self) -> u64 {
        self.position_seq.load(Ordering::SeqCst)
    }

    pub fn go(&mut self, movetime_ms: Option<u64>) -> Result<(), ChessError> {
        match movetime_ms {
            Some(ms) => self.send_line(&format!("go movetime {ms}")),
            None => self.send_line("go"),
        }
    }

    pub fn stop(&mut self) -> Result<(), ChessError> {
        self.send_line("stop")
    }

    pub fn try_suggestion(&mut self) -> Option<Suggestion> {
        self.suggestions.try_recv().ok()
    }

    pub fn wait_suggestion(&mut self, timeout: Duration) -> Option<Suggestion> {
        match self.suggestions.recv_timeout(timeout) {
            Ok(suggestion) => Some(suggestion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        let _ = self.send_line("quit");
        thread::sleep(Duration::from_millis(50));
        match self.child.try_wait() {
            Ok(Some(_)) => {}
            _ => {
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
        }
    }
}

// The crate's wire format writes knight promotions as `k`; standard UCI
// engines expect `n`. Translation happens only at this protocol boundary.
fn promotion_to_uci(mv: &str) -> String {
    match mv.strip_suffix('k') {
        Some(head) if mv.len() == 5 => format!("{head}n"),
        _ => mv.to_owned(),
    }
}

fn promotion_from_uci(mv: &str) -> String {
    match mv.strip_suffix('n') {
        Some(head) if mv.len() == 5 => format!("{head}k"),
        _ => mv.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{promotion_from_uci, promotion_to_uci};

    #[test]
    fn knight_promotions_translate_at_the_boundary() {
        assert_eq!(promotion_to_uci("e7e8k"), "e7e8n");
        assert_eq!(promotion_from_uci("e7e8n"), "e7e8k");
    }

    #[test]
    fn other_moves_pass_through_unchanged() {
        assert_eq!(promotion_to_uci("e2e4"), "e2e4");
        assert_eq!(promotion_to_uci("e7e8q"), "e7e8q");
        assert_eq!(promotion_from_uci("e7e8q"), "e7e8q");
        assert_eq!(promotion_from_uci("g1f3"), "g1f3");
    }
}
