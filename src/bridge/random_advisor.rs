//! Uniform random move advisor.
//!
//! Stands in for the external engine when no binary is configured: picks
//! uniformly from the legal moves of the side to move. Also useful for
//! integration tests and smoke play.

use rand::prelude::IndexedRandom;

use crate::session::game_session::GameSession;

/// A random legal move for the current player, or `None` when the game is
/// over or has not started.
pub fn suggest_random_move(session: &mut GameSession) -> Option<String> {
    let moves = session.legal_moves();
    let mut rng = rand::rng();
    moves.choose(&mut rng).map(|m| m.wire())
}

#[cfg(test)]
mod tests {
    use super::suggest_random_move;
    use crate::session::game_session::{GameSession, GameStatus};

    #[test]
    fn suggestions_are_legal() {
        let mut session = GameSession::new();
        session.reset_game();

        for _ in 0..10 {
            let Some(mv) = suggest_random_move(&mut session) else {
                break;
            };
            session
                .apply_move(&mv, false)
                .expect("suggested move should be legal");
            if session.status().is_terminal() {
                break;
            }
        }
    }

    #[test]
    fn no_suggestion_after_checkmate() {
        let mut session = GameSession::new();
        session.reset_game();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            session.apply_move(mv, false).expect("legal move");
        }
        assert_eq!(session.status(), GameStatus::Checkmate);
        assert!(suggest_random_move(&mut session).is_none());
    }
}
