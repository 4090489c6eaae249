use crate::session::piece::{PieceColor, PieceId};

/// Who drives a player's moves. The session itself never queries an engine;
/// the flag tells the embedding application whose turn needs outside input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    Human,
    Engine,
}

/// One of the two sides of a game.
///
/// `pieces` holds the player's 16 piece handles in creation order (pawns,
/// bishops, knights, rooks, queen, king); the order is fixed for the life of
/// the session and relied upon by presentation layers that map handles to
/// mesh instances.
#[derive(Debug, Clone)]
pub struct Player {
    pub color: PieceColor,
    pub pieces: Vec<PieceId>,
    pub king: PieceId,
    pub promotion_rank: i8,
    pub controller: Controller,
}
