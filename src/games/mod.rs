//! The bundled minigames
//!
//! Each game is a self-contained `Game` implementation driven by its
//! section of `Tuning` and a seeded PCG stream.

pub mod breakout;
pub mod pong;
pub mod snake;
pub mod tetris;

pub use breakout::Breakout;
pub use pong::Pong;
pub use snake::Snake;
pub use tetris::Tetris;

use crate::sim::Game;
use crate::tuning::Tuning;

/// Which game to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Breakout,
    Pong,
    Snake,
    Tetris,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::Breakout,
        GameKind::Pong,
        GameKind::Snake,
        GameKind::Tetris,
    ];

    /// Identifier used in URLs and storage keys
    pub fn id(&self) -> &'static str {
        match self {
            GameKind::Breakout => "breakout",
            GameKind::Pong => "pong",
            GameKind::Snake => "snake",
            GameKind::Tetris => "tetris",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.id() == s)
    }

    /// Game named by a `game=` pair in a URL query string (`?game=snake&x=1`)
    pub fn from_query(query: &str) -> Option<Self> {
        query
            .trim_start_matches('?')
            .split('&')
            .find_map(|pair| pair.strip_prefix("game="))
            .and_then(Self::from_str)
    }

    /// Build a fresh game from the tuning and an RNG seed
    pub fn build(&self, tuning: &Tuning, seed: u64) -> Box<dyn Game> {
        match self {
            GameKind::Breakout => Box::new(Breakout::new(tuning.breakout.clone(), seed)),
            GameKind::Pong => Box::new(Pong::new(tuning.pong.clone(), seed)),
            GameKind::Snake => Box::new(Snake::new(tuning.snake.clone(), seed)),
            GameKind::Tetris => Box::new(Tetris::new(tuning.tetris.clone(), seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(GameKind::from_str("Snake"), Some(GameKind::Snake));
        assert_eq!(GameKind::from_str(" tetris "), Some(GameKind::Tetris));
        assert_eq!(GameKind::from_str("asteroids"), None);
    }

    #[test]
    fn test_from_query() {
        assert_eq!(GameKind::from_query("?game=pong"), Some(GameKind::Pong));
        assert_eq!(
            GameKind::from_query("?debug=1&game=Tetris"),
            Some(GameKind::Tetris)
        );
        assert_eq!(GameKind::from_query(""), None);
        assert_eq!(GameKind::from_query("?game=chess"), None);
    }

    #[test]
    fn test_built_game_ids_match_kind() {
        let tuning = Tuning::default();
        for kind in GameKind::ALL {
            assert_eq!(kind.build(&tuning, 1).id(), kind.id());
        }
    }
}
