//! Per-game high scores
//!
//! One number per game, stored as a decimal string under `{game_id}HighScore`.

use crate::persistence::KeyValueStore;

/// Storage key for a game's best score
pub fn storage_key(game_id: &str) -> String {
    format!("{game_id}HighScore")
}

/// Check if a score beats the current best
pub fn qualifies(best: u64, score: u64) -> bool {
    score > 0 && score > best
}

/// Read the stored best score
///
/// Absent keys, unreadable values and unavailable storage all read as zero.
pub fn load<S: KeyValueStore + ?Sized>(store: &S, game_id: &str) -> u64 {
    let Some(raw) = store.get(&storage_key(game_id)) else {
        return 0;
    };

    let raw = raw.trim();
    let parsed = raw.parse::<u64>().ok().or_else(|| {
        // Older front ends stored whatever Number.toString() produced
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
    });

    match parsed {
        Some(score) => score,
        None => {
            log::warn!("Ignoring unreadable high score for {}: {:?}", game_id, raw);
            0
        }
    }
}

/// Write a game's best score. Returns false if the store rejected it.
pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, game_id: &str, score: u64) -> bool {
    let saved = store.set(&storage_key(game_id), &score.to_string());
    if saved {
        log::info!("High score saved for {}: {}", game_id, score);
    }
    saved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    /// Storage that is never available (private browsing, quota errors)
    struct Unavailable;

    impl KeyValueStore for Unavailable {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> bool {
            false
        }

        fn remove(&mut self, _key: &str) {}
    }

    #[test]
    fn test_absent_key_reads_zero() {
        let store = MemoryStore::new();
        assert_eq!(load(&store, "snake"), 0);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        assert!(save(&mut store, "snake", 230));
        assert_eq!(load(&store, "snake"), 230);
        assert_eq!(store.get("snakeHighScore").as_deref(), Some("230"));
    }

    #[test]
    fn test_scores_are_keyed_per_game() {
        let mut store = MemoryStore::new();
        save(&mut store, "snake", 50);
        assert_eq!(load(&store, "tetris"), 0);
    }

    #[test]
    fn test_garbage_reads_zero() {
        let mut store = MemoryStore::new();
        store.set("pongHighScore", "not a number");
        assert_eq!(load(&store, "pong"), 0);

        store.set("pongHighScore", "-5");
        assert_eq!(load(&store, "pong"), 0);
    }

    #[test]
    fn test_float_string_is_accepted() {
        let mut store = MemoryStore::new();
        store.set("breakoutHighScore", "120.0");
        assert_eq!(load(&store, "breakout"), 120);
    }

    #[test]
    fn test_unavailable_store_defaults() {
        let mut store = Unavailable;
        assert_eq!(load(&store, "snake"), 0);
        assert!(!save(&mut store, "snake", 10));
    }

    #[test]
    fn test_qualifies() {
        assert!(!qualifies(0, 0));
        assert!(qualifies(0, 10));
        assert!(!qualifies(10, 10));
        assert!(qualifies(10, 11));
    }
}
