//! Data-driven game balance
//!
//! Every size, speed, interval and threshold the games use. Defaults match
//! the feel of the original canvas games (velocities there were pixels per
//! 60 Hz frame, here they are pixels per second). Overrides are partial JSON:
//! any field left out keeps its default.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;
use crate::settings::Difficulty;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutTuning {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Distance from the floor to the paddle's top edge
    pub paddle_offset: f32,
    /// Keyboard paddle speed (px/s)
    pub paddle_speed: f32,
    pub ball_radius: f32,
    /// Launch speed on level 1 is `base_speed + speed_per_level`
    pub base_speed: f32,
    pub speed_per_level: f32,
    /// Launch direction is up, tilted by at most this much (radians)
    pub launch_spread: f32,
    /// Deflection at the paddle tips (radians from vertical)
    pub max_bounce_angle: f32,
    pub brick_rows: u32,
    pub brick_cols: u32,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_padding: f32,
    pub brick_top: f32,
    pub brick_left: f32,
    /// Rows from the top that need `tough_hits` hits
    pub tough_rows: u32,
    pub tough_hits: u8,
    /// Points per destroyed brick, multiplied by the level
    pub brick_points: u64,
    pub lives: u32,
}

impl Default for BreakoutTuning {
    fn default() -> Self {
        Self {
            width: 480.0,
            height: 400.0,
            paddle_width: 80.0,
            paddle_height: 12.0,
            paddle_offset: 25.0,
            paddle_speed: 480.0,
            ball_radius: 8.0,
            base_speed: 300.0,
            speed_per_level: 30.0,
            launch_spread: 30f32.to_radians(),
            max_bounce_angle: 0.35 * std::f32::consts::PI,
            brick_rows: 5,
            brick_cols: 8,
            brick_width: 52.0,
            brick_height: 18.0,
            brick_padding: 6.0,
            brick_top: 50.0,
            brick_left: 11.0,
            tough_rows: 2,
            tough_hits: 2,
            brick_points: 10,
            lives: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongTuning {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between a side edge and its paddle
    pub paddle_inset: f32,
    pub ball_size: f32,
    /// Player paddle speed (px/s)
    pub player_speed: f32,
    /// Horizontal serve speed (px/s)
    pub serve_speed: f32,
    /// Serve vertical speed is random in ±this
    pub serve_spread: f32,
    /// Horizontal speed multiplier per paddle hit
    pub speedup: f32,
    pub max_speed: f32,
    /// Vertical speed range across the paddle face
    pub english: f32,
    /// AI aims at the ball ± half of this
    pub ai_jitter: f32,
    /// AI ignores errors smaller than this
    pub ai_dead_zone: f32,
    pub ai_speed_easy: f32,
    pub ai_speed_medium: f32,
    pub ai_speed_hard: f32,
    pub difficulty: Difficulty,
    pub winning_score: u32,
}

impl Default for PongTuning {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            paddle_width: 10.0,
            paddle_height: 80.0,
            paddle_inset: 30.0,
            ball_size: 12.0,
            player_speed: 420.0,
            serve_speed: 300.0,
            serve_spread: 180.0,
            speedup: 1.05,
            max_speed: 720.0,
            english: 600.0,
            ai_jitter: 30.0,
            ai_dead_zone: 10.0,
            ai_speed_easy: 180.0,
            ai_speed_medium: 240.0,
            ai_speed_hard: 360.0,
            difficulty: Difficulty::Medium,
            winning_score: 5,
        }
    }
}

impl PongTuning {
    /// AI paddle speed for the selected difficulty (px/s)
    pub fn ai_speed(&self) -> f32 {
        match self.difficulty {
            Difficulty::Easy => self.ai_speed_easy,
            Difficulty::Medium => self.ai_speed_medium,
            Difficulty::Hard => self.ai_speed_hard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    pub cols: i32,
    pub rows: i32,
    pub cell_size: f32,
    /// Seconds per move at the start
    pub start_interval: f32,
    /// Fastest allowed move interval
    pub min_interval: f32,
    /// Interval reduction per food eaten
    pub interval_step: f32,
    pub food_points: u64,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            cols: 20,
            rows: 20,
            cell_size: 20.0,
            start_interval: 0.1,
            min_interval: 0.05,
            interval_step: 0.002,
            food_points: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TetrisTuning {
    pub cols: i32,
    pub rows: i32,
    pub cell_size: f32,
    /// Width in cells of the next-piece panel beside the well
    pub panel_cols: i32,
    /// Seconds per gravity drop on level 1
    pub start_interval: f32,
    /// Gravity interval reduction per level
    pub interval_step: f32,
    pub min_interval: f32,
    pub lines_per_level: u32,
    /// Points for clearing 0..=4 lines at once, multiplied by the level
    pub line_points: [u64; 5],
    pub soft_drop_points: u64,
    pub hard_drop_points: u64,
}

impl Default for TetrisTuning {
    fn default() -> Self {
        Self {
            cols: 10,
            rows: 20,
            cell_size: 30.0,
            panel_cols: 5,
            start_interval: 1.0,
            interval_step: 0.1,
            min_interval: 0.1,
            lines_per_level: 10,
            line_points: [0, 100, 300, 500, 800],
            soft_drop_points: 1,
            hard_drop_points: 2,
        }
    }
}

/// Balance for every game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub breakout: BreakoutTuning,
    pub pong: PongTuning,
    pub snake: SnakeTuning,
    pub tetris: TetrisTuning,
}

impl Tuning {
    /// Storage key for overrides
    const STORAGE_KEY: &'static str = "arcade_tuning";

    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load overrides from the store, defaults when absent or invalid
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let Some(json) = store.get(Self::STORAGE_KEY) else {
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring invalid tuning overrides: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{"snake":{"cols":30},"pong":{"winning_score":11}}"#)
            .expect("valid json");
        assert_eq!(tuning.snake.cols, 30);
        assert_eq!(tuning.snake.rows, 20);
        assert_eq!(tuning.pong.winning_score, 11);
        assert_eq!(tuning.breakout, BreakoutTuning::default());
    }

    #[test]
    fn test_json_roundtrip_keeps_values() {
        let mut tuning = Tuning::default();
        tuning.tetris.line_points = [0, 40, 100, 300, 1200];
        let json = tuning.to_json().expect("serializable");
        assert_eq!(Tuning::from_json(&json).expect("valid json"), tuning);
    }

    #[test]
    fn test_invalid_override_falls_back() {
        let mut store = MemoryStore::new();
        store.set("arcade_tuning", "[1, 2");
        assert_eq!(Tuning::load(&store), Tuning::default());
    }

    #[test]
    fn test_ai_speed_follows_difficulty() {
        let mut pong = PongTuning::default();
        pong.difficulty = Difficulty::Hard;
        assert_eq!(pong.ai_speed(), 360.0);
        pong.difficulty = Difficulty::Easy;
        assert_eq!(pong.ai_speed(), 180.0);
    }

    #[test]
    fn test_default_brick_wall_fits_playfield() {
        let b = BreakoutTuning::default();
        let wall_width = b.brick_left * 2.0
            + b.brick_cols as f32 * b.brick_width
            + (b.brick_cols - 1) as f32 * b.brick_padding;
        assert!(wall_width <= b.width);
    }
}
