//! The per-game simulation seam
//!
//! A `Game` owns its entities and counters. The session decides *when* it
//! steps; the game decides *what* one step means.

use glam::Vec2;

use super::input::TickInput;
use crate::renderer::Frame;

/// Timing passed to every step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    /// Ticks elapsed in the current session (1 on the first step)
    pub tick: u64,
    /// Fixed timestep in seconds
    pub dt: f32,
}

/// What a step decided about the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    GameOver,
}

/// Things that happened during a tick (sound cues, HUD pops)
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Ball served or launched
    Launch,
    PaddleHit,
    WallHit,
    /// Brick took damage but survived
    BrickHit,
    BrickDestroyed,
    /// Player score increased
    Scored { points: u64 },
    /// Opponent scored (pong)
    PointLost,
    LifeLost { lives_left: u32 },
    LevelUp { level: u32 },
    FoodEaten,
    PieceLocked,
    LinesCleared { lines: u32 },
    GameOver { score: u64 },
    NewHighScore { score: u64 },
}

/// Counters shown in the HUD
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub score: u64,
    pub lives: Option<u32>,
    pub level: Option<u32>,
}

pub trait Game {
    /// Stable identifier, also the high-score key prefix
    fn id(&self) -> &'static str;

    fn title(&self) -> &'static str;

    /// Playfield size in pixels
    fn playfield(&self) -> Vec2;

    /// Recreate every entity and zero every counter
    fn reset(&mut self);

    /// Advance one fixed timestep
    fn step(&mut self, input: &TickInput, clock: Clock, events: &mut Vec<GameEvent>) -> Step;

    fn stats(&self) -> Stats;

    fn score(&self) -> u64 {
        self.stats().score
    }

    /// Headline for the game-over overlay
    fn outcome(&self) -> String {
        "GAME OVER".to_string()
    }

    /// Append this game's scene to `frame`
    fn draw(&self, frame: &mut Frame);

    /// Idle/demo mode - input a simple AI would give this tick
    fn autopilot(&self, _clock: Clock) -> TickInput {
        TickInput::default()
    }
}

impl<G: Game + ?Sized> Game for Box<G> {
    fn id(&self) -> &'static str {
        (**self).id()
    }

    fn title(&self) -> &'static str {
        (**self).title()
    }

    fn playfield(&self) -> Vec2 {
        (**self).playfield()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn step(&mut self, input: &TickInput, clock: Clock, events: &mut Vec<GameEvent>) -> Step {
        (**self).step(input, clock, events)
    }

    fn stats(&self) -> Stats {
        (**self).stats()
    }

    fn outcome(&self) -> String {
        (**self).outcome()
    }

    fn draw(&self, frame: &mut Frame) {
        (**self).draw(frame)
    }

    fn autopilot(&self, clock: Clock) -> TickInput {
        (**self).autopilot(clock)
    }
}
