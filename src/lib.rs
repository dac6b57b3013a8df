//! Arcade Loop - fixed-timestep browser minigames
//!
//! Core modules:
//! - `sim`: Session lifecycle, input capture, collision helpers and the `Game` trait
//! - `games`: Breakout, Pong, Snake and Tetris simulations
//! - `renderer`: Immediate-mode frames and the WebGPU pipeline that draws them
//! - `platform`: Fixed-timestep clock and keyboard mapping
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `tuning`: Data-driven game balance
//! - `audio`: Procedural sound cues for game events

pub mod audio;
pub mod games;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use games::GameKind;
pub use settings::{Difficulty, Settings};
pub use sim::{Game, Session, SessionPhase, TickInput};
pub use tuning::Tuning;

/// Loop configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Largest frame delta fed to the accumulator (tab switches, debugger stalls)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
