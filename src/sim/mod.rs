//! Simulation module
//!
//! Everything that advances a game lives here and stays free of platform code:
//! - One `tick` per fixed timestep, driven by whatever host owns the session
//! - Input arrives as a `TickInput` snapshot, never read from globals
//! - Rendering only reads state (`Game::draw`, `Session::render`)

pub mod collision;
pub mod game;
pub mod input;
pub mod session;

pub use collision::{Aabb, CollisionResult, Edges, bounce_off_walls, circle_aabb_collision};
pub use game::{Clock, Game, GameEvent, Stats, Step};
pub use input::{Action, Control, Direction, InputState, TickInput};
pub use session::{Session, SessionPhase, TickReport};
