//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks
//! - Input events

pub mod clock;
pub mod keys;

pub use clock::FixedTimestep;
pub use keys::map_key;
