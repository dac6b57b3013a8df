//! Fixed timestep accumulator
//!
//! Frame deltas arrive at whatever rate the display runs; the simulation
//! only ever sees whole `SIM_DT` ticks.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    accumulator: f32,
    dt: f32,
    max_substeps: u32,
    max_frame_dt: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedTimestep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            dt,
            max_substeps,
            max_frame_dt: MAX_FRAME_DT,
        }
    }

    /// Feed one frame's elapsed seconds; returns how many ticks to run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        // Tab switches and debugger stops produce huge deltas
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, self.max_frame_dt)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < self.max_substeps {
            self.accumulator -= self.dt;
            ticks += 1;
        }

        // Drop whatever the substep cap couldn't absorb
        if ticks == self.max_substeps {
            self.accumulator = self.accumulator.min(self.dt);
        }
        ticks
    }

    /// Forget accumulated time (after a pause or a hidden tab)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_ticks_only() {
        let mut clock = FixedTimestep::new(0.01, 10);
        assert_eq!(clock.advance(0.025), 2);
        // 0.005 carried over
        assert_eq!(clock.advance(0.006), 1);
    }

    #[test]
    fn test_substep_cap() {
        let mut clock = FixedTimestep::new(0.01, 3);
        assert_eq!(clock.advance(0.09), 3);
        // Backlog dropped, not replayed
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn test_huge_and_invalid_deltas() {
        let mut clock = FixedTimestep::default();
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(-1.0), 0);
        // Ten seconds clamps to MAX_FRAME_DT = 6 ticks at 60 Hz, capped at 5
        assert_eq!(clock.advance(10.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_reset_clears_remainder() {
        let mut clock = FixedTimestep::new(0.01, 10);
        assert_eq!(clock.advance(0.009), 0);
        clock.reset();
        // Without the reset this would complete a tick
        assert_eq!(clock.advance(0.002), 0);
    }
}
