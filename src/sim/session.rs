//! Session lifecycle
//!
//! Idle -> Running -> (Paused) -> GameOver -> Idle. The session owns the game
//! and the high-score store; the host owns the session and calls `tick` once
//! per fixed timestep.

use glam::Vec2;

use super::game::{Clock, Game, GameEvent, Step};
use super::input::TickInput;
use crate::consts::SIM_DT;
use crate::highscores;
use crate::persistence::KeyValueStore;
use crate::renderer::{Frame, colors};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for a start action
    Idle,
    /// Game is ticking
    Running,
    /// Game is paused
    Paused,
    /// Terminal condition reached, waiting for restart
    GameOver,
}

/// What a tick did
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub phase: SessionPhase,
    pub events: Vec<GameEvent>,
}

/// One game plus its lifecycle state
pub struct Session<G, S> {
    game: G,
    store: S,
    phase: SessionPhase,
    high_score: u64,
    ticks: u64,
    dt: f32,
    /// Autopilot is driving
    demo: bool,
    /// Current run was touched by the autopilot; its score is not a record
    demo_run: bool,
}

impl<G: Game, S: KeyValueStore> Session<G, S> {
    /// Wrap a game; the stored high score is read here and nowhere else
    pub fn new(mut game: G, store: S) -> Self {
        game.reset();
        let high_score = highscores::load(&store, game.id());
        log::info!("{} ready (best: {})", game.title(), high_score);
        Self {
            game,
            store,
            phase: SessionPhase::Idle,
            high_score,
            ticks: 0,
            dt: SIM_DT,
            demo: false,
            demo_run: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Ticks stepped since the session last started
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Mark the session as driven by the autopilot. Any run that sees demo
    /// input keeps its score out of the high-score store.
    pub fn set_demo(&mut self, demo: bool) {
        self.demo = demo;
        self.demo_run |= demo;
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    /// Idle -> Running. Always starts from a fresh layout.
    pub fn start(&mut self) -> bool {
        if self.phase != SessionPhase::Idle {
            return false;
        }
        self.game.reset();
        self.ticks = 0;
        self.demo_run = self.demo;
        self.phase = SessionPhase::Running;
        log::info!("{} started", self.game.title());
        true
    }

    /// Running <-> Paused
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            SessionPhase::Running => SessionPhase::Paused,
            SessionPhase::Paused => SessionPhase::Running,
            _ => return false,
        };
        log::debug!("{} {:?}", self.game.title(), self.phase);
        true
    }

    /// GameOver -> Idle
    pub fn restart(&mut self) -> bool {
        if self.phase != SessionPhase::GameOver {
            return false;
        }
        self.game.reset();
        self.ticks = 0;
        self.phase = SessionPhase::Idle;
        true
    }

    /// Advance the session by one fixed timestep
    pub fn tick(&mut self, input: &TickInput) -> TickReport {
        let mut events = Vec::new();

        if input.start {
            match self.phase {
                SessionPhase::Idle => {
                    self.start();
                    return self.report(events);
                }
                SessionPhase::GameOver => {
                    self.restart();
                    return self.report(events);
                }
                _ => {}
            }
        }

        if input.pause && self.toggle_pause() && self.phase == SessionPhase::Paused {
            return self.report(events);
        }

        // Don't tick unless running
        if self.phase != SessionPhase::Running {
            return self.report(events);
        }

        self.ticks += 1;
        let clock = Clock {
            tick: self.ticks,
            dt: self.dt,
        };

        if self.game.step(input, clock, &mut events) == Step::GameOver {
            self.finish(&mut events);
        }

        self.report(events)
    }

    /// Input the game's autopilot would give on the next tick
    pub fn autopilot_input(&self) -> TickInput {
        self.game.autopilot(Clock {
            tick: self.ticks + 1,
            dt: self.dt,
        })
    }

    fn finish(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = SessionPhase::GameOver;
        let score = self.game.score();
        events.push(GameEvent::GameOver { score });
        log::info!(
            "{} over after {} ticks, score {}",
            self.game.title(),
            self.ticks,
            score
        );

        if self.demo_run {
            log::debug!("Demo score {} not recorded", score);
            return;
        }

        if highscores::qualifies(self.high_score, score) {
            self.high_score = score;
            if !highscores::save(&mut self.store, self.game.id(), score) {
                log::warn!("High score {} not persisted", score);
            }
            events.push(GameEvent::NewHighScore { score });
        }
    }

    fn report(&self, events: Vec<GameEvent>) -> TickReport {
        TickReport {
            phase: self.phase,
            events,
        }
    }

    /// Draw the game plus the overlay for the current phase
    pub fn render(&self) -> Frame {
        let size = self.game.playfield();
        let mut frame = Frame::new(size);
        self.game.draw(&mut frame);

        let center = size * 0.5;
        match self.phase {
            SessionPhase::Running => {}
            SessionPhase::Idle => {
                frame.rect(Vec2::ZERO, size, colors::OVERLAY);
                frame.text(center - Vec2::Y * 20.0, 32.0, self.game.title(), colors::TEXT);
                frame.text(
                    center + Vec2::Y * 20.0,
                    16.0,
                    "Press Enter to start",
                    colors::TEXT_DIM,
                );
                if self.high_score > 0 {
                    frame.text(
                        center + Vec2::Y * 50.0,
                        14.0,
                        format!("Best: {}", self.high_score),
                        colors::GOLD,
                    );
                }
            }
            SessionPhase::Paused => {
                frame.rect(Vec2::ZERO, size, colors::OVERLAY);
                frame.text(center, 24.0, "PAUSED", colors::TEXT);
            }
            SessionPhase::GameOver => {
                frame.rect(Vec2::ZERO, size, colors::OVERLAY);
                frame.text(center - Vec2::Y * 20.0, 32.0, self.game.outcome(), colors::DANGER);
                frame.text(
                    center + Vec2::Y * 20.0,
                    20.0,
                    format!("Score: {}", self.game.score()),
                    colors::GOLD,
                );
                frame.text(
                    center + Vec2::Y * 55.0,
                    14.0,
                    "Press Enter to play again",
                    colors::TEXT_DIM,
                );
            }
        }

        frame
    }
}
