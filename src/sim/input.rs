//! Input capture
//!
//! Latest-value-wins control state. Nothing is queued: held directions and the
//! pointer keep their most recent value, and one-shot actions are consumed by
//! the next tick that takes a snapshot.

use glam::{IVec2, Vec2};

/// A directional control (screen space, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// One grid step in this direction
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Semantic one-shot actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Launch / hard drop / jump, depending on the game
    Primary,
    /// Rotate the falling piece
    Rotate,
    /// Pause toggle
    Pause,
    /// Start a session, or leave the game-over screen
    Start,
}

/// Anything a key or button can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Move(Direction),
    Act(Action),
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Direction pressed since the previous tick (latest press only)
    pub nudge: Option<Direction>,
    /// Pointer position in playfield coordinates
    pub pointer: Option<Vec2>,
    pub primary: bool,
    pub rotate: bool,
    pub pause: bool,
    pub start: bool,
}

impl TickInput {
    /// Held horizontal intent: -1, 0 or 1
    pub fn horizontal(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }

    /// Held vertical intent: -1 (up), 0 or 1 (down)
    pub fn vertical(&self) -> f32 {
        (self.down as i32 - self.up as i32) as f32
    }

}

/// Captured control state between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: [bool; 4],
    nudge: Option<Direction>,
    pointer: Option<Vec2>,
    primary: bool,
    rotate: bool,
    pause: bool,
    start: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key/button down
    pub fn press(&mut self, control: Control) {
        match control {
            Control::Move(direction) => {
                self.held[direction.index()] = true;
                self.nudge = Some(direction);
            }
            Control::Act(Action::Primary) => self.primary = true,
            Control::Act(Action::Rotate) => self.rotate = true,
            Control::Act(Action::Pause) => self.pause = true,
            Control::Act(Action::Start) => self.start = true,
        }
    }

    /// Key/button up. Actions are one-shot, so only directions care.
    pub fn release(&mut self, control: Control) {
        if let Control::Move(direction) = control {
            self.held[direction.index()] = false;
        }
    }

    /// Record the latest pointer position (playfield coordinates)
    pub fn point(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    /// Drop held keys (window blur loses the matching keyup events)
    pub fn release_all(&mut self) {
        self.held = [false; 4];
    }

    /// Forget everything (idle mode toggled, new session)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Build this tick's input and consume the one-shot values
    pub fn snapshot(&mut self) -> TickInput {
        let input = TickInput {
            up: self.held[Direction::Up.index()],
            down: self.held[Direction::Down.index()],
            left: self.held[Direction::Left.index()],
            right: self.held[Direction::Right.index()],
            nudge: self.nudge.take(),
            pointer: self.pointer,
            primary: self.primary,
            rotate: self.rotate,
            pause: self.pause,
            start: self.start,
        };
        self.primary = false;
        self.rotate = false;
        self.pause = false;
        self.start = false;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_consumed_once() {
        let mut state = InputState::new();
        state.press(Control::Act(Action::Primary));
        state.press(Control::Act(Action::Primary));

        let first = state.snapshot();
        assert!(first.primary);
        let second = state.snapshot();
        assert!(!second.primary);
    }

    #[test]
    fn test_held_direction_persists_until_release() {
        let mut state = InputState::new();
        state.press(Control::Move(Direction::Left));

        assert!(state.snapshot().left);
        assert!(state.snapshot().left);

        state.release(Control::Move(Direction::Left));
        assert!(!state.snapshot().left);
    }

    #[test]
    fn test_latest_direction_wins() {
        let mut state = InputState::new();
        state.press(Control::Move(Direction::Up));
        state.press(Control::Move(Direction::Right));

        let input = state.snapshot();
        assert_eq!(input.nudge, Some(Direction::Right));
        // Both stay held, but the nudge is spent
        let input = state.snapshot();
        assert!(input.up && input.right);
        assert_eq!(input.nudge, None);
    }

    #[test]
    fn test_pointer_keeps_latest_value() {
        let mut state = InputState::new();
        state.point(Vec2::new(10.0, 20.0));
        state.point(Vec2::new(30.0, 40.0));

        assert_eq!(state.snapshot().pointer, Some(Vec2::new(30.0, 40.0)));
        assert_eq!(state.snapshot().pointer, Some(Vec2::new(30.0, 40.0)));
    }

    #[test]
    fn test_horizontal_intent() {
        let mut state = InputState::new();
        state.press(Control::Move(Direction::Left));
        state.press(Control::Move(Direction::Right));
        assert_eq!(state.snapshot().horizontal(), 0.0);

        state.release(Control::Move(Direction::Left));
        assert_eq!(state.snapshot().horizontal(), 1.0);
    }

    #[test]
    fn test_release_all_keeps_pending_actions() {
        let mut state = InputState::new();
        state.press(Control::Move(Direction::Down));
        state.press(Control::Act(Action::Pause));
        state.release_all();

        let input = state.snapshot();
        assert!(!input.down);
        assert!(input.pause);
    }
}
