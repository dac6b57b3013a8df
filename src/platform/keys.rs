//! Keyboard bindings
//!
//! Maps `KeyboardEvent.key` values to controls. Letter keys match either case.

use crate::sim::{Action, Control, Direction};

pub fn map_key(key: &str) -> Option<Control> {
    let control = match key {
        "ArrowUp" => Control::Move(Direction::Up),
        "ArrowDown" => Control::Move(Direction::Down),
        "ArrowLeft" => Control::Move(Direction::Left),
        "ArrowRight" => Control::Move(Direction::Right),
        " " | "Spacebar" => Control::Act(Action::Primary),
        "Enter" => Control::Act(Action::Start),
        "Escape" => Control::Act(Action::Pause),
        _ => return map_letter(key),
    };
    Some(control)
}

fn map_letter(key: &str) -> Option<Control> {
    let mut chars = key.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };

    let control = match c.to_ascii_lowercase() {
        'w' => Control::Move(Direction::Up),
        's' => Control::Move(Direction::Down),
        'a' => Control::Move(Direction::Left),
        'd' => Control::Move(Direction::Right),
        'p' => Control::Act(Action::Pause),
        'r' => Control::Act(Action::Start),
        'x' | 'z' => Control::Act(Action::Rotate),
        _ => return None,
    };
    Some(control)
}

/// Keys whose browser default (scrolling) should be suppressed
pub fn blocks_default(key: &str) -> bool {
    matches!(
        key,
        "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | " "
    )
}
