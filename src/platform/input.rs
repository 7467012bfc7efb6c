//! Input mapping from browser events to simulation commands

use crate::sim::Command;

/// Map a `KeyboardEvent.code` to a command
pub fn command_for_key(code: &str) -> Option<Command> {
    match code {
        "ArrowLeft" | "KeyA" => Some(Command::MoveLeft),
        "ArrowRight" | "KeyD" => Some(Command::MoveRight),
        "Space" | "Enter" => Some(Command::Start),
        _ => None,
    }
}

/// On-screen control buttons, by element id
pub const CONTROL_BUTTONS: [(&str, Command); 3] = [
    ("btn-left", Command::MoveLeft),
    ("btn-right", Command::MoveRight),
    ("btn-start", Command::Start),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(command_for_key("ArrowLeft"), Some(Command::MoveLeft));
        assert_eq!(command_for_key("ArrowRight"), Some(Command::MoveRight));
        assert_eq!(command_for_key("Space"), Some(Command::Start));
        assert_eq!(command_for_key("KeyQ"), None);
    }
}
