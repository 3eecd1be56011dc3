use std::collections::VecDeque;
use std::io;

use crate::game::GameState;
use crate::grid::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PauseToggle,
    Restart,
    Quit,
}

impl Command {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Command::MoveUp => Some(Direction::Up),
            Command::MoveDown => Some(Direction::Down),
            Command::MoveLeft => Some(Direction::Left),
            Command::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Anything that can hand the game loop the commands issued since the last poll.
/// Must not block.
pub trait InputSource {
    /// `state` is the screen the player is looking at, for sources whose keys
    /// mean different things on different screens.
    fn poll(&mut self, state: GameState) -> io::Result<Vec<Command>>;
}

/// Replays a fixed list of per-frame command batches, then reports nothing.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<Command>>,
}

impl ScriptedInput {
    pub fn new<I>(frames: I) -> Self
    where
        I: IntoIterator<Item = Vec<Command>>,
    {
        ScriptedInput { frames: frames.into_iter().collect() }
    }

    pub fn push_frame(&mut self, commands: Vec<Command>) {
        self.frames.push_back(commands);
    }

    pub fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _state: GameState) -> io::Result<Vec<Command>> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_commands_map_to_directions() {
        assert_eq!(Command::MoveUp.direction(), Some(Direction::Up));
        assert_eq!(Command::MoveRight.direction(), Some(Direction::Right));
        assert_eq!(Command::PauseToggle.direction(), None);
        assert_eq!(Command::Quit.direction(), None);
    }

    #[test]
    fn scripted_input_replays_frames_in_order() {
        let mut input = ScriptedInput::new(vec![vec![Command::MoveUp], vec![]]);
        input.push_frame(vec![Command::Quit]);

        assert_eq!(input.poll(GameState::Running).unwrap(), vec![Command::MoveUp]);
        assert_eq!(input.poll(GameState::Running).unwrap(), vec![]);
        assert_eq!(input.poll(GameState::Running).unwrap(), vec![Command::Quit]);
        assert!(input.is_exhausted());
        assert_eq!(input.poll(GameState::Running).unwrap(), vec![]);
    }
}
