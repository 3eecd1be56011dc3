pub mod clock;
pub mod config;
pub mod driver;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod render;
pub mod snake;
pub mod term;

pub use config::{ConfigError, GameConfig};
pub use game::{Control, GameOutcome, GameState, SnakeGame};
pub use grid::{Direction, Grid, Position};
