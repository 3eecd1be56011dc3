use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::food::{place_food, Food};
use crate::grid::{Grid, GridInt};
use crate::input::Command;
use crate::snake::{Collision, MoveResult::{self, *}, Snake, INITIAL_SNAKE_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Crashed(Collision),
    /// No free cell left for food: the snake filled the field.
    Cleared,
}

/// What the loop should do after a command has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct SnakeGame {
    grid: Grid,
    food_margin: GridInt,
    state: GameState,
    outcome: Option<GameOutcome>,
    snake: Snake,
    food: Option<Food>,
    rng: StdRng,
}

impl SnakeGame {
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        SnakeGame::with_rng(config.grid(), config.food_margin, rng)
    }

    pub fn with_rng(grid: Grid, food_margin: GridInt, rng: StdRng) -> Self {
        let snake = Snake::new(&grid);
        let mut game = SnakeGame {
            grid,
            food_margin,
            state: GameState::Running,
            outcome: None,
            snake,
            food: None,
            rng,
        };
        game.initialize();
        game
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Food> {
        self.food
    }

    pub fn score(&self) -> usize {
        self.snake.len() - INITIAL_SNAKE_LENGTH
    }

    /// Applies one player command according to the current state. Moves are
    /// only buffered here; they take effect on the next tick.
    pub fn apply(&mut self, command: Command) -> Control {
        use GameState::*;

        if command == Command::Quit {
            log::info!("Quit requested with score {}", self.score());
            return Control::Quit;
        }

        match (self.state, command) {
            (Running, Command::PauseToggle) => {
                log::info!("Paused");
                self.state = Paused;
            }
            (Running, cmd) => {
                if let Some(dir) = cmd.direction() {
                    if !self.snake.set_direction(dir) {
                        log::trace!("Ignoring reversal to {:?}", dir);
                    }
                }
            }
            (Paused, Command::PauseToggle) => {
                log::info!("Resumed");
                self.state = Running;
            }
            (Paused, Command::Restart) | (GameOver, Command::Restart) => self.restart(),
            _ => {}
        }

        Control::Continue
    }

    /// Advances the simulation by one step. Does nothing unless running.
    pub fn tick(&mut self) -> Option<MoveResult> {
        if self.state != GameState::Running {
            return None;
        }

        let food = match self.food {
            Some(food) => food,
            None => {
                self.finish(GameOutcome::Cleared);
                return None;
            }
        };

        let res = self.snake.advance(&self.grid, food.position);

        match res {
            Moved { ate } => {
                log::trace!("Head at {:?}", self.snake.head());
                if ate {
                    self.respawn_food();
                }
            }
            Grazed(kind) => log::debug!("{:?} collision grace at {:?}", kind, self.snake.head()),
            Crashed(kind) => self.finish(GameOutcome::Crashed(kind)),
        }

        Some(res)
    }

    pub fn restart(&mut self) {
        log::info!("Restarting, previous score {}", self.score());
        self.snake = Snake::new(&self.grid);
        self.state = GameState::Running;
        self.outcome = None;
        self.initialize();
    }

    ///////////////////////////////////////////////////////////////////////////

    fn initialize(&mut self) {
        self.food = None;
        self.respawn_food();
    }

    fn respawn_food(&mut self) {
        self.food = place_food(&mut self.rng, &self.grid, self.food_margin, &self.snake);

        match self.food {
            Some(food) => log::debug!("Food placed at {:?}", food.position),
            None => self.finish(GameOutcome::Cleared),
        }
    }

    fn finish(&mut self, outcome: GameOutcome) {
        log::info!("Game over ({:?}), score {}", outcome, self.score());
        self.state = GameState::GameOver;
        self.outcome = Some(outcome);
    }
}
