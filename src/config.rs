use thiserror::Error;

use crate::food::DEFAULT_FOOD_MARGIN;
use crate::grid::{Grid, GridInt};

pub const DEFAULT_GRID_WIDTH: GridInt = 32;
pub const DEFAULT_GRID_HEIGHT: GridInt = 24;
pub const DEFAULT_TICK_MS: u64 = 100;

/// Narrowest grid that still leaves room for the starting snake left of its head.
const MIN_START_WIDTH: GridInt = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be at least {min_width}x{min_height} for a food margin of {margin}, got {width}x{height}")]
    GridTooSmall {
        width: GridInt,
        height: GridInt,
        min_width: GridInt,
        min_height: GridInt,
        margin: GridInt,
    },
    #[error("food margin cannot be negative, got {0}")]
    NegativeMargin(GridInt),
    #[error("tick interval must be at least 1 ms")]
    ZeroTickInterval,
    #[error("cell size must be at least 1")]
    ZeroCellSize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Grid columns
    pub width: GridInt,
    /// Grid rows
    pub height: GridInt,
    /// Milliseconds between snake moves
    pub tick_ms: u64,
    /// Cells kept free of food along every edge
    pub food_margin: GridInt,
    /// Renderer units per grid cell
    pub cell_size: i32,
    /// Fixed RNG seed for reproducible food placement
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            tick_ms: DEFAULT_TICK_MS,
            food_margin: DEFAULT_FOOD_MARGIN,
            cell_size: 1,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn new(width: GridInt, height: GridInt) -> Self {
        Self { width, height, ..Default::default() }
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.width, self.height)
    }

    /// Smallest (width, height) accepted for the configured margin.
    pub fn min_grid(&self) -> (GridInt, GridInt) {
        let food_span = 2 * self.food_margin + 1;
        (food_span.max(MIN_START_WIDTH), food_span.max(1))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.food_margin < 0 {
            return Err(ConfigError::NegativeMargin(self.food_margin));
        }

        let (min_width, min_height) = self.min_grid();
        if self.width < min_width || self.height < min_height {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
                min_width,
                min_height,
                margin: self.food_margin,
            });
        }

        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.cell_size < 1 {
            return Err(ConfigError::ZeroCellSize);
        }

        Ok(())
    }
}
