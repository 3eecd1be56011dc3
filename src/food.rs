use crate::grid::{Grid, GridInt, Position};
use crate::snake::Snake;

use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_FOOD_MARGIN: GridInt = 2;

/// Random draws before giving up on sampling and scanning for free cells.
const MAX_SAMPLES: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub position: Position,
}

/// Picks a cell inside the margin that the snake doesn't occupy. Returns `None`
/// only when every such cell is taken.
pub fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    grid: &Grid,
    margin: GridInt,
    snake: &Snake,
) -> Option<Food> {
    let (xs, ys) = grid.inner_region(margin)?;

    for _ in 0..MAX_SAMPLES {
        let pos = Position::new(rng.gen_range(xs.lo..=xs.hi), rng.gen_range(ys.lo..=ys.hi));
        if !snake.occupies(pos) {
            return Some(Food { position: pos });
        }
    }

    log::debug!("Food sampling gave up after {} draws, scanning free cells", MAX_SAMPLES);

    let free: Vec<Position> = (ys.lo..=ys.hi)
        .flat_map(|y| (xs.lo..=xs.hi).map(move |x| Position::new(x, y)))
        .filter(|pos| !snake.occupies(*pos))
        .collect();

    free.choose(rng).map(|&position| Food { position })
}
