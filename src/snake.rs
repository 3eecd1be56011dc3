use crate::grid::{Direction::{self, *}, Grid, Position};
use MoveResult::*;

pub const INITIAL_SNAKE_LENGTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Moved { ate: bool },
    /// First violation of its kind: nothing moved, the grace flag is now armed.
    Grazed(Collision),
    Crashed(Collision),
}

impl MoveResult {
    pub fn moved(&self) -> bool {
        matches!(self, Moved { .. })
    }

    pub fn ate(&self) -> bool {
        matches!(self, Moved { ate: true })
    }

    pub fn collided(&self) -> bool {
        matches!(self, Crashed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Position>,
    direction: Direction,
    next_direction: Direction,
    hit_wall_pending: bool,
    hit_body_pending: bool,
}

impl Snake {
    /// Starting snake for `grid`: head at one fifth of the width on the middle
    /// row, one segment trailing to its left, heading right.
    pub fn new(grid: &Grid) -> Self {
        let head = Position::new(grid.width() / 5, grid.height() / 2);
        let body = (0..INITIAL_SNAKE_LENGTH as i32)
            .map(|i| Position::new(head.x - i, head.y))
            .collect();

        Snake::from_parts(body, Right)
    }

    /// Builds a snake from explicit segments, head first. `None` if shorter
    /// than the starting length.
    pub fn from_segments(body: Vec<Position>, direction: Direction) -> Option<Self> {
        if body.len() < INITIAL_SNAKE_LENGTH {
            return None;
        }
        Some(Snake::from_parts(body, direction))
    }

    fn from_parts(body: Vec<Position>, direction: Direction) -> Self {
        Snake {
            body,
            direction,
            next_direction: direction,
            hit_wall_pending: false,
            hit_body_pending: false,
        }
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn next_direction(&self) -> Direction {
        self.next_direction
    }

    pub fn hit_wall_pending(&self) -> bool {
        self.hit_wall_pending
    }

    pub fn hit_body_pending(&self) -> bool {
        self.hit_body_pending
    }

    /// Queues `new_direction` for the next tick. Rejected when it reverses the
    /// direction the snake is moving in right now; the queued one is irrelevant.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }
        self.next_direction = new_direction;
        true
    }

    pub fn advance(&mut self, grid: &Grid, food: Position) -> MoveResult {
        self.direction = self.next_direction;
        let next = self.head().step(self.direction);

        if !grid.in_bounds(next) {
            if self.hit_wall_pending {
                return Crashed(Collision::Wall);
            }
            self.hit_wall_pending = true;
            return Grazed(Collision::Wall);
        }
        self.hit_wall_pending = false;

        if self.body[1..].contains(&next) {
            if self.hit_body_pending {
                return Crashed(Collision::Body);
            }
            self.hit_body_pending = true;
            return Grazed(Collision::Body);
        }
        self.hit_body_pending = false;

        // Shift every segment one slot toward the tail, then place the head
        self.body.rotate_right(1);
        self.body[0] = next;

        let ate = next == food;
        if ate {
            // The new tail sits on the old one so nothing visibly shrinks this tick
            let tail = self.body[self.body.len() - 1];
            self.body.push(tail);
        }

        Moved { ate }
    }
}
