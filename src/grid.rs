use Direction::*;

pub type GridInt = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: GridInt,
    pub y: GridInt,
}

impl Position {
    pub const fn new(x: GridInt, y: GridInt) -> Self {
        Position { x, y }
    }

    /// The neighbouring cell one step in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.unit();
        Position::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit vector in grid space, y grows downward.
    pub fn unit(self) -> (GridInt, GridInt) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// Fixed-size play field measured in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: GridInt,
    height: GridInt,
}

impl Grid {
    pub fn new(width: GridInt, height: GridInt) -> Self {
        Grid { width, height }
    }

    pub fn width(&self) -> GridInt {
        self.width
    }

    pub fn height(&self) -> GridInt {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Inclusive ranges of cells at least `margin` away from every edge.
    /// `None` when the margin swallows the whole axis.
    pub fn inner_region(&self, margin: GridInt) -> Option<(Span, Span)> {
        let xs = Span::new(margin, self.width - 1 - margin)?;
        let ys = Span::new(margin, self.height - 1 - margin)?;
        Some((xs, ys))
    }
}

/// Non-empty inclusive range of grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub lo: GridInt,
    pub hi: GridInt,
}

impl Span {
    fn new(lo: GridInt, hi: GridInt) -> Option<Self> {
        if lo <= hi { Some(Span { lo, hi }) } else { None }
    }

    pub fn contains(&self, v: GridInt) -> bool {
        self.lo <= v && v <= self.hi
    }

    pub fn len(&self) -> usize {
        (self.hi - self.lo + 1) as usize
    }
}
