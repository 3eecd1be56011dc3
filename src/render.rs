use std::io;

use crate::game::{GameOutcome, GameState, SnakeGame};
use crate::grid::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const GREY: Color = Color::rgb(0x88, 0x88, 0x88);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

pub trait Renderer {
    /// Blanks the back buffer.
    fn clear(&mut self) -> io::Result<()>;
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) -> io::Result<()>;
    /// Draws one line of text horizontally centred on `at`.
    fn draw_text(&mut self, text: &str, at: Point, color: Color) -> io::Result<()>;
    /// Shows everything drawn since the last `clear`.
    fn present(&mut self) -> io::Result<()>;
}

/// Renderer that draws nothing.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames: usize,
}

impl Renderer for NullRenderer {
    fn clear(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn fill_rect(&mut self, _x: i32, _y: i32, _w: i32, _h: i32, _color: Color) -> io::Result<()> {
        Ok(())
    }

    fn draw_text(&mut self, _text: &str, _at: Point, _color: Color) -> io::Result<()> {
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.frames += 1;
        Ok(())
    }
}

pub const SNAKE_COLOR: Color = Color::WHITE;
pub const FOOD_COLOR: Color = Color::RED;
pub const TEXT_COLOR: Color = Color::WHITE;
pub const GRID_COLOR: Color = Color::GREY;

const GRID_DOT: &str = "·";

/// Draws the whole frame for the game's current state and presents it.
pub fn draw_frame<R: Renderer + ?Sized>(
    renderer: &mut R,
    game: &SnakeGame,
    cell_size: i32,
) -> io::Result<()> {
    renderer.clear()?;

    match game.state() {
        GameState::Running => draw_field(renderer, game, cell_size)?,
        GameState::Paused => {
            let score = format!("Score: {}", game.score());
            let lines = [
                "- PAUSED -",
                score.as_str(),
                "Press 'Esc' to continue,",
                "'R' to restart, or 'Q' to quit.",
            ];
            draw_message(renderer, game, cell_size, &lines)?;
        }
        GameState::GameOver => {
            let title = match game.outcome() {
                Some(GameOutcome::Cleared) => "- YOU WIN -",
                _ => "- GAME OVER -",
            };
            let score = format!("Score: {}", game.score());
            let lines = [title, score.as_str(), "Press 'Enter' to restart", "or 'Q' to quit."];
            draw_message(renderer, game, cell_size, &lines)?;
        }
    }

    renderer.present()
}

fn draw_field<R: Renderer + ?Sized>(
    renderer: &mut R,
    game: &SnakeGame,
    cell_size: i32,
) -> io::Result<()> {
    let grid = game.grid();

    // Dotted background on the inner cell corners, drawn first so it stays underneath
    for y in 1..grid.height() {
        for x in 1..grid.width() {
            renderer.draw_text(GRID_DOT, Point::new(x * cell_size, y * cell_size), GRID_COLOR)?;
        }
    }

    for pos in game.snake().body() {
        fill_cell(renderer, *pos, cell_size, SNAKE_COLOR)?;
    }

    if let Some(food) = game.food() {
        fill_cell(renderer, food.position, cell_size, FOOD_COLOR)?;
    }

    // Score in the top right corner, one cell in from the edges
    let at = Point::new((grid.width() - 2) * cell_size, cell_size);
    renderer.draw_text(&game.score().to_string(), at, TEXT_COLOR)
}

fn fill_cell<R: Renderer + ?Sized>(
    renderer: &mut R,
    pos: Position,
    cell_size: i32,
    color: Color,
) -> io::Result<()> {
    renderer.fill_rect(pos.x * cell_size, pos.y * cell_size, cell_size, cell_size, color)
}

/// Title, score and two hint lines stacked around the vertical centre.
fn draw_message<R: Renderer + ?Sized>(
    renderer: &mut R,
    game: &SnakeGame,
    cell_size: i32,
    lines: &[&str; 4],
) -> io::Result<()> {
    let grid = game.grid();
    let (cx, cy) = (grid.width() / 2, grid.height() / 2);
    let rows = [cy - 3, cy - 1, cy + 1, cy + 2];

    for (line, row) in lines.iter().zip(rows) {
        renderer.draw_text(line, Point::new(cx * cell_size, row.max(0) * cell_size), TEXT_COLOR)?;
    }

    Ok(())
}
