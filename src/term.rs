use std::io::{self, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll, read};

use crate::game::GameState::{self, *};
use crate::grid::{Grid, GridInt};
use crate::input::{Command, InputSource};
use crate::render::{Color, Point, Renderer};

pub type TermInt = u16;
pub type Coords = (TermInt, TermInt);

/// Terminal columns per grid cell; characters are roughly twice as tall as wide.
const CELL_COLUMNS: TermInt = 2;

const FILL_CHAR: char = '█';
const BORDER_COLOR: Color = Color::GREY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell { ch: ' ', color: Color::WHITE };
// Never drawn, forces a full repaint on the next present
const STALE: Cell = Cell { ch: '\0', color: Color::BLACK };

/// Owns the terminal while the game runs and draws the play field inside a
/// border. Frames are composed off-screen and only changed cells are written.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Cell>,
    shown: Vec<Cell>,
    /// Top-left terminal cell of the play field, inside the border
    origin: Coords,
    /// Play field size in terminal cells
    field: Coords,
}

impl TermManager {
    pub fn new(grid: &Grid) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let field = field_size(grid);
        let origin = field_origin((width, height), field).ok_or_else(|| too_small((width, height), field))?;
        let size = width as usize * height as usize;

        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            screen: vec![BLANK; size],
            shown: vec![STALE; size],
            origin,
            field,
        })
    }

    /// Takes over the terminal. On failure whatever was already switched is
    /// switched back before the error is returned.
    pub fn setup(&mut self) -> io::Result<()> {
        let res = self.enter();
        or_undo(res, || self.restore())
    }

    pub fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )
    }

    ///////////////////////////////////////////////////////////////////////////

    fn enter(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))?;
        self.shown.fill(STALE);
        Ok(())
    }

    /// Re-centres the field after the terminal changed size and forces a full
    /// repaint. Fails if the field no longer fits.
    fn relayout(&mut self, size: Coords) -> io::Result<()> {
        let origin = field_origin(size, self.field).ok_or_else(|| too_small(size, self.field))?;
        log::debug!("Terminal is now {}x{}, field origin {:?}", size.0, size.1, origin);

        let cells = size.0 as usize * size.1 as usize;
        (self.width, self.height) = size;
        self.origin = origin;
        self.screen = vec![BLANK; cells];
        self.shown = vec![STALE; cells];
        queue!(self.stdout, terminal::Clear(ClearType::All))
    }

    fn draw_borders(&mut self) {
        let (x0, y0) = (self.origin.0 - 1, self.origin.1 - 1);
        let (x1, y1) = (self.origin.0 + self.field.0, self.origin.1 + self.field.1);

        for x in x0..=x1 {
            let ch = if x == x0 || x == x1 {'+'} else {'-'};
            self.put((x, y0), ch, BORDER_COLOR);
            self.put((x, y1), ch, BORDER_COLOR);
        }

        for y in y0 + 1..y1 {
            self.put((x0, y), '|', BORDER_COLOR);
            self.put((x1, y), '|', BORDER_COLOR);
        }
    }

    /// Terminal cell for a field-relative column/row, if it lies inside the field.
    fn field_cell(&self, col: i32, row: i32) -> Option<Coords> {
        if col < 0 || row < 0 || col >= self.field.0 as i32 || row >= self.field.1 as i32 {
            return None;
        }
        Some((self.origin.0 + col as TermInt, self.origin.1 + row as TermInt))
    }

    fn put(&mut self, pos: Coords, ch: char, color: Color) {
        if pos.0 < self.width && pos.1 < self.height {
            self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = Cell { ch, color };
        }
    }
}

impl Renderer for TermManager {
    fn clear(&mut self) -> io::Result<()> {
        let size = terminal::size()?;
        if size != (self.width, self.height) {
            self.relayout(size)?;
        }

        self.screen.fill(BLANK);
        self.draw_borders();
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) -> io::Result<()> {
        let cols = CELL_COLUMNS as i32;

        for row in y..y + h {
            for col in x * cols..(x + w) * cols {
                if let Some(pos) = self.field_cell(col, row) {
                    self.put(pos, FILL_CHAR, color);
                }
            }
        }

        Ok(())
    }

    fn draw_text(&mut self, text: &str, at: Point, color: Color) -> io::Result<()> {
        let len = text.chars().count() as i32;
        let start = at.x * CELL_COLUMNS as i32 - len / 2;

        for (i, ch) in text.chars().enumerate() {
            if let Some(pos) = self.field_cell(start + i as i32, at.y) {
                self.put(pos, ch, color);
            }
        }

        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let width = self.width as usize;

        for (i, (new, old)) in self.screen.iter().zip(self.shown.iter()).enumerate() {
            if new == old {
                continue;
            }
            let (x, y) = ((i % width) as TermInt, (i / width) as TermInt);
            let fg = style::Color::Rgb { r: new.color.r, g: new.color.g, b: new.color.b };
            queue!(self.stdout, cursor::MoveTo(x, y), style::SetForegroundColor(fg), style::Print(new.ch))?;
        }

        self.stdout.flush()?;
        self.shown.copy_from_slice(&self.screen);
        Ok(())
    }
}

/// Keyboard side of the terminal. Reads whatever key events are queued without
/// waiting.
#[derive(Debug, Default)]
pub struct TermInput;

impl InputSource for TermInput {
    fn poll(&mut self, state: GameState) -> io::Result<Vec<Command>> {
        let mut commands = vec![];

        while poll(Duration::ZERO)? {
            match read()? {
                Event::Key(ev) if ev.kind != KeyEventKind::Release => {
                    if let Some(cmd) = command_for_key(&ev, state) {
                        commands.push(cmd);
                    }
                }
                // Picked up by the renderer on the next frame
                Event::Resize(w, h) => log::debug!("Terminal resized to {}x{}", w, h),
                _ => {}
            }
        }

        Ok(commands)
    }
}

/// Terminal cells the play field of `grid` takes up, border excluded.
pub fn field_size(grid: &Grid) -> Coords {
    let cols = TermInt::try_from(grid.width()).unwrap_or(TermInt::MAX);
    let rows = TermInt::try_from(grid.height()).unwrap_or(TermInt::MAX);
    (cols.saturating_mul(CELL_COLUMNS), rows)
}

/// Where a `field` sized play field starts when centred in a terminal of
/// `size`. `None` if the field and its border don't fit.
pub fn field_origin(size: Coords, field: Coords) -> Option<Coords> {
    if field.0 > size.0.saturating_sub(2) || field.1 > size.1.saturating_sub(2) {
        return None;
    }
    Some(((size.0 - field.0) / 2, (size.1 - field.1) / 2))
}

fn too_small(size: Coords, field: Coords) -> io::Error {
    let (max_w, max_h) = max_grid(size);
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!(
            "terminal {}x{} fits at most a {}x{} grid, need {}x{}",
            size.0, size.1, max_w, max_h, field.0 / CELL_COLUMNS, field.1
        ),
    )
}

/// Hands back `res`, running `undo` first when it is an error. A failing
/// `undo` is logged and the original error wins.
fn or_undo<T, F>(res: io::Result<T>, undo: F) -> io::Result<T>
where
    F: FnOnce() -> io::Result<()>,
{
    if res.is_err() {
        if let Err(err) = undo() {
            log::debug!("Undo after failure also failed: {}", err);
        }
    }
    res
}

/// Largest grid that fits a terminal of `size`, border included.
pub fn max_grid(size: Coords) -> (GridInt, GridInt) {
    let cols = size.0.saturating_sub(2) / CELL_COLUMNS;
    let rows = size.1.saturating_sub(2);
    (cols as GridInt, rows as GridInt)
}

/// Command for a key press. Enter and Space depend on the screen: on the pause
/// screen they resume, after a game over they start a new run.
pub fn command_for_key(ev: &KeyEvent, state: GameState) -> Option<Command> {
    if ev.modifiers.contains(KeyModifiers::CONTROL) && matches!(ev.code, KeyCode::Char('c')) {
        return Some(Command::Quit);
    }

    let cmd = match ev.code {
        KeyCode::Up => Command::MoveUp,
        KeyCode::Down => Command::MoveDown,
        KeyCode::Left => Command::MoveLeft,
        KeyCode::Right => Command::MoveRight,
        KeyCode::Esc => Command::PauseToggle,
        KeyCode::Enter => match state {
            Running => return None,
            Paused => Command::PauseToggle,
            GameOver => Command::Restart,
        },
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' | 'i' => Command::MoveUp,
            's' | 'k' => Command::MoveDown,
            'a' | 'j' => Command::MoveLeft,
            'd' | 'l' => Command::MoveRight,
            ' ' if state == GameOver => Command::Restart,
            ' ' | 'p' => Command::PauseToggle,
            'r' => Command::Restart,
            'q' => Command::Quit,
            _ => return None,
        },
        _ => return None,
    };

    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as Flag;

    fn key(code: KeyCode) -> Option<Command> {
        command_for_key(&KeyEvent::new(code, KeyModifiers::NONE), Running)
    }

    fn key_in(code: KeyCode, state: GameState) -> Option<Command> {
        command_for_key(&KeyEvent::new(code, KeyModifiers::NONE), state)
    }

    #[test]
    fn arrows_and_letter_clusters_steer() {
        assert_eq!(key(KeyCode::Up), Some(Command::MoveUp));
        assert_eq!(key(KeyCode::Char('W')), Some(Command::MoveUp));
        assert_eq!(key(KeyCode::Char('k')), Some(Command::MoveDown));
        assert_eq!(key(KeyCode::Char('a')), Some(Command::MoveLeft));
        assert_eq!(key(KeyCode::Char('l')), Some(Command::MoveRight));
    }

    #[test]
    fn control_keys() {
        assert_eq!(key(KeyCode::Esc), Some(Command::PauseToggle));
        assert_eq!(key(KeyCode::Char(' ')), Some(Command::PauseToggle));
        assert_eq!(key(KeyCode::Char('R')), Some(Command::Restart));
        assert_eq!(key(KeyCode::Char('q')), Some(Command::Quit));
        assert_eq!(
            command_for_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Paused),
            Some(Command::Quit)
        );
        assert_eq!(key(KeyCode::Char('c')), None);
        assert_eq!(key(KeyCode::Tab), None);
    }

    #[test]
    fn enter_resumes_when_paused_and_restarts_after_game_over() {
        assert_eq!(key_in(KeyCode::Enter, Running), None);
        assert_eq!(key_in(KeyCode::Enter, Paused), Some(Command::PauseToggle));
        assert_eq!(key_in(KeyCode::Enter, GameOver), Some(Command::Restart));

        assert_eq!(key_in(KeyCode::Char(' '), Paused), Some(Command::PauseToggle));
        assert_eq!(key_in(KeyCode::Char(' '), GameOver), Some(Command::Restart));
        assert_eq!(key_in(KeyCode::Char('r'), Paused), Some(Command::Restart));
    }

    #[test]
    fn grid_fit_leaves_room_for_border() {
        assert_eq!(max_grid((80, 24)), (39, 22));
        assert_eq!(max_grid((66, 26)), (32, 24));
        assert_eq!(max_grid((1, 1)), (0, 0));
    }

    #[test]
    fn field_is_centred_inside_its_border() {
        let field = field_size(&Grid::new(32, 20));
        assert_eq!(field, (64, 20));

        assert_eq!(field_origin((80, 24), field), Some((8, 2)));
        assert_eq!(field_origin((66, 22), field), Some((1, 1)));
        // Shrunk below field plus border
        assert_eq!(field_origin((65, 22), field), None);
        assert_eq!(field_origin((66, 21), field), None);
        assert_eq!(field_origin((0, 0), field), None);
    }

    #[test]
    fn failed_step_is_undone_and_keeps_its_error() {
        let undone = Flag::new(false);
        let res: io::Result<()> = or_undo(Err(io::Error::other("no tty")), || {
            undone.set(true);
            Err(io::Error::other("still no tty"))
        });

        assert!(undone.get());
        assert_eq!(res.unwrap_err().to_string(), "no tty");

        let undone = Flag::new(false);
        assert_eq!(or_undo(Ok(3), || { undone.set(true); Ok(()) }).unwrap(), 3);
        assert!(!undone.get());
    }
}
