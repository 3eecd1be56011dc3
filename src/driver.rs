use std::io;
use std::thread::sleep;
use std::time::Duration;

use crate::clock::Clock;
use crate::game::{Control, GameState, SnakeGame};
use crate::input::InputSource;
use crate::render::{draw_frame, Renderer};

/// Gap between input polls. Much shorter than a tick so key presses are
/// picked up promptly.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(5);

/// Fires at most once per interval, measured from the last time it fired.
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval_ms: u64,
    last_ms: u64,
}

impl TickTimer {
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        TickTimer { interval_ms, last_ms: now_ms }
    }

    pub fn due(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_ms) < self.interval_ms {
            return false;
        }
        self.last_ms = now_ms;
        true
    }

    /// Restarts the interval from `now_ms`.
    pub fn rearm(&mut self, now_ms: u64) {
        self.last_ms = now_ms;
    }
}

/// One game wired to its collaborators: polls input, ticks on schedule and
/// draws, all on the calling thread.
pub struct Session<R, I, C> {
    game: SnakeGame,
    renderer: R,
    input: I,
    clock: C,
    timer: TickTimer,
    cell_size: i32,
}

impl<R: Renderer, I: InputSource, C: Clock> Session<R, I, C> {
    pub fn new(
        game: SnakeGame,
        renderer: R,
        input: I,
        clock: C,
        tick_ms: u64,
        cell_size: i32,
    ) -> Self {
        let timer = TickTimer::new(tick_ms, clock.now_millis());
        Session { game, renderer, input, clock, timer, cell_size }
    }

    pub fn game(&self) -> &SnakeGame {
        &self.game
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn into_parts(self) -> (SnakeGame, R, I, C) {
        (self.game, self.renderer, self.input, self.clock)
    }

    /// Runs one loop iteration. Returns `Control::Quit` as soon as a quit
    /// command is seen; later commands from the same poll are dropped.
    pub fn step(&mut self) -> io::Result<Control> {
        for command in self.input.poll(self.game.state())? {
            let before = self.game.state();
            if self.game.apply(command) == Control::Quit {
                return Ok(Control::Quit);
            }
            if before != GameState::Running && self.game.state() == GameState::Running {
                self.timer.rearm(self.clock.now_millis());
            }
        }

        if self.game.state() == GameState::Running && self.timer.due(self.clock.now_millis()) {
            self.game.tick();
        }

        draw_frame(&mut self.renderer, &self.game, self.cell_size)?;
        Ok(Control::Continue)
    }

    pub fn run(&mut self) -> io::Result<()> {
        log::info!("Game loop started");

        while self.step()? == Control::Continue {
            sleep(FRAME_INTERVAL);
        }

        log::info!("Game loop finished, final score {}", self.game.score());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::GameConfig;
    use crate::grid::Position;
    use crate::input::{Command, ScriptedInput};
    use crate::render::NullRenderer;

    fn session<'a>(
        frames: Vec<Vec<Command>>,
        clock: &'a ManualClock,
    ) -> Session<NullRenderer, ScriptedInput, &'a ManualClock> {
        // 30 wide so the snake only reaches the wall when a test drives it there
        let config = GameConfig { seed: Some(11), ..GameConfig::new(30, 8) };
        let game = SnakeGame::new(&config);
        Session::new(game, NullRenderer::default(), ScriptedInput::new(frames), clock, 100, 1)
    }

    fn head(s: &Session<NullRenderer, ScriptedInput, &ManualClock>) -> Position {
        s.game().snake().head()
    }

    #[test]
    fn timer_fires_once_per_interval() {
        let mut timer = TickTimer::new(100, 0);

        assert!(!timer.due(99));
        assert!(timer.due(100));
        assert!(!timer.due(150));
        assert!(timer.due(230));
        assert!(!timer.due(300));
        assert!(timer.due(330));
    }

    #[test]
    fn ticks_only_when_interval_elapsed() {
        let clock = ManualClock::new(0);
        let mut s = session(vec![], &clock);

        s.step().unwrap();
        assert_eq!(head(&s), Position::new(6, 4));

        clock.advance(100);
        s.step().unwrap();
        assert_eq!(head(&s), Position::new(7, 4));

        clock.advance(50);
        s.step().unwrap();
        assert_eq!(head(&s), Position::new(7, 4));
        assert_eq!(s.renderer().frames, 3);
    }

    #[test]
    fn last_turn_before_the_tick_wins() {
        let clock = ManualClock::new(0);
        let frames = vec![vec![Command::MoveUp], vec![Command::MoveDown, Command::MoveLeft]];
        let mut s = session(frames, &clock);

        s.step().unwrap();
        clock.advance(100);
        s.step().unwrap();

        // Up then Down: Left is a reversal of the current heading and is dropped
        assert_eq!(head(&s), Position::new(6, 5));
    }

    #[test]
    fn resume_waits_a_full_interval() {
        let clock = ManualClock::new(0);
        let frames = vec![vec![Command::PauseToggle], vec![], vec![Command::PauseToggle], vec![]];
        let mut s = session(frames, &clock);

        s.step().unwrap();
        clock.advance(500);
        s.step().unwrap();
        assert_eq!(s.game().state(), GameState::Paused);
        assert_eq!(head(&s), Position::new(6, 4));

        s.step().unwrap();
        assert_eq!(s.game().state(), GameState::Running);
        assert_eq!(head(&s), Position::new(6, 4));

        clock.advance(100);
        s.step().unwrap();
        assert_eq!(head(&s), Position::new(7, 4));
    }

    #[test]
    fn restart_waits_a_full_interval() {
        let clock = ManualClock::new(0);
        let mut s = session(vec![], &clock);

        while s.game().state() != GameState::GameOver {
            clock.advance(100);
            s.step().unwrap();
        }

        // Long enough that a stale timer would tick right after the restart
        clock.advance(250);
        s.step().unwrap();
        s.input_mut().push_frame(vec![Command::Restart]);
        s.step().unwrap();
        assert_eq!(s.game().state(), GameState::Running);
        assert_eq!(head(&s), Position::new(6, 4));

        clock.advance(99);
        s.step().unwrap();
        assert_eq!(head(&s), Position::new(6, 4));

        clock.advance(1);
        s.step().unwrap();
        assert_eq!(head(&s), Position::new(7, 4));
    }

    #[test]
    fn quit_stops_the_loop() {
        let clock = ManualClock::new(0);
        let mut s = session(vec![vec![], vec![Command::Quit, Command::MoveUp]], &clock);

        s.run().unwrap();

        let (game, renderer, input, _) = s.into_parts();
        assert_eq!(renderer.frames, 1);
        assert!(input.is_exhausted());
        assert_eq!(game.snake().next_direction(), crate::grid::Direction::Right);
    }
}
