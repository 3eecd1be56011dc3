use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::terminal;

use grid_snake::clock::SystemClock;
use grid_snake::config::{GameConfig, DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_TICK_MS};
use grid_snake::driver::Session;
use grid_snake::food::DEFAULT_FOOD_MARGIN;
use grid_snake::term::{max_grid, TermInput, TermManager};
use grid_snake::SnakeGame;

#[derive(Parser)]
#[command(name = "grid-snake")]
#[command(version, about = "Snake on a fixed grid, in the terminal")]
struct Cli {
    /// Grid columns [default: 32, or less to fit the terminal]
    #[arg(long)]
    width: Option<i32>,

    /// Grid rows [default: 24, or less to fit the terminal]
    #[arg(long)]
    height: Option<i32>,

    /// Milliseconds between snake moves
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u64,

    /// Cells kept free of food along every edge
    #[arg(long, default_value_t = DEFAULT_FOOD_MARGIN)]
    margin: i32,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here instead of stderr, which the game screen hides
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_logger(log_file: Option<&PathBuf>) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let (fit_w, fit_h) = max_grid(terminal::size().context("reading terminal size")?);

    let config = GameConfig {
        width: cli.width.unwrap_or(DEFAULT_GRID_WIDTH.min(fit_w)),
        height: cli.height.unwrap_or(DEFAULT_GRID_HEIGHT.min(fit_h)),
        tick_ms: cli.tick_ms,
        food_margin: cli.margin,
        cell_size: 1,
        seed: cli.seed,
    };

    config.validate().context("invalid game settings")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_file.as_ref())?;

    let config = build_config(&cli)?;
    log::info!("Starting {}x{} game, tick {} ms", config.width, config.height, config.tick_ms);

    let mut term = TermManager::new(&config.grid()).context("preparing terminal")?;
    term.setup().context("entering game screen")?;

    let game = SnakeGame::new(&config);
    let clock = SystemClock::new();
    let mut session = Session::new(game, term, TermInput, clock, config.tick_ms, config.cell_size);
    let res = session.run();

    // Always hand the terminal back before reporting anything
    let (_, mut term, _, _) = session.into_parts();
    term.restore().context("restoring terminal")?;

    res.context("game loop failed")
}
