use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::tty::IsTty;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sweep::board::Board;
use sweep::game_loop;
use sweep::terminal::RawMode;

const DEFAULT_ROWS: u32 = 10;
const DEFAULT_COLS: u32 = 10;
const DEFAULT_BOMB_PERCENTAGE: u32 = 10;

const CONTROLS: &str = "\
Controls:
  w/a/s/d    Move cursor
  space      Open cell
  f          Flag/unflag cell
  q          Quit

Examples:
  sweep start
  sweep start 15 20 20";

#[derive(Parser)]
#[command(name = "sweep", about = "MineSweeper Game", arg_required_else_help = true, after_help = CONTROLS)]
struct Args {
    /// Write log output to this file (otherwise only to a redirected stderr)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a game with default settings, or with all three of rows, cols and bomb_percentage
    Start(StartArgs),
}

#[derive(clap::Args)]
struct StartArgs {
    /// Number of rows (5-50, default: 10)
    #[arg(value_parser = clap::value_parser!(u32).range(5..=50), requires = "cols")]
    rows: Option<u32>,

    /// Number of columns (5-50, default: 10)
    #[arg(value_parser = clap::value_parser!(u32).range(5..=50), requires = "bomb_percentage")]
    cols: Option<u32>,

    /// Percentage of bombs (1-90, default: 10)
    #[arg(value_parser = clap::value_parser!(u32).range(1..=90), requires = "rows")]
    bomb_percentage: Option<u32>,

    /// Seed the bomb placement for a reproducible game
    #[arg(long)]
    seed: Option<u64>,
}

/// Where log output goes. The board is redrawn in place, so nothing may be
/// written to the terminal while a game runs.
#[derive(Debug, PartialEq)]
enum LogSink<'a> {
    File(&'a Path),
    Stderr,
    Off,
}

fn log_sink(log_file: Option<&Path>, stderr_is_tty: bool) -> LogSink<'_> {
    match log_file {
        Some(path) => LogSink::File(path),
        None if stderr_is_tty => LogSink::Off,
        None => LogSink::Stderr,
    }
}

fn init_logging(sink: LogSink<'_>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    match sink {
        LogSink::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        LogSink::Stderr => registry
            .with(fmt::layer().with_ansi(false).with_writer(io::stderr))
            .init(),
        LogSink::Off => {}
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(log_sink(args.log_file.as_deref(), io::stderr().is_tty()))?;

    let Command::Start(start) = args.command;
    let rows = start.rows.unwrap_or(DEFAULT_ROWS) as usize;
    let cols = start.cols.unwrap_or(DEFAULT_COLS) as usize;
    let bomb_percentage = i64::from(start.bomb_percentage.unwrap_or(DEFAULT_BOMB_PERCENTAGE));

    let mut board = match start.seed {
        Some(seed) => Board::with_seed(rows, cols, bomb_percentage, seed),
        None => Board::new(rows, cols, bomb_percentage),
    };

    let state = {
        // Dropped at the end of this block, or during unwinding.
        let _raw = RawMode::enter()?;
        let stdin = io::stdin();
        let stdout = io::stdout();
        game_loop(&mut board, &mut stdin.lock(), &mut stdout.lock())
            .context("terminal I/O failed")?
    };
    info!(?state, "exiting");
    Ok(())
}
