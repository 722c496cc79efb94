//! Terminal plumbing: the raw-mode guard, the keystroke source and the
//! in-place redraw.

use std::io::{self, ErrorKind, Read, Write};

use crossterm::tty::IsTty;
use crossterm::{cursor, queue, terminal};
use thiserror::Error;
use tracing::{debug, warn};

use crate::board::{Board, CELL_WIDTH};

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("Not a terminal.")]
    NotATerminal,
    #[error("failed to switch terminal mode: {0}")]
    Mode(#[from] io::Error),
}

/// Holds the terminal in raw mode; the previous mode comes back on drop.
#[derive(Debug)]
pub struct RawMode {
    _private: (),
}

impl RawMode {
    pub fn enter() -> Result<Self, TerminalError> {
        if !io::stdin().is_tty() {
            return Err(TerminalError::NotATerminal);
        }
        terminal::enable_raw_mode()?;
        debug!("entered raw mode");
        Ok(Self { _private: () })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            warn!(error = %err, "failed to restore terminal mode");
        } else {
            debug!("restored terminal mode");
        }
    }
}

/// A blocking source of single keystrokes.
pub trait KeySource {
    /// Next byte, or `None` once input is exhausted.
    fn read_key(&mut self) -> io::Result<Option<u8>>;
}

impl<R: Read> KeySource for R {
    fn read_key(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }
}

/// Prints the board. Lines end in `\r\n` since raw mode turns off output
/// post-processing.
pub fn draw<W: Write>(out: &mut W, board: &Board, game_over: bool) -> io::Result<()> {
    for line in board.render(game_over).lines() {
        write!(out, "{}\r\n", line)?;
    }
    out.flush()
}

/// Moves the terminal cursor back to the top-left corner of a drawn board.
pub fn rewind<W: Write>(out: &mut W, board: &Board) -> io::Result<()> {
    let size = board.size();
    let rows = size.rows as u16;
    let cols = (size.cols * CELL_WIDTH) as u16;
    queue!(out, cursor::MoveUp(rows), cursor::MoveLeft(cols))
}

pub fn redraw<W: Write>(out: &mut W, board: &Board, game_over: bool) -> io::Result<()> {
    rewind(out, board)?;
    draw(out, board, game_over)
}
