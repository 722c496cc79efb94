pub mod board;
pub mod interaction;
pub mod terminal;

use std::io::{self, Write};

use tracing::{info, warn};

use board::Board;
use interaction::Action;
use terminal::KeySource;

/// Consecutive failed reads after which input is considered gone.
const MAX_READ_ERRORS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
    Lost,
    Quit
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        *self != GameState::Playing
    }
}

/// Applies one action to the board. `first_step` is consumed by the first
/// reveal, which places the bombs around the cursor's safe zone.
pub fn apply_action(board: &mut Board, action: Action, first_step: &mut bool) -> GameState {
    match action {
        Action::Quit => GameState::Quit,
        Action::Move(drow, dcol) => {
            board.move_cursor(drow, dcol);
            GameState::Playing
        }
        Action::Flag => {
            board.flag_cell();
            if !*first_step && board.check_win() {
                GameState::Won
            } else {
                GameState::Playing
            }
        }
        Action::Open => {
            if *first_step {
                board.randomize();
                *first_step = false;
            }
            if board.open_cell() {
                GameState::Lost
            } else {
                GameState::Playing
            }
        }
    }
}

/// Runs a game to completion, reading keys from `keys` and drawing onto `out`.
pub fn game_loop<K: KeySource, W: Write>(board: &mut Board, keys: &mut K, out: &mut W) -> io::Result<GameState> {
    let size = board.size();
    info!(rows = size.rows, cols = size.cols, bomb_percentage = board.bomb_percentage(), "starting game");
    terminal::draw(out, board, false)?;

    let mut first_step = true;
    let mut state = GameState::Playing;
    let mut read_errors = 0;
    while !state.is_terminal() {
        let byte = match keys.read_key() {
            Ok(Some(byte)) => {
                read_errors = 0;
                Some(byte)
            }
            Ok(None) => {
                info!("input closed");
                state = GameState::Quit;
                break
            }
            Err(err) => {
                read_errors += 1;
                warn!(error = %err, read_errors, "read failed");
                if read_errors >= MAX_READ_ERRORS {
                    state = GameState::Quit;
                    break
                }
                None
            }
        };
        state = match byte.and_then(interaction::action_from_byte) {
            Some(action) => apply_action(board, action, &mut first_step),
            None => GameState::Playing
        };
        match state {
            GameState::Playing => terminal::redraw(out, board, false)?,
            GameState::Won | GameState::Lost => finish(out, board, state)?,
            GameState::Quit => {}
        }
    }
    info!(?state, "game over");
    Ok(state)
}

fn finish<W: Write>(out: &mut W, board: &Board, state: GameState) -> io::Result<()> {
    let lost = state == GameState::Lost;
    terminal::redraw(out, board, lost)?;
    let message = if lost { "Game Over" } else { "You win!" };
    write!(out, "{}\r\n", message)?;
    out.flush()
}
