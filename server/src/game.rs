use log::info;
use shared::{parse_move_line, Board, Mark, PositionError, BOARD_SIZE, SEAT_COUNT};
use thiserror::Error;

/// Why a move was rejected. The `Display` text is what the offending
/// player sees after the `ERROR:` prefix.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("waiting for a second player to join")]
    OpponentMissing,
    #[error("invalid format, use: row,col (example: 0,2)")]
    Malformed,
    #[error("position out of range, use numbers 0 to 2")]
    OutOfRange,
    #[error("position already taken")]
    Occupied,
    #[error("it is not your turn")]
    NotYourTurn,
}

/// How the round stands after an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Win,
    Draw,
    NextTurn(Mark),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub mark: Mark,
    pub row: usize,
    pub col: usize,
    pub status: RoundStatus,
}

/// The authoritative game state: the board plus the seat whose turn it is.
///
/// Created once at startup and only ever touched by the command loop, so it
/// needs no locking. A rejected move leaves it bit-for-bit unchanged.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current_turn: usize,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_turn: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    /// Arbitrates one move line from the given seat.
    ///
    /// Validation order: line format, coordinate range, turn ownership, cell
    /// occupancy. On success the board gains exactly one mark and the status
    /// is decided with win checked before draw, so a move that fills the
    /// board while completing a line counts as a win.
    pub fn apply_move(&mut self, seat: usize, line: &str) -> Result<MoveOutcome, MoveError> {
        let (row, col) = parse_move_line(line).map_err(|_| MoveError::Malformed)?;
        if row < 0 || col < 0 || row >= BOARD_SIZE as i32 || col >= BOARD_SIZE as i32 {
            return Err(MoveError::OutOfRange);
        }
        if seat != self.current_turn {
            return Err(MoveError::NotYourTurn);
        }

        let (row, col) = (row as usize, col as usize);
        let mark = Mark::for_seat(seat);
        self.board.place(row, col, mark).map_err(|err| match err {
            PositionError::OutOfRange { .. } => MoveError::OutOfRange,
            PositionError::Occupied { .. } => MoveError::Occupied,
        })?;

        let status = if self.board.check_win(mark) {
            RoundStatus::Win
        } else if self.board.is_full() {
            RoundStatus::Draw
        } else {
            self.current_turn = (self.current_turn + 1) % SEAT_COUNT;
            RoundStatus::NextTurn(Mark::for_seat(self.current_turn))
        };

        Ok(MoveOutcome {
            mark,
            row,
            col,
            status,
        })
    }

    /// Returns the game to its initial state: empty board, seat 0 to move.
    pub fn reset(&mut self) {
        info!("Resetting the game");
        self.board.reset();
        self.current_turn = 0;
    }
}
