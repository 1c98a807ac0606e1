use std::fmt;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;
pub const BOARD_SIZE: usize = 3;
pub const SEAT_COUNT: usize = 2;

/// The symbol a seat places on the board. Seat 0 plays `X`, seat 1 plays `O`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn for_seat(seat: usize) -> Self {
        if seat == 0 {
            Mark::X
        } else {
            Mark::O
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' => Some(Mark::X),
            'O' => Some(Mark::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PositionError {
    #[error("position {row},{col} is outside the board")]
    OutOfRange { row: usize, col: usize },
    #[error("position {row},{col} is already taken")]
    Occupied { row: usize, col: usize },
}

/// The 3x3 grid. A cell holds the mark placed on it, or `None` while empty.
///
/// A cell is written at most once between resets: `place` refuses occupied
/// cells, and only `reset` returns a cell to empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Option<Mark>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [[Option<Mark>; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Mark> {
        self.cells[row][col]
    }

    pub fn place(&mut self, row: usize, col: usize, mark: Mark) -> Result<(), PositionError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(PositionError::OutOfRange { row, col });
        }
        if self.cells[row][col].is_some() {
            return Err(PositionError::Occupied { row, col });
        }
        self.cells[row][col] = Some(mark);
        Ok(())
    }

    /// True when any row, column or diagonal is completely `mark`.
    pub fn check_win(&self, mark: Mark) -> bool {
        let taken = |row: usize, col: usize| self.cells[row][col] == Some(mark);

        for i in 0..BOARD_SIZE {
            if (0..BOARD_SIZE).all(|j| taken(i, j)) || (0..BOARD_SIZE).all(|j| taken(j, i)) {
                return true;
            }
        }

        (0..BOARD_SIZE).all(|i| taken(i, i)) || (0..BOARD_SIZE).all(|i| taken(i, BOARD_SIZE - 1 - i))
    }

    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_some()))
    }

    pub fn reset(&mut self) {
        self.cells = Default::default();
    }
}

/// A server-to-client notification, one per wire line.
///
/// The wire format is line-oriented UTF-8 with a prefix tag, e.g. `TURN:X` or
/// `BOARD:X..;.O.;...` (rows joined with `;`, empty cells as `.`). `encode`
/// and `decode` are exact inverses for every variant.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Seat assignment, sent once right after connecting.
    Symbol(Mark),
    /// Human-readable informational text.
    Info(String),
    /// A rejected move or refused connection; never changes client state.
    Error(String),
    /// Full board snapshot.
    Board(Board),
    /// Whose turn it now is.
    Turn(Mark),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unrecognised message {0:?}")]
    UnknownPrefix(String),
    #[error("invalid mark {0:?}")]
    InvalidMark(String),
    #[error("invalid board snapshot {0:?}")]
    InvalidBoard(String),
}

impl ServerMessage {
    /// Renders the message as a single wire line, without the trailing newline.
    pub fn encode(&self) -> String {
        match self {
            ServerMessage::Symbol(mark) => format!("SYMBOL:{}", mark),
            ServerMessage::Info(text) => format!("MSG:{}", text),
            ServerMessage::Error(text) => format!("ERROR:{}", text),
            ServerMessage::Board(board) => format!("BOARD:{}", encode_board(board)),
            ServerMessage::Turn(mark) => format!("TURN:{}", mark),
        }
    }

    /// Parses one wire line (without its newline).
    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        if let Some(rest) = line.strip_prefix("SYMBOL:") {
            Ok(ServerMessage::Symbol(decode_mark(rest)?))
        } else if let Some(rest) = line.strip_prefix("MSG:") {
            Ok(ServerMessage::Info(rest.to_string()))
        } else if let Some(rest) = line.strip_prefix("ERROR:") {
            Ok(ServerMessage::Error(rest.to_string()))
        } else if let Some(rest) = line.strip_prefix("BOARD:") {
            Ok(ServerMessage::Board(decode_board(rest)?))
        } else if let Some(rest) = line.strip_prefix("TURN:") {
            Ok(ServerMessage::Turn(decode_mark(rest)?))
        } else {
            Err(DecodeError::UnknownPrefix(line.to_string()))
        }
    }
}

fn encode_board(board: &Board) -> String {
    let mut rows = Vec::with_capacity(BOARD_SIZE);
    for row in 0..BOARD_SIZE {
        let cells: String = (0..BOARD_SIZE)
            .map(|col| board.cell(row, col).map_or('.', Mark::as_char))
            .collect();
        rows.push(cells);
    }
    rows.join(";")
}

fn decode_board(data: &str) -> Result<Board, DecodeError> {
    let mut cells = [[None; BOARD_SIZE]; BOARD_SIZE];
    let rows: Vec<&str> = data.split(';').collect();
    if rows.len() != BOARD_SIZE {
        return Err(DecodeError::InvalidBoard(data.to_string()));
    }

    for (row, row_data) in rows.iter().enumerate() {
        let chars: Vec<char> = row_data.chars().collect();
        if chars.len() != BOARD_SIZE {
            return Err(DecodeError::InvalidBoard(data.to_string()));
        }
        for (col, &c) in chars.iter().enumerate() {
            cells[row][col] = match c {
                '.' => None,
                _ => Some(
                    Mark::from_char(c).ok_or_else(|| DecodeError::InvalidBoard(data.to_string()))?,
                ),
            };
        }
    }

    Ok(Board::from_cells(cells))
}

fn decode_mark(data: &str) -> Result<Mark, DecodeError> {
    let mut chars = data.chars();
    match (chars.next().and_then(Mark::from_char), chars.next()) {
        (Some(mark), None) => Ok(mark),
        _ => Err(DecodeError::InvalidMark(data.to_string())),
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("expected two comma-separated integers")]
pub struct ParseMoveError;

/// Parses a client move line of the form `row,col`.
///
/// Range checking is left to the caller; the original protocol treats `9,9`
/// as a position error, not a malformed line.
pub fn parse_move_line(line: &str) -> Result<(i32, i32), ParseMoveError> {
    let mut parts = line.split(',');
    let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ParseMoveError);
    };
    let row = row.trim().parse().map_err(|_| ParseMoveError)?;
    let col = col.trim().parse().map_err(|_| ParseMoveError)?;
    Ok((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_for_seat() {
        assert_eq!(Mark::for_seat(0), Mark::X);
        assert_eq!(Mark::for_seat(1), Mark::O);
    }

    #[test]
    fn test_mark_opponent() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }

    #[test]
    fn test_mark_char_roundtrip() {
        assert_eq!(Mark::from_char('X'), Some(Mark::X));
        assert_eq!(Mark::from_char('O'), Some(Mark::O));
        assert_eq!(Mark::from_char('.'), None);
        assert_eq!(Mark::from_char(Mark::X.as_char()), Some(Mark::X));
    }

    #[test]
    fn test_place_on_empty_cell() {
        let mut board = Board::new();
        board.place(1, 2, Mark::X).unwrap();
        assert_eq!(board.cell(1, 2), Some(Mark::X));
    }

    #[test]
    fn test_place_out_of_range() {
        let mut board = Board::new();
        assert_eq!(
            board.place(3, 0, Mark::X),
            Err(PositionError::OutOfRange { row: 3, col: 0 })
        );
        assert_eq!(
            board.place(0, 3, Mark::X),
            Err(PositionError::OutOfRange { row: 0, col: 3 })
        );
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_place_on_occupied_cell_keeps_original_mark() {
        let mut board = Board::new();
        board.place(0, 0, Mark::X).unwrap();
        assert_eq!(
            board.place(0, 0, Mark::O),
            Err(PositionError::Occupied { row: 0, col: 0 })
        );
        assert_eq!(board.cell(0, 0), Some(Mark::X));
    }

    #[test]
    fn test_check_win_rows_columns_diagonals() {
        for i in 0..BOARD_SIZE {
            let mut board = Board::new();
            for j in 0..BOARD_SIZE {
                board.place(i, j, Mark::X).unwrap();
            }
            assert!(board.check_win(Mark::X), "row {} should win", i);

            let mut board = Board::new();
            for j in 0..BOARD_SIZE {
                board.place(j, i, Mark::O).unwrap();
            }
            assert!(board.check_win(Mark::O), "column {} should win", i);
        }

        let mut board = Board::new();
        for i in 0..BOARD_SIZE {
            board.place(i, i, Mark::X).unwrap();
        }
        assert!(board.check_win(Mark::X));

        let mut board = Board::new();
        for i in 0..BOARD_SIZE {
            board.place(i, BOARD_SIZE - 1 - i, Mark::O).unwrap();
        }
        assert!(board.check_win(Mark::O));
    }

    #[test]
    fn test_check_win_requires_a_full_line() {
        let mut board = Board::new();
        board.place(0, 0, Mark::X).unwrap();
        board.place(0, 1, Mark::X).unwrap();
        board.place(1, 1, Mark::O).unwrap();
        assert!(!board.check_win(Mark::X));
        assert!(!board.check_win(Mark::O));
    }

    #[test]
    fn test_check_win_symmetry() {
        // Every board symmetry maps a winning pattern to a winning pattern.
        let transforms: [fn(usize, usize) -> (usize, usize); 8] = [
            |r, c| (r, c),
            |r, c| (c, 2 - r),
            |r, c| (2 - r, 2 - c),
            |r, c| (2 - c, r),
            |r, c| (r, 2 - c),
            |r, c| (2 - r, c),
            |r, c| (c, r),
            |r, c| (2 - c, 2 - r),
        ];
        let winning = [(0, 0), (0, 1), (0, 2)];
        let losing = [(0, 0), (1, 2), (2, 1)];

        for transform in transforms {
            let mut board = Board::new();
            for &(r, c) in &winning {
                let (r, c) = transform(r, c);
                board.place(r, c, Mark::X).unwrap();
            }
            assert!(board.check_win(Mark::X));
            assert!(!board.check_win(Mark::O));

            let mut board = Board::new();
            for &(r, c) in &losing {
                let (r, c) = transform(r, c);
                board.place(r, c, Mark::O).unwrap();
            }
            assert!(!board.check_win(Mark::O));
        }
    }

    #[test]
    fn test_is_full() {
        let mut board = Board::new();
        assert!(!board.is_full());
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                board.place(row, col, Mark::X).unwrap();
            }
        }
        assert!(board.is_full());
    }

    #[test]
    fn test_reset_clears_every_cell() {
        let mut board = Board::new();
        board.place(0, 0, Mark::X).unwrap();
        board.place(2, 2, Mark::O).unwrap();
        board.reset();
        assert_eq!(board, Board::new());
        board.place(0, 0, Mark::O).unwrap();
        assert_eq!(board.cell(0, 0), Some(Mark::O));
    }

    #[test]
    fn test_encode_empty_board() {
        let message = ServerMessage::Board(Board::new());
        assert_eq!(message.encode(), "BOARD:...;...;...");
    }

    #[test]
    fn test_encode_mixed_board() {
        let mut board = Board::new();
        board.place(0, 0, Mark::X).unwrap();
        board.place(1, 1, Mark::O).unwrap();
        board.place(2, 0, Mark::X).unwrap();
        assert_eq!(ServerMessage::Board(board).encode(), "BOARD:X..;.O.;X..");
    }

    #[test]
    fn test_encode_simple_messages() {
        assert_eq!(ServerMessage::Symbol(Mark::X).encode(), "SYMBOL:X");
        assert_eq!(ServerMessage::Turn(Mark::O).encode(), "TURN:O");
        assert_eq!(
            ServerMessage::Info("hello".to_string()).encode(),
            "MSG:hello"
        );
        assert_eq!(
            ServerMessage::Error("not your turn".to_string()).encode(),
            "ERROR:not your turn"
        );
    }

    #[test]
    fn test_decode_roundtrip() {
        let mut board = Board::new();
        board.place(1, 2, Mark::O).unwrap();

        let messages = vec![
            ServerMessage::Symbol(Mark::O),
            ServerMessage::Info("welcome".to_string()),
            ServerMessage::Error("position already taken".to_string()),
            ServerMessage::Board(board),
            ServerMessage::Turn(Mark::X),
        ];

        for message in messages {
            let decoded = ServerMessage::decode(&message.encode()).unwrap();
            assert_eq!(decoded, message);
        }
    }

    #[test]
    fn test_decode_rejects_unknown_prefix() {
        assert_eq!(
            ServerMessage::decode("PING:1"),
            Err(DecodeError::UnknownPrefix("PING:1".to_string()))
        );
        assert!(ServerMessage::decode("").is_err());
    }

    #[test]
    fn test_decode_rejects_bad_mark() {
        assert_eq!(
            ServerMessage::decode("SYMBOL:Z"),
            Err(DecodeError::InvalidMark("Z".to_string()))
        );
        assert!(ServerMessage::decode("TURN:XO").is_err());
        assert!(ServerMessage::decode("TURN:").is_err());
    }

    #[test]
    fn test_decode_rejects_bad_board() {
        assert!(ServerMessage::decode("BOARD:...;...").is_err());
        assert!(ServerMessage::decode("BOARD:..;...;...").is_err());
        assert!(ServerMessage::decode("BOARD:..q;...;...").is_err());
        assert!(ServerMessage::decode("BOARD:...;...;...;...").is_err());
    }

    #[test]
    fn test_parse_move_line() {
        assert_eq!(parse_move_line("0,2"), Ok((0, 2)));
        assert_eq!(parse_move_line("2 , 1"), Ok((2, 1)));
        assert_eq!(parse_move_line("-1,5"), Ok((-1, 5)));
    }

    #[test]
    fn test_parse_move_line_rejects_malformed_input() {
        assert!(parse_move_line("").is_err());
        assert!(parse_move_line("1").is_err());
        assert!(parse_move_line("1,2,3").is_err());
        assert!(parse_move_line("a,b").is_err());
        assert!(parse_move_line("1;2").is_err());
    }
}
