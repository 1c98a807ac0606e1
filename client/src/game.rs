use shared::{Board, Mark};

/// Client-side view of the match, rebuilt from server notifications.
///
/// The server is authoritative; this state only mirrors what the last
/// `BOARD:`, `SYMBOL:` and `TURN:` messages said.
#[derive(Debug, Clone, Default)]
pub struct ClientGameState {
    board: Board,
    own_mark: Option<Mark>,
    turn: Option<Mark>,
}

impl ClientGameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn own_mark(&self) -> Option<Mark> {
        self.own_mark
    }

    pub fn turn(&self) -> Option<Mark> {
        self.turn
    }

    pub fn set_own_mark(&mut self, mark: Mark) {
        self.own_mark = Some(mark);
    }

    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    pub fn set_turn(&mut self, mark: Mark) {
        self.turn = Some(mark);
    }

    pub fn is_own_turn(&self) -> bool {
        self.own_mark.is_some() && self.own_mark == self.turn
    }
}
