//! Terminal board display.

use crate::game::ClientGameState;
use shared::{Board, Mark, BOARD_SIZE};

/// Clears the terminal and redraws the board with a status line.
pub fn draw(state: &ClientGameState) {
    print!("\x1b[H\x1b[2J");
    println!("=== TIC-TAC-TOE ===");
    println!();
    print!("{}", format_board(state.board()));
    println!();
    if let Some(mark) = state.own_mark() {
        println!("You are playing as {}", mark);
    }
}

pub fn format_board(board: &Board) -> String {
    let mut out = String::new();
    for row in 0..BOARD_SIZE {
        out.push(' ');
        for col in 0..BOARD_SIZE {
            out.push(board.cell(row, col).map_or('.', Mark::as_char));
            out.push(' ');
        }
        out.push('\n');
    }
    out
}
