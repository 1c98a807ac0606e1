//! # Game Server Library
//!
//! This library provides the authoritative server for the networked
//! tic-tac-toe game. It owns the canonical board, arbitrates every move and
//! pushes state notifications to both connected players.
//!
//! ## Architecture Design
//!
//! ### Single-Consumer Command Queue
//! All mutation of game state flows through one unbounded mpsc channel that
//! is drained by a single long-lived task. Connection tasks never touch the
//! board or the seat registry directly; they only enqueue commands. Mutual
//! exclusion is therefore achieved by construction, without locks, and
//! commands from both players are applied in strict arrival order.
//!
//! ### Connection Tasks
//! The listener accepts connections indefinitely and spawns one reader task
//! per connection. A reader forwards each received line as a move command
//! and reports EOF or a read error as exactly one disconnect command. A
//! connection refused because both seats are taken is told so and closed
//! without ever producing further commands.
//!
//! ### Round Lifecycle
//! A round runs from the moment both seats fill until a win, a draw or a
//! disconnect. Any of those ends the round: the outcome is broadcast, the
//! board is cleared, both seats are freed and the next two connections
//! start fresh. Nothing survives a reset, which keeps reconnection simple.
//!
//! ## Module Organization
//!
//! - [`game`] — the board-plus-turn state machine and move validation.
//! - [`seats`] — seat assignment and per-seat connection handles.
//! - [`network`] — listener, per-connection reader tasks, the command queue
//!   and outbound notifications.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let mut server = Server::new("127.0.0.1:8000").await?;
//!
//!     // Runs the accept loop and the game loop:
//!     // - seats the first two connections as X and O
//!     // - applies their moves one at a time in arrival order
//!     // - broadcasts board snapshots, turn changes and round results
//!     // - resets the round on win, draw or disconnect
//!     server.run().await
//! }
//! ```

pub mod game;
pub mod network;
pub mod seats;
