//! # Game Client Library
//!
//! Terminal client for the networked tic-tac-toe game. The client keeps no
//! authority over the rules: it renders whatever the server broadcasts and
//! forwards the player's typed lines for the server to validate.
//!
//! ## Module Organization
//!
//! - [`game`] — the local mirror of the match: board snapshot, own mark and
//!   current turn, as last reported by the server.
//! - [`network`] — the connection loop. One `select!` alternates between
//!   server lines (decoded into [`shared::ServerMessage`] values) and stdin
//!   lines (sent verbatim as `row,col` moves).
//! - [`rendering`] — clears the terminal and draws the 3x3 grid.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let mut client = Client::new("127.0.0.1:8000");
//!     client.run().await
//! }
//! ```

pub mod game;
pub mod network;
pub mod rendering;
