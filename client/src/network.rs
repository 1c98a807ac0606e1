use crate::game::ClientGameState;
use crate::rendering;
use log::{info, warn};
use shared::ServerMessage;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Terminal client: renders server notifications and forwards typed moves.
pub struct Client {
    server_addr: String,
    state: ClientGameState,
}

impl Client {
    pub fn new(server_addr: &str) -> Self {
        Client {
            server_addr: server_addr.to_string(),
            state: ClientGameState::new(),
        }
    }

    /// Connects and runs until the server hangs up or stdin closes.
    ///
    /// Lines typed by the player are sent as-is; the server validates them
    /// and answers with `ERROR:` when they are not acceptable moves.
    pub async fn run(&mut self) -> io::Result<()> {
        let stream = TcpStream::connect(self.server_addr.as_str()).await?;
        info!("Connected to {}", self.server_addr);

        let (read_half, mut write_half) = stream.into_split();
        let mut server_lines = BufReader::new(read_half).lines();
        let mut input_lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                result = server_lines.next_line() => {
                    match result {
                        Ok(Some(line)) => self.handle_line(&line),
                        Ok(None) => {
                            println!("The server closed the connection.");
                            break;
                        }
                        Err(err) => {
                            warn!("Lost the server connection: {}", err);
                            break;
                        }
                    }
                }
                result = input_lines.next_line() => {
                    match result {
                        Ok(Some(line)) => {
                            let mut out = line;
                            out.push('\n');
                            if let Err(err) = write_half.write_all(out.as_bytes()).await {
                                warn!("Failed to send move: {}", err);
                                break;
                            }
                        }
                        Ok(None) | Err(_) => break,
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_line(&mut self, line: &str) {
        let message = match ServerMessage::decode(line) {
            Ok(message) => message,
            Err(err) => {
                warn!("Ignoring unrecognised server line: {}", err);
                return;
            }
        };

        match message {
            ServerMessage::Symbol(mark) => {
                self.state.set_own_mark(mark);
                println!("== You are player {} ==", mark);
            }
            ServerMessage::Info(text) => println!("{}", text),
            ServerMessage::Error(text) => println!("ERROR: {}", text),
            ServerMessage::Board(board) => {
                self.state.set_board(board);
                rendering::draw(&self.state);
            }
            ServerMessage::Turn(mark) => {
                self.state.set_turn(mark);
                if self.state.is_own_turn() {
                    println!(">> Your turn. Enter row,col (example: 0,2):");
                } else {
                    println!(">> Player {}'s turn, waiting...", mark);
                }
            }
        }
    }
}
