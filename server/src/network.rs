//! Server network layer: connection intake and the command-queue game loop.
//!
//! Every accepted connection gets one reader task that forwards events into
//! an unbounded mpsc channel. A single long-lived loop drains that channel
//! and is the only code that touches the game state and the seat registry,
//! so commands are applied one at a time in strict arrival order and no
//! locking is needed anywhere.

use crate::game::{GameState, MoveError, RoundStatus};
use crate::seats::SeatRegistry;
use log::{debug, info, warn};
use shared::{Mark, ServerMessage, SEAT_COUNT};
use std::io;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

/// Events funneled from connection tasks into the game loop.
///
/// `Connect` carries a oneshot ack so the reader task learns its fate: the
/// assigned seat, or `None` when the game is full and the connection is to
/// be closed. `Move` and `Disconnect` are fire-and-forget.
#[derive(Debug)]
pub enum Command {
    Connect {
        conn_id: u32,
        writer: OwnedWriteHalf,
        ack: oneshot::Sender<Option<usize>>,
    },
    Move {
        conn_id: u32,
        line: String,
    },
    Disconnect {
        conn_id: u32,
    },
}

/// The authoritative game server: listener, command queue and game state.
pub struct Server {
    listener: Option<TcpListener>,
    local_addr: SocketAddr,
    cmd_tx: mpsc::UnboundedSender<Command>,
    cmd_rx: mpsc::UnboundedReceiver<Command>,
    seats: SeatRegistry<OwnedWriteHalf>,
    game: GameState,
}

impl Server {
    /// Binds the listener. This is the only fallible step of server startup;
    /// a bind failure is fatal to the process.
    pub async fn new(addr: &str) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Server listening on {}", local_addr);

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener: Some(listener),
            local_addr,
            cmd_tx,
            cmd_rx,
            seats: SeatRegistry::new(),
            game: GameState::new(),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Runs the accept loop and the game loop until the process is stopped.
    pub async fn run(&mut self) -> io::Result<()> {
        if let Some(listener) = self.listener.take() {
            tokio::spawn(accept_loop(listener, self.cmd_tx.clone()));
        }

        while let Some(command) = self.cmd_rx.recv().await {
            self.apply(command).await;
        }

        Ok(())
    }

    /// Applies one queued command against the shared state.
    async fn apply(&mut self, command: Command) {
        match command {
            Command::Connect {
                conn_id,
                writer,
                ack,
            } => self.handle_connect(conn_id, writer, ack).await,
            Command::Move { conn_id, line } => self.handle_move(conn_id, &line).await,
            Command::Disconnect { conn_id } => self.handle_disconnect(conn_id).await,
        }
    }

    async fn handle_connect(
        &mut self,
        conn_id: u32,
        writer: OwnedWriteHalf,
        ack: oneshot::Sender<Option<usize>>,
    ) {
        match self.seats.assign(conn_id, writer) {
            Ok(seat) => {
                let mark = Mark::for_seat(seat);
                self.notify(seat, &ServerMessage::Symbol(mark)).await;
                self.notify(
                    seat,
                    &ServerMessage::Info(format!("Welcome, player {}. You are '{}'.", seat + 1, mark)),
                )
                .await;

                if self.seats.occupied_count() < SEAT_COUNT {
                    self.notify(seat, &ServerMessage::Info("Waiting for an opponent...".to_string()))
                        .await;
                } else {
                    info!("Both seats taken, starting the round");
                    self.broadcast(&ServerMessage::Info(
                        "Both players connected, the game begins!".to_string(),
                    ))
                    .await;
                    self.broadcast(&ServerMessage::Board(self.game.board().clone()))
                        .await;
                    self.broadcast(&ServerMessage::Turn(Mark::for_seat(self.game.current_turn())))
                        .await;
                }

                let _ = ack.send(Some(seat));
            }
            Err(err) => {
                warn!("Connection {} refused: {}", conn_id, err);
                let text = err.to_string();
                let mut writer = err.0;
                if let Err(err) = send_line(&mut writer, &ServerMessage::Error(text)).await {
                    debug!("Could not tell connection {} it was refused: {}", conn_id, err);
                }
                let _ = ack.send(None);
            }
        }
    }

    async fn handle_move(&mut self, conn_id: u32, line: &str) {
        let Some(seat) = self.seats.seat_of(conn_id) else {
            debug!("Dropping line from unseated connection {}", conn_id);
            return;
        };

        if self.seats.occupied_count() < SEAT_COUNT {
            self.notify(
                seat,
                &ServerMessage::Error(MoveError::OpponentMissing.to_string()),
            )
            .await;
            return;
        }

        match self.game.apply_move(seat, line) {
            Ok(outcome) => {
                self.broadcast(&ServerMessage::Info(format!(
                    "{} played {},{}",
                    outcome.mark, outcome.row, outcome.col
                )))
                .await;
                self.broadcast(&ServerMessage::Board(self.game.board().clone()))
                    .await;

                match outcome.status {
                    RoundStatus::Win => {
                        info!("Player {} wins the round", outcome.mark);
                        self.broadcast(&ServerMessage::Info(format!(
                            "Game over! Player {} wins!",
                            outcome.mark
                        )))
                        .await;
                        self.reset_round();
                    }
                    RoundStatus::Draw => {
                        info!("Round ends in a draw");
                        self.broadcast(&ServerMessage::Info("Game over! It's a draw!".to_string()))
                            .await;
                        self.reset_round();
                    }
                    RoundStatus::NextTurn(next) => {
                        self.broadcast(&ServerMessage::Turn(next)).await;
                    }
                }
            }
            Err(err) => {
                debug!("Rejected move {:?} from seat {}: {}", line, seat, err);
                self.notify(seat, &ServerMessage::Error(err.to_string())).await;
            }
        }
    }

    async fn handle_disconnect(&mut self, conn_id: u32) {
        let Some(seat) = self.seats.seat_of(conn_id) else {
            debug!("Disconnect from unseated connection {}", conn_id);
            return;
        };

        let mark = Mark::for_seat(seat);
        info!("Player {} (connection {}) disconnected", mark, conn_id);
        self.seats.release(seat);

        if self.seats.occupied_count() > 0 {
            self.broadcast(&ServerMessage::Info(format!("Player {} disconnected.", mark)))
                .await;
        }

        self.reset_round();
    }

    /// Ends the round: empty board, turn back to seat 0, both seats freed.
    /// Dropping the seat entries hangs up any connection still open.
    fn reset_round(&mut self) {
        self.game.reset();
        self.seats.clear();
    }

    /// Sends a message to every occupied seat. A failed write is logged and
    /// ignored; the broken connection reports itself as a disconnect.
    async fn broadcast(&mut self, message: &ServerMessage) {
        for seat in 0..SEAT_COUNT {
            self.notify(seat, message).await;
        }
    }

    /// Sends a message to one seat, if occupied.
    async fn notify(&mut self, seat: usize, message: &ServerMessage) {
        if let Some(writer) = self.seats.writer_mut(seat) {
            if let Err(err) = send_line(writer, message).await {
                warn!("Failed to write to seat {}: {}", seat, err);
            }
        }
    }
}

async fn send_line<W>(writer: &mut W, message: &ServerMessage) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = message.encode();
    line.push('\n');
    writer.write_all(line.as_bytes()).await
}

/// Accepts connections forever, giving each a fresh connection id and its
/// own reader task. Accept errors are logged and do not stop the loop.
async fn accept_loop(listener: TcpListener, cmd_tx: mpsc::UnboundedSender<Command>) {
    let mut next_conn_id: u32 = 1;

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let conn_id = next_conn_id;
                next_conn_id += 1;
                info!("Accepted connection {} from {}", conn_id, addr);
                tokio::spawn(handle_connection(conn_id, stream, cmd_tx.clone()));
            }
            Err(err) => {
                warn!("Failed to accept connection: {}", err);
            }
        }
    }
}

/// Per-connection reader task.
///
/// Queues `Connect` and waits for the seat ack; a refused connection is
/// closed here and never produces another command. Afterwards every line
/// read becomes a `Move`, and EOF or a read error becomes exactly one
/// `Disconnect`.
async fn handle_connection(conn_id: u32, stream: TcpStream, cmd_tx: mpsc::UnboundedSender<Command>) {
    let (read_half, write_half) = stream.into_split();

    let (ack_tx, ack_rx) = oneshot::channel();
    if cmd_tx
        .send(Command::Connect {
            conn_id,
            writer: write_half,
            ack: ack_tx,
        })
        .is_err()
    {
        return;
    }

    let seat = match ack_rx.await {
        Ok(Some(seat)) => seat,
        Ok(None) | Err(_) => {
            debug!("Connection {} was not seated, closing", conn_id);
            return;
        }
    };
    debug!("Connection {} reading moves for seat {}", conn_id, seat);

    let mut reader = BufReader::new(read_half);
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {
                let command = Command::Move {
                    conn_id,
                    line: line.trim().to_string(),
                };
                if cmd_tx.send(command).is_err() {
                    return;
                }
            }
            Err(err) => {
                debug!("Read error on connection {}: {}", conn_id, err);
                break;
            }
        }
    }

    let _ = cmd_tx.send(Command::Disconnect { conn_id });
}
