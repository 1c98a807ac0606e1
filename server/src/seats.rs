//! Seat bookkeeping for the two player slots.
//!
//! The registry tracks which connection occupies which seat and owns the
//! write half of each seated connection. Seat 0 always plays `X` and seat 1
//! plays `O`; assignment is strictly first-come-first-served. Every entry
//! carries the connection id handed out by the listener, which is how queued
//! commands from a connection that was unseated by an earlier reset are told
//! apart from the current occupant of the same seat.
//!
//! The registry is generic over the writer type so the bookkeeping can be
//! tested without opening sockets; the server instantiates it with
//! `OwnedWriteHalf`.

use log::info;
use shared::{Mark, SEAT_COUNT};
use thiserror::Error;

/// Returned by `assign` when both seats are taken. Hands the writer back to
/// the caller so the refusal can still be written to the connection.
#[derive(Debug, Error)]
#[error("all seats are occupied")]
pub struct SeatsFull<W: std::fmt::Debug>(pub W);

/// One occupied player slot.
#[derive(Debug)]
pub struct Seat<W> {
    conn_id: u32,
    mark: Mark,
    writer: W,
}

impl<W> Seat<W> {
    pub fn conn_id(&self) -> u32 {
        self.conn_id
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }
}

/// Tracks at most two seated connections.
#[derive(Debug)]
pub struct SeatRegistry<W> {
    seats: [Option<Seat<W>>; SEAT_COUNT],
}

impl<W: std::fmt::Debug> SeatRegistry<W> {
    pub fn new() -> Self {
        Self {
            seats: [None, None],
        }
    }

    /// Seats a connection in the lowest free slot.
    ///
    /// The first party gets seat 0 (mark `X`), the second seat 1 (mark `O`).
    /// A third concurrent connection is refused without touching the seated
    /// players.
    pub fn assign(&mut self, conn_id: u32, writer: W) -> Result<usize, SeatsFull<W>> {
        match self.seats.iter().position(Option::is_none) {
            Some(index) => {
                let mark = Mark::for_seat(index);
                info!("Connection {} takes seat {} as {}", conn_id, index, mark);
                self.seats[index] = Some(Seat {
                    conn_id,
                    mark,
                    writer,
                });
                Ok(index)
            }
            None => Err(SeatsFull(writer)),
        }
    }

    /// Clears one seat, returning its entry so the caller can keep or drop
    /// the writer.
    pub fn release(&mut self, index: usize) -> Option<Seat<W>> {
        self.seats.get_mut(index)?.take()
    }

    /// Clears both seats. Dropping the entries closes the write side of any
    /// still-open connection.
    pub fn clear(&mut self) {
        for seat in &mut self.seats {
            *seat = None;
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|seat| seat.is_some()).count()
    }

    /// Resolves a connection id to its seat, if that connection is currently
    /// seated. Commands from stale connections resolve to `None`.
    pub fn seat_of(&self, conn_id: u32) -> Option<usize> {
        self.seats
            .iter()
            .position(|seat| seat.as_ref().is_some_and(|s| s.conn_id == conn_id))
    }

    pub fn mark_of(&self, index: usize) -> Option<Mark> {
        self.seats.get(index)?.as_ref().map(Seat::mark)
    }

    pub fn writer_mut(&mut self, index: usize) -> Option<&mut W> {
        self.seats
            .get_mut(index)?
            .as_mut()
            .map(|seat| &mut seat.writer)
    }
}
