use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    game::{board::Board, tiles::TileBag},
    websocket::messages::ServerMessage,
};

/// Target rack size; racks are refilled up to the draw taken after a move
pub const RACK_SIZE: usize = 7;
/// Seats in a normal room
pub const ROOM_CAPACITY: usize = 4;
/// Seats in a solo practice room, both held by the same connection
pub const PRACTICE_CAPACITY: usize = 2;

/// One proposed tile placement: a board cell and the letter to put there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub index: usize,
    pub letter: char,
}

/// A seat at the table: a human behind a socket, or a bot
#[derive(Debug)]
pub struct Player {
    /// Per-connection handle; bots carry a generated one of their own
    pub conn_id: Uuid,
    pub name: String,
    pub rack: Vec<char>,
    pub score: i32,
    pub is_bot: bool,
    /// Outbound queue of the owning connection; bots have none
    pub tx: Option<mpsc::Sender<ServerMessage>>,
}

/// Live state of one room. Owned exclusively by the session manager;
/// nothing outside it keeps board or rack state across turns.
#[derive(Debug)]
pub struct Game {
    pub room_key: String,
    pub board: Board,
    pub bag: TileBag,
    pub players: Vec<Player>,
    pub active_player: usize,
    pub first_move: bool,
    pub practice: bool,
    pub last_activity: Instant,
}

impl Game {
    pub fn new(room_key: String, practice: bool) -> Self {
        Self {
            room_key,
            board: Board::new(),
            bag: TileBag::full(),
            players: Vec::new(),
            active_player: 0,
            first_move: true,
            practice,
            last_activity: Instant::now(),
        }
    }

    pub fn capacity(&self) -> usize {
        if self.practice {
            PRACTICE_CAPACITY
        } else {
            ROOM_CAPACITY
        }
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.capacity()
    }

    /// Seat a player with a freshly drawn rack; returns the seat index
    pub fn add_player(
        &mut self,
        conn_id: Uuid,
        name: String,
        tx: Option<mpsc::Sender<ServerMessage>>,
        is_bot: bool,
    ) -> usize {
        let rack = self.bag.draw(RACK_SIZE);
        self.players.push(Player {
            conn_id,
            name,
            rack,
            score: 0,
            is_bot,
            tx,
        });
        self.players.len() - 1
    }

    /// The seat the sender may act from right now: the active seat, if the
    /// sender owns it. Covers the normal turn guard and practice rooms,
    /// where one connection owns both seats and plays whichever is active.
    pub fn active_seat_of(&self, conn_id: Uuid) -> Option<usize> {
        let player = self.players.get(self.active_player)?;
        (!player.is_bot && player.conn_id == conn_id).then_some(self.active_player)
    }

    pub fn active_is_bot(&self) -> bool {
        self.players
            .get(self.active_player)
            .is_some_and(|p| p.is_bot)
    }

    pub fn advance_turn(&mut self) {
        if !self.players.is_empty() {
            self.active_player = (self.active_player + 1) % self.players.len();
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Remove every seat a dropped connection owned, keeping the active
    /// index pointed at the same seat (or its successor when the active
    /// seat itself left). Removed players are handed back so the caller
    /// can return their racks to the bag.
    pub fn remove_conn_seats(&mut self, conn_id: Uuid) -> Vec<Player> {
        let mut removed = Vec::new();
        let mut i = 0;
        while i < self.players.len() {
            if !self.players[i].is_bot && self.players[i].conn_id == conn_id {
                if i < self.active_player {
                    self.active_player -= 1;
                }
                removed.push(self.players.remove(i));
            } else {
                i += 1;
            }
        }
        if self.players.is_empty() {
            self.active_player = 0;
        } else {
            self.active_player %= self.players.len();
        }
        removed
    }

    pub fn humans_remaining(&self) -> usize {
        self.players.iter().filter(|p| !p.is_bot).count()
    }

    /// Tiles anywhere in this room: bag, racks and board. Stays equal to
    /// the full distribution in every reachable state.
    pub fn tile_count(&self) -> usize {
        self.bag.len()
            + self
                .players
                .iter()
                .map(|p| p.rack.len())
                .sum::<usize>()
            + self.board.tile_count()
    }
}
