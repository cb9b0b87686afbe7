use serde::{Deserialize, Serialize};

use crate::models::{Placement, Player};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join a named room; a blank name lands in the lobby
    JoinRoom { room: String, name: String },
    /// Open a private practice room and play both seats
    JoinPractice { name: String },
    /// Seat a bot in the current room
    AddBot,
    /// Submit a placement for the current turn
    PlaceTiles { tiles: Vec<Placement> },
    /// Exchange rack tiles against the bag
    SwapTiles { letters: Vec<char> },
    /// Give up the turn
    PassTurn,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Private seat assignment after a join
    RoomJoined { room: String, seat: usize },
    /// Room-wide snapshot of committed game state
    GameState {
        room: String,
        board: Vec<Option<char>>,
        players: Vec<PlayerInfo>,
        active_player: usize,
        tiles_remaining: usize,
    },
    /// Private view of one rack
    RackUpdate { seat: usize, tiles: Vec<char> },
    /// Private rejection of a place or swap, with the reason shown as-is
    MoveRejected { reason: String },
    /// Room-wide one-liner ("Anna scored 22 points")
    Status { message: String },
    /// Private failure unrelated to a move (bad payload, full room)
    Error { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub score: i32,
    pub is_bot: bool,
}

impl From<&Player> for PlayerInfo {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            score: player.score,
            is_bot: player.is_bot,
        }
    }
}
