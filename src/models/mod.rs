pub mod game;

pub use game::{Game, Placement, Player, PRACTICE_CAPACITY, RACK_SIZE, ROOM_CAPACITY};
