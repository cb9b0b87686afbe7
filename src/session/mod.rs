use std::{
    collections::HashSet,
    sync::{Arc, Weak},
    time::{Duration, Instant},
};

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    config::GameConfig,
    dictionary::Dictionary,
    game::{MoveValidator, Scorer},
    models::{Game, Placement},
    websocket::messages::{PlayerInfo, ServerMessage},
};

/// Key of the room joined when no room name is given
pub const DEFAULT_ROOM: &str = "lobby";
/// Allowed characters for practice room codes - excludes I, O, 0, 1 for readability
pub const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
/// Length of generated practice room codes
pub const ROOM_CODE_LENGTH: usize = 6;
/// How many tiles a bot tries to swap on an ordinary turn
pub const BOT_SWAP_COUNT: usize = 3;
/// The scripted icebreaker a bot opens an untouched board with
pub const BOT_OPENING: [(usize, char); 4] = [(112, 'C'), (113, 'H'), (114, 'E'), (115, 'F')];

/// Messages produced while a room guard is held. They are delivered only
/// after the guard is released, so clients never observe uncommitted state.
pub type Outbox = Vec<(mpsc::Sender<ServerMessage>, ServerMessage)>;

/// Send out everything an action produced
pub async fn deliver(outbox: Outbox) {
    for (tx, message) in outbox {
        let _ = tx.send(message).await;
    }
}

/// Generate a short, readable practice room code
fn generate_room_code() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..ROOM_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..ROOM_CODE_CHARSET.len());
            ROOM_CODE_CHARSET[idx] as char
        })
        .collect()
}

fn normalize_room_key(room: &str) -> String {
    let key = room.trim().to_lowercase();
    if key.is_empty() {
        DEFAULT_ROOM.to_string()
    } else {
        key
    }
}

/// Remove `letters` from `rack`, all or nothing. The check runs on a
/// disposable copy; the live rack only changes when every letter is held.
fn remove_letters(rack: &mut Vec<char>, letters: &[char]) -> bool {
    let mut copy = rack.clone();
    for letter in letters {
        match copy.iter().position(|&t| t == *letter) {
            Some(pos) => {
                copy.remove(pos);
            }
            None => return false,
        }
    }
    *rack = copy;
    true
}

/// The orchestrator. Owns every room, keyed by room identifier, and runs
/// each inbound action to completion (validate, score, commit, queue
/// broadcasts) under that room's exclusive map guard. Nothing is awaited
/// while a guard is held.
pub struct SessionManager {
    dictionary: Dictionary,
    rooms: DashMap<String, Game>,
    /// Which room each connection currently sits in
    conn_rooms: DashMap<Uuid, String>,
    bot_delay: Duration,
    idle_timeout: Duration,
    sweep_interval: Duration,
    /// Handle back to the shared self, for spawning bot and sweep tasks
    me: Weak<SessionManager>,
}

impl SessionManager {
    pub fn new(dictionary: Dictionary, config: &GameConfig) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            dictionary,
            rooms: DashMap::new(),
            conn_rooms: DashMap::new(),
            bot_delay: Duration::from_millis(config.bot_delay_ms),
            idle_timeout: Duration::from_secs(config.idle_timeout_secs),
            sweep_interval: Duration::from_secs(config.sweep_interval_secs),
            me: me.clone(),
        })
    }

    /// Join a named room (the lobby when the name is blank). Joining a
    /// new room implicitly leaves the previous one.
    pub fn join_room(
        &self,
        conn_id: Uuid,
        name: String,
        room: String,
        tx: mpsc::Sender<ServerMessage>,
    ) -> Outbox {
        let key = normalize_room_key(&room);
        self.join_seats(conn_id, key, vec![name], false, tx)
    }

    /// Open a fresh practice room in which one connection plays both
    /// seats, alternating with the turn.
    pub fn join_practice(
        &self,
        conn_id: Uuid,
        name: String,
        tx: mpsc::Sender<ServerMessage>,
    ) -> Outbox {
        let key = format!("practice:{}", generate_room_code());
        let second = format!("{} (2)", name);
        self.join_seats(conn_id, key, vec![name, second], true, tx)
    }

    fn join_seats(
        &self,
        conn_id: Uuid,
        key: String,
        names: Vec<String>,
        practice: bool,
        tx: mpsc::Sender<ServerMessage>,
    ) -> Outbox {
        let mut outbox = self.leave(conn_id);
        {
            let mut entry = self.rooms.entry(key.clone()).or_insert_with(|| {
                tracing::info!("Created room {}", key);
                Game::new(key.clone(), practice)
            });
            let game = entry.value_mut();
            if game.players.len() + names.len() > game.capacity() {
                outbox.push((
                    tx,
                    ServerMessage::Error {
                        message: format!("room {} is full", key),
                    },
                ));
                return outbox;
            }
            for name in names {
                let seat = game.add_player(conn_id, name.clone(), Some(tx.clone()), false);
                outbox.push((
                    tx.clone(),
                    ServerMessage::RoomJoined {
                        room: key.clone(),
                        seat,
                    },
                ));
                outbox.push((
                    tx.clone(),
                    ServerMessage::RackUpdate {
                        seat,
                        tiles: game.players[seat].rack.clone(),
                    },
                ));
                Self::push_status(game, &mut outbox, format!("{} joined the game", name));
            }
            game.touch();
            Self::push_snapshot(game, &mut outbox);
        }
        self.conn_rooms.insert(conn_id, key);
        outbox
    }

    /// Seat a bot in the requester's room
    pub fn add_bot(&self, conn_id: Uuid) -> Outbox {
        let Some(key) = self.room_of(conn_id) else {
            return Vec::new();
        };
        let mut outbox = Vec::new();
        if let Some(mut entry) = self.rooms.get_mut(&key) {
            let game = entry.value_mut();
            if game.is_full() {
                if let Some(tx) = Self::sender_of(game, conn_id) {
                    outbox.push((
                        tx,
                        ServerMessage::Error {
                            message: format!("room {} is full", key),
                        },
                    ));
                }
                return outbox;
            }
            let number = game.players.iter().filter(|p| p.is_bot).count() + 1;
            let name = format!("Bot {}", number);
            game.add_player(Uuid::new_v4(), name.clone(), None, true);
            game.touch();
            Self::push_status(game, &mut outbox, format!("{} joined the game", name));
            Self::push_snapshot(game, &mut outbox);
        }
        outbox
    }

    /// Submit a placement for the sender's active seat
    pub fn place_tiles(&self, conn_id: Uuid, placements: Vec<Placement>) -> Outbox {
        let placements: Vec<Placement> = placements
            .into_iter()
            .map(|p| Placement {
                index: p.index,
                letter: p.letter.to_ascii_uppercase(),
            })
            .collect();
        let Some(key) = self.room_of(conn_id) else {
            return Vec::new();
        };
        let mut outbox = Vec::new();
        let mut bot_pending = false;
        if let Some(mut entry) = self.rooms.get_mut(&key) {
            let game = entry.value_mut();
            let Some(seat) = game.active_seat_of(conn_id) else {
                tracing::debug!("Dropping out-of-turn placement in room {}", key);
                return outbox;
            };

            let validator = MoveValidator::new(&self.dictionary);
            if let Err(reason) =
                validator.validate(&game.board, &game.players[seat].rack, &placements, game.first_move)
            {
                if let Some(tx) = &game.players[seat].tx {
                    outbox.push((
                        tx.clone(),
                        ServerMessage::MoveRejected {
                            reason: reason.to_string(),
                        },
                    ));
                }
                return outbox;
            }

            let score = Scorer::score_move(&game.board, &placements);
            for p in &placements {
                game.board.set(p.index, p.letter);
            }
            let letters: Vec<char> = placements.iter().map(|p| p.letter).collect();
            remove_letters(&mut game.players[seat].rack, &letters);
            let drawn = game.bag.draw(placements.len());
            game.players[seat].rack.extend(drawn);
            game.players[seat].score += score;
            game.first_move = false;

            if let Some(tx) = &game.players[seat].tx {
                outbox.push((
                    tx.clone(),
                    ServerMessage::RackUpdate {
                        seat,
                        tiles: game.players[seat].rack.clone(),
                    },
                ));
            }
            let name = game.players[seat].name.clone();
            Self::push_status(game, &mut outbox, format!("{} scored {} points", name, score));
            game.advance_turn();
            game.touch();
            Self::push_snapshot(game, &mut outbox);
            bot_pending = game.active_is_bot();
        }
        if bot_pending {
            self.schedule_bot_turn(key);
        }
        outbox
    }

    /// Exchange rack tiles against the bag; only allowed while the bag
    /// still holds at least as many tiles as are being swapped
    pub fn swap_tiles(&self, conn_id: Uuid, letters: Vec<char>) -> Outbox {
        let letters: Vec<char> = letters.iter().map(|c| c.to_ascii_uppercase()).collect();
        let Some(key) = self.room_of(conn_id) else {
            return Vec::new();
        };
        let mut outbox = Vec::new();
        let mut bot_pending = false;
        if let Some(mut entry) = self.rooms.get_mut(&key) {
            let game = entry.value_mut();
            let Some(seat) = game.active_seat_of(conn_id) else {
                tracing::debug!("Dropping out-of-turn swap in room {}", key);
                return outbox;
            };

            if game.bag.len() < letters.len() {
                if let Some(tx) = &game.players[seat].tx {
                    outbox.push((
                        tx.clone(),
                        ServerMessage::MoveRejected {
                            reason: format!(
                                "the bag only holds {} tiles, cannot swap {}",
                                game.bag.len(),
                                letters.len()
                            ),
                        },
                    ));
                }
                return outbox;
            }
            if !remove_letters(&mut game.players[seat].rack, &letters) {
                if let Some(tx) = &game.players[seat].tx {
                    outbox.push((
                        tx.clone(),
                        ServerMessage::MoveRejected {
                            reason: format!(
                                "you do not hold these tiles: {}",
                                letters.iter().collect::<String>()
                            ),
                        },
                    ));
                }
                return outbox;
            }

            game.bag.return_and_reshuffle(&letters);
            let drawn = game.bag.draw(letters.len());
            game.players[seat].rack.extend(drawn);

            if let Some(tx) = &game.players[seat].tx {
                outbox.push((
                    tx.clone(),
                    ServerMessage::RackUpdate {
                        seat,
                        tiles: game.players[seat].rack.clone(),
                    },
                ));
            }
            let name = game.players[seat].name.clone();
            Self::push_status(
                game,
                &mut outbox,
                format!("{} swapped {} tiles", name, letters.len()),
            );
            game.advance_turn();
            game.touch();
            Self::push_snapshot(game, &mut outbox);
            bot_pending = game.active_is_bot();
        }
        if bot_pending {
            self.schedule_bot_turn(key);
        }
        outbox
    }

    /// Give up the turn without doing anything else
    pub fn pass_turn(&self, conn_id: Uuid) -> Outbox {
        let Some(key) = self.room_of(conn_id) else {
            return Vec::new();
        };
        let mut outbox = Vec::new();
        let mut bot_pending = false;
        if let Some(mut entry) = self.rooms.get_mut(&key) {
            let game = entry.value_mut();
            let Some(seat) = game.active_seat_of(conn_id) else {
                tracing::debug!("Dropping out-of-turn pass in room {}", key);
                return outbox;
            };
            let name = game.players[seat].name.clone();
            Self::push_status(game, &mut outbox, format!("{} passed", name));
            game.advance_turn();
            game.touch();
            Self::push_snapshot(game, &mut outbox);
            bot_pending = game.active_is_bot();
        }
        if bot_pending {
            self.schedule_bot_turn(key);
        }
        outbox
    }

    /// Drop every seat a connection held. Their rack tiles go back into
    /// the bag so the room's tile count stays closed; the room itself is
    /// discarded once no humans remain.
    pub fn leave(&self, conn_id: Uuid) -> Outbox {
        let Some((_, key)) = self.conn_rooms.remove(&conn_id) else {
            return Vec::new();
        };
        let mut outbox = Vec::new();
        let mut drop_room = false;
        let mut bot_pending = false;
        if let Some(mut entry) = self.rooms.get_mut(&key) {
            let game = entry.value_mut();
            let removed = game.remove_conn_seats(conn_id);
            let tiles: Vec<char> = removed.iter().flat_map(|p| p.rack.iter().copied()).collect();
            if !tiles.is_empty() {
                game.bag.return_and_reshuffle(&tiles);
            }
            if game.humans_remaining() == 0 {
                drop_room = true;
            } else {
                for player in &removed {
                    Self::push_status(game, &mut outbox, format!("{} left the game", player.name));
                }
                game.touch();
                Self::push_snapshot(game, &mut outbox);
                bot_pending = game.active_is_bot();
            }
        }
        if drop_room {
            if self.rooms.remove(&key).is_some() {
                tracing::info!("Removed room {} after the last player left", key);
            }
        } else if bot_pending {
            self.schedule_bot_turn(key);
        }
        outbox
    }

    /// Start the periodic sweep that reclaims idle rooms
    pub fn spawn_idle_sweep(&self) {
        let Some(manager) = self.me.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(manager.sweep_interval);
            loop {
                interval.tick().await;
                manager.reclaim_idle_rooms();
            }
        });
    }

    fn reclaim_idle_rooms(&self) {
        let now = Instant::now();
        let expired: Vec<String> = self
            .rooms
            .iter()
            .filter(|room| now.duration_since(room.last_activity) > self.idle_timeout)
            .map(|room| room.key().clone())
            .collect();

        for key in expired {
            if let Some((_, game)) = self.rooms.remove(&key) {
                for player in &game.players {
                    self.conn_rooms
                        .remove_if(&player.conn_id, |_, room| room == &key);
                }
                tracing::info!(
                    "Reclaimed idle room {} ({} players)",
                    key,
                    game.players.len()
                );
            }
        }
    }

    /// Queue a delayed bot turn. The spawned task re-fetches the room on
    /// every firing and keeps playing while consecutive seats are bots;
    /// a room reclaimed in the meantime simply ends the task.
    fn schedule_bot_turn(&self, room_key: String) {
        let Some(manager) = self.me.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(manager.bot_delay).await;
                let Some((outbox, again)) = manager.bot_take_turn(&room_key) else {
                    return;
                };
                deliver(outbox).await;
                if !again {
                    return;
                }
            }
        });
    }

    /// One bot turn: the scripted opener on an untouched board, otherwise
    /// swap a few tiles while the bag allows it, otherwise pass. Returns
    /// None when the room no longer exists.
    fn bot_take_turn(&self, room_key: &str) -> Option<(Outbox, bool)> {
        let mut entry = self.rooms.get_mut(room_key)?;
        let game = entry.value_mut();
        let seat = game.active_player;
        if !game.players.get(seat).is_some_and(|p| p.is_bot) {
            // The roster changed while the turn was pending
            return Some((Vec::new(), false));
        }

        let mut outbox = Vec::new();
        let name = game.players[seat].name.clone();
        if game.first_move {
            let placements: Vec<Placement> = BOT_OPENING
                .iter()
                .map(|&(index, letter)| Placement { index, letter })
                .collect();
            let score = Scorer::score_move(&game.board, &placements);
            for p in &placements {
                game.board.set(p.index, p.letter);
            }
            // The icebreaker ignores the real rack: as many tiles as were
            // placed are discarded and redrawn. The discards stay out of
            // the bag; the board gained exactly that many tiles.
            let discard = placements.len().min(game.players[seat].rack.len());
            game.players[seat].rack.drain(..discard);
            let drawn = game.bag.draw(discard);
            game.players[seat].rack.extend(drawn);
            game.players[seat].score += score;
            game.first_move = false;
            Self::push_status(game, &mut outbox, format!("{} scored {} points", name, score));
        } else {
            let count = BOT_SWAP_COUNT.min(game.players[seat].rack.len());
            if count > 0 && game.bag.len() >= count {
                let letters: Vec<char> = game.players[seat].rack[..count].to_vec();
                game.players[seat].rack.drain(..count);
                game.bag.return_and_reshuffle(&letters);
                let drawn = game.bag.draw(count);
                game.players[seat].rack.extend(drawn);
                Self::push_status(game, &mut outbox, format!("{} swapped {} tiles", name, count));
            } else {
                Self::push_status(game, &mut outbox, format!("{} passed", name));
            }
        }
        game.advance_turn();
        game.touch();
        Self::push_snapshot(game, &mut outbox);
        Some((outbox, game.active_is_bot()))
    }

    /// Room listing for the HTTP API
    pub fn room_summaries(&self) -> Vec<(String, usize, usize)> {
        self.rooms
            .iter()
            .map(|room| (room.key().clone(), room.players.len(), room.bag.len()))
            .collect()
    }

    fn room_of(&self, conn_id: Uuid) -> Option<String> {
        self.conn_rooms.get(&conn_id).map(|room| room.value().clone())
    }

    fn sender_of(game: &Game, conn_id: Uuid) -> Option<mpsc::Sender<ServerMessage>> {
        game.players
            .iter()
            .find(|p| !p.is_bot && p.conn_id == conn_id)
            .and_then(|p| p.tx.clone())
    }

    fn push_snapshot(game: &Game, outbox: &mut Outbox) {
        let snapshot = ServerMessage::GameState {
            room: game.room_key.clone(),
            board: game.board.cells().to_vec(),
            players: game.players.iter().map(PlayerInfo::from).collect(),
            active_player: game.active_player,
            tiles_remaining: game.bag.len(),
        };
        Self::broadcast(game, snapshot, outbox);
    }

    fn push_status(game: &Game, outbox: &mut Outbox, message: String) {
        Self::broadcast(game, ServerMessage::Status { message }, outbox);
    }

    /// Queue a message for every connection in the room once, even when a
    /// connection owns several seats
    fn broadcast(game: &Game, message: ServerMessage, outbox: &mut Outbox) {
        let mut seen = HashSet::new();
        for player in &game.players {
            if let Some(tx) = &player.tx {
                if seen.insert(player.conn_id) {
                    outbox.push((tx.clone(), message.clone()));
                }
            }
        }
    }
}
