use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub dictionary_path: String,
    /// Rooms quiet for longer than this are reclaimed by the sweep
    pub idle_timeout_secs: u64,
    /// How often the idle sweep runs
    pub sweep_interval_secs: u64,
    /// Pause before a bot takes its scheduled turn
    pub bot_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a number")?,
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "./public".to_string()),
        };

        let game = GameConfig {
            dictionary_path: env::var("DICTIONARY_PATH")
                .unwrap_or_else(|_| "./dictionary.txt".to_string()),
            idle_timeout_secs: env::var("ROOM_IDLE_TIMEOUT")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .context("ROOM_IDLE_TIMEOUT must be a number of seconds")?,
            sweep_interval_secs: env::var("ROOM_SWEEP_INTERVAL")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("ROOM_SWEEP_INTERVAL must be a number of seconds")?,
            bot_delay_ms: env::var("BOT_TURN_DELAY_MS")
                .unwrap_or_else(|_| "1500".to_string())
                .parse()
                .context("BOT_TURN_DELAY_MS must be a number of milliseconds")?,
        };

        Ok(Config { server, game })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
