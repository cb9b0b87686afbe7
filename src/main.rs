mod config;
mod dictionary;
mod game;
mod models;
mod routes;
mod session;
mod utils;
mod websocket;

use std::sync::Arc;

use anyhow::Result;
use axum::{routing::get, Router};
use config::Config;
use dictionary::Dictionary;
use session::SessionManager;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub sessions: Arc<SessionManager>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "word_duel_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Word Duel backend server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Load dictionary; the game stays playable without a word list file
    let dictionary = match Dictionary::load(&config.game.dictionary_path).await {
        Ok(dict) => dict,
        Err(e) => {
            tracing::warn!(
                "Failed to load word list from {}: {}. Falling back to the built-in word set.",
                config.game.dictionary_path,
                e
            );
            Dictionary::fallback()
        }
    };

    // Create the session manager and start the idle-room sweep
    let sessions = SessionManager::new(dictionary, &config.game);
    sessions.spawn_idle_sweep();

    // Create application state
    let state = Arc::new(AppState {
        config: config.clone(),
        sessions,
    });

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Serve the game frontend
    let frontend_service = ServeDir::new(&config.server.static_dir);

    // Build router
    let app = Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket::handle_websocket))
        // API routes
        .merge(routes::create_routes())
        // Serve static assets at root
        .fallback_service(frontend_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Game frontend: http://{}/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
