use actix::Actor;
use actix_web::{web, App, HttpServer};
use log::info;

// Pure board logic
mod game;
// Gateway to the external win store
mod leaderboard;
// Wire protocol and session data
mod models;
// HTTP routes
mod routes;
// Process-wide shared state
mod state;
// Per-connection actors
mod websocket;

use crate::leaderboard::LeaderboardStore;
use crate::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse::<u16>().ok())
        .unwrap_or(3000);
    let store_path =
        std::env::var("LEADERBOARD_PATH").unwrap_or_else(|_| "leaderboard.json".to_string());

    // The win store runs as its own actor so game handlers never block on it
    let leaderboard = LeaderboardStore::load(store_path).start();
    let app_state = web::Data::new(AppState::new(leaderboard));

    info!("Server started on port {}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure_routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
