use axum::{
    Router,
    extract::Extension,
    routing::{get, post},
};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

mod dto {
    pub mod board_dto;
    pub mod draft_dto;
    pub mod log_dto;
    pub mod summary_dto;
}

mod engine {
    pub mod catalog;
    pub mod clock;
    pub mod resolver;
    pub mod sequence;
    pub mod state;
}

mod routes {
    pub mod draft;
}

mod services {
    pub mod authority;
    pub mod hub;
    pub mod store;
    pub mod websocket;
}

use engine::clock::TURN_SECONDS;
use routes::draft::{
    advance_match, confirm_ban, confirm_pick, create_draft, get_board, get_catalog, get_draft,
    get_log, get_summary, start_draft,
};
use services::authority::{self, TurnSeconds};
use services::hub::DraftHub;
use services::websocket::websocket_handler;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let db_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://./data/draft.db?mode=rwc".to_string());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await
        .expect("Could not connect to SQLite");
    services::store::ensure_schema(&pool)
        .await
        .expect("Could not create tables");

    info!("Connected to sqlite database.");

    let turn_seconds = std::env::var("TURN_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(TURN_SECONDS);

    // Re-open rooms for persisted drafts and restart the turn authority for
    // every series still in progress.
    let hub = DraftHub::new();
    match services::store::load_all(&pool).await {
        Ok(drafts) => {
            for (id, state) in drafts {
                let in_progress = !state.is_draft_complete();
                let (room, created) = hub.open(id, state).await;
                if created && in_progress {
                    authority::spawn(pool.clone(), room, turn_seconds);
                }
            }
        }
        Err(e) => error!("Failed to resume persisted drafts: {e}"),
    }

    let app = Router::new()
        .route("/pokemon", get(get_catalog))
        .route("/drafts", post(create_draft))
        .route("/drafts/{id}", get(get_draft))
        .route("/drafts/{id}/board", get(get_board))
        .route("/drafts/{id}/start", post(start_draft))
        .route("/drafts/{id}/ban", post(confirm_ban))
        .route("/drafts/{id}/pick", post(confirm_pick))
        .route("/drafts/{id}/advance", post(advance_match))
        .route("/drafts/{id}/log", get(get_log))
        .route("/drafts/{id}/summary", get(get_summary))
        .route("/ws/{id}", get(websocket_handler))
        .layer(Extension(pool))
        .layer(Extension(hub))
        .layer(Extension(TurnSeconds(turn_seconds)))
        .layer(CorsLayer::permissive());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Could not bind listener");
    info!("Started server on {bind_addr}.");
    axum::serve(listener, app).await.expect("Server error");
}
