pub mod config;
pub mod error;
pub mod format;
pub mod handlers;
pub mod models;
pub mod nights;
pub mod slots;
pub mod summary;

use axum::{
    Router,
    routing::{get, post},
};
use config::Config;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,poker_nights=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/hours", get(handlers::get_hours))
        .route("/api/slots", post(handlers::generate_slots_handler))
        .route("/api/nights", post(handlers::group_nights_handler))
        .route("/api/summary", post(handlers::summary_handler))
        .layer(TraceLayer::new_for_http())
}

pub async fn run() -> std::io::Result<()> {
    init_logging();
    let config = Config::from_env();

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    info!("listening on {}", config.addr());
    axum::serve(listener, create_router()).await
}
