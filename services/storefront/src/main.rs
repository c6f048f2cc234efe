use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use bloom_storefront::config::StorefrontConfig;
use bloom_storefront::router::build_router;
use bloom_storefront::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    bloom_core::tracing::init_tracing();

    let config = StorefrontConfig::from_env();
    info!(rate_limits = ?config.rate_limits, "configuration loaded");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let http_addr = format!("0.0.0.0:{}", config.port);
    let state = AppState {
        db,
        config: Arc::new(config),
    };

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("storefront service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
