//! # Outlay API Server
//!
//! Record-management service for expenses grouped under projects, with
//! users, categories, and per-project membership, backed by MongoDB.
//!
//! ## Usage
//!
//! ```bash
//! MONGO_URI=mongodb://localhost:27017 MONGO_DB=outlay cargo run -p outlay-api
//! ```

use outlay_api::app::{build_router, AppState};
use outlay_api::config::Config;
use outlay_shared::db::ConnectionManager;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outlay_api=info,outlay_shared=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Outlay API server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    // Establish the single shared connection up front: a store that is not
    // reachable is fatal before we accept the first request.
    let manager = ConnectionManager::new(config.store_config());
    let db = manager
        .database()
        .await
        .map_err(|err| anyhow::anyhow!("store unavailable at startup: {err}"))?;

    let addr = config.bind_address();
    let state = AppState::new(db, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received, exiting...");
        })
        .await?;

    Ok(())
}
