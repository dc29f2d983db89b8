//! # Taskboard API Server
//!
//! REST API for the Taskboard multi-user project and kanban task tracker.
//!
//! ## Architecture
//!
//! - Storage: PostgreSQL via sqlx, or an in-memory store (`STORAGE_BACKEND=memory`)
//! - Authentication: Argon2id passwords and HS256 bearer tokens
//! - Authorization: project owner / member checks on every request
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskboard-api
//! ```

use std::sync::Arc;

use anyhow::Context;
use taskboard_api::{
    app::{build_router, AppState},
    config::{Config, StorageBackend},
};
use taskboard_shared::{
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{close_pool, create_pool},
    },
    seed::seed_demo_data,
    store::{memory::MemoryStore, postgres::PgStore, Store},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "taskboard_api=debug,taskboard_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;

    let mut pool: Option<sqlx::PgPool> = None;
    let store: Arc<dyn Store> = match (config.storage, &config.database) {
        (StorageBackend::Postgres, Some(database)) => {
            ensure_database_exists(&database.url)
                .await
                .context("Failed to create database")?;

            let pg = create_pool(&database.url, database.max_connections)
                .await
                .context("Failed to connect to database")?;

            run_migrations(&pg).await.context("Failed to run migrations")?;

            pool = Some(pg.clone());
            Arc::new(PgStore::new(pg))
        }
        (StorageBackend::Postgres, None) => {
            anyhow::bail!("DATABASE_URL is required for the postgres storage backend")
        }
        (StorageBackend::Memory, _) => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    tracing::info!(backend = store.backend_name(), "Storage ready");

    let bind_address = config.bind_address();
    let seed = config.seed_demo_data;
    let state = AppState::new(store, config);

    if seed {
        seed_demo_data(&state.services)
            .await
            .context("Failed to seed demo data")?;
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(pool) = pool {
        close_pool(pool).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler the server would stop at once
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
