//! # Subscriptions API Server
//!
//! ```text
//! config ─► telemetry ─► store (ping, schema) ─► bind ─► serve ─► close
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use subscriptions_api::config::{AppConfig, Backend};
use subscriptions_api::server::{self, shutdown_signal};
use subscriptions_api::{telemetry, AppState, Subscriptions};
use subscriptions_core::SubscriptionRepository;
use subscriptions_db::{Database, MemorySubscriptionRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    telemetry::init(config.app.production);

    info!(
        production = config.app.production,
        backend = ?config.database.backend,
        "Starting subscriptions service"
    );

    // Storage
    let (repository, database): (Arc<dyn SubscriptionRepository>, Option<Database>) =
        match config.database.backend {
            Backend::Postgres => {
                let db = Database::connect(config.database.db_config())
                    .await
                    .context("configuring database pool")?;
                db.ping().await.context("database is unreachable")?;
                db.ensure_schema().await.context("creating subscriptions table")?;
                info!(table = %db.table(), "Connected to PostgreSQL");

                (Arc::new(db.subscriptions()), Some(db))
            }
            Backend::Memory => {
                info!("Using in-memory store; data is lost on exit");
                (Arc::new(MemorySubscriptionRepository::new()), None)
            }
        };

    let state = AppState::new(Arc::new(Subscriptions::new(repository)));
    let app = server::app(state, &config.server.cors).context("building router")?;

    // Listener
    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Listening");

    server::serve(listener, app, config.server.shutdown_timeout(), shutdown_signal())
        .await
        .context("serving HTTP")?;

    if let Some(db) = database {
        db.close().await;
    }

    info!("Server shutdown complete");
    Ok(())
}
