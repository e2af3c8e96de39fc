//! Student records server: loads config from env (and `.env`), prepares the store, serves HTTP.

use std::sync::Arc;
use student_records::{
    build_app, ensure_database_exists, ensure_students_collection, init_tracing, AppState, MemoryStore,
    PgDocumentStore, ServiceConfig, StoreKind, StudentStore,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServiceConfig::from_env()?;
    let store: Arc<dyn StudentStore> = match config.store {
        StoreKind::Postgres => {
            let opts = config.database.connect_options()?;
            ensure_database_exists(&opts).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect_with(opts)
                .await?;
            ensure_students_collection(&pool, &config.database.schema).await?;
            tracing::info!(schema = %config.database.schema, "using postgres student store");
            Arc::new(PgDocumentStore::new(pool, &config.database.schema))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory student store; records are lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, config.patch_policy);
    let app = build_app(state, &config);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(policy = ?config.patch_policy, "listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
