use std::sync::Arc;

use titles_etl::{AppState, DEFAULT_LOG_FILTER, build_router, config::Config, db, store::TitleStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::connect_and_migrate(&config.database_url, config.db_max_connections).await?;
    let store = TitleStore::new(db);

    let state = Arc::new(AppState { config: config.clone(), store: store.clone() });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    let served = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    store.close().await?;
    tracing::info!("store connection closed");
    served?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
