use titles_etl::{DEFAULT_LOG_FILTER, config::Config, current_year, db, loader, store::TitleStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        )
        .init();

    let config = Config::from_env()?;
    let options = config.load_options(current_year());

    let db = db::connect_and_migrate(&config.database_url, config.db_max_connections).await?;
    let store = TitleStore::new(db);

    let outcome = loader::load_csv(&store, &config.csv_path, &options).await;

    if let Err(err) = store.close().await {
        tracing::warn!(error = %err, "failed to close store connection");
    }

    match outcome {
        Ok(report) => {
            tracing::info!(inserted = report.inserted, rejected = report.rejected, "load finished");
            Ok(())
        },
        Err(err) => {
            tracing::error!(error = %err, "load failed");
            Err(err.into())
        },
    }
}
