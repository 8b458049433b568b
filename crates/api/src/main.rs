use anyhow::Context;

use stockroom_api::app::{build_app, AppServices};
use stockroom_infra::{AppConfig, DatabaseConfig, store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    stockroom_observability::init(config.log_format);

    if config.database == DatabaseConfig::InMemory {
        tracing::warn!("DATABASE_URL not set; using in-memory store (data is lost on exit)");
    }
    let store = store::open(&config.database)
        .await
        .context("failed to open inventory store")?;

    let app = build_app(AppServices::new(store));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
