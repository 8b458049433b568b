//! Populate the configured store with the demo dataset.
//!
//! Refuses to run against a store that already has data.

use anyhow::Context;
use chrono::Utc;

use stockroom_infra::{AppConfig, DatabaseConfig, seed, store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    stockroom_observability::init(config.log_format);

    if config.database == DatabaseConfig::InMemory {
        anyhow::bail!("DATABASE_URL must point at a sqlite database; seeding an in-memory store is pointless");
    }

    let store = store::open(&config.database)
        .await
        .context("failed to open inventory store")?;

    let summary = seed::seed_store(store.as_ref(), Utc::now())
        .await
        .context("seeding failed")?;

    println!(
        "Seeded {} products, {} locations, {} movements.",
        summary.products, summary.locations, summary.movements
    );
    Ok(())
}
