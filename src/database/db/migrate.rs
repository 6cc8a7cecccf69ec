use anyhow::Context;
use sqlx::{migrate::Migrator, Pool, Sqlite};
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies pending migrations. Safe to call on every start.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> anyhow::Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .context("failed to apply migrations")?;
    info!(known = MIGRATOR.iter().count(), "schema up to date");
    Ok(())
}
