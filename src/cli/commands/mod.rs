pub mod migrate;
pub mod serve;
pub mod user;

use anyhow::Context;

use crate::config;
use crate::database::{DatabaseManager, PgNoteRepository};

/// Connect to the configured PostgreSQL store
pub(crate) async fn connect_postgres() -> anyhow::Result<PgNoteRepository> {
    let pool = DatabaseManager::connect(&config::config().database)
        .await
        .context("failed to connect to database")?;
    Ok(PgNoteRepository::new(pool))
}
