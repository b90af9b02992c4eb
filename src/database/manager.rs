use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;

/// Errors from the note store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown user: {0}")]
    UnknownUser(Uuid),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Classify a driver error, separating connectivity failures from query failures
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionError(err.to_string())
            }
            other => DatabaseError::Sqlx(other),
        }
    }

    /// Foreign key violations on the owner column mean the user does not exist
    pub fn from_sqlx_for_user(err: sqlx::Error, user: Uuid) -> Self {
        let is_fk_violation = err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code == "23503")
            .unwrap_or(false);
        if is_fk_violation {
            DatabaseError::UnknownUser(user)
        } else {
            Self::from_sqlx(err)
        }
    }
}

/// Builds the process-wide connection pool from configuration
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool against `database.url`
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let target = Self::describe_target(url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        info!("Created database pool for: {}", target);
        Ok(pool)
    }

    /// Host and database name of a connection string, without credentials
    pub fn describe_target(url: &str) -> Result<String, DatabaseError> {
        let url = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }

        let host = url.host_str().unwrap_or("localhost");
        let port = url.port().unwrap_or(5432);
        let database = url.path().trim_start_matches('/');
        Ok(format!("{}:{}/{}", host, port, database))
    }
}
