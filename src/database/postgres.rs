use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewNote, Note, User};
use crate::database::repository::NoteRepository;

const NOTE_COLUMNS: &str = "id, user_id, title, text, completed, created_at, updated_at";

/// Tables the API reads and writes. Titles are indexed but not unique.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notes (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users (id),
        title TEXT NOT NULL,
        text TEXT NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS notes_title_idx ON notes (title)",
];

/// PostgreSQL-backed note repository
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `users` and `notes` tables if they are missing
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(DatabaseError::from_sqlx)?;
        }
        info!("Database schema is up to date");
        Ok(())
    }

    /// Register a note owner
    pub async fn add_user(&self, username: &str) -> Result<User, DatabaseError> {
        let user = User::new(username);
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, created_at) VALUES ($1, $2, $3) \
             RETURNING id, username, created_at",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        sqlx::query_as::<_, User>("SELECT id, username, created_at FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn select_all(&self) -> Result<Vec<Note>, DatabaseError> {
        let sql = format!("SELECT {} FROM notes ORDER BY created_at, id", NOTE_COLUMNS);
        sqlx::query_as::<_, Note>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    async fn select_by_id(&self, id: Uuid) -> Result<Option<Note>, DatabaseError> {
        let sql = format!("SELECT {} FROM notes WHERE id = $1", NOTE_COLUMNS);
        sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    async fn select_by_title(&self, title: &str) -> Result<Option<Note>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM notes WHERE title = $1 ORDER BY created_at, id LIMIT 1",
            NOTE_COLUMNS
        );
        sqlx::query_as::<_, Note>(&sql)
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    async fn create(&self, note: NewNote) -> Result<Note, DatabaseError> {
        let note = Note::from_new(note);
        let sql = format!(
            "INSERT INTO notes ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {cols}",
            cols = NOTE_COLUMNS
        );
        sqlx::query_as::<_, Note>(&sql)
            .bind(note.id)
            .bind(note.user)
            .bind(&note.title)
            .bind(&note.text)
            .bind(note.completed)
            .bind(note.created_at)
            .bind(note.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx_for_user(e, note.user))
    }

    async fn update(&self, note: &Note) -> Result<Note, DatabaseError> {
        let sql = format!(
            "UPDATE notes SET user_id = $2, title = $3, text = $4, completed = $5, updated_at = now() \
             WHERE id = $1 RETURNING {}",
            NOTE_COLUMNS
        );
        sqlx::query_as::<_, Note>(&sql)
            .bind(note.id)
            .bind(note.user)
            .bind(&note.title)
            .bind(&note.text)
            .bind(note.completed)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx_for_user(e, note.user))?
            .ok_or_else(|| DatabaseError::NotFound(format!("note {}", note.id)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn select_users(&self, ids: &[Uuid]) -> Result<Vec<User>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        sqlx::query_as::<_, User>("SELECT id, username, created_at FROM users WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
