use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewNote, Note, User};

/// Access to the note collection and the (read-only) user collection.
///
/// Every method is one independent round trip; nothing here spans calls, so
/// handlers that check and then write are not atomic.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Short name of the backing store, reported by `/health`
    fn backend_tag(&self) -> &'static str;

    /// All notes, oldest first
    async fn select_all(&self) -> Result<Vec<Note>, DatabaseError>;

    async fn select_by_id(&self, id: Uuid) -> Result<Option<Note>, DatabaseError>;

    /// Exact, case-sensitive title match. Returns the oldest match if several exist.
    async fn select_by_title(&self, title: &str) -> Result<Option<Note>, DatabaseError>;

    /// Insert a new note. Fails with `UnknownUser` if the owner does not exist.
    async fn create(&self, note: NewNote) -> Result<Note, DatabaseError>;

    /// Overwrite every mutable field of an existing note and bump `updated_at`.
    /// Fails with `NotFound` if the note disappeared.
    async fn update(&self, note: &Note) -> Result<Note, DatabaseError>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;

    /// Users matching any of `ids`; unknown ids are skipped
    async fn select_users(&self, ids: &[Uuid]) -> Result<Vec<User>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Release the underlying connections
    async fn close(&self);
}
