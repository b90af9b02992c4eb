use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewNote, Note, User};
use crate::database::repository::NoteRepository;

/// In-process note repository used by `serve --in-memory` and the test suite.
///
/// Each call takes the lock once, so it interleaves with concurrent callers
/// exactly like separate round trips to a real store would.
#[derive(Default)]
pub struct MemoryNoteRepository {
    notes: RwLock<Vec<Note>>,
    users: RwLock<HashMap<Uuid, User>>,
    offline: AtomicBool,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a note owner
    pub async fn add_user(&self, username: &str) -> User {
        let user = User::new(username);
        self.users.write().await.insert(user.id, user.clone());
        user
    }

    pub async fn remove_user(&self, id: Uuid) -> Option<User> {
        self.users.write().await.remove(&id)
    }

    pub async fn note_count(&self) -> usize {
        self.notes.read().await.len()
    }

    /// Make every call fail as if the store were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    fn ensure_online(&self) -> Result<(), DatabaseError> {
        if self.offline.load(Ordering::Relaxed) {
            return Err(DatabaseError::ConnectionError("memory store offline".to_string()));
        }
        Ok(())
    }

    async fn ensure_user(&self, id: Uuid) -> Result<(), DatabaseError> {
        if self.users.read().await.contains_key(&id) {
            Ok(())
        } else {
            Err(DatabaseError::UnknownUser(id))
        }
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn select_all(&self) -> Result<Vec<Note>, DatabaseError> {
        self.ensure_online()?;
        Ok(self.notes.read().await.clone())
    }

    async fn select_by_id(&self, id: Uuid) -> Result<Option<Note>, DatabaseError> {
        self.ensure_online()?;
        Ok(self.notes.read().await.iter().find(|n| n.id == id).cloned())
    }

    async fn select_by_title(&self, title: &str) -> Result<Option<Note>, DatabaseError> {
        self.ensure_online()?;
        Ok(self
            .notes
            .read()
            .await
            .iter()
            .find(|n| n.title == title)
            .cloned())
    }

    async fn create(&self, note: NewNote) -> Result<Note, DatabaseError> {
        self.ensure_online()?;
        self.ensure_user(note.user).await?;
        let note = Note::from_new(note);
        self.notes.write().await.push(note.clone());
        Ok(note)
    }

    async fn update(&self, note: &Note) -> Result<Note, DatabaseError> {
        self.ensure_online()?;
        self.ensure_user(note.user).await?;
        let mut notes = self.notes.write().await;
        let stored = notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("note {}", note.id)))?;

        stored.user = note.user;
        stored.title = note.title.clone();
        stored.text = note.text.clone();
        stored.completed = note.completed;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.ensure_online()?;
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|n| n.id != id);
        Ok(notes.len() < before)
    }

    async fn select_users(&self, ids: &[Uuid]) -> Result<Vec<User>, DatabaseError> {
        self.ensure_online()?;
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.ensure_online()
    }

    async fn close(&self) {}
}
