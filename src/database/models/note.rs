use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted note. `user` is stored in the `user_id` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by a caller creating a note
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub user: Uuid,
    pub title: String,
    pub text: String,
}

impl Note {
    /// Materialize a new note with a fresh id; new notes start incomplete
    pub fn from_new(new: NewNote) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user: new.user,
            title: new.title,
            text: new.text,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// List output: the note plus its owner's display name
#[derive(Debug, Clone, Serialize)]
pub struct NoteWithUser {
    #[serde(flatten)]
    pub note: Note,
    pub username: Option<String>,
}
