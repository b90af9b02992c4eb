// Request and response bodies for /notes, validated before any store access

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{NewNote, Note};
use crate::error::ApiError;

use super::{ALL_FIELDS_REQUIRED, NOTE_ID_REQUIRED};

const FIELD_REQUIRED: &str = "This field is required";

/// POST /notes
#[derive(Debug, Default, Deserialize)]
pub struct CreateNoteRequest {
    pub user: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
}

/// PATCH /notes. `completed` stays untyped so a non-boolean is a validation
/// error rather than a body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub id: Option<String>,
    pub user: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub completed: Option<Value>,
}

/// DELETE /notes
#[derive(Debug, Default, Deserialize)]
pub struct DeleteNoteRequest {
    pub id: Option<String>,
}

/// Validated PATCH input: every mutable field, overwritten wholesale
#[derive(Debug, Clone, PartialEq)]
pub struct NoteUpdate {
    pub id: Uuid,
    pub user: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UpdatedNoteResponse {
    pub message: String,
    pub note: Note,
}

#[derive(Debug, Serialize)]
pub struct DeletedNoteResponse {
    pub message: String,
    pub id: Uuid,
    pub title: String,
}

/// Collects every missing field before failing, so clients see all of them at once
#[derive(Default)]
struct RequiredFields {
    errors: HashMap<String, String>,
}

impl RequiredFields {
    /// Empty strings count as missing
    fn take(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => Some(v),
            None => {
                self.errors.insert(field.to_string(), FIELD_REQUIRED.to_string());
                None
            }
        }
    }

    fn take_bool(&mut self, field: &str, value: Option<Value>) -> Option<bool> {
        match value {
            Some(Value::Bool(b)) => Some(b),
            Some(_) => {
                self.errors.insert(field.to_string(), "Must be a boolean".to_string());
                None
            }
            None => {
                self.errors.insert(field.to_string(), FIELD_REQUIRED.to_string());
                None
            }
        }
    }

    fn into_error(self, message: &str) -> ApiError {
        ApiError::validation_error(message, Some(self.errors))
    }
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(value).map_err(|_| {
        ApiError::invalid_field(
            "Invalid field format",
            field,
            format!("Invalid UUID format: {}", value),
        )
    })
}

impl CreateNoteRequest {
    pub fn validate(self) -> Result<NewNote, ApiError> {
        let mut fields = RequiredFields::default();
        let user = fields.take("user", self.user);
        let title = fields.take("title", self.title);
        let text = fields.take("text", self.text);

        match (user, title, text) {
            (Some(user), Some(title), Some(text)) => Ok(NewNote {
                user: parse_uuid("user", &user)?,
                title,
                text,
            }),
            _ => Err(fields.into_error(ALL_FIELDS_REQUIRED)),
        }
    }
}

impl UpdateNoteRequest {
    pub fn validate(self) -> Result<NoteUpdate, ApiError> {
        let mut fields = RequiredFields::default();
        let id = fields.take("id", self.id);
        let user = fields.take("user", self.user);
        let title = fields.take("title", self.title);
        let text = fields.take("text", self.text);
        let completed = fields.take_bool("completed", self.completed);

        match (id, user, title, text, completed) {
            (Some(id), Some(user), Some(title), Some(text), Some(completed)) => Ok(NoteUpdate {
                id: parse_uuid("id", &id)?,
                user: parse_uuid("user", &user)?,
                title,
                text,
                completed,
            }),
            _ => Err(fields.into_error(ALL_FIELDS_REQUIRED)),
        }
    }
}

impl DeleteNoteRequest {
    pub fn validate(self) -> Result<Uuid, ApiError> {
        let mut fields = RequiredFields::default();
        match fields.take("id", self.id) {
            Some(id) => parse_uuid("id", &id),
            None => Err(fields.into_error(NOTE_ID_REQUIRED)),
        }
    }
}
