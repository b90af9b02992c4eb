use axum::extract::State;
use tracing::info;

use crate::app::AppState;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};

use super::types::{UpdateNoteRequest, UpdatedNoteResponse};
use super::{DUPLICATE_TITLE, NOTE_NOT_FOUND};

/// PATCH /notes - Overwrite every mutable field of an existing note
pub async fn patch(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<UpdateNoteRequest>,
) -> ApiResult<UpdatedNoteResponse> {
    let input = payload.validate()?;

    let mut note = state
        .notes
        .select_by_id(input.id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOTE_NOT_FOUND))?;

    // Keeping its own title is not a duplicate
    if let Some(existing) = state.notes.select_by_title(&input.title).await? {
        if existing.id != input.id {
            return Err(ApiError::conflict(DUPLICATE_TITLE));
        }
    }

    note.user = input.user;
    note.title = input.title;
    note.text = input.text;
    note.completed = input.completed;

    let updated = state.notes.update(&note).await.map_err(|err| match err {
        DatabaseError::NotFound(_) => ApiError::not_found(NOTE_NOT_FOUND),
        other => other.into(),
    })?;
    info!(note_id = %updated.id, "Note updated");

    Ok(ApiResponse::success(UpdatedNoteResponse {
        message: format!("Note '{}' updated", updated.title),
        note: updated,
    }))
}
