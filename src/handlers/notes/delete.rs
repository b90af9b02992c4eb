use axum::extract::State;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};

use super::types::{DeleteNoteRequest, DeletedNoteResponse};
use super::NOTE_NOT_FOUND;

/// DELETE /notes - Permanently remove a note
pub async fn delete(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<DeleteNoteRequest>,
) -> ApiResult<DeletedNoteResponse> {
    let id = payload.validate()?;

    let note = state
        .notes
        .select_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOTE_NOT_FOUND))?;

    // Title and id come from the document read above, not from the delete
    let (id, title) = (note.id, note.title);

    if !state.notes.delete(id).await? {
        return Err(ApiError::not_found(NOTE_NOT_FOUND));
    }
    info!(note_id = %id, "Note deleted");

    Ok(ApiResponse::success(DeletedNoteResponse {
        message: format!("Note '{}' with ID {} deleted", title, id),
        id,
        title,
    }))
}
