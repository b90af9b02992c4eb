use axum::extract::State;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};

use super::types::{CreateNoteRequest, MessageResponse};
use super::DUPLICATE_TITLE;

/// POST /notes - Create a note; new notes start with `completed = false`
pub async fn post(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateNoteRequest>,
) -> ApiResult<MessageResponse> {
    let new_note = payload.validate()?;

    if state.notes.select_by_title(&new_note.title).await?.is_some() {
        return Err(ApiError::conflict(DUPLICATE_TITLE));
    }

    let note = state.notes.create(new_note).await?;
    info!(note_id = %note.id, user_id = %note.user, "Note created");

    // The new id is deliberately not part of the response
    Ok(ApiResponse::created(MessageResponse {
        message: "New note created".to_string(),
    }))
}
