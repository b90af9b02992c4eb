use axum::extract::State;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::NoteWithUser;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

use super::NO_NOTES_FOUND;

/// GET /notes - All notes, each with its owner's username
pub async fn get(State(state): State<AppState>) -> ApiResult<Vec<NoteWithUser>> {
    let notes = state.notes.select_all().await?;

    if notes.is_empty() && state.config.notes.empty_list_is_error {
        return Err(ApiError::empty_result(NO_NOTES_FOUND));
    }

    // One lookup for all distinct owners instead of one per note
    let mut owner_ids: Vec<Uuid> = notes.iter().map(|note| note.user).collect();
    owner_ids.sort_unstable();
    owner_ids.dedup();

    let usernames: HashMap<Uuid, String> = state
        .notes
        .select_users(&owner_ids)
        .await?
        .into_iter()
        .map(|user| (user.id, user.username))
        .collect();

    let data = notes
        .into_iter()
        .map(|note| {
            let username = usernames.get(&note.user).cloned();
            if username.is_none() {
                warn!(note_id = %note.id, user_id = %note.user, "Note owner not found");
            }
            NoteWithUser { note, username }
        })
        .collect();

    Ok(ApiResponse::success(data))
}
