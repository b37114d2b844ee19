use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use soulverse_shared::errors::AppResult;
use soulverse_shared::types::ApiResponse;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LikeCount {
    pub likes: i64,
}

// --- POST /comment/:id_comment/like/:id_user ---

pub async fn like_comment(
    State(state): State<Arc<AppState>>,
    Path((id_comment, id_user)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<LikeCount>>> {
    let likes = state.profiles.like_comment(&id_comment, &id_user).await?;
    Ok(Json(ApiResponse::ok(LikeCount { likes })))
}

// --- POST /comment/:id_comment/unlike/:id_user ---

pub async fn unlike_comment(
    State(state): State<Arc<AppState>>,
    Path((id_comment, id_user)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<LikeCount>>> {
    let likes = state.profiles.unlike_comment(&id_comment, &id_user).await?;
    Ok(Json(ApiResponse::ok(LikeCount { likes })))
}
