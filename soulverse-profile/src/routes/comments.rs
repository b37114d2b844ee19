use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use soulverse_shared::errors::AppResult;
use soulverse_shared::middleware::JsonBody;
use soulverse_shared::types::ApiResponse;

use crate::models::{CommentView, Created, NewCommentRequest};
use crate::AppState;

// --- POST /:id/addComment ---

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(id_profile): Path<String>,
    JsonBody(req): JsonBody<NewCommentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Created>>)> {
    let id = state.profiles.add_comment(&id_profile, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(Created::from(id), "Comment Created")),
    ))
}

// --- GET /:id/comments ---

#[derive(Debug, Serialize)]
pub struct UserComments {
    pub comments: Vec<CommentView>,
}

pub async fn list_user_comments(
    State(state): State<Arc<AppState>>,
    Path(id_user): Path<String>,
) -> AppResult<Json<ApiResponse<UserComments>>> {
    let comments = state.profiles.list_user_comments(&id_user).await?;
    Ok(Json(ApiResponse::ok(UserComments {
        comments: comments.into_iter().map(CommentView::from).collect(),
    })))
}
