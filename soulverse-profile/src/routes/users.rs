use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use soulverse_shared::errors::AppResult;
use soulverse_shared::middleware::JsonBody;
use soulverse_shared::types::ApiResponse;

use crate::models::{Created, NewUserRequest};
use crate::AppState;

// --- POST /user ---

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<NewUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Created>>)> {
    let id = state.profiles.create_user(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(Created::from(id), "User Created")),
    ))
}
