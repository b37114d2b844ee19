use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use soulverse_shared::errors::{AppError, AppResult, ErrorCode};
use soulverse_shared::middleware::{JsonBody, QueryParams};
use soulverse_shared::types::ApiResponse;

use crate::models::{Created, NewProfileRequest, ProfileView};
use crate::render;
use crate::services::profile_service::PROFILE_ID_MISSING;
use crate::services::CommentQuery;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProfilePayload {
    pub profile: ProfileView,
}

// --- GET /:id ---

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    QueryParams(query): QueryParams<CommentQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let found = state.profiles.get_profile_with_comments(&id, &query).await?;
    let profile = ProfileView::from(found);

    if wants_json(&headers) {
        return Ok(Json(ApiResponse::ok(ProfilePayload { profile })).into_response());
    }
    Ok(Html(render::profile_page(&profile)).into_response())
}

// --- GET / ---

pub async fn missing_profile_id() -> AppError {
    AppError::new(ErrorCode::MissingIdentifier, PROFILE_ID_MISSING)
}

// --- POST /profile ---

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<NewProfileRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Created>>)> {
    let id = state.profiles.create_profile(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(Created::from(id), "Profile Created")),
    ))
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}
