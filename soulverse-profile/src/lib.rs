use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod ids;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;

use services::ProfileService;

pub struct AppState {
    pub profiles: ProfileService,
    pub metrics_handle: Option<PrometheusHandle>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/", get(routes::profile::missing_profile_id))
        .route("/profile", post(routes::profile::create_profile))
        .route("/user", post(routes::users::create_user))
        .route("/:id", get(routes::profile::get_profile))
        .route("/:id/addComment", post(routes::comments::add_comment))
        .route("/:id/comments", get(routes::comments::list_user_comments))
        .route("/comment/:id_comment/like/:id_user", post(routes::likes::like_comment))
        .route("/comment/:id_comment/unlike/:id_user", post(routes::likes::unlike_comment))
        .layer(axum::middleware::from_fn(soulverse_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
