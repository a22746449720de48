pub mod health;
pub mod resume;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resume/upload", post(resume::handle_upload))
        .route("/api/v1/resume/enhance", post(resume::handle_enhance))
        .route("/api/v1/resume/download", post(resume::handle_download))
        .with_state(state)
}
