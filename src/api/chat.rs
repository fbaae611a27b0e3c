//! Chat API endpoints
//!
//! POST   /api/v1/chat/ask          - Run one conversational turn
//! GET    /api/v1/chat/threads      - List the caller's threads
//! GET    /api/v1/chat/threads/:id  - Thread with its messages
//! PATCH  /api/v1/chat/threads/:id  - Rename a thread
//! DELETE /api/v1/chat/threads/:id  - Delete a thread and its messages

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use colony_core::{TurnRequest, TurnResponse};
use colony_store::{Thread, ThreadWithMessages};
use serde::Deserialize;

use super::{ApiError, ApiResponse, AppState};
use crate::middleware::auth::RequireUser;

/// Request to rename a thread
#[derive(Debug, Deserialize)]
pub struct RenameThreadRequest {
    pub title: String,
}

/// Run one turn. The body is returned as-is, without the envelope.
async fn ask(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let response = state.orchestrator.run_turn(&user, request).await?;
    Ok(Json(response))
}

async fn list_threads(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Thread>>>, ApiError> {
    let threads = state
        .orchestrator
        .conversations()
        .list_threads(&user.id)
        .await?;
    Ok(Json(ApiResponse::success(threads)))
}

async fn get_thread(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ThreadWithMessages>>, ApiError> {
    let thread = state
        .orchestrator
        .conversations()
        .get_thread(&id, &user.id)
        .await?;
    Ok(Json(ApiResponse::success(thread)))
}

async fn rename_thread(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenameThreadRequest>,
) -> Result<Json<ApiResponse<Thread>>, ApiError> {
    let thread = state
        .orchestrator
        .conversations()
        .rename_thread(&id, &user.id, &request.title)
        .await?;
    Ok(Json(ApiResponse::success(thread)))
}

async fn delete_thread(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .orchestrator
        .conversations()
        .delete_thread(&id, &user.id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}

/// Create chat routes
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/chat/ask", post(ask))
        .route("/api/v1/chat/threads", get(list_threads))
        .route(
            "/api/v1/chat/threads/:id",
            get(get_thread).patch(rename_thread).delete(delete_thread),
        )
}
