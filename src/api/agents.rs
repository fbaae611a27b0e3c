//! Agent catalog endpoints
//!
//! GET    /api/v1/agents        - Agents visible to the caller
//! POST   /api/v1/agents        - Create an agent
//! PATCH  /api/v1/agents/:id    - Update an agent (owner or admin)
//! DELETE /api/v1/agents/:id    - Delete an agent (owner or admin)
//! GET    /api/v1/admin/agents  - Every agent with its role bindings (admin)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use colony_store::{AgentDefinition, AgentPatch, AgentWithRoles, NewAgent};
use uuid::Uuid;

use super::{ApiError, ApiResponse, AppState};
use crate::middleware::auth::RequireUser;

async fn list_agents(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AgentDefinition>>>, ApiError> {
    let agents = state.orchestrator.catalog().list_visible(&user).await?;
    Ok(Json(ApiResponse::success(agents)))
}

async fn create_agent(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Json(input): Json<NewAgent>,
) -> Result<(StatusCode, Json<ApiResponse<AgentWithRoles>>), ApiError> {
    let agent = state.orchestrator.catalog().create(input, &user).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(agent))))
}

async fn update_agent(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<AgentPatch>,
) -> Result<Json<ApiResponse<AgentWithRoles>>, ApiError> {
    let agent = state
        .orchestrator
        .catalog()
        .update(id, patch, &user)
        .await?;
    Ok(Json(ApiResponse::success(agent)))
}

async fn delete_agent(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.orchestrator.catalog().delete(id, &user).await?;
    Ok(Json(ApiResponse::success(())))
}

async fn list_all_agents(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AgentWithRoles>>>, ApiError> {
    let agents = state.orchestrator.catalog().list_all(&user).await?;
    Ok(Json(ApiResponse::success(agents)))
}

/// Create agent routes
pub fn agents_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/agents", get(list_agents).post(create_agent))
        .route("/api/v1/agents/:id", patch(update_agent).delete(delete_agent))
        .route("/api/v1/admin/agents", get(list_all_agents))
}
