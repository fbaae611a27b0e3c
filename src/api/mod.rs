//! Web API module for Colony
//!
//! Provides REST API endpoints for:
//! - Conversational turns and thread management
//! - Agent catalog management
//! - Health checks

pub mod agents;
pub mod chat;
pub mod health;


use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use colony_core::TurnOrchestrator;
use colony_store::Database;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

pub use agents::agents_routes;
pub use chat::chat_routes;
pub use health::health_routes;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<TurnOrchestrator>,
    pub db: Database,
}

impl AppState {
    pub fn new(orchestrator: Arc<TurnOrchestrator>, db: Database) -> Self {
        Self { orchestrator, db }
    }
}

/// JSON envelope for management routes
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Handler error carrying its HTTP status
#[derive(Debug)]
pub struct ApiError(pub colony_core::Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use colony_core::Error;
        match self.0 {
            Error::Unauthorized(_) => StatusCode::FORBIDDEN,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<colony_core::Error> for ApiError {
    fn from(e: colony_core::Error) -> Self {
        Self(e)
    }
}

impl From<colony_store::Error> for ApiError {
    fn from(e: colony_store::Error) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self.0, "Request failed");
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

/// Create the API router with all endpoints
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(chat_routes())
        .merge(agents_routes())
        .with_state(state)
}
