use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::ErrorResponse,
    session::{ClientCommand, SessionError, SessionManager},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedSession {
    pub session_id: Uuid,
}

/// POST /api/sessions
pub async fn create_session(State(manager): State<Arc<SessionManager>>) -> impl IntoResponse {
    match manager.create_session().await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(CreatedSession {
                session_id: session.id(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create session");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("InternalError", &e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /api/sessions
pub async fn list_sessions(State(manager): State<Arc<SessionManager>>) -> impl IntoResponse {
    Json(manager.list_sessions().await)
}

/// GET /api/sessions/:session_id
pub async fn get_session(
    State(manager): State<Arc<SessionManager>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, SessionError> {
    Ok(Json(manager.snapshot(&session_id).await?))
}

/// DELETE /api/sessions/:session_id
pub async fn delete_session(
    State(manager): State<Arc<SessionManager>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, SessionError> {
    if manager.remove_session(&session_id).await {
        Ok(Json(serde_json::json!({ "success": true })))
    } else {
        Err(SessionError::SessionNotFound(session_id.to_string()))
    }
}

/// POST /api/sessions/:session_id/commands
/// Applies one command and returns the resulting snapshot.
pub async fn post_command(
    State(manager): State<Arc<SessionManager>>,
    Path(session_id): Path<Uuid>,
    Json(command): Json<ClientCommand>,
) -> Result<impl IntoResponse, SessionError> {
    manager.handle_command(&session_id, command).await?;
    Ok(Json(manager.snapshot(&session_id).await?))
}
