use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::ErrorResponse;
use crate::player::PlayerError;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("Session '{0}' not found")]
    SessionNotFound(String),
    #[error("Comment text must not be empty")]
    EmptyComment,
    #[error("Product '{0}' not found")]
    UnknownProduct(String),
    #[error("Option '{0}' has no value '{1}'")]
    UnknownOption(String, String),
    #[error("Player error: {0}")]
    Player(#[from] PlayerError),
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::SessionNotFound(_) => "SessionNotFound",
            SessionError::EmptyComment => "EmptyComment",
            SessionError::UnknownProduct(_) => "UnknownProduct",
            SessionError::UnknownOption(..) => "UnknownOption",
            SessionError::Player(_) => "PlayerError",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            SessionError::SessionNotFound(_) | SessionError::UnknownProduct(_) => {
                StatusCode::NOT_FOUND
            }
            SessionError::EmptyComment
            | SessionError::UnknownOption(..)
            | SessionError::Player(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse::new(self.code(), &self.to_string())),
        )
            .into_response()
    }
}
