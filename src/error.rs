use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// ShellError
///
/// Failures surfaced by the shell core and its stores. Gate evaluation never fails;
/// only theme selection, registry construction and store access can.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("unrecognized theme '{0}'")]
    InvalidTheme(String),

    #[error("duplicate navigation path '{0}'")]
    DuplicateNavPath(String),

    #[error("store error: {0}")]
    Store(String),
}

impl IntoResponse for ShellError {
    fn into_response(self) -> Response {
        let status = match &self {
            ShellError::InvalidTheme(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ShellError::DuplicateNavPath(_) | ShellError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
