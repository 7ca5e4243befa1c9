//! Error types for the rpg-gen server

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rpg_gen_core::{CompileError, LoadError, NotFoundError, ParseError};
use serde::Serialize;
use thiserror::Error;

/// Server error types
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Missing or invalid admin key")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LoadError> for ServerError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Parse(e) => ServerError::Parse(e),
            LoadError::Compile(e) => ServerError::Compile(e),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, "CATEGORY_NOT_FOUND"),
            ServerError::Parse(_) => (StatusCode::BAD_REQUEST, "PARSE_ERROR"),
            ServerError::Compile(_) => (StatusCode::UNPROCESSABLE_ENTITY, "COMPILE_ERROR"),
            ServerError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ServerError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            code: code.to_string(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, header::HeaderValue::from_static("Bearer"));
        }
        response
    }
}
