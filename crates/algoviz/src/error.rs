//! Error types for the trace server.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// A specialized `Result` type for trace server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur within the `algoviz` crate.
#[derive(Error, Debug)]
pub enum Error {
    /// A caller error reported by one of the algorithm engines.
    #[error("Engine error: {0}")]
    Engine(#[from] algoviz_core::Error),

    /// The request body was not JSON of the expected shape.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    /// An error related to the web server (e.g., a failed engine task).
    #[error("Server error: {0}")]
    Server(String),

    /// An error from the underlying I/O system (binding, accepting).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error related to the server's configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// JSON body sent for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl Error {
    /// Returns the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Engine(_) => StatusCode::BAD_REQUEST,
            Error::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Error::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to API callers. Engine messages are passed through
    /// unprefixed.
    pub fn client_message(&self) -> String {
        match self {
            Error::Engine(e) => e.to_string(),
            Error::InvalidBody(rejection) => rejection.body_text(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("request failed: {}", self);
        } else {
            log::debug!("rejected request: {}", self);
        }

        let body = ErrorResponse {
            error: self.client_message(),
        };
        (status, axum::Json(body)).into_response()
    }
}
