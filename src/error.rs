use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Errors raised by HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.message()
            }
        });
        (status, Json(body)).into_response()
    }
}

/// Why a gateway request failed authentication.
///
/// Clients never see the variant: both are reported as a `false` status or
/// a silently dropped frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// A session exists but the presented token does not match it.
    AuthFailure,
    /// No session is registered for the connection.
    UnknownConnection,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AuthFailure => write!(f, "token does not match session"),
            SessionError::UnknownConnection => write!(f, "no session for connection"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Failure loading a content filter table.
#[derive(Debug)]
pub enum FilterError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// Entry at the given index has an empty pattern.
    EmptyPattern(usize),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Io(e) => write!(f, "failed to read filter table: {e}"),
            FilterError::Parse(e) => write!(f, "invalid filter table: {e}"),
            FilterError::EmptyPattern(idx) => {
                write!(f, "filter table entry {idx} has an empty pattern")
            }
        }
    }
}

impl std::error::Error for FilterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FilterError::Io(e) => Some(e),
            FilterError::Parse(e) => Some(e),
            FilterError::EmptyPattern(_) => None,
        }
    }
}

impl From<std::io::Error> for FilterError {
    fn from(e: std::io::Error) -> Self {
        FilterError::Io(e)
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(e: serde_json::Error) -> Self {
        FilterError::Parse(e)
    }
}
