use crate::auth::AuthError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use weather_core::api::error::MessageResp;

/// An error from the API
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Something went wrong which we should log but not expose to clients.
    /// Carries the generic message the endpoint shows instead.
    Internal(&'static str),

    /// Some handler-specific error
    Custom(StatusCode, String),
}

impl Error {
    /// Construct a custom error
    pub fn custom(message: &str) -> Self {
        Self::custom_with_status(message, StatusCode::BAD_REQUEST)
    }

    /// Construct a custom error with a specific status code
    pub fn custom_with_status(message: &str, status: StatusCode) -> Self {
        Self::Custom(status, message.to_string())
    }

    /// Convert an auth failure, using `internal_message` in place of any
    /// internal details.
    pub fn from_auth(err: AuthError, internal_message: &'static str) -> Self {
        match err {
            AuthError::Internal => Self::Internal(internal_message),
            err => Self::custom(&err.to_string()),
        }
    }

    /// Unwrap a handler-specific error
    #[cfg(test)]
    pub fn unwrap_custom(self) -> (StatusCode, String) {
        match self {
            Self::Custom(status_code, message) => (status_code, message),
            Self::Internal(_) => panic!("called `Error::unwrap_custom` on an `Internal`"),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(err: JsonRejection) -> Self {
        tracing::debug!(?err, "rejected request body");

        match err {
            // No JSON at all reads as a form with nothing filled in.
            JsonRejection::MissingJsonContentType(_) => {
                Self::custom(&AuthError::Validation.to_string())
            }
            _ => Self::custom("Malformed request body."),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message.to_string()),
            Self::Custom(status_code, message) => (status_code, message),
        };

        (status, Json(MessageResp { message })).into_response()
    }
}
