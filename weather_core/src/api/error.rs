use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Easy alias for error handling
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can happen while processing requests
#[derive(Debug, Error)]
pub enum Error {
    /// We couldn't parse a URL, for example if the base URL was invalid.
    #[error("URL error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// We couldn't reach the server or couldn't read what it sent back.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server turned the request down and told us why. The message is
    /// meant to be shown to the user as-is.
    #[error("{message}")]
    Rejected {
        /// The status the server responded with
        status: StatusCode,

        /// The server's explanation
        message: String,
    },

    /// The server failed without a readable explanation.
    #[error("Unexpected response from the server: {0}")]
    Unexpected(StatusCode),
}

/// The body the server sends along with every message-bearing response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResp {
    /// Human-readable explanation
    pub message: String,
}
