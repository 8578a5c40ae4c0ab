use serde::{Deserialize, Serialize};

/// The request to create a new account.
///
/// Both fields are optional on the wire so that a missing field reaches the
/// server's validation instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Req {
    /// Email to use for login. Compared case-insensitively.
    #[serde(default)]
    pub email: Option<String>,

    /// Plaintext password to use for login.
    #[serde(default)]
    pub password: Option<String>,
}

impl Req {
    /// Construct a request with both fields present
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }
}

/// Result of creating an account.
pub type Resp = super::error::MessageResp;

/// Where the signup endpoint lives.
pub const PATH: &str = "/api/signup";
