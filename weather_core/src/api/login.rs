use serde::{Deserialize, Serialize};

/// The request to log in. Same shape as signup.
pub type Req = super::signup::Req;

/// Result of logging in. There is no token: a successful response only
/// confirms who the caller is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resp {
    /// Human-readable confirmation
    pub message: String,

    /// The account that matched
    pub user: User,
}

/// The public part of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// The normalized (lowercase) email of the account.
    pub email: String,
}

/// Where the login endpoint lives.
pub const PATH: &str = "/api/login";
