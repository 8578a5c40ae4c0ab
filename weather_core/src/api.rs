/// Things that can go wrong in the API
pub mod error;
pub use error::Error;

/// Create a new account
pub mod signup;

/// Check credentials for an existing account
pub mod login;

/// Client for the account API
pub mod client;
pub use client::Client;
