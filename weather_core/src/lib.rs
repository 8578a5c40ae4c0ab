//! Common code shared between the weather-auth server and its clients

/// Talk to the account API (signup and login.)
pub mod api;

/// Look up current conditions from the weather provider.
pub mod weather;
pub use weather::Conditions;
