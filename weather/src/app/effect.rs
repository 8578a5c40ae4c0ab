use super::Action;
use crate::config::Config;
use weather_core::{
    api::{login, signup, Client},
    weather::{self, Provider, Query},
};

/// Connections to external services that effect use. We keep these around to
/// have some level of connection sharing for the app as a whole.
pub struct EffectContext {
    /// an HTTP client with reqwest
    http: reqwest::Client,
}

impl EffectContext {
    /// Get a new `EffectContext`
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

/// Things that can happen as a result of user input. Side effects!
#[derive(Debug, PartialEq)]
pub enum Effect {
    /// Create a new account on the server
    SignUp(Client, signup::Req),

    /// Check credentials for an existing account
    LogIn(Client, login::Req),

    /// Ask for our location
    Locate {
        /// Handed back in `Action::Located`
        generation: u64,
    },

    /// Look up current conditions
    FetchWeather {
        /// Handed back in `Action::GotWeather`
        generation: u64,

        /// Who to ask
        provider: Provider,

        /// What to ask about
        query: Query,
    },
}

impl Effect {
    /// Perform the side-effectful portions of this effect, returning the next
    /// `Action` the application needs to handle. Failures are part of the
    /// returned action; nothing here is fatal.
    pub async fn run(self, conn: &EffectContext, config: &Config) -> Action {
        match self {
            Self::SignUp(client, req) => {
                tracing::info!("signing up");

                let resp = client.signup(&conn.http, &req).await;
                if let Err(err) = &resp {
                    tracing::error!(?err, "signup failed");
                }

                Action::SignedUp(resp)
            }

            Self::LogIn(client, req) => {
                tracing::info!("logging in");

                let resp = client.login(&conn.http, &req).await;
                if let Err(err) = &resp {
                    tracing::error!(?err, "login failed");
                }

                Action::LoggedIn(resp)
            }

            Self::Locate { generation } => {
                let coordinates = config.location();
                tracing::debug!(?coordinates, "located");

                Action::Located {
                    generation,
                    coordinates,
                }
            }

            Self::FetchWeather {
                generation,
                provider,
                query,
            } => {
                tracing::info!(?query, "fetching weather");

                Action::GotWeather {
                    generation,
                    result: weather::fetch(&conn.http, &provider, &query).await,
                }
            }
        }
    }
}
