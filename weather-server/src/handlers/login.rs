use crate::{auth, error::Error, password::Hasher, store::Store};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use weather_core::api::login::{Req, Resp, User};

static INTERNAL_MESSAGE: &str = "Server error during login.";

static SUCCESS_MESSAGE: &str = "Login successful!";

#[tracing::instrument(skip_all)]
pub async fn handler(
    State(store): State<Store>,
    State(hasher): State<Hasher>,
    req: Result<Json<Req>, JsonRejection>,
) -> Result<Json<Resp>, Error> {
    let Json(req) = req?;

    let email = auth::login(
        &store,
        &hasher,
        req.email.as_deref().unwrap_or_default(),
        req.password.as_deref().unwrap_or_default(),
    )
    .await
    .map_err(|err| Error::from_auth(err, INTERNAL_MESSAGE))?;

    Ok(Json(Resp {
        message: SUCCESS_MESSAGE.to_string(),
        user: User { email },
    }))
}
