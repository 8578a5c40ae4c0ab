use crate::{auth, error::Error, password::Hasher, store::Store};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use weather_core::api::signup::{Req, Resp};

static INTERNAL_MESSAGE: &str = "Server error during signup.";

#[tracing::instrument(skip_all)]
pub async fn handler(
    State(store): State<Store>,
    State(hasher): State<Hasher>,
    req: Result<Json<Req>, JsonRejection>,
) -> Result<(StatusCode, Json<Resp>), Error> {
    let Json(req) = req?;

    let message = auth::signup(
        &store,
        &hasher,
        req.email.as_deref().unwrap_or_default(),
        req.password.as_deref().unwrap_or_default(),
    )
    .await
    .map_err(|err| Error::from_auth(err, INTERNAL_MESSAGE))?;

    Ok((
        StatusCode::CREATED,
        Json(Resp {
            message: message.to_string(),
        }),
    ))
}
