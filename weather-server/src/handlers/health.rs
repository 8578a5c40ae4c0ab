#[tracing::instrument]
pub async fn handler() -> &'static str {
    "OK"
}
