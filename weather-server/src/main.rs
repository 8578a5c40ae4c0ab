//! Account server for the weather app.

/// Signup and login rules
mod auth;

/// HTTP-facing errors
mod error;

/// Request handlers
mod handlers;

/// Password hashing
mod password;

/// Shared request state
mod state;

/// Account storage
mod store;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::{path::PathBuf, process::ExitCode, time::Duration};
use tokio::net::TcpListener;
use tower_http::{compression, cors, limit, services, timeout, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather_core::api::{login, signup};

/// Serve signup, login, and the entry page
#[derive(Debug, Parser)]
#[clap(version)]
struct Config {
    /// Address to listen on
    #[clap(long, env, default_value = "127.0.0.1:3000")]
    address: String,

    /// Where accounts are stored
    #[clap(long, env, default_value = "sqlite://weather-auth.db")]
    database_url: String,

    /// Directory holding the entry page and its assets
    #[clap(long, env, default_value = "static")]
    static_dir: PathBuf,

    /// Password hashing work factor (argon2 time cost)
    #[clap(long, env, default_value_t = password::DEFAULT_COST)]
    hash_cost: u32,

    /// Request body size limit, in bytes
    #[clap(long, env, default_value = "65536")]
    body_limit: usize,

    /// Request timeout, in seconds
    #[clap(long, env, default_value = "30", value_parser = duration_parser)]
    request_timeout: Duration,
}

/// Parse a whole number of seconds
fn duration_parser(s: &str) -> Result<Duration, std::num::ParseIntError> {
    s.parse().map(Duration::from_secs)
}

/// Wire up routes and middleware around the given state.
fn router(state: state::State, config: &Config) -> Router {
    let index = config.static_dir.join("index.html");

    Router::new()
        // ROUTES
        .route_service("/", services::ServeFile::new(index))
        .route("/health", get(handlers::health::handler))
        .route(signup::PATH, post(handlers::signup::handler))
        .route(login::PATH, post(handlers::login::handler))
        .fallback_service(services::ServeDir::new(&config.static_dir))
        // MIDDLEWARE
        .layer(trace::TraceLayer::new_for_http())
        .layer(compression::CompressionLayer::new())
        .layer(limit::RequestBodyLimitLayer::new(config.body_limit))
        .layer(timeout::TimeoutLayer::new(config.request_timeout))
        .layer(cors::CorsLayer::permissive())
        // STATE
        .with_state(state)
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = match store::Store::connect(&config.database_url).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(?err, url = %config.database_url, "could not open store");
            return ExitCode::FAILURE;
        }
    };

    let hasher = match password::Hasher::new(config.hash_cost) {
        Ok(hasher) => hasher,
        Err(err) => {
            tracing::error!(?err, "invalid hash cost");
            return ExitCode::FAILURE;
        }
    };

    let app = router(state::State::new(store, hasher), &config);

    let listener = match TcpListener::bind(&config.address).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(?err, address = %config.address, "could not bind");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(address = ?listener.local_addr(), "listening");

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(?err, "server stopped");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::{
        body::{self, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let config = Config::parse_from(["weather-server", "--static-dir", "static"]);
        let store = store::Store::in_memory().await.unwrap();

        router(
            state::State::new(store, password::Hasher::cheap()),
            &config,
        )
    }

    async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test_log::test(tokio::test)]
    async fn test_signup_and_login_flow() {
        let app = app().await;

        let (status, body) = post_json(
            &app,
            "/api/signup",
            json!({"email": "a@b.com", "password": "pw1"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({"message": "User created successfully! Please log in."})
        );

        let (status, body) = post_json(
            &app,
            "/api/signup",
            json!({"email": "A@B.com", "password": "anything"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"message": "User with this email already exists."})
        );

        let (status, body) = post_json(
            &app,
            "/api/login",
            json!({"email": "a@b.com", "password": "wrong"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Invalid email or password."}));

        let (status, body) = post_json(
            &app,
            "/api/login",
            json!({"email": "a@b.com", "password": "pw1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": "Login successful!", "user": {"email": "a@b.com"}})
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_missing_fields_are_validation_errors() {
        let app = app().await;

        for path in ["/api/signup", "/api/login"] {
            let (status, body) = post_json(&app, path, json!({"email": "a@b.com"})).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"message": "Email and password are required."}));
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_malformed_body() {
        let app = app().await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Malformed request body."}));
    }

    #[test_log::test(tokio::test)]
    async fn test_body_without_json_content_type_is_a_validation_error() {
        let app = app().await;

        for path in ["/api/signup", "/api/login"] {
            let request = Request::builder()
                .method("POST")
                .uri(path)
                .body(Body::from("email=a%40b.com&password=pw1"))
                .unwrap();

            let response = app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body: Value = serde_json::from_slice(&bytes).unwrap();

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"message": "Email and password are required."}));
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_health() {
        let app = app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test_log::test(tokio::test)]
    async fn test_entry_page() {
        let app = app().await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
