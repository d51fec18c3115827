//! Issue and verify tokens over HTTP
//!
//! ```not_rust
//! JWT_SECRET=change-me cargo run --example server
//! curl http://127.0.0.1:3000/sign
//! curl http://127.0.0.1:3000/verify/<token>
//! ```

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use jwtcodec::{Algorithm, Claims, Error, ErrorKind, Key, issue, verify};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Settings read once at start-up
struct Config {
    secret: String,
    algorithm: Algorithm,
    ttl: Duration,
    bind_addr: SocketAddr,
}

impl Config {
    fn from_env() -> Result<Self, String> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        let algorithm: Algorithm = env_or("JWT_ALGORITHM", "HS256")
            .parse()
            .map_err(|e| format!("JWT_ALGORITHM: {e}"))?;
        if !algorithm.is_symmetric() {
            return Err(format!("JWT_ALGORITHM: {algorithm} needs a key pair, use HS256/384/512"));
        }

        let ttl = env_or("JWT_TTL_SECONDS", "3600")
            .parse()
            .map(Duration::from_secs)
            .map_err(|e| format!("JWT_TTL_SECONDS: {e}"))?;

        let bind_addr = env_or("BIND_ADDR", "127.0.0.1:3000")
            .parse()
            .map_err(|e| format!("BIND_ADDR: {e}"))?;

        Ok(Self {
            secret,
            algorithm,
            ttl,
            bind_addr,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[derive(Clone)]
struct AppState {
    key: Arc<Key>,
    algorithm: Algorithm,
    ttl: Duration,
}

/// Codec errors rendered as `{"error": message}`
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::Malformed => StatusCode::BAD_REQUEST,
            ErrorKind::Rejected => StatusCode::UNAUTHORIZED,
            ErrorKind::Usage => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("token operation failed: {}", self.0);
        } else {
            tracing::warn!("token rejected: {}", self.0);
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(message) => {
            tracing::error!("{message}");
            std::process::exit(1);
        }
    };

    let state = AppState {
        key: Arc::new(Key::symmetric(config.secret)),
        algorithm: config.algorithm,
        ttl: config.ttl,
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/sign", get(sign))
        .route("/verify/{token}", get(check))
        .fallback(not_found)
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("cannot bind {}: {e}", config.bind_addr);
            std::process::exit(1);
        }
    };
    tracing::debug!("listening on {}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}

async fn index() -> &'static str {
    "jwtcodec demo: GET /sign, then GET /verify/{token}"
}

async fn sign(State(state): State<AppState>) -> Result<String, ApiError> {
    let claims = Claims::new()
        .with_claim("name", "Kaif Khan")
        .with_claim("email", "kaif@email.com");

    let token = issue(&claims, &state.key, state.algorithm, Some(state.ttl))?;
    tracing::debug!("issued {} token", state.algorithm);
    Ok(token)
}

async fn check(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let claims = verify(&token, &state.key, state.algorithm)?;
    let json = claims.to_json()?;
    Ok(([(CONTENT_TYPE, "application/json")], json).into_response())
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
