//! HTTP boundary for the relay
//!
//! Routes:
//! - `POST /fetch`: fetch a page, rewrite it, answer with [`RelayResponse`]
//! - everything else: static files from the public directory, when configured
//!
//! Validation failures answer 400 without touching the relay. Fetch failures
//! answer 500 with `Failed to fetch content: <cause>`.

use crate::error::FetchError;
use crate::relay::Relay;
use crate::types::{ErrorResponse, RelayRequest, RelayResponse};
use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Default listening port
pub const DEFAULT_PORT: u16 = 3001;

/// Default bind host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Directory served for `GET /` and other static paths
    pub public_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            public_dir: None,
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
struct AppState {
    relay: Arc<Relay>,
}

/// Errors surfaced to HTTP clients as JSON
#[derive(Debug)]
pub enum ApiError {
    /// No `url` in the request
    MissingUrl,
    /// Body could not be decoded
    InvalidBody(String),
    /// Fetching or rewriting failed
    Fetch(FetchError),
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::MissingUrl => ApiError::MissingUrl,
            other => ApiError::Fetch(other),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::MissingUrl => "URL is required".to_string(),
            ApiError::InvalidBody(reason) => format!("Invalid request body: {}", reason),
            ApiError::Fetch(err) => format!("Failed to fetch content: {}", err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.message()))).into_response()
    }
}

/// Accepts JSON and URL-encoded bodies; anything else carries no URL
impl<S> FromRequest<S> for RelayRequest
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/json") {
            let Json(body) = Json::<RelayRequest>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
            Ok(body)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(body) = Form::<RelayRequest>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
            Ok(body)
        } else {
            Ok(RelayRequest::default())
        }
    }
}

/// Build the router for `relay`, serving static files from `public_dir`
pub fn router(relay: Relay, config: &ServerConfig) -> Router {
    let state = AppState {
        relay: Arc::new(relay),
    };

    let router = Router::new()
        .route("/fetch", post(fetch_handler))
        .with_state(state);

    let router = match config.public_dir {
        Some(ref dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(TraceLayer::new_for_http())
}

async fn fetch_handler(
    State(state): State<AppState>,
    request: RelayRequest,
) -> Result<Json<RelayResponse>, ApiError> {
    let Some(url) = request.target() else {
        warn!("Rejected relay request without URL");
        return Err(ApiError::MissingUrl);
    };

    match state.relay.execute(url).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            error!(url = %url, error = %err, "Relay request failed");
            Err(err.into())
        }
    }
}

/// Serve `app` on `listener` until Ctrl-C
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(address = %addr, "Faleproxy server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Faleproxy server stopped");
    Ok(())
}

/// Bind according to `config` and serve `relay`
pub async fn run(config: ServerConfig, relay: Relay) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    let app = router(relay, &config);
    serve(listener, app).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}
