//! HTTP server setup and configuration.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use reqwest::Client;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use super::handlers;
use crate::bootstrap::{self, Bootstrap};
use crate::config::{Config, GeminiConfig};
use crate::gemini::{GeminiClient, ModelHandle};

/// Response header carrying the per-request correlation ID (UUID v4).
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation ID assigned to each incoming request.
#[derive(Debug, Clone, Copy)]
pub struct RequestId(pub Uuid);

/// Shared application state.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    /// `None` when bootstrap could not configure a model.
    pub model: Option<ModelHandle>,
    /// Used by `/health` to enumerate models; `None` without an API key.
    pub upstream: Option<GeminiClient>,
}

impl AppState {
    pub fn new(bootstrap: Bootstrap) -> Self {
        Self {
            model: bootstrap.model.ok(),
            upstream: bootstrap.upstream,
        }
    }
}

async fn assign_request_id(mut request: Request, next: Next) -> Response {
    let id = Uuid::new_v4();
    request.extensions_mut().insert(RequestId(id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Create the axum router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .map(|id| id.0.to_string())
                    .unwrap_or_default();
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id
                )
            }),
        )
        // Outside the trace layer so the span can see the ID.
        .layer(middleware::from_fn(assign_request_id))
        .layer(CorsLayer::permissive())
}

/// HTTP client for upstream calls.
///
/// Only the connect phase is bounded unless `request_timeout_secs` is set.
pub fn build_http_client(config: &GeminiConfig) -> reqwest::Result<Client> {
    let mut builder = Client::builder().connect_timeout(Duration::from_secs(10));
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// Run the HTTP server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let listen_addr = config.server.listen_addr()?;

    let http_client = build_http_client(&config.gemini)?;
    let bootstrap = bootstrap::bootstrap(&config.gemini, http_client).await;

    println!("Gemini relay starting on http://{}", listen_addr);
    match &bootstrap.model {
        Ok(model) => println!("Gemini: configured ({})", model.identifier()),
        Err(e) => println!("Gemini: not configured ({})", e),
    }

    let state = AppState::new(bootstrap);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(address = %listen_addr, "Starting gemini-relay server");

    axum::serve(listener, app).await?;

    Ok(())
}
