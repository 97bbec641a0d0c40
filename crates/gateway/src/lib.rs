//! HTTP API gateway for CareBridge.
//!
//! Exposes the conversation bridge over JSON:
//!
//! - `POST /chat`: one persona-aware chat turn
//! - `POST /summary`: structured summary of a conversation
//! - `GET /health`: liveness plus the active model
//!
//! Built on Axum. The service is stateless; the only shared data is the
//! read-only persona catalog inside the bridge.

pub mod error;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderValue, Method, header};
use axum::response::Json;
use axum::{
    Router,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use carebridge_bridge::{BridgeRequest, ConversationBridge};
use carebridge_config::{AppConfig, GatewayConfig};
use carebridge_core::error::GatewayError;
use carebridge_core::message::Message;
use carebridge_core::summary::SummaryResult;
use carebridge_persona::PersonaCatalog;

use crate::error::ApiError;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub bridge: ConversationBridge,
    pub started_at: DateTime<Utc>,
}

impl GatewayState {
    pub fn new(bridge: ConversationBridge) -> Self {
        Self {
            bridge,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS restricted to `allowed_origins`
/// - Request body size limit
/// - HTTP trace logging, one span per request with a request id
pub fn build_router(state: SharedState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/summary", post(summary_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(&config.allowed_origins))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::extract::Request| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    uri = %req.uri(),
                    request_id = %uuid::Uuid::new_v4(),
                )
            }),
        )
}

/// `*` anywhere in the list opens the API to every origin. Entries that are
/// not valid header values are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    if origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(allowed))
}

/// Start the gateway HTTP server.
///
/// The persona catalog is validated before binding; an incomplete catalog
/// aborts startup.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let catalog = Arc::new(PersonaCatalog::from_config(&config.persona)?);

    let router = carebridge_providers::router::build_from_config(&config);
    let provider = router
        .default()
        .ok_or_else(|| GatewayError::NotConfigured(config.default_provider.clone()))?;

    let bridge = ConversationBridge::from_config(&config, provider, catalog);
    info!(
        provider = bridge.provider_name(),
        model = bridge.model(),
        summary_strategy = bridge.extractor().name(),
        "Conversation bridge ready"
    );

    let app = build_router(Arc::new(GatewayState::new(bridge)), &config.gateway);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<BridgeRequest>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Rejected chat request body");
        error::from_rejection(&e)
    })?;

    info!(
        condition = %request.condition,
        role = %request.role,
        language = %request.language,
        messages = request.messages.len(),
        "Chat request"
    );

    state.bridge.chat(request).await.map(Json).map_err(|e| {
        if e.is_client_error() {
            warn!(error = %e, "Rejected chat request");
        }
        error::from_error(&e)
    })
}

async fn summary_handler(
    State(state): State<SharedState>,
    payload: Result<Json<BridgeRequest>, JsonRejection>,
) -> Result<Json<SummaryResult>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Rejected summary request body");
        error::from_rejection(&e)
    })?;

    info!(
        language = %request.language,
        messages = request.messages.len(),
        "Summary request"
    );

    Ok(Json(state.bridge.summarize(request).await))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    model: String,
    provider: String,
    version: &'static str,
    started_at: DateTime<Utc>,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.bridge.model().to_string(),
        provider: state.bridge.provider_name().to_string(),
        version: env!("CARGO_PKG_VERSION"),
        started_at: state.started_at,
    })
}
