//! HTTP API and monitoring endpoints
//!
//! This module provides the Axum server for the team-mixer service: the mix
//! API used by chat gateways, plus health check and Prometheus metrics
//! endpoints for operations.

use crate::command::{CommandContext, CommandHandler, CommandReply};
use crate::error::MixerError;
use crate::metrics::MetricsCollector;
use crate::service::health::{HealthCheck, HealthStatus};
use crate::types::{MentionMap, MixId, PlayerName};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host to bind to (typically "0.0.0.0" for all interfaces)
    pub host: String,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// Shared state for the HTTP server
#[derive(Clone)]
pub struct HttpServerState {
    pub command_handler: Arc<CommandHandler>,
    pub metrics_collector: Arc<MetricsCollector>,
    pub is_running: Arc<RwLock<bool>>,
    pub service_name: String,
    pub started_at: DateTime<Utc>,
}

impl HttpServerState {
    pub fn new(
        command_handler: Arc<CommandHandler>,
        metrics_collector: Arc<MetricsCollector>,
        is_running: Arc<RwLock<bool>>,
        service_name: String,
    ) -> Self {
        Self {
            command_handler,
            metrics_collector,
            is_running,
            service_name,
            started_at: Utc::now(),
        }
    }
}

/// Mix request body for the HTTP API.
#[derive(Debug, Clone, Deserialize)]
pub struct MixRequest {
    /// Full command text, e.g. `!mix ana, bob (cid, dora)`
    pub text: String,
    /// Mention id to display name map, when the gateway pre-resolved mentions
    #[serde(default)]
    pub mentions: MentionMap,
    /// Voice channel member names backing a bare `!mix`
    #[serde(default)]
    pub voice_roster: Option<Vec<String>>,
}

/// Mix reply body for the HTTP API.
#[derive(Debug, Clone, Serialize)]
pub struct MixResponse {
    /// The formatted reply text, ready to post to the channel
    pub text: String,
    /// Session id for reshuffles; absent for help and rejection replies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mix_id: Option<MixId>,
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    pub waitlist: Vec<String>,
}

impl From<CommandReply> for MixResponse {
    fn from(reply: CommandReply) -> Self {
        let (team_a, team_b, waitlist) = match reply.assignment {
            Some(assignment) => (
                display_names(&assignment.team_a),
                display_names(&assignment.team_b),
                display_names(&assignment.waitlist),
            ),
            None => (Vec::new(), Vec::new(), Vec::new()),
        };

        Self {
            text: reply.text,
            mix_id: reply.mix_id,
            team_a,
            team_b,
            waitlist,
        }
    }
}

fn display_names(players: &[PlayerName]) -> Vec<String> {
    players.iter().map(|p| p.as_str().to_string()).collect()
}

/// HTTP server exposing the mix API and monitoring endpoints
pub struct HttpServer {
    config: HttpServerConfig,
    state: HttpServerState,
    shutdown_tx: broadcast::Sender<()>,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: HttpServerConfig, state: HttpServerState) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            state,
            shutdown_tx,
        }
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("Invalid HTTP server address")?;

        let app = self.create_router();
        let listener = TcpListener::bind(addr).await?;

        info!("HTTP server listening on http://{}", addr);

        // Create a shutdown receiver for this task
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        // Serve with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("HTTP server shutdown signal received");
            })
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Create the Axum router with all endpoints
    fn create_router(&self) -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route("/healthcheck", get(healthcheck_handler))
            .route("/metrics", get(metrics_handler))
            .route("/stats", get(stats_handler))
            .route("/mix", post(mix_handler))
            .route("/mix/{mix_id}/reshuffle", post(reshuffle_handler))
            .route("/mix/{mix_id}", delete(accept_handler))
            .with_state(self.state.clone())
    }

    /// Stop the HTTP server
    pub async fn stop(&self) -> Result<()> {
        info!("Stopping HTTP server...");

        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal to HTTP server: {}", e);
        }

        info!("HTTP server stop signal sent");
        Ok(())
    }
}

/// Root endpoint handler - shows service information
async fn root_handler(State(state): State<HttpServerState>) -> impl IntoResponse {
    let info = json!({
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Hello from Team Mixer 🎲",
        "endpoints": [
            "/healthcheck",
            "/metrics",
            "/stats",
            "/mix",
            "/mix/{mix_id}/reshuffle"
        ]
    });

    Json(info)
}

/// Lightweight health check endpoint handler
async fn healthcheck_handler(State(state): State<HttpServerState>) -> impl IntoResponse {
    debug!("Health check requested");

    let status = HealthCheck::liveness_check(&state).await;
    let body = json!({
        "status": status.to_string(),
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION")
    });

    match status {
        HealthStatus::Healthy | HealthStatus::Degraded => (StatusCode::OK, Json(body)),
        HealthStatus::Unhealthy => (StatusCode::SERVICE_UNAVAILABLE, Json(body)),
    }
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<HttpServerState>) -> impl IntoResponse {
    debug!("Metrics endpoint requested");

    let registry = state.metrics_collector.registry();
    let metric_families = registry.gather();
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&metric_families) {
        Ok(metrics_output) => {
            debug!("Serving {} metric families", metric_families.len());

            Response::builder()
                .status(StatusCode::OK)
                .header("content-type", encoder.format_type())
                .body(metrics_output)
                .unwrap()
        }
        Err(e) => {
            error!("Failed to encode metrics: {}", e);

            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body("Failed to encode metrics".to_string())
                .unwrap()
        }
    }
}

/// Detailed service statistics endpoint handler (for debugging/human consumption)
async fn stats_handler(State(state): State<HttpServerState>) -> impl IntoResponse {
    debug!("Stats endpoint requested");

    match HealthCheck::check(&state).await {
        Ok(health) => {
            let stats = json!({
                "service": {
                    "name": state.service_name,
                    "version": env!("CARGO_PKG_VERSION"),
                    "status": health.status,
                    "uptime": health.stats.uptime_info
                },
                "mixes": {
                    "created": health.stats.mixes_created,
                    "reshuffles": health.stats.reshuffles,
                    "commands_handled": health.stats.commands_handled,
                    "rejected": health.stats.rejected
                },
                "sessions": {
                    "active": health.stats.active_sessions
                },
                "components": health.checks,
                "timestamp": chrono::Utc::now()
            });

            (StatusCode::OK, Json(stats))
        }
        Err(e) => {
            error!("Failed to get stats: {}", e);

            let error_response = json!({
                "service": {
                    "name": state.service_name,
                    "version": env!("CARGO_PKG_VERSION"),
                    "status": "error"
                },
                "error": "Failed to get service stats",
                "timestamp": chrono::Utc::now()
            });

            (StatusCode::SERVICE_UNAVAILABLE, Json(error_response))
        }
    }
}

/// Mix endpoint handler: run one command through the handler
async fn mix_handler(
    State(state): State<HttpServerState>,
    Json(request): Json<MixRequest>,
) -> Response {
    let context = CommandContext {
        mentions: request.mentions,
        voice_roster: request.voice_roster,
    };

    match state.command_handler.handle(&request.text, &context) {
        Ok(Some(reply)) => {
            state.metrics_collector.record_http_request("/mix", 200);
            (StatusCode::OK, Json(MixResponse::from(reply))).into_response()
        }
        Ok(None) => {
            state.metrics_collector.record_http_request("/mix", 400);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Not a recognized command" })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Mix request failed: {}", e);
            state.metrics_collector.record_http_request("/mix", 500);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal service error" })),
            )
                .into_response()
        }
    }
}

/// Reshuffle endpoint handler: re-roll a stored mix
async fn reshuffle_handler(
    State(state): State<HttpServerState>,
    Path(mix_id): Path<MixId>,
) -> Response {
    match state.command_handler.reshuffle(mix_id) {
        Ok(reply) => {
            state
                .metrics_collector
                .record_http_request("/mix/reshuffle", 200);
            (StatusCode::OK, Json(MixResponse::from(reply))).into_response()
        }
        Err(e) if is_session_not_found(&e) => {
            state
                .metrics_collector
                .record_http_request("/mix/reshuffle", 404);
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("Mix session not found: {mix_id}") })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Reshuffle failed: {}", e);
            state
                .metrics_collector
                .record_http_request("/mix/reshuffle", 500);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal service error" })),
            )
                .into_response()
        }
    }
}

/// Accept endpoint handler: the teams were accepted, close the session
async fn accept_handler(
    State(state): State<HttpServerState>,
    Path(mix_id): Path<MixId>,
) -> Response {
    match state.command_handler.accept(mix_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) if is_session_not_found(&e) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Mix session not found: {mix_id}") })),
        )
            .into_response(),
        Err(e) => {
            error!("Accept failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal service error" })),
            )
                .into_response()
        }
    }
}

fn is_session_not_found(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<MixerError>(),
        Some(MixerError::SessionNotFound { .. })
    )
}
