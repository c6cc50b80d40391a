//! HTTP front door: scan results, health, audit launch, live frame feed.
//!
//! Every JSON body carries a `success` flag (or a health status) -- the
//! boundary never returns an unstructured failure. CORS stays permissive
//! so a browser front end on another origin can consume the API.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use airscope_core::{NetworkRecord, Scanner};

use crate::audit::AuditLauncher;

/// Shared state behind the router.
pub struct AppState {
    pub scanner: Scanner,
    /// Present only when the bus bridge is running.
    pub frames: Option<broadcast::Sender<String>>,
    pub audit: AuditLauncher,
}

type SharedState = Arc<AppState>;

/// Build the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/wifi-data", get(wifi_data))
        .route("/api/health", get(health))
        .route("/api/audit", post(audit))
        .route("/ws/live", get(ws_live))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Response bodies ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct WifiDataResponse {
    success: bool,
    timestamp: String,
    count: usize,
    wifi_networks: Vec<NetworkRecord>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    timestamp: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            timestamp: now_iso(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Handlers ─────────────────────────────────────────────────────────

/// `GET /api/wifi-data` -- scan (or serve the cache) and return the
/// records. Total scan failure is a structured 500.
async fn wifi_data(State(state): State<SharedState>) -> Response {
    match state.scanner.try_scan().await {
        Ok(records) => {
            info!(count = records.len(), "served wifi networks");
            (
                StatusCode::OK,
                Json(WifiDataResponse {
                    success: true,
                    timestamp: now_iso(),
                    count: records.len(),
                    wifi_networks: records,
                }),
            )
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "scan path failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

/// `GET /api/health`
#[allow(clippy::unused_async)] // axum handlers are async by contract
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: now_iso(),
    })
}

// ── Audit launch ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AuditRequest {
    bssid: Option<String>,
    ssid: Option<String>,
}

#[derive(Debug, Serialize)]
struct AuditResponse {
    success: bool,
    message: String,
}

/// `POST /api/audit` -- fire-and-forget launch of the external audit
/// tool against a BSSID or SSID.
#[allow(clippy::unused_async)] // axum handlers are async by contract
async fn audit(State(state): State<SharedState>, Json(req): Json<AuditRequest>) -> Response {
    let target = req
        .bssid
        .or(req.ssid)
        .filter(|target| !target.is_empty());

    let Some(target) = target else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No target provided")),
        )
            .into_response();
    };

    match state.audit.launch(&target) {
        Ok(()) => (
            StatusCode::OK,
            Json(AuditResponse {
                success: true,
                message: format!("audit started against {target}"),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

// ── Live frame feed ──────────────────────────────────────────────────

/// `GET /ws/live` -- WebSocket forwarding each bus frame payload.
#[allow(clippy::unused_async)] // axum handlers are async by contract
async fn ws_live(State(state): State<SharedState>, ws: WebSocketUpgrade) -> Response {
    let Some(frames) = state.frames.clone() else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                "live feed not enabled -- start the server with --bridge",
            )),
        )
            .into_response();
    };

    ws.on_upgrade(move |socket| forward_frames(socket, frames.subscribe()))
}

async fn forward_frames(mut socket: WebSocket, mut rx: broadcast::Receiver<String>) {
    loop {
        match rx.recv().await {
            Ok(payload) => {
                if socket.send(Message::Text(payload.into())).await.is_err() {
                    // Client went away.
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "websocket client lagging, frames dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
