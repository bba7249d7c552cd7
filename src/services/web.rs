//! Axum-based HTTP server for the speed reporting API.
//!
//! Provides read-only REST endpoints:
//! - GET `/api/state` - Full status document (all motors + uptime)
//! - GET `/api/speed` - Speed readings for all motors
//! - GET `/api/speed/:id` - Speed reading for one motor
//!
//! There is no write surface: the tachometer measures, it does not command.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::WebConfig;

use super::api::{ApiResponse, SpeedResponse, StateResponse};
use super::shared::SharedTachoState;

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/state - Returns the full status document
async fn get_state(
    State(state): State<Arc<SharedTachoState>>,
) -> Json<ApiResponse<StateResponse>> {
    let snapshot = state.snapshot();
    Json(ApiResponse::ok(StateResponse::new(
        &snapshot,
        state.uptime_ms(),
    )))
}

/// GET /api/speed - Returns speed readings for all motors
async fn get_speeds(
    State(state): State<Arc<SharedTachoState>>,
) -> Json<ApiResponse<Vec<SpeedResponse>>> {
    let snapshot = state.snapshot();
    let speeds = snapshot
        .motors
        .iter()
        .map(|m| SpeedResponse {
            id: m.id,
            rpm: m.rpm,
        })
        .collect();
    Json(ApiResponse::ok(speeds))
}

/// GET /api/speed/:id - Returns the speed reading for one motor
async fn get_speed(
    State(state): State<Arc<SharedTachoState>>,
    Path(id): Path<u8>,
) -> Json<ApiResponse<SpeedResponse>> {
    let snapshot = state.snapshot();
    match snapshot.motor(id) {
        Some(motor) => Json(ApiResponse::ok(SpeedResponse {
            id: motor.id,
            rpm: motor.rpm,
        })),
        None => Json(ApiResponse::err("Unknown motor id")),
    }
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::err("Not found")),
    )
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8080".parse().unwrap(),
            cors_permissive: true,
        }
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router(state: Arc<SharedTachoState>, config: &WebServerConfig) -> Router {
    let mut router = Router::new()
        // API routes
        .route("/api/state", get(get_state))
        .route("/api/speed", get(get_speeds))
        .route("/api/speed/:id", get(get_speed))
        // Fallback
        .fallback(not_found)
        .with_state(state);

    // Add CORS if requested
    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Start the web server
///
/// This function blocks until the server is shut down.
/// Creates its own `SharedTachoState` - use `run_server_with_state` to share
/// state with other services.
pub async fn run_server(
    tachometer: crate::Tachometer,
    config: WebServerConfig,
) -> Result<(), std::io::Error> {
    let state = Arc::new(SharedTachoState::new(tachometer));
    run_server_with_state(state, config).await
}

/// Start the web server with shared state
///
/// Use this when you need to share state with other services (display loop,
/// data logger) or keep a handle for driving consumer ticks.
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(SharedTachoState::new(tachometer));
///
/// // A polling loop elsewhere drives state.tick()
/// run_server_with_state(state, web_config).await?;
/// ```
pub async fn run_server_with_state(
    state: Arc<SharedTachoState>,
    config: WebServerConfig,
) -> Result<(), std::io::Error> {
    let router = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    println!("Web server listening on http://{}", config.addr);

    axum::serve(listener, router).await
}
