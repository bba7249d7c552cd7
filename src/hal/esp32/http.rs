//! HTTP server for the ESP32 speed reporting API.
//!
//! Provides a lightweight HTTP server using esp-idf-svc, exposing the same
//! read-only JSON surface as the desktop axum server.
//!
//! # Endpoints
//!
//! - `GET /api/state` - Full status document (all motors + uptime)
//! - `GET /api/speed` - Speed readings for all motors
//!
//! # Example
//!
//! ```ignore
//! use rs_tacho::hal::esp32::{Esp32HttpServer, Esp32SharedState};
//! use rs_tacho::config::WebConfig;
//! use std::sync::{Arc, Mutex};
//!
//! let shared = Arc::new(Mutex::new(Esp32SharedState::default()));
//! let config = WebConfig::default().with_port(80);
//! let server = Esp32HttpServer::new(&config, shared)?;
//! ```

use crate::config::WebConfig;
use crate::tachometer::TachoState;
use esp_idf_hal::io::Write;
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use esp_idf_svc::io::EspIOError;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

/// Formats the status document without pulling in a JSON library.
///
/// The response shape matches the desktop API's `StateResponse`.
fn state_to_json(state: &TachoState, uptime_ms: u64) -> String {
    let mut json = String::from(r#"{"motors":["#);
    for (i, motor) in state.motors.iter().enumerate() {
        if i > 0 {
            json.push(',');
        }
        let _ = write!(json, r#"{{"id":{},"rpm":{}}}"#, motor.id, motor.rpm);
    }
    let _ = write!(json, r#"],"uptime_ms":{}}}"#, uptime_ms);
    json
}

/// Shared state between HTTP handlers and the main loop (ESP32-specific).
///
/// The callback-based esp-idf-svc HTTP server cannot borrow the tachometer
/// directly, so the main loop refreshes this snapshot on its polling cadence
/// and the handlers serve whatever is current.
pub struct Esp32SharedState {
    /// Current speed snapshot
    pub state: TachoState,
    /// Milliseconds since boot at the last refresh
    pub uptime_ms: u64,
}

impl Default for Esp32SharedState {
    fn default() -> Self {
        Self {
            state: TachoState::default(),
            uptime_ms: 0,
        }
    }
}

/// HTTP server for the speed reporting API.
///
/// Runs an embedded HTTP server that exposes read-only REST endpoints for
/// retrieving motor speeds.
pub struct Esp32HttpServer {
    _server: EspHttpServer<'static>,
}

impl Esp32HttpServer {
    /// Create a new HTTP server.
    ///
    /// The server shares state via the provided
    /// `Arc<Mutex<Esp32SharedState>>`; the main loop should refresh `state`
    /// and `uptime_ms` regularly.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP server fails to start.
    pub fn new(
        config: &WebConfig,
        shared_state: Arc<Mutex<Esp32SharedState>>,
    ) -> anyhow::Result<Self> {
        let server_config = Configuration {
            http_port: config.port,
            ..Default::default()
        };

        let mut server = EspHttpServer::new(&server_config)?;

        // Clone Arc for each handler
        let state_for_state = shared_state.clone();
        let state_for_speed = shared_state;

        // GET /api/state - Full status document
        server.fn_handler("/api/state", esp_idf_svc::http::Method::Get, move |req| {
            let shared = state_for_state.lock().unwrap();
            let json = state_to_json(&shared.state, shared.uptime_ms);
            let mut resp =
                req.into_response(200, None, &[("Content-Type", "application/json")])?;
            resp.write_all(json.as_bytes())?;
            Ok::<_, EspIOError>(())
        })?;

        // GET /api/speed - Speed readings only
        server.fn_handler("/api/speed", esp_idf_svc::http::Method::Get, move |req| {
            let shared = state_for_speed.lock().unwrap();
            let mut json = String::from("[");
            for (i, motor) in shared.state.motors.iter().enumerate() {
                if i > 0 {
                    json.push(',');
                }
                let _ = write!(json, r#"{{"id":{},"rpm":{}}}"#, motor.id, motor.rpm);
            }
            json.push(']');
            let mut resp =
                req.into_response(200, None, &[("Content-Type", "application/json")])?;
            resp.write_all(json.as_bytes())?;
            Ok::<_, EspIOError>(())
        })?;

        println!("[HTTP] Server started on port {}", config.port);

        Ok(Self { _server: server })
    }
}
