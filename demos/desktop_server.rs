//! Desktop server demo for testing the speed API without hardware.
//!
//! This demo runs the web API against two simulated motors, allowing you to:
//! - Poll `http://localhost:8080/api/state` and `/api/speed`
//! - Watch the estimator converge on the simulated speeds
//! - Stop a simulated motor and watch the staleness timeout report 0
//!
//! # Simulation
//!
//! Each motor gets a task that fires synthetic feedback edges at a fixed
//! spacing: motor 1 at 50ms per edge (600 RPM), motor 2 at 25ms (1200 RPM).
//! Motor 2 stops firing after 30 seconds so the staleness path is visible.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example desktop_server --features web
//! ```

use std::sync::Arc;
use std::time::Duration;

use rs_tacho::services::{run_server_with_state, SharedTachoState, WebServerConfig};
use rs_tacho::{Config, FeedbackChannel, Tachometer};

fn main() {
    // Initialize the tokio runtime
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");

    rt.block_on(async {
        println!("=================================");
        println!("  rs-tacho Desktop Server");
        println!("=================================");
        println!();

        // Central configuration - modify this for your setup
        let config = Config::default();
        // Example of customization:
        // let config = Config::default()
        //     .with_web(rs_tacho::WebConfig::default().with_port(3000))
        //     .with_capture(rs_tacho::CaptureConfig::default()
        //         .with_stale_after_ms(1000));

        let motor1 = Arc::new(
            FeedbackChannel::new(config.capture.motor1_id)
                .with_stale_after_ms(config.capture.stale_after_ms),
        );
        let motor2 = Arc::new(
            FeedbackChannel::new(config.capture.motor2_id)
                .with_stale_after_ms(config.capture.stale_after_ms),
        );

        let mut tacho = Tachometer::new();
        tacho.add_channel(Arc::clone(&motor1)).unwrap();
        tacho.add_channel(Arc::clone(&motor2)).unwrap();

        let state = Arc::new(SharedTachoState::new(tacho));
        let web_config = WebServerConfig::from_config(&config.web);

        println!("Simulated motors:");
        println!("  Motor 1: edges every 50ms  -> 600 RPM");
        println!("  Motor 2: edges every 25ms  -> 1200 RPM (stops after 30s)");
        println!();
        println!("Endpoints:");
        println!("  http://{}/api/state", web_config.addr);
        println!("  http://{}/api/speed", web_config.addr);
        println!("  http://{}/api/speed/1", web_config.addr);
        println!();
        println!("Press Ctrl+C to stop.");
        println!();

        // Synthetic edge sources, one per motor
        spawn_edge_source(Arc::clone(&state), motor1, 50, None);
        spawn_edge_source(Arc::clone(&state), motor2, 25, Some(30_000));

        // Consumer loop standing in for the per-channel periodic tasks
        spawn_tick_loop(Arc::clone(&state), config.capture.tick_period_ms);

        // Run web server
        run_server_with_state(state, web_config).await.unwrap();
    });
}

/// Spawn a task that fires synthetic edges at `spacing_ms` intervals.
///
/// With constant spacing, every paired interval is `2 * spacing_ms`, so the
/// expected estimate is `60_000 / (2 * spacing_ms)` RPM. If `stop_after_ms`
/// is set, the source goes quiet after that long, exercising the staleness
/// timeout.
fn spawn_edge_source(
    state: Arc<SharedTachoState>,
    channel: Arc<FeedbackChannel>,
    spacing_ms: u64,
    stop_after_ms: Option<u64>,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(spacing_ms));
        loop {
            interval.tick().await;
            let now = state.now_ms();
            if let Some(stop) = stop_after_ms {
                if now > stop {
                    return;
                }
            }
            channel.on_edge(now as u32);
        }
    });
}

/// Spawn the consumer loop.
///
/// Runs every `period_ms` and reduces any completed batches, applying the
/// staleness override on every pass.
fn spawn_tick_loop(state: Arc<SharedTachoState>, period_ms: u32) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(u64::from(period_ms)));
        loop {
            interval.tick().await;
            state.tick();
        }
    });
}
