//! ESP32 dual-motor tachometer firmware.
//!
//! This is the main entry point for the vehicle's speed-sensing board.
//! It wires one feedback channel per motor:
//! - Any-edge GPIO interrupts capture pulse intervals (GPIO2/GPIO15)
//! - A 100ms consumer task per motor reduces batches to RPM
//! - The main loop polls speeds for the OLED, HTTP API and serial log
//!
//! # Build
//!
//! ```bash
//! # Basic (speed sensing + serial log)
//! cargo build --features esp32
//!
//! # With display
//! cargo build --features esp32,display
//!
//! # With WiFi + HTTP API
//! cargo build --features esp32-http
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use esp_idf_hal::cpu::Core;
use rs_tacho::hal::esp32::{Esp32Clock, Esp32PulseInput, Esp32Ticker};
#[cfg(feature = "esp32-http")]
use rs_tacho::traits::Clock;
use rs_tacho::{Config, FeedbackChannel, Tachometer};

/// Serial speed report interval in polling ticks (every 5 ticks = 1s at 200ms)
const LOG_INTERVAL_TICKS: u32 = 5;

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();

    println!();
    println!("================================");
    println!("  rs-tacho Speed Sensor");
    println!("================================");
    println!();

    // =========================================================================
    // Configuration
    // =========================================================================
    let config = Config::default().with_wifi(
        rs_tacho::WifiConfig::default()
            .with_ssid(option_env!("WIFI_SSID").unwrap_or(""))
            .with_password(option_env!("WIFI_PASSWORD").unwrap_or("")),
    );

    #[cfg(any(feature = "display", feature = "wifi"))]
    let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;

    // =========================================================================
    // Initialize Feedback Channels
    // =========================================================================
    let capture = config.capture.clone();

    let motor1 = Arc::new(
        FeedbackChannel::new(capture.motor1_id)
            .with_stale_after_ms(capture.stale_after_ms)
            .with_tick_period_ms(capture.tick_period_ms),
    );
    let motor2 = Arc::new(
        FeedbackChannel::new(capture.motor2_id)
            .with_stale_after_ms(capture.stale_after_ms)
            .with_tick_period_ms(capture.tick_period_ms),
    );

    let clock = Arc::new(Esp32Clock::new());

    let mut pulse1 = Esp32PulseInput::new(capture.motor1_pin)?;
    let mut pulse2 = Esp32PulseInput::new(capture.motor2_pin)?;

    // One consumer task per motor, split across the two cores.
    let mut ticker1 = Esp32Ticker::new().pinned_to(Core::Core0);
    let mut ticker2 = Esp32Ticker::new().pinned_to(Core::Core1);

    motor1
        .begin(Arc::clone(&clock), &mut pulse1, &mut ticker1)
        .map_err(|e| anyhow::anyhow!("Motor 1 begin failed: {:?}", e))?;
    println!(
        "[OK] Motor {} capture started (GPIO{})",
        capture.motor1_id, capture.motor1_pin
    );

    motor2
        .begin(Arc::clone(&clock), &mut pulse2, &mut ticker2)
        .map_err(|e| anyhow::anyhow!("Motor 2 begin failed: {:?}", e))?;
    println!(
        "[OK] Motor {} capture started (GPIO{})",
        capture.motor2_id, capture.motor2_pin
    );

    let mut tacho = Tachometer::new();
    tacho
        .add_channel(Arc::clone(&motor1))
        .map_err(|_| anyhow::anyhow!("Motor table full"))?;
    tacho
        .add_channel(Arc::clone(&motor2))
        .map_err(|_| anyhow::anyhow!("Motor table full"))?;

    // =========================================================================
    // Initialize Display (SSD1306 on GPIO21/22) - Optional
    // =========================================================================
    #[cfg(feature = "display")]
    let mut display = {
        use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
        use esp_idf_hal::prelude::*;
        use rs_tacho::hal::esp32::Esp32Display;

        let i2c = I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio21, // SDA
            peripherals.pins.gpio22, // SCL
            &I2cConfig::new().baudrate(400.kHz().into()),
        )?;

        let disp =
            Esp32Display::new(i2c).map_err(|e| anyhow::anyhow!("Display init failed: {:?}", e))?;
        println!("[OK] Display initialized (GPIO21/22 I2C)");
        disp
    };

    #[cfg(feature = "display")]
    {
        use rs_tacho::traits::TachoDisplay;
        display
            .init()
            .map_err(|e| anyhow::anyhow!("Display init failed: {:?}", e))?;
        let _ = display.show_message("rs-tacho", Some("Starting..."));
    }

    // =========================================================================
    // Initialize WiFi (required for HTTP)
    // =========================================================================
    #[cfg(feature = "wifi")]
    let _wifi = {
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use esp_idf_svc::nvs::EspDefaultNvsPartition;
        use rs_tacho::hal::esp32::Esp32Wifi;

        if config.wifi.is_configured() {
            let sysloop = EspSystemEventLoop::take()?;
            let nvs = EspDefaultNvsPartition::take()?;

            let wifi = Esp32Wifi::new(peripherals.modem, sysloop, Some(nvs), &config.wifi)?;
            println!("[OK] WiFi connected: {:?}", wifi.ip_addr());
            Some(wifi)
        } else {
            println!("[SKIP] WiFi not configured (set WIFI_SSID/WIFI_PASSWORD)");
            None
        }
    };

    // =========================================================================
    // Initialize HTTP Server (speed API)
    // =========================================================================
    #[cfg(feature = "esp32-http")]
    let http_state = {
        use rs_tacho::hal::esp32::{Esp32HttpServer, Esp32SharedState};
        use std::sync::Mutex;

        let shared = Arc::new(Mutex::new(Esp32SharedState::default()));
        let _server = Esp32HttpServer::new(&config.web, shared.clone())?;
        println!("[OK] HTTP server started on port {}", config.web.port);
        Some((shared, _server))
    };

    println!();
    println!("Reporting:");
    println!("  Serial:  speed lines every second");
    #[cfg(feature = "esp32-http")]
    println!("  HTTP:    GET /api/state, GET /api/speed");
    println!();
    println!(
        "Polling every {}ms ({}ms consumer period per motor)...",
        config.web.poll_interval_ms, capture.tick_period_ms
    );
    println!();

    // =========================================================================
    // Main Reporting Loop
    // =========================================================================
    let mut log_counter: u32 = 0;
    loop {
        let state = tacho.snapshot();

        // ---------------------------------------------------------------------
        // Refresh HTTP shared state
        // ---------------------------------------------------------------------
        #[cfg(feature = "esp32-http")]
        if let Some((ref shared, _)) = http_state {
            let mut guard = shared.lock().unwrap();
            guard.state = state.clone();
            guard.uptime_ms = clock.now_ms();
        }

        // ---------------------------------------------------------------------
        // Update display
        // ---------------------------------------------------------------------
        #[cfg(feature = "display")]
        {
            use rs_tacho::traits::TachoDisplay;
            let _ = display.render(&state);
        }

        // ---------------------------------------------------------------------
        // Serial speed report
        // ---------------------------------------------------------------------
        log_counter += 1;
        if log_counter >= LOG_INTERVAL_TICKS {
            log_counter = 0;
            for motor in &state.motors {
                println!("Motor {}: {} RPM", motor.id, motor.rpm);
            }
        }

        // Sleep until next polling tick
        thread::sleep(Duration::from_millis(u64::from(config.web.poll_interval_ms)));
    }
}
