//! ESP32 hardware abstraction layer for dual-motor speed sensing.
//!
//! This module provides hardware implementations for an ESP32 dev board
//! reading two BLDC motor feedback lines, with optional OLED dashboard and
//! HTTP reporting.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32 (dual-core Xtensa, 4MB Flash)
//! - **Feedback**: one Hall/encoder wave line per motor, any-edge interrupts
//! - **Display**: SSD1306 128x64 OLED (I2C)
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the vehicle wiring.

mod clock;
mod pulse;
mod ticker;

pub use clock::Esp32Clock;
pub use pulse::Esp32PulseInput;
pub use ticker::Esp32Ticker;

#[cfg(feature = "display")]
mod display;
#[cfg(feature = "display")]
pub use display::Esp32Display;

#[cfg(feature = "wifi")]
mod wifi;
#[cfg(feature = "wifi")]
pub use wifi::Esp32Wifi;

#[cfg(feature = "esp32-http")]
mod http;
#[cfg(feature = "esp32-http")]
pub use http::{Esp32HttpServer, Esp32SharedState};

/// Pin assignments for the dual-motor ESP32 board.
///
/// These constants match the vehicle wiring:
/// - Motor feedback wave lines on GPIO2/GPIO15
/// - I2C display on GPIO21/GPIO22
pub mod pins {
    // =========================================================================
    // Motor Feedback
    // =========================================================================

    /// Motor 1 Hall/encoder wave line
    pub const FEEDBACK1: i32 = 2;

    /// Motor 2 Hall/encoder wave line
    pub const FEEDBACK2: i32 = 15;

    // =========================================================================
    // I2C Display (SSD1306)
    // =========================================================================

    /// I2C data line
    pub const I2C_SDA: i32 = 21;

    /// I2C clock line
    pub const I2C_SCL: i32 = 22;

    /// Default I2C address for SSD1306 OLED
    pub const OLED_I2C_ADDR: u8 = 0x3C;
}
