//! # rs-tacho
//!
//! A pulse-period tachometer for dual-BLDC vehicle platforms, with optional
//! web API and OLED dashboard reporting.
//!
//! ## Features
//!
//! - **Interrupt-driven capture**: every edge on a motor's Hall/encoder line
//!   records an inter-edge interval into a fixed 32-slot batch
//! - **Batched estimation**: a periodic consumer reduces each completed
//!   batch (16 paired full periods) to one RPM value
//! - **Stopped-shaft detection**: a quiet feedback line forces the estimate
//!   to zero after a configurable timeout
//! - **ISR-safe synchronization**: producer and consumer share state through
//!   a critical section; speed reads are lock-free atomic loads
//! - **Hardware abstraction**: traits for the edge source, scheduler, clock
//!   and display, with mock implementations for desktop testing
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `sampler` - Interrupt-context interval capture (producer)
//! - `estimator` - Batch reduction and staleness policy (consumer)
//! - `channel` - Per-motor producer/consumer pair with its critical section
//! - `tachometer` - Multi-motor aggregate and state snapshots
//! - `traits` - Hardware and display abstractions
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rs_tacho::{FeedbackChannel, Tachometer};
//!
//! // One channel per motor, bound to an id used in reporting.
//! let motor1 = Arc::new(FeedbackChannel::new(1));
//! let mut tacho = Tachometer::new();
//! tacho.add_channel(Arc::clone(&motor1)).unwrap();
//!
//! // The interrupt source calls on_edge() per transition; here we simulate
//! // a priming edge plus one full batch at 50ms spacing.
//! for i in 0..=32u32 {
//!     motor1.on_edge(i * 50);
//! }
//!
//! // The periodic task calls on_tick(); any context may read the speed.
//! motor1.on_tick(1600);
//! assert_eq!(tacho.speed(1), 600);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Per-motor feedback channel pairing sampler and estimator.
pub mod channel;
/// Shared configuration system for desktop and ESP32.
pub mod config;
/// Batch reduction and stopped-shaft detection.
pub mod estimator;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Interrupt-context interval capture.
pub mod sampler;
/// Multi-motor aggregate and state snapshots.
pub mod tachometer;
/// Core traits for hardware abstraction and display rendering.
pub mod traits;

/// Web service for the speed API (feature-gated).
#[cfg(feature = "web")]
pub mod services;

// Re-exports for convenience
pub use channel::{ChannelError, FeedbackChannel, DEFAULT_TICK_PERIOD_MS};
pub use estimator::{SpeedEstimator, DEFAULT_STALE_AFTER_MS, MS_PER_MINUTE};
pub use sampler::{PulseSampler, PAIRED_SAMPLES, RAW_SAMPLES};
pub use tachometer::{MotorSpeed, TachoState, Tachometer, MAX_MOTORS};
pub use traits::{Clock, PulseInput, TachoDisplay, TickScheduler};

// Config re-exports
pub use config::{CaptureConfig, Config, DeviceConfig, WebConfig, WifiConfig};
