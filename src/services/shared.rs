//! Shared state handed to every reporting service.
//!
//! [`SharedTachoState`] wraps the [`Tachometer`] together with a common time
//! base so the web API, display loop and any logger see consistent uptime
//! stamps.
//!
//! Unlike a controller that takes commands, the tachometer is read-only for
//! its consumers, and every per-motor speed is a single atomic word - so no
//! mutex is needed here at all. Services read snapshots concurrently while
//! the consumer tasks keep updating the channels underneath.

use std::time::Instant;

use crate::{TachoState, Tachometer};

/// Unified shared state for all reporting services (web, display, logger).
///
/// Wraps the tachometer and a start instant. Cheap to share via `Arc`; all
/// reads are lock-free.
pub struct SharedTachoState {
    /// The tachometer; channels inside are `Arc`s shared with their
    /// interrupt closures and consumer tasks.
    tachometer: Tachometer,

    /// Time when the state was created (for consistent timestamps across
    /// services).
    start_time: Instant,
}

impl SharedTachoState {
    /// Create new shared state wrapping a tachometer.
    ///
    /// The `start_time` is set to `Instant::now()`, which becomes the time
    /// base for all `now_ms()` calls across all services sharing this state.
    pub fn new(tachometer: Tachometer) -> Self {
        Self {
            tachometer,
            start_time: Instant::now(),
        }
    }

    /// Get current timestamp in milliseconds since state creation.
    ///
    /// This is the unified time source for all services.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Uptime in milliseconds (alias of [`now_ms`](Self::now_ms), named for
    /// reporting).
    #[inline]
    pub fn uptime_ms(&self) -> u64 {
        self.now_ms()
    }

    /// Get a read-only snapshot of every motor's current speed.
    pub fn snapshot(&self) -> TachoState {
        self.tachometer.snapshot()
    }

    /// Current speed of the given motor in RPM; unknown ids read 0.
    pub fn speed(&self, motor_id: u8) -> u32 {
        self.tachometer.speed(motor_id)
    }

    /// The wrapped tachometer, for hosts that drive consumer ticks
    /// themselves.
    pub fn tachometer(&self) -> &Tachometer {
        &self.tachometer
    }

    /// Runs one consumer step on every channel at the shared time base.
    ///
    /// Convenience for desktop hosts that poll instead of registering
    /// per-channel periodic tasks.
    pub fn tick(&self) {
        let now = self.now_ms() as u32;
        self.tachometer.tick_all(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeedbackChannel;
    use std::sync::Arc;

    fn shared_with_motor() -> (SharedTachoState, Arc<FeedbackChannel>) {
        let channel = Arc::new(FeedbackChannel::new(1));
        let mut tacho = Tachometer::new();
        tacho.add_channel(Arc::clone(&channel)).unwrap();
        (SharedTachoState::new(tacho), channel)
    }

    #[test]
    fn snapshot_sees_channel_updates() {
        let (state, channel) = shared_with_motor();

        for i in 0..=32u32 {
            channel.on_edge(i * 50);
        }
        channel.on_tick(1600);

        assert_eq!(state.speed(1), 600);
        assert_eq!(state.snapshot().motor(1).unwrap().rpm, 600);
    }

    #[test]
    fn unknown_motor_reads_zero() {
        let (state, _channel) = shared_with_motor();
        assert_eq!(state.speed(9), 0);
    }

    #[test]
    fn time_base_is_monotonic() {
        let (state, _channel) = shared_with_motor();
        let a = state.now_ms();
        let b = state.now_ms();
        assert!(b >= a);
    }
}
