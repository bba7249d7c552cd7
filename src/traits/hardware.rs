//! Hardware abstraction traits for edge capture and periodic scheduling.
//!
//! This module defines the seams that let the tachometer core run across
//! platforms (ESP32, desktop mocks, simulation).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Clock`] | Monotonic millisecond time source |
//! | [`PulseInput`] | Any-edge interrupt source on a feedback pin |
//! | [`TickScheduler`] | Periodic task slot for the consumer |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations from
//! [`crate::hal::mock`]. For ESP32 hardware, use the implementations from
//! `hal::esp32` (requires the `esp32` feature).
//!
//! # Registration model
//!
//! Both [`PulseInput`] and [`TickScheduler`] accept an owned closure. Each
//! feedback channel passes a closure capturing its own handle, so any number
//! of channels can register independently - there is no shared static
//! dispatch slot, and the platform's interrupt machinery carries the
//! per-channel context.

/// Monotonic time source.
///
/// Provides milliseconds since an arbitrary epoch. On desktop this can wrap
/// `std::time::Instant`; on embedded, a hardware timer. The tachometer core
/// truncates readings to `u32` and works in modular arithmetic, so epoch and
/// rollover are immaterial.
///
/// # Example
///
/// ```
/// use rs_tacho::traits::Clock;
/// use rs_tacho::hal::MockClock;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}

/// Edge-interrupt source for one feedback pin.
///
/// Implementations configure the pin for any-transition interrupts and call
/// the attached handler once per edge, from interrupt context. The handler
/// must therefore be short, non-blocking and allocation-free - the feedback
/// channel's edge entry point satisfies this.
///
/// # Implementation Notes
///
/// - Sensitivity is "any transition" (rising and falling both count).
/// - The handler is attached once at startup and kept for the process
///   lifetime; there is no detach path.
/// - Implementations must not call the handler before `attach` returns.
pub trait PulseInput {
    /// Error type for interrupt registration.
    type Error;

    /// Attaches the edge handler and enables the interrupt.
    ///
    /// The closure is invoked from interrupt context on every edge.
    fn attach(&mut self, on_edge: impl FnMut() + Send + 'static) -> Result<(), Self::Error>;
}

/// Periodic task slot for consumer work.
///
/// Implementations run the given closure at a fixed period for the process
/// lifetime. On ESP32 this maps to a named FreeRTOS-backed thread with a
/// configurable priority and core affinity; in tests the mock runs ticks on
/// demand.
pub trait TickScheduler {
    /// Error type for task creation.
    type Error;

    /// Spawns a periodic task running `tick` every `period_ms`.
    ///
    /// `name` identifies the task for diagnostics and need not be unique.
    fn spawn_periodic(
        &mut self,
        name: &str,
        period_ms: u32,
        tick: impl FnMut() + Send + 'static,
    ) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now_ms(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn clock_truncation_to_u32_wraps_cleanly() {
        // Past the 32-bit boundary, the truncated reading continues modularly.
        let clock = FixedClock(u64::from(u32::MAX) + 5);
        assert_eq!(clock.now_ms() as u32, 4);
    }

    struct CapturingInput {
        handler: Option<Box<dyn FnMut() + Send>>,
    }

    impl PulseInput for CapturingInput {
        type Error = ();

        fn attach(&mut self, on_edge: impl FnMut() + Send + 'static) -> Result<(), ()> {
            self.handler = Some(Box::new(on_edge));
            Ok(())
        }
    }

    #[test]
    fn pulse_input_keeps_attached_handler() {
        use core::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let count = Arc::new(AtomicU32::new(0));
        let captured = Arc::clone(&count);

        let mut input = CapturingInput { handler: None };
        input
            .attach(move || {
                captured.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();

        let handler = input.handler.as_mut().unwrap();
        handler();
        handler();
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }
}
