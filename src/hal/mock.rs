//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the hardware and display traits,
//! enabling development and testing on desktop without physical hardware.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockClock`] | [`Clock`] | Controllable, shareable time source |
//! | [`MockPulseInput`] | [`PulseInput`] | Captures the edge handler, fires edges on demand |
//! | [`MockTicker`] | [`TickScheduler`] | Captures periodic tasks, runs ticks on demand |
//! | [`MockDisplay`] | [`TachoDisplay`] | Tracks render calls |
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rs_tacho::FeedbackChannel;
//! use rs_tacho::hal::{MockClock, MockPulseInput, MockTicker};
//!
//! let clock = Arc::new(MockClock::new());
//! let mut pulse = MockPulseInput::new();
//! let mut ticker = MockTicker::new();
//!
//! let channel = Arc::new(FeedbackChannel::new(1));
//! channel.begin(Arc::clone(&clock), &mut pulse, &mut ticker).unwrap();
//!
//! // Simulate edges at 50ms spacing: priming edge + one full batch.
//! for _ in 0..=32 {
//!     pulse.fire_edge();
//!     clock.advance(50);
//! }
//!
//! ticker.tick_all();
//! assert_eq!(channel.speed_rpm(), 600);
//! ```
//!
//! [`Clock`]: crate::traits::Clock
//! [`PulseInput`]: crate::traits::PulseInput
//! [`TickScheduler`]: crate::traits::TickScheduler
//! [`TachoDisplay`]: crate::traits::TachoDisplay

use core::cell::Cell;

use critical_section::Mutex;

use crate::traits::{Clock, PulseInput, TachoDisplay, TickScheduler};

extern crate alloc;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

// ============================================================================
// Clock Mock
// ============================================================================

/// Mock clock for testing.
///
/// A controllable time source. Clones share the same underlying time, so the
/// instance handed to `begin()` and the one kept by the test stay in step.
///
/// # Example
///
/// ```rust
/// use rs_tacho::hal::MockClock;
/// use rs_tacho::traits::Clock;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.set(1000);
/// assert_eq!(clock.now_ms(), 1000);
///
/// clock.advance(500);
/// assert_eq!(clock.now_ms(), 1500);
/// ```
#[derive(Clone)]
pub struct MockClock {
    current_ms: Arc<Mutex<Cell<u64>>>,
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClock {
    /// Creates a new mock clock starting at 0ms.
    pub fn new() -> Self {
        Self {
            current_ms: Arc::new(Mutex::new(Cell::new(0))),
        }
    }

    /// Sets the current time in milliseconds.
    pub fn set(&self, ms: u64) {
        critical_section::with(|cs| self.current_ms.borrow(cs).set(ms));
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, ms: u64) {
        critical_section::with(|cs| {
            let cell = self.current_ms.borrow(cs);
            cell.set(cell.get() + ms);
        });
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        critical_section::with(|cs| self.current_ms.borrow(cs).get())
    }
}

impl core::fmt::Debug for MockClock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockClock")
            .field("current_ms", &self.now_ms())
            .finish()
    }
}

// ============================================================================
// Pulse Input Mock
// ============================================================================

/// Mock edge-interrupt source for testing.
///
/// Captures the handler passed to `attach()` and lets tests fire edges on
/// demand, standing in for the hardware interrupt dispatch.
///
/// # Example
///
/// ```rust
/// use rs_tacho::hal::MockPulseInput;
/// use rs_tacho::traits::PulseInput;
///
/// let mut pulse = MockPulseInput::new();
/// assert!(!pulse.is_attached());
/// assert!(!pulse.fire_edge()); // nothing attached yet
///
/// pulse.attach(|| {}).unwrap();
/// assert!(pulse.is_attached());
/// assert!(pulse.fire_edge());
/// assert_eq!(pulse.edges_fired, 1);
/// ```
#[derive(Default)]
pub struct MockPulseInput {
    handler: Option<Box<dyn FnMut() + Send>>,
    /// Number of edges fired so far.
    pub edges_fired: usize,
}

impl MockPulseInput {
    /// Creates a new mock input with no handler attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a handler has been attached.
    pub fn is_attached(&self) -> bool {
        self.handler.is_some()
    }

    /// Fires one edge through the attached handler.
    ///
    /// Returns false (and counts nothing) when no handler is attached.
    pub fn fire_edge(&mut self) -> bool {
        match self.handler.as_mut() {
            Some(handler) => {
                handler();
                self.edges_fired += 1;
                true
            }
            None => false,
        }
    }

    /// Fires `count` edges back to back.
    pub fn fire_edges(&mut self, count: usize) {
        for _ in 0..count {
            if !self.fire_edge() {
                break;
            }
        }
    }
}

impl PulseInput for MockPulseInput {
    type Error = ();

    fn attach(&mut self, on_edge: impl FnMut() + Send + 'static) -> Result<(), ()> {
        self.handler = Some(Box::new(on_edge));
        Ok(())
    }
}

impl core::fmt::Debug for MockPulseInput {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockPulseInput")
            .field("attached", &self.is_attached())
            .field("edges_fired", &self.edges_fired)
            .finish()
    }
}

// ============================================================================
// Scheduler Mock
// ============================================================================

struct MockTask {
    name: String,
    period_ms: u32,
    tick: Box<dyn FnMut() + Send>,
}

/// Mock periodic scheduler for testing.
///
/// Captures spawned tasks and runs their ticks on demand, standing in for
/// the platform's task scheduler.
///
/// # Example
///
/// ```rust
/// use rs_tacho::hal::MockTicker;
/// use rs_tacho::traits::TickScheduler;
///
/// let mut ticker = MockTicker::new();
/// ticker.spawn_periodic("tacho1", 100, || {}).unwrap();
///
/// assert_eq!(ticker.task_count(), 1);
/// assert_eq!(ticker.period_of("tacho1"), Some(100));
/// assert!(ticker.tick("tacho1"));
/// assert!(!ticker.tick("unknown"));
/// ```
#[derive(Default)]
pub struct MockTicker {
    tasks: Vec<MockTask>,
}

impl MockTicker {
    /// Creates a new mock scheduler with no tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spawned tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Period of the named task, if spawned.
    pub fn period_of(&self, name: &str) -> Option<u32> {
        self.tasks
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.period_ms)
    }

    /// Runs one tick of the named task. Returns false if unknown.
    pub fn tick(&mut self, name: &str) -> bool {
        match self.tasks.iter_mut().find(|t| t.name == name) {
            Some(task) => {
                (task.tick)();
                true
            }
            None => false,
        }
    }

    /// Runs one tick of every spawned task, in spawn order.
    pub fn tick_all(&mut self) {
        for task in &mut self.tasks {
            (task.tick)();
        }
    }
}

impl TickScheduler for MockTicker {
    type Error = ();

    fn spawn_periodic(
        &mut self,
        name: &str,
        period_ms: u32,
        tick: impl FnMut() + Send + 'static,
    ) -> Result<(), ()> {
        self.tasks.push(MockTask {
            name: name.into(),
            period_ms,
            tick: Box::new(tick),
        });
        Ok(())
    }
}

impl core::fmt::Debug for MockTicker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockTicker")
            .field("task_count", &self.task_count())
            .finish()
    }
}

// ============================================================================
// Display Mock
// ============================================================================

/// Mock display for testing dashboard rendering.
///
/// Tracks render calls and stores the last rendered state for verification.
///
/// # Example
///
/// ```
/// use rs_tacho::hal::MockDisplay;
/// use rs_tacho::traits::TachoDisplay;
///
/// let mut display = MockDisplay::new();
/// display.init().unwrap();
/// assert_eq!(display.render_count, 0);
/// ```
#[derive(Debug, Default)]
pub struct MockDisplay {
    /// The last state that was rendered.
    pub last_state: Option<crate::TachoState>,
    /// Number of times render() was called.
    pub render_count: usize,
    /// Last message shown via show_message().
    pub last_message: Option<(String, Option<String>)>,
    /// Whether init() was called.
    pub initialized: bool,
}

impl MockDisplay {
    /// Creates a new mock display.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TachoDisplay for MockDisplay {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        self.initialized = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ()> {
        self.last_state = None;
        Ok(())
    }

    fn render(&mut self, state: &crate::TachoState) -> Result<(), ()> {
        self.last_state = Some(state.clone());
        self.render_count += 1;
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), ()> {
        self.last_message = Some((line1.into(), line2.map(Into::into)));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MotorSpeed, TachoState};

    // =========================================================================
    // MockClock Tests
    // =========================================================================

    #[test]
    fn mock_clock_default() {
        let clock = MockClock::new();
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn mock_clock_set() {
        let clock = MockClock::new();
        clock.set(1000);
        assert_eq!(clock.now_ms(), 1000);
    }

    #[test]
    fn mock_clock_advance() {
        let clock = MockClock::new();
        clock.advance(500);
        assert_eq!(clock.now_ms(), 500);
        clock.advance(250);
        assert_eq!(clock.now_ms(), 750);
    }

    #[test]
    fn mock_clock_clones_share_time() {
        let clock = MockClock::new();
        let shared = clock.clone();

        clock.advance(300);
        assert_eq!(shared.now_ms(), 300);

        shared.set(40);
        assert_eq!(clock.now_ms(), 40);
    }

    // =========================================================================
    // MockPulseInput Tests
    // =========================================================================

    #[test]
    fn mock_pulse_input_default() {
        let mut pulse = MockPulseInput::new();
        assert!(!pulse.is_attached());
        assert!(!pulse.fire_edge());
        assert_eq!(pulse.edges_fired, 0);
    }

    #[test]
    fn mock_pulse_input_fires_handler() {
        use core::sync::atomic::{AtomicUsize, Ordering};

        let count = Arc::new(AtomicUsize::new(0));
        let captured = Arc::clone(&count);

        let mut pulse = MockPulseInput::new();
        pulse
            .attach(move || {
                captured.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();

        pulse.fire_edges(5);
        assert_eq!(count.load(Ordering::Relaxed), 5);
        assert_eq!(pulse.edges_fired, 5);
    }

    // =========================================================================
    // MockTicker Tests
    // =========================================================================

    #[test]
    fn mock_ticker_default() {
        let mut ticker = MockTicker::new();
        assert_eq!(ticker.task_count(), 0);
        assert!(!ticker.tick("anything"));
        assert_eq!(ticker.period_of("anything"), None);
    }

    #[test]
    fn mock_ticker_runs_named_task() {
        use core::sync::atomic::{AtomicUsize, Ordering};

        let count = Arc::new(AtomicUsize::new(0));
        let captured = Arc::clone(&count);

        let mut ticker = MockTicker::new();
        ticker
            .spawn_periodic("tacho1", 100, move || {
                captured.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();

        assert!(ticker.tick("tacho1"));
        assert!(ticker.tick("tacho1"));
        assert_eq!(count.load(Ordering::Relaxed), 2);
        assert_eq!(ticker.period_of("tacho1"), Some(100));
    }

    #[test]
    fn mock_ticker_tick_all_runs_every_task() {
        use core::sync::atomic::{AtomicUsize, Ordering};

        let count = Arc::new(AtomicUsize::new(0));
        let mut ticker = MockTicker::new();
        for name in ["tacho1", "tacho2"] {
            let captured = Arc::clone(&count);
            ticker
                .spawn_periodic(name, 100, move || {
                    captured.fetch_add(1, Ordering::Relaxed);
                })
                .unwrap();
        }

        ticker.tick_all();
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }

    // =========================================================================
    // MockDisplay Tests
    // =========================================================================

    #[test]
    fn mock_display_default() {
        let display = MockDisplay::new();
        assert!(display.last_state.is_none());
        assert_eq!(display.render_count, 0);
        assert!(display.last_message.is_none());
        assert!(!display.initialized);
    }

    #[test]
    fn mock_display_init() {
        let mut display = MockDisplay::new();
        assert!(!display.initialized);
        display.init().unwrap();
        assert!(display.initialized);
    }

    #[test]
    fn mock_display_render() {
        let mut display = MockDisplay::new();
        display.init().unwrap();

        let mut state = TachoState::default();
        state.motors.push(MotorSpeed { id: 1, rpm: 600 }).unwrap();

        display.render(&state).unwrap();
        assert_eq!(display.render_count, 1);

        let rendered = display.last_state.as_ref().unwrap();
        assert_eq!(rendered.motor(1).unwrap().rpm, 600);

        // Render again
        display.render(&state).unwrap();
        assert_eq!(display.render_count, 2);
    }

    #[test]
    fn mock_display_show_message() {
        let mut display = MockDisplay::new();
        display.show_message("Hello", Some("World")).unwrap();

        let (line1, line2) = display.last_message.as_ref().unwrap();
        assert_eq!(line1, "Hello");
        assert_eq!(line2.as_deref(), Some("World"));
    }

    #[test]
    fn mock_display_clear() {
        let mut display = MockDisplay::new();
        let state = TachoState::default();
        display.render(&state).unwrap();
        assert!(display.last_state.is_some());

        display.clear().unwrap();
        assert!(display.last_state.is_none());
    }
}
