//! Per-motor feedback channel: sampler + estimator under one roof.
//!
//! [`FeedbackChannel`] binds one [`PulseSampler`] (fed from interrupt
//! context) and one [`SpeedEstimator`] (driven from a periodic task) for a
//! single motor. The two run in different concurrency domains, so the
//! sampler lives behind a [`critical_section`] mutex - the "disable
//! preemption for a short bounded span" primitive that is safe to take from
//! an interrupt handler, unlike a blocking lock. The published speed is an
//! `AtomicU32`, so any context can read it without touching the lock.
//!
//! Channels are fully independent: each owns its own sampler, estimator and
//! speed word, so edges on one motor can never disturb another.
//!
//! # Entry points
//!
//! | Method | Context | Purpose |
//! |--------|---------|---------|
//! | [`on_edge`](FeedbackChannel::on_edge) | interrupt | record one edge |
//! | [`on_tick`](FeedbackChannel::on_tick) | periodic task | reduce batch, apply staleness |
//! | [`speed_rpm`](FeedbackChannel::speed_rpm) | any | read the last estimate |
//!
//! # Example
//!
//! ```
//! use rs_tacho::channel::FeedbackChannel;
//!
//! let channel = FeedbackChannel::new(1);
//!
//! // 33 edges at 50ms spacing: one priming edge + one full batch.
//! for i in 0..=32u32 {
//!     channel.on_edge(i * 50);
//! }
//!
//! channel.on_tick(32 * 50);
//! assert_eq!(channel.speed_rpm(), 600);
//! ```

use core::cell::RefCell;
use core::fmt::Write as _;
use core::sync::atomic::{AtomicU32, Ordering};

use alloc::sync::Arc;

use critical_section::Mutex;

use crate::estimator::{SpeedEstimator, DEFAULT_STALE_AFTER_MS};
use crate::sampler::PulseSampler;
use crate::traits::{Clock, PulseInput, TickScheduler};

/// Default consumer period, ms.
pub const DEFAULT_TICK_PERIOD_MS: u32 = 100;

/// Error from [`FeedbackChannel::begin`].
///
/// Wraps whichever registration failed: the edge-interrupt source or the
/// periodic scheduler.
#[derive(Debug)]
pub enum ChannelError<P, S> {
    /// Attaching the edge interrupt handler failed.
    EdgeSource(P),
    /// Spawning the periodic consumer task failed.
    Scheduler(S),
}

/// One motor's speed-sensing channel.
///
/// Constructed once at startup, bound to a motor id, and registered with an
/// interrupt source and a periodic scheduler via [`begin`](Self::begin).
/// Lives for the process lifetime; there is no shutdown path.
///
/// All methods take `&self`, so a channel is shared between its interrupt
/// closure, its consumer task and any number of readers through a single
/// `Arc`.
pub struct FeedbackChannel {
    /// Motor id, used only for reporting.
    id: u8,
    /// Producer state, shared between interrupt and task context.
    sampler: Mutex<RefCell<PulseSampler>>,
    /// Consumer policy (staleness threshold).
    estimator: SpeedEstimator,
    /// Consumer period handed to the scheduler by `begin`.
    tick_period_ms: u32,
    /// Last computed estimate; 0 while stopped. Written only by the
    /// consumer, read from any context.
    rpm: AtomicU32,
}

impl FeedbackChannel {
    /// Creates a channel for the given motor id with default policy
    /// (2000ms staleness, 100ms consumer period).
    pub fn new(id: u8) -> Self {
        Self {
            id,
            sampler: Mutex::new(RefCell::new(PulseSampler::new())),
            estimator: SpeedEstimator::new(DEFAULT_STALE_AFTER_MS),
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            rpm: AtomicU32::new(0),
        }
    }

    /// Sets the quiet time after which the channel reports zero speed.
    pub fn with_stale_after_ms(mut self, ms: u32) -> Self {
        self.estimator = SpeedEstimator::new(ms);
        self
    }

    /// Sets the consumer period requested from the scheduler.
    pub fn with_tick_period_ms(mut self, ms: u32) -> Self {
        self.tick_period_ms = ms;
        self
    }

    /// Motor id this channel reports under.
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Consumer period handed to the scheduler by [`begin`](Self::begin).
    #[inline]
    pub fn tick_period_ms(&self) -> u32 {
        self.tick_period_ms
    }

    /// Interrupt entry point: records one edge observed at `now_ms`.
    ///
    /// The entire sampler update runs inside one critical section, so the
    /// consumer can never observe a half-written batch. Bounded, O(1),
    /// allocation-free, no I/O - fit for ISR context.
    pub fn on_edge(&self, now_ms: u32) {
        critical_section::with(|cs| {
            self.sampler.borrow_ref_mut(cs).record_edge(now_ms);
        });
    }

    /// Periodic entry point: reduces a completed batch and applies the
    /// staleness override.
    ///
    /// The critical section covers only the batch handoff; the arithmetic
    /// runs outside it. A degenerate batch (zero total) leaves the previous
    /// estimate in place. The staleness check runs every tick regardless of
    /// whether a batch completed, forcing the estimate to zero once the
    /// feedback line has been quiet past the threshold.
    pub fn on_tick(&self, now_ms: u32) {
        let (batch, last_edge_ms) = critical_section::with(|cs| {
            let mut sampler = self.sampler.borrow_ref_mut(cs);
            (sampler.take_batch(), sampler.last_edge_ms())
        });

        if let Some(batch) = batch {
            if let Some(rpm) = SpeedEstimator::reduce(&batch) {
                self.rpm.store(rpm, Ordering::Relaxed);
            }
        }

        if self.estimator.is_stale(last_edge_ms, now_ms) {
            self.rpm.store(0, Ordering::Relaxed);
        }
    }

    /// Last computed speed in RPM; 0 while the shaft is stopped.
    ///
    /// Non-blocking, never fails, callable from any context. Reading twice
    /// without an intervening consumer tick returns the same value.
    #[inline]
    pub fn speed_rpm(&self) -> u32 {
        self.rpm.load(Ordering::Relaxed)
    }

    /// Registers this channel with its edge source and periodic scheduler.
    ///
    /// Call once at startup. The channel hands its own `Arc` into both
    /// closures, so any number of channels can register independently - no
    /// shared static dispatch slot. The interrupt source fires on any
    /// transition; the scheduler runs the consumer every
    /// [`tick_period_ms`](Self::tick_period_ms).
    pub fn begin<C, P, S>(
        self: &Arc<Self>,
        clock: Arc<C>,
        pulse: &mut P,
        scheduler: &mut S,
    ) -> Result<(), ChannelError<P::Error, S::Error>>
    where
        C: Clock + Send + Sync + 'static,
        P: PulseInput,
        S: TickScheduler,
    {
        let channel = Arc::clone(self);
        let edge_clock = Arc::clone(&clock);
        pulse
            .attach(move || channel.on_edge(edge_clock.now_ms() as u32))
            .map_err(ChannelError::EdgeSource)?;

        let mut task_name = heapless::String::<16>::new();
        let _ = write!(task_name, "tacho{}", self.id);

        let channel = Arc::clone(self);
        scheduler
            .spawn_periodic(&task_name, self.tick_period_ms, move || {
                channel.on_tick(clock.now_ms() as u32)
            })
            .map_err(ChannelError::Scheduler)?;

        Ok(())
    }

    /// Raw slots filled since the last batch reset (test/diagnostic access).
    pub fn fill_index(&self) -> usize {
        critical_section::with(|cs| self.sampler.borrow_ref(cs).fill_index())
    }

    /// True when a completed batch awaits the consumer (test/diagnostic
    /// access).
    pub fn batch_ready(&self) -> bool {
        critical_section::with(|cs| self.sampler.borrow_ref(cs).batch_ready())
    }

    /// Timestamp of the most recent edge, ms (test/diagnostic access).
    pub fn last_edge_ms(&self) -> u32 {
        critical_section::with(|cs| self.sampler.borrow_ref(cs).last_edge_ms())
    }
}

impl core::fmt::Debug for FeedbackChannel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FeedbackChannel")
            .field("id", &self.id)
            .field("rpm", &self.speed_rpm())
            .field("tick_period_ms", &self.tick_period_ms)
            .finish()
    }
}
