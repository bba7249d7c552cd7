//! Integration tests for the feedback channels and tachometer.

use std::sync::Arc;

use rs_tacho::hal::{MockClock, MockPulseInput, MockTicker};
use rs_tacho::{FeedbackChannel, Tachometer, RAW_SAMPLES};

/// Primes the channel at `start_ms`, then feeds one full batch of edges at
/// the given spacing. Returns the timestamp of the last edge.
fn feed_batch(channel: &FeedbackChannel, start_ms: u32, spacing_ms: u32) -> u32 {
    let mut t = start_ms;
    channel.on_edge(t);
    for _ in 0..RAW_SAMPLES {
        t = t.wrapping_add(spacing_ms);
        channel.on_edge(t);
    }
    t
}

#[test]
fn constant_50ms_edges_read_600_rpm() {
    // 50ms per edge -> 100ms per paired period -> 1600ms over 16 periods.
    let channel = FeedbackChannel::new(1);
    let last = feed_batch(&channel, 0, 50);

    channel.on_tick(last);
    assert_eq!(channel.speed_rpm(), 600);
}

#[test]
fn quiet_channel_reads_zero_after_timeout() {
    let channel = FeedbackChannel::new(1);
    channel.on_edge(0); // primes last_edge at t=0

    channel.on_tick(2001);
    assert_eq!(channel.speed_rpm(), 0);
}

#[test]
fn thirty_one_edges_complete_no_batch() {
    let channel = FeedbackChannel::new(1);
    channel.on_edge(0);

    let mut t = 0;
    for _ in 0..RAW_SAMPLES - 1 {
        t += 50;
        channel.on_edge(t);
    }

    assert!(!channel.batch_ready());
    channel.on_tick(t);
    assert_eq!(channel.speed_rpm(), 0, "no batch, no estimate");
}

#[test]
fn zero_interval_batch_keeps_previous_value() {
    let channel = FeedbackChannel::new(1);
    let last = feed_batch(&channel, 0, 50);
    channel.on_tick(last);
    assert_eq!(channel.speed_rpm(), 600);

    // 32 edges at one instant sum to a zero total period.
    for _ in 0..RAW_SAMPLES {
        channel.on_edge(last);
    }
    channel.on_tick(last);

    assert_eq!(channel.speed_rpm(), 600);
    assert!(!channel.batch_ready(), "degenerate batch is still consumed");
}

#[test]
fn two_channels_one_fed_one_idle() {
    let a = Arc::new(FeedbackChannel::new(1));
    let b = Arc::new(FeedbackChannel::new(2));
    let mut tacho = Tachometer::new();
    tacho.add_channel(Arc::clone(&a)).unwrap();
    tacho.add_channel(Arc::clone(&b)).unwrap();

    let last = feed_batch(&a, 0, 50);
    tacho.tick_all(last);

    assert_eq!(tacho.speed(1), 600);
    assert_eq!(tacho.speed(2), 0);
}

// ============================================================================
// Lifecycle via the HAL traits
// ============================================================================

#[test]
fn begin_registers_interrupt_and_periodic_task() {
    let clock = Arc::new(MockClock::new());
    let mut pulse = MockPulseInput::new();
    let mut ticker = MockTicker::new();

    let channel = Arc::new(FeedbackChannel::new(1));
    channel
        .begin(Arc::clone(&clock), &mut pulse, &mut ticker)
        .unwrap();

    assert!(pulse.is_attached());
    assert_eq!(ticker.task_count(), 1);
    assert_eq!(ticker.period_of("tacho1"), Some(100));
}

#[test]
fn full_pipeline_through_mock_hardware() {
    let clock = Arc::new(MockClock::new());
    let mut pulse = MockPulseInput::new();
    let mut ticker = MockTicker::new();

    let channel = Arc::new(FeedbackChannel::new(1));
    channel
        .begin(Arc::clone(&clock), &mut pulse, &mut ticker)
        .unwrap();

    // Priming edge plus one full batch at 50ms spacing.
    for _ in 0..=RAW_SAMPLES {
        pulse.fire_edge();
        clock.advance(50);
    }

    ticker.tick("tacho1");
    assert_eq!(channel.speed_rpm(), 600);
}

#[test]
fn mock_pipeline_staleness() {
    let clock = Arc::new(MockClock::new());
    let mut pulse = MockPulseInput::new();
    let mut ticker = MockTicker::new();

    let channel = Arc::new(FeedbackChannel::new(2));
    channel
        .begin(Arc::clone(&clock), &mut pulse, &mut ticker)
        .unwrap();

    for _ in 0..=RAW_SAMPLES {
        pulse.fire_edge();
        clock.advance(50);
    }
    ticker.tick("tacho2");
    assert_eq!(channel.speed_rpm(), 600);

    // Line goes quiet; past the threshold the estimate drops to zero.
    clock.advance(2500);
    ticker.tick("tacho2");
    assert_eq!(channel.speed_rpm(), 0);
}

#[test]
fn two_channels_register_independently() {
    let clock = Arc::new(MockClock::new());

    let mut pulse1 = MockPulseInput::new();
    let mut pulse2 = MockPulseInput::new();
    let mut ticker = MockTicker::new();

    let motor1 = Arc::new(FeedbackChannel::new(1));
    let motor2 = Arc::new(FeedbackChannel::new(2));

    motor1
        .begin(Arc::clone(&clock), &mut pulse1, &mut ticker)
        .unwrap();
    motor2
        .begin(Arc::clone(&clock), &mut pulse2, &mut ticker)
        .unwrap();

    assert_eq!(ticker.task_count(), 2);

    // Only motor 1 sees edges.
    for _ in 0..=RAW_SAMPLES {
        pulse1.fire_edge();
        clock.advance(50);
    }
    ticker.tick_all();

    assert_eq!(motor1.speed_rpm(), 600);
    assert_eq!(motor2.speed_rpm(), 0);
}
