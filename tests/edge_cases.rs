//! Edge case and boundary condition tests for the speed estimator.

use std::sync::Arc;

use rs_tacho::{
    FeedbackChannel, PulseSampler, SpeedEstimator, Tachometer, MAX_MOTORS, PAIRED_SAMPLES,
    RAW_SAMPLES,
};

fn feed_batch(channel: &FeedbackChannel, start_ms: u32, spacing_ms: u32) -> u32 {
    let mut t = start_ms;
    channel.on_edge(t);
    for _ in 0..RAW_SAMPLES {
        t = t.wrapping_add(spacing_ms);
        channel.on_edge(t);
    }
    t
}

// ============================================================================
// Buffer Bounds
// ============================================================================

#[test]
fn fill_index_bounded_over_long_runs() {
    let channel = FeedbackChannel::new(1);
    let mut t = 0u32;
    for i in 0..1000u32 {
        t = t.wrapping_add(10 + (i % 7));
        channel.on_edge(t);
        let fill = channel.fill_index();
        assert!(fill < RAW_SAMPLES, "fill_index {} out of bounds", fill);
    }
}

#[test]
fn pairing_holds_for_irregular_spacing() {
    let mut sampler = PulseSampler::new();
    let mut t = 0u32;
    sampler.record_edge(t);
    for i in 0..RAW_SAMPLES as u32 {
        t += 5 + (i * 3) % 40;
        sampler.record_edge(t);
    }

    let raw = *sampler.raw_intervals();
    let paired = *sampler.paired_intervals();
    for k in 0..PAIRED_SAMPLES {
        assert_eq!(paired[k], raw[2 * k] + raw[2 * k + 1]);
    }
}

#[test]
fn exactly_32_intervals_complete_a_batch() {
    let channel = FeedbackChannel::new(1);
    channel.on_edge(0);

    let mut t = 0;
    for n in 1..=RAW_SAMPLES as u32 {
        t += 50;
        channel.on_edge(t);
        if n < RAW_SAMPLES as u32 {
            assert!(!channel.batch_ready(), "batch ready early at edge {}", n);
        }
    }

    assert!(channel.batch_ready());
    assert_eq!(channel.fill_index(), 0);
}

// ============================================================================
// Numeric Hazards
// ============================================================================

#[test]
fn zero_total_period_never_updates() {
    let channel = FeedbackChannel::new(1);
    for _ in 0..=RAW_SAMPLES {
        channel.on_edge(777);
    }

    // Estimate untouched from its initial zero; the tick must not fault.
    channel.on_tick(777);
    assert_eq!(channel.speed_rpm(), 0);
}

#[test]
fn reduce_rejects_zero_and_nothing_else() {
    assert_eq!(SpeedEstimator::reduce(&[0; PAIRED_SAMPLES]), None);

    let mut one_nonzero = [0u32; PAIRED_SAMPLES];
    one_nonzero[7] = 1600;
    assert_eq!(SpeedEstimator::reduce(&one_nonzero), Some(600));
}

#[test]
fn batch_spanning_clock_rollover_is_correct() {
    let channel = FeedbackChannel::new(1);
    let start = u32::MAX - 777;
    let last = feed_batch(&channel, start, 50);

    channel.on_tick(last);
    assert_eq!(channel.speed_rpm(), 600);
}

// ============================================================================
// Staleness
// ============================================================================

#[test]
fn staleness_is_strictly_greater_than_threshold() {
    let channel = FeedbackChannel::new(1);
    let last = feed_batch(&channel, 0, 50);
    channel.on_tick(last);
    assert_eq!(channel.speed_rpm(), 600);

    channel.on_tick(last + 2000);
    assert_eq!(channel.speed_rpm(), 600);

    channel.on_tick(last + 2001);
    assert_eq!(channel.speed_rpm(), 0);
}

#[test]
fn custom_threshold_is_honored() {
    let channel = FeedbackChannel::new(1).with_stale_after_ms(300);
    let last = feed_batch(&channel, 0, 50);
    channel.on_tick(last);

    channel.on_tick(last + 301);
    assert_eq!(channel.speed_rpm(), 0);
}

#[test]
fn estimate_recovers_after_stall() {
    let channel = FeedbackChannel::new(1);
    let last = feed_batch(&channel, 0, 50);
    channel.on_tick(last);
    assert_eq!(channel.speed_rpm(), 600);

    // Stall long enough to read zero.
    channel.on_tick(last + 5000);
    assert_eq!(channel.speed_rpm(), 0);

    // Shaft starts again. The first interval of the new batch covers the
    // whole 3000ms gap (the channel never re-primes), so the first batch
    // after a stall averages the gap in: total = 3000 + 31*50 = 4550ms.
    let mut t = last + 3000;
    channel.on_edge(t);
    for _ in 0..RAW_SAMPLES - 1 {
        t += 50;
        channel.on_edge(t);
    }
    channel.on_tick(t);
    assert_eq!(channel.speed_rpm(), 211); // round(960_000 / 4550)
}

// ============================================================================
// Read Semantics
// ============================================================================

#[test]
fn reads_without_events_are_stable() {
    let channel = FeedbackChannel::new(1);
    let last = feed_batch(&channel, 0, 50);
    channel.on_tick(last);

    assert_eq!(channel.speed_rpm(), channel.speed_rpm());
}

#[test]
fn ticks_without_new_batches_keep_the_value() {
    let channel = FeedbackChannel::new(1);
    let last = feed_batch(&channel, 0, 50);
    channel.on_tick(last);

    // Repeated consumer passes inside the staleness window change nothing.
    for dt in [100u32, 200, 500, 1000] {
        channel.on_tick(last + dt);
        assert_eq!(channel.speed_rpm(), 600);
    }
}

// ============================================================================
// Isolation and Aggregate
// ============================================================================

#[test]
fn edges_on_one_channel_leave_the_other_untouched() {
    let a = FeedbackChannel::new(1);
    let b = FeedbackChannel::new(2);

    feed_batch(&a, 0, 50);

    assert_eq!(b.fill_index(), 0);
    assert!(!b.batch_ready());
    assert_eq!(b.last_edge_ms(), 0);
    assert_eq!(b.speed_rpm(), 0);
}

#[test]
fn different_speeds_per_channel() {
    let a = Arc::new(FeedbackChannel::new(1));
    let b = Arc::new(FeedbackChannel::new(2));
    let mut tacho = Tachometer::new();
    tacho.add_channel(Arc::clone(&a)).unwrap();
    tacho.add_channel(Arc::clone(&b)).unwrap();

    let last_a = feed_batch(&a, 0, 50); // 600 RPM
    let last_b = feed_batch(&b, 0, 100); // 300 RPM
    tacho.tick_all(last_a.max(last_b));

    assert_eq!(tacho.speed(1), 600);
    assert_eq!(tacho.speed(2), 300);
}

#[test]
fn unknown_motor_id_reads_zero() {
    let mut tacho = Tachometer::new();
    tacho.add_channel(Arc::new(FeedbackChannel::new(1))).unwrap();
    assert_eq!(tacho.speed(42), 0);
}

#[test]
fn motor_table_capacity() {
    let mut tacho = Tachometer::new();
    for id in 0..MAX_MOTORS as u8 {
        tacho.add_channel(Arc::new(FeedbackChannel::new(id))).unwrap();
    }
    assert!(tacho
        .add_channel(Arc::new(FeedbackChannel::new(99)))
        .is_err());
}

// ============================================================================
// Consecutive Batches
// ============================================================================

#[test]
fn speed_tracks_changing_shaft_rate() {
    let channel = FeedbackChannel::new(1);
    let last = feed_batch(&channel, 0, 50);
    channel.on_tick(last);
    assert_eq!(channel.speed_rpm(), 600);

    // Shaft speeds up: 25ms spacing -> 1200 RPM on the next batch.
    let mut t = last;
    for _ in 0..RAW_SAMPLES {
        t += 25;
        channel.on_edge(t);
    }
    channel.on_tick(t);
    assert_eq!(channel.speed_rpm(), 1200);
}

#[test]
fn unconsumed_batch_is_replaced_by_the_next() {
    let channel = FeedbackChannel::new(1);
    let last = feed_batch(&channel, 0, 50);

    // A second batch completes before any consumer tick runs.
    let mut t = last;
    for _ in 0..RAW_SAMPLES {
        t += 25;
        channel.on_edge(t);
    }

    // The consumer sees the freshest batch.
    channel.on_tick(t);
    assert_eq!(channel.speed_rpm(), 1200);
}
