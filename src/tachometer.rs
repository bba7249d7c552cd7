//! Multi-motor aggregate and state snapshots.
//!
//! [`Tachometer`] composes the per-motor [`FeedbackChannel`]s of a vehicle
//! and offers the one call every external collaborator uses: look up a
//! motor's current speed. Display renderers, the web API and data loggers
//! all poll here; none of them touch channel internals.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rs_tacho::{FeedbackChannel, Tachometer};
//!
//! let mut tacho = Tachometer::new();
//! tacho.add_channel(Arc::new(FeedbackChannel::new(1))).unwrap();
//! tacho.add_channel(Arc::new(FeedbackChannel::new(2))).unwrap();
//!
//! // No edges yet: both motors read stopped.
//! assert_eq!(tacho.speed(1), 0);
//! assert_eq!(tacho.speed(2), 0);
//!
//! // Unknown ids read 0 rather than failing.
//! assert_eq!(tacho.speed(9), 0);
//! ```

use alloc::sync::Arc;

use crate::channel::FeedbackChannel;

/// Maximum number of motors a tachometer tracks.
pub const MAX_MOTORS: usize = 4;

/// Speed reading for one motor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorSpeed {
    /// Motor id.
    pub id: u8,
    /// Last estimate in RPM; 0 while stopped.
    pub rpm: u32,
}

/// Value snapshot of every motor's speed, for display/API/logging.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TachoState {
    /// One entry per registered channel, in registration order.
    pub motors: heapless::Vec<MotorSpeed, MAX_MOTORS>,
}

impl TachoState {
    /// Reading for the given motor id, if registered.
    pub fn motor(&self, id: u8) -> Option<&MotorSpeed> {
        self.motors.iter().find(|m| m.id == id)
    }
}

/// The set of feedback channels for one vehicle.
///
/// Channels are held by `Arc`, so the same instances stay registered with
/// their interrupt sources and consumer tasks while the tachometer serves
/// reads. Speed lookups are plain atomic reads - no locking.
#[derive(Debug, Default)]
pub struct Tachometer {
    channels: heapless::Vec<Arc<FeedbackChannel>, MAX_MOTORS>,
}

impl Tachometer {
    /// Creates an empty tachometer.
    pub fn new() -> Self {
        Self {
            channels: heapless::Vec::new(),
        }
    }

    /// Registers a channel.
    ///
    /// Returns the channel back when the motor table is full. The first
    /// channel registered under an id wins lookups for that id.
    pub fn add_channel(
        &mut self,
        channel: Arc<FeedbackChannel>,
    ) -> Result<(), Arc<FeedbackChannel>> {
        self.channels.push(channel)
    }

    /// Current speed of the given motor in RPM.
    ///
    /// Unknown ids read 0 - the accessor never fails and never blocks.
    pub fn speed(&self, motor_id: u8) -> u32 {
        self.channel(motor_id).map_or(0, |c| c.speed_rpm())
    }

    /// The channel registered for the given motor id.
    pub fn channel(&self, motor_id: u8) -> Option<&Arc<FeedbackChannel>> {
        self.channels.iter().find(|c| c.id() == motor_id)
    }

    /// Registered channels in registration order.
    pub fn channels(&self) -> impl Iterator<Item = &Arc<FeedbackChannel>> {
        self.channels.iter()
    }

    /// Number of registered channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True when no channels are registered.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Snapshot of every motor's current speed.
    pub fn snapshot(&self) -> TachoState {
        let mut motors = heapless::Vec::new();
        for channel in &self.channels {
            // Capacity matches MAX_MOTORS; push cannot fail.
            let _ = motors.push(MotorSpeed {
                id: channel.id(),
                rpm: channel.speed_rpm(),
            });
        }
        TachoState { motors }
    }

    /// Runs every channel's consumer step once.
    ///
    /// Convenience for hosts that drive all channels from a single periodic
    /// task instead of registering one task per channel.
    pub fn tick_all(&self, now_ms: u32) {
        for channel in &self.channels {
            channel.on_tick(now_ms);
        }
    }
}
