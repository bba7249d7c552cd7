//! Periodic consumer tasks on FreeRTOS-backed threads.
//!
//! Each feedback channel's consumer runs on its own named thread with a
//! configurable FreeRTOS priority and core affinity, sleeping out the
//! remainder of its period between ticks.

use std::thread;
use std::time::Duration;

use crate::traits::TickScheduler;
use esp_idf_hal::cpu::Core;
use esp_idf_hal::task::thread::ThreadSpawnConfiguration;

/// Default stack size for consumer tasks, bytes.
const TASK_STACK_SIZE: usize = 4096;

/// Default FreeRTOS priority for consumer tasks.
const TASK_PRIORITY: u8 = 1;

/// Periodic task scheduler backed by FreeRTOS threads.
///
/// The consumer work per tick is tiny (sum 16 integers, one division), so
/// low priority and a small stack are plenty.
///
/// # Example
///
/// ```ignore
/// use esp_idf_hal::cpu::Core;
/// use rs_tacho::hal::esp32::Esp32Ticker;
///
/// let mut ticker = Esp32Ticker::new().pinned_to(Core::Core1);
/// channel.begin(clock, &mut pulse, &mut ticker)?;
/// ```
pub struct Esp32Ticker {
    stack_size: usize,
    priority: u8,
    pin_to_core: Option<Core>,
}

impl Esp32Ticker {
    /// Creates a scheduler with default stack, priority 1 and no affinity.
    pub fn new() -> Self {
        Self {
            stack_size: TASK_STACK_SIZE,
            priority: TASK_PRIORITY,
            pin_to_core: None,
        }
    }

    /// Sets the FreeRTOS priority for tasks spawned by this scheduler.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Pins tasks spawned by this scheduler to the given core.
    pub fn pinned_to(mut self, core: Core) -> Self {
        self.pin_to_core = Some(core);
        self
    }

    /// Sets the stack size for tasks spawned by this scheduler.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = bytes;
        self
    }
}

impl Default for Esp32Ticker {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler for Esp32Ticker {
    type Error = anyhow::Error;

    fn spawn_periodic(
        &mut self,
        name: &str,
        period_ms: u32,
        mut tick: impl FnMut() + Send + 'static,
    ) -> Result<(), Self::Error> {
        // Applies to threads spawned after this call on this core.
        ThreadSpawnConfiguration {
            stack_size: self.stack_size,
            priority: self.priority,
            pin_to_core: self.pin_to_core,
            ..Default::default()
        }
        .set()?;

        let period = Duration::from_millis(u64::from(period_ms));
        thread::Builder::new()
            .name(name.into())
            .stack_size(self.stack_size)
            .spawn(move || loop {
                tick();
                thread::sleep(period);
            })?;

        Ok(())
    }
}
